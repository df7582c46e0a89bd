mod support;

use anyhow::Result;
use chrono::{Days, Utc};
use futures::future::join_all;
use shelf_core::api_types::{BookPatch, BorrowingInput, BorrowingPatch};
use shelf_core::model::{BookId, BorrowingId, MemberId};
use shelf_core::{ConflictKind, EntityKind, ShelfError};

use support::Fixture;

#[tokio::test]
async fn borrow_then_return_restores_copies() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "The Hobbit", "9780261102217", 3).await;
    let member = fx.member(&library, "Bilbo", true).await;

    let borrowing = fx.circulation.borrow_book(book.id, member.id, None).await?;
    assert!(!borrowing.is_returned);
    assert_eq!(borrowing.return_date, None);
    assert_eq!(
        borrowing.due_date,
        borrowing.borrow_date.date_naive() + Days::new(14)
    );
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 2);

    let returned = fx.circulation.return_book(borrowing.id).await?;
    assert!(returned.is_returned);
    assert_eq!(returned.return_date, Some(Utc::now().date_naive()));
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 3);
    Ok(())
}

#[tokio::test]
async fn borrowing_without_copies_records_nothing() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Silmarillion", "9780261102736", 0).await;
    let member = fx.member(&library, "Frodo", true).await;

    let err = fx
        .circulation
        .borrow_book(book.id, member.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.conflict(), Some(ConflictKind::BookUnavailable));
    assert!(fx.circulation.list_borrowings().await?.is_empty());
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 0);
    Ok(())
}

#[tokio::test]
async fn inactive_member_cannot_borrow() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Unfinished Tales", "9780261102156", 1).await;
    let member = fx.member(&library, "Lobelia", false).await;

    let err = fx
        .circulation
        .borrow_book(book.id, member.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.conflict(), Some(ConflictKind::MemberInactive));
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 1);
    Ok(())
}

#[tokio::test]
async fn missing_book_and_member_are_not_found() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Beren and Luthien", "9780008214197", 1).await;

    let err = fx
        .circulation
        .borrow_book(BookId(404), MemberId(404), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFound(EntityKind::Book)));

    let err = fx
        .circulation
        .borrow_book(book.id, MemberId(404), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFound(EntityKind::Member)));

    // lookups come before the loan length check
    let err = fx
        .circulation
        .borrow_book(BookId(404), MemberId(404), Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFound(EntityKind::Book)));

    let err = fx
        .circulation
        .borrow_book(book.id, MemberId(404), Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFound(EntityKind::Member)));

    let err = fx.circulation.return_book(BorrowingId(404)).await.unwrap_err();
    assert!(matches!(err, ShelfError::NotFound(EntityKind::Borrowing)));
    Ok(())
}

#[tokio::test]
async fn second_return_is_rejected_without_double_increment() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "The Two Towers", "9780261102361", 2).await;
    let member = fx.member(&library, "Sam", true).await;

    let borrowing = fx.circulation.borrow_book(book.id, member.id, Some(7)).await?;
    fx.circulation.return_book(borrowing.id).await?;

    let err = fx.circulation.return_book(borrowing.id).await.unwrap_err();
    assert_eq!(err.conflict(), Some(ConflictKind::AlreadyReturned));
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 2);
    Ok(())
}

#[tokio::test]
async fn return_into_a_full_book_is_an_invariant_fault() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Return of the King", "9780261102378", 1).await;
    let member = fx.member(&library, "Pippin", true).await;

    let borrowing = fx.circulation.borrow_book(book.id, member.id, None).await?;
    // Someone bumps the count back by hand while the loan is still open.
    fx.catalog
        .patch_book(
            book.id,
            BookPatch {
                available_copies: Some(1),
                ..Default::default()
            },
        )
        .await?;

    let err = fx.circulation.return_book(borrowing.id).await.unwrap_err();
    assert!(matches!(err, ShelfError::Invariant(_)));

    let stored = fx.circulation.get_borrowing(borrowing.id).await?;
    assert!(!stored.is_returned, "rolled back");
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 1);
    Ok(())
}

#[tokio::test]
async fn loan_days_outside_policy_are_rejected() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Farmer Giles", "9780261102927", 1).await;
    let member = fx.member(&library, "Merry", true).await;

    for days in [0, 366] {
        let err = fx
            .circulation
            .borrow_book(book.id, member.id, Some(days))
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::Validation { field: "days", .. }));
    }
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_borrows_of_last_copy_admit_exactly_one() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "The Fall of Gondolin", "9780008302757", 1).await;

    let mut members = Vec::new();
    for i in 0..8 {
        members.push(fx.member(&library, &format!("Elf{i}"), true).await);
    }

    let attempts = members.iter().map(|member| {
        let circulation = fx.circulation.clone();
        let (book_id, member_id) = (book.id, member.id);
        tokio::spawn(async move { circulation.borrow_book(book_id, member_id, None).await })
    });
    let results = join_all(attempts).await;

    let mut successes = 0;
    let mut unavailable = 0;
    for joined in results {
        match joined? {
            Ok(_) => successes += 1,
            Err(err) if err.conflict() == Some(ConflictKind::BookUnavailable) => {
                unavailable += 1
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(unavailable, 7);
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 0);
    assert_eq!(fx.circulation.list_borrowings().await?.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn metadata_edits_during_borrows_keep_copy_accounting() -> Result<()> {
    for round in 0..5 {
        let fx = Fixture::new();
        let library = fx.library("Central").await;
        let book = fx.book(&library, "The Silmarillion", "9780261102736", 40).await;

        let mut members = Vec::new();
        for i in 0..40 {
            members.push(fx.member(&library, &format!("Reader{i}"), true).await);
        }

        let mut tasks = Vec::new();
        for (i, member) in members.iter().enumerate() {
            let circulation = fx.circulation.clone();
            let (book_id, member_id) = (book.id, member.id);
            tasks.push(tokio::spawn(async move {
                circulation.borrow_book(book_id, member_id, None).await.map(|_| ())
            }));

            let catalog = fx.catalog.clone();
            let patch = BookPatch {
                description: Some(format!("edition note {i}")),
                ..Default::default()
            };
            tasks.push(tokio::spawn(async move {
                catalog.patch_book(book_id, patch).await.map(|_| ())
            }));
        }
        for joined in join_all(tasks).await {
            joined??;
        }

        let stored = fx.catalog.get_book(book.id).await?;
        let active = fx
            .circulation
            .list_borrowings()
            .await?
            .into_iter()
            .filter(|loan| !loan.is_returned)
            .count();
        assert_eq!(active, 40, "round {round}");
        assert_eq!(stored.available_copies, 0, "round {round}");
        assert_eq!(stored.total_copies, 40, "round {round}");
    }
    Ok(())
}

#[tokio::test]
async fn member_borrowings_are_newest_first() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let first = fx.book(&library, "Leaf by Niggle", "9780007105045", 1).await;
    let second = fx.book(&library, "Smith of Wootton", "9780261102248", 1).await;
    let member = fx.member(&library, "Tom", true).await;
    let other = fx.member(&library, "Goldberry", true).await;

    let older = fx.circulation.borrow_book(first.id, member.id, None).await?;
    let newer = fx.circulation.borrow_book(second.id, member.id, None).await?;
    fx.circulation.return_book(older.id).await?;
    fx.circulation.borrow_book(first.id, other.id, None).await?;

    let listed = fx.circulation.member_borrowings(member.id).await?;
    let ids: Vec<_> = listed.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let err = fx
        .circulation
        .member_borrowings(MemberId(404))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn availability_reports_copy_counts() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Roverandom", "9780261103191", 1).await;
    let member = fx.member(&library, "Rover", true).await;

    let report = fx.circulation.availability(book.id).await?;
    assert!(report.is_available);
    assert_eq!((report.available_copies, report.total_copies), (1, 1));

    fx.circulation.borrow_book(book.id, member.id, None).await?;
    let report = fx.circulation.availability(book.id).await?;
    assert!(!report.is_available);
    assert_eq!(report.title, "Roverandom");

    assert!(fx.circulation.availability(BookId(404)).await.is_err());
    Ok(())
}

#[tokio::test]
async fn direct_borrowing_records_follow_the_lifecycle_rules() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Mr. Bliss", "9780261102989", 1).await;
    let member = fx.member(&library, "Bliss", true).await;
    let due = Utc::now().date_naive() + Days::new(3);

    let active = fx
        .circulation
        .create_borrowing(BorrowingInput {
            book: book.id,
            member: member.id,
            due_date: due,
            return_date: None,
            is_returned: false,
        })
        .await?;
    assert_eq!(active.due_date, due);
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 0);

    let history = fx
        .circulation
        .create_borrowing(BorrowingInput {
            book: book.id,
            member: member.id,
            due_date: due,
            return_date: None,
            is_returned: true,
        })
        .await?;
    assert!(history.is_returned);
    assert!(history.return_date.is_some());
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 0);

    let err = fx
        .circulation
        .create_borrowing(BorrowingInput {
            book: book.id,
            member: member.id,
            due_date: due,
            return_date: None,
            is_returned: false,
        })
        .await
        .unwrap_err();
    assert_eq!(err.conflict(), Some(ConflictKind::BookUnavailable));

    let later = due + Days::new(7);
    let patched = fx
        .circulation
        .patch_borrowing(active.id, BorrowingPatch { due_date: Some(later) })
        .await?;
    assert_eq!(patched.due_date, later);
    assert!(!patched.is_returned);
    Ok(())
}

#[tokio::test]
async fn deleting_an_active_borrowing_releases_its_copy() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "The Homecoming", "9780048220161", 2).await;
    let member = fx.member(&library, "Torhthelm", true).await;

    let active = fx.circulation.borrow_book(book.id, member.id, None).await?;
    let returned = fx.circulation.borrow_book(book.id, member.id, None).await?;
    fx.circulation.return_book(returned.id).await?;
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 1);

    fx.circulation.delete_borrowing(returned.id).await?;
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 1);

    fx.circulation.delete_borrowing(active.id).await?;
    assert_eq!(fx.catalog.get_book(book.id).await?.available_copies, 2);

    let err = fx.circulation.delete_borrowing(active.id).await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn borrowing_views_embed_book_and_member() -> Result<()> {
    let fx = Fixture::new();
    let library = fx.library("Central").await;
    let book = fx.book(&library, "Tree and Leaf", "9780261102729", 1).await;
    let member = fx.member(&library, "Niggle", true).await;

    let borrowing = fx.circulation.borrow_book(book.id, member.id, None).await?;
    let view = fx.circulation.borrowing_view(borrowing).await?;
    assert_eq!(view.member_name, "Niggle");
    assert_eq!(view.book_details.title, "Tree and Leaf");
    assert_eq!(view.book_details.available_copies, 0);

    let json = serde_json::to_value(&view)?;
    assert_eq!(json["book"], book.id.get());
    assert_eq!(json["member"], member.id.get());
    assert_eq!(json["book_details"]["isbn"], "9780261102729");
    Ok(())
}
