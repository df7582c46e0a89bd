use std::collections::HashMap;

use chrono::Utc;
use shelf_model::{
    AvailabilityReport, BookId, Borrowing, BorrowingId, MemberId, NewBorrowing,
};
use tracing::{info, instrument, warn};

use super::LoanPolicy;
use crate::api_types::{
    BookSummary, BorrowingInput, BorrowingPatch, BorrowingUpdate, BorrowingView,
};
use crate::application::AppUnitOfWork;
use crate::database::ports::borrowings::{
    BorrowingFilter, CheckInOutcome, CheckoutOutcome,
};
use crate::domain::validation::invalid_pk;
use crate::error::{ConflictKind, EntityKind, Result, ShelfError};

#[derive(Clone, Debug)]
pub struct CirculationService {
    uow: AppUnitOfWork,
    policy: LoanPolicy,
}

impl CirculationService {
    pub fn new(uow: AppUnitOfWork, policy: LoanPolicy) -> Self {
        Self { uow, policy }
    }

    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }

    /// Lend one copy of `book_id` to `member_id` for `days` (default from
    /// the policy).
    ///
    /// Checks run in order: book exists, member exists, `days` is within
    /// the policy, a copy is free, the member is active. The copy is claimed
    /// and the loan recorded in one atomic step, so of several callers racing
    /// for the last copy exactly one succeeds and the rest see
    /// `BookUnavailable`.
    #[instrument(skip(self))]
    pub async fn borrow_book(
        &self,
        book_id: BookId,
        member_id: MemberId,
        days: Option<i64>,
    ) -> Result<Borrowing> {
        let book = self
            .uow
            .books
            .get_book(book_id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Book))?;
        let member = self
            .uow
            .members
            .get_member(member_id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Member))?;
        let days = self.policy.loan_days(days)?;

        if !book.is_available() {
            warn!("borrow rejected: no copies available");
            return Err(ConflictKind::BookUnavailable.into());
        }
        if !member.is_active {
            warn!("borrow rejected: member inactive");
            return Err(ConflictKind::MemberInactive.into());
        }

        let now = Utc::now();
        let due_date = self.policy.due_date(now.date_naive(), days)?;
        let loan = NewBorrowing::active(book_id, member_id, now, due_date);

        match self.uow.borrowings.checkout(loan).await? {
            CheckoutOutcome::Recorded(borrowing) => {
                info!(borrowing_id = %borrowing.id, %due_date, "book borrowed");
                Ok(borrowing)
            }
            CheckoutOutcome::Unavailable => {
                warn!("borrow rejected: last copy claimed concurrently");
                Err(ConflictKind::BookUnavailable.into())
            }
        }
    }

    /// Close an active loan today and give its copy back.
    ///
    /// A copy count already at `total_copies` is an accounting fault: the
    /// return fails with `Invariant` and nothing is written.
    #[instrument(skip(self))]
    pub async fn return_book(&self, borrowing_id: BorrowingId) -> Result<Borrowing> {
        let today = Utc::now().date_naive();

        match self.uow.borrowings.check_in(borrowing_id, today).await? {
            CheckInOutcome::Returned(borrowing) => {
                info!(book_id = %borrowing.book_id, "book returned");
                Ok(borrowing)
            }
            CheckInOutcome::AlreadyReturned => {
                warn!("return rejected: already returned");
                Err(ConflictKind::AlreadyReturned.into())
            }
            CheckInOutcome::Missing => Err(ShelfError::NotFound(EntityKind::Borrowing)),
            CheckInOutcome::CopiesOverflow { book_id } => {
                Err(ShelfError::Invariant(format!(
                    "returning borrowing {borrowing_id} would push book {book_id} \
                     past its total copies"
                )))
            }
        }
    }

    pub async fn availability(&self, book_id: BookId) -> Result<AvailabilityReport> {
        let book = self
            .uow
            .books
            .get_book(book_id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Book))?;

        Ok(AvailabilityReport {
            book_id: book.id,
            is_available: book.is_available(),
            title: book.title,
            available_copies: book.available_copies,
            total_copies: book.total_copies,
        })
    }

    /// The member's borrowings, newest first.
    pub async fn member_borrowings(&self, member_id: MemberId) -> Result<Vec<Borrowing>> {
        if self.uow.members.get_member(member_id).await?.is_none() {
            return Err(ShelfError::NotFound(EntityKind::Member));
        }

        self.uow
            .borrowings
            .list_borrowings(BorrowingFilter::for_member(member_id))
            .await
    }

    pub async fn list_borrowings(&self) -> Result<Vec<Borrowing>> {
        self.uow
            .borrowings
            .list_borrowings(BorrowingFilter::default())
            .await
    }

    pub async fn get_borrowing(&self, id: BorrowingId) -> Result<Borrowing> {
        self.uow
            .borrowings
            .get_borrowing(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Borrowing))
    }

    /// Record a borrowing directly. An active one goes through the same
    /// checks and atomic claim as `borrow_book`, with the caller's due date.
    /// A returned one is history and leaves copy counts alone.
    pub async fn create_borrowing(&self, input: BorrowingInput) -> Result<Borrowing> {
        let book = self
            .uow
            .books
            .get_book(input.book)
            .await?
            .ok_or_else(|| invalid_pk("book", input.book))?;
        let member = self
            .uow
            .members
            .get_member(input.member)
            .await?
            .ok_or_else(|| invalid_pk("member", input.member))?;
        let now = Utc::now();

        if input.is_returned {
            let loan = NewBorrowing {
                book_id: book.id,
                member_id: member.id,
                borrow_date: now,
                due_date: input.due_date,
                return_date: Some(input.return_date.unwrap_or(now.date_naive())),
                is_returned: true,
            };
            return self.uow.borrowings.record_returned(loan).await;
        }

        if input.return_date.is_some() {
            return Err(ShelfError::validation(
                "return_date",
                "must be empty while the borrowing is active",
            ));
        }
        if !book.is_available() {
            return Err(ConflictKind::BookUnavailable.into());
        }
        if !member.is_active {
            return Err(ConflictKind::MemberInactive.into());
        }

        let loan = NewBorrowing::active(book.id, member.id, now, input.due_date);
        match self.uow.borrowings.checkout(loan).await? {
            CheckoutOutcome::Recorded(borrowing) => {
                info!(borrowing_id = %borrowing.id, book_id = %book.id, "borrowing recorded");
                Ok(borrowing)
            }
            CheckoutOutcome::Unavailable => Err(ConflictKind::BookUnavailable.into()),
        }
    }

    pub async fn update_borrowing(
        &self,
        id: BorrowingId,
        update: BorrowingUpdate,
    ) -> Result<Borrowing> {
        self.uow
            .borrowings
            .update_due_date(id, update.due_date)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Borrowing))
    }

    pub async fn patch_borrowing(
        &self,
        id: BorrowingId,
        patch: BorrowingPatch,
    ) -> Result<Borrowing> {
        match patch.due_date {
            Some(due_date) => {
                self.update_borrowing(id, BorrowingUpdate { due_date }).await
            }
            None => self.get_borrowing(id).await,
        }
    }

    /// Deleting an active borrowing releases its copy.
    pub async fn delete_borrowing(&self, id: BorrowingId) -> Result<()> {
        if self.uow.borrowings.delete_borrowing(id).await? {
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Borrowing))
        }
    }

    pub async fn borrowing_view(&self, borrowing: Borrowing) -> Result<BorrowingView> {
        let mut views = self.borrowing_views(vec![borrowing]).await?;
        views
            .pop()
            .ok_or_else(|| ShelfError::Internal("borrowing view missing".to_string()))
    }

    /// Attach `book_details` and `member_name`, reading each referenced book
    /// and member once.
    pub async fn borrowing_views(
        &self,
        borrowings: Vec<Borrowing>,
    ) -> Result<Vec<BorrowingView>> {
        let mut books: HashMap<BookId, BookSummary> = HashMap::new();
        let mut members: HashMap<MemberId, String> = HashMap::new();
        let mut views = Vec::with_capacity(borrowings.len());

        for borrowing in borrowings {
            let book_details = match books.get(&borrowing.book_id) {
                Some(summary) => summary.clone(),
                None => {
                    let book = self
                        .uow
                        .books
                        .get_book(borrowing.book_id)
                        .await?
                        .ok_or_else(|| dangling(borrowing.id, "book"))?;
                    let summary = BookSummary::from(&book);
                    books.insert(book.id, summary.clone());
                    summary
                }
            };
            let member_name = match members.get(&borrowing.member_id) {
                Some(name) => name.clone(),
                None => {
                    let member = self
                        .uow
                        .members
                        .get_member(borrowing.member_id)
                        .await?
                        .ok_or_else(|| dangling(borrowing.id, "member"))?;
                    members.insert(member.id, member.name.clone());
                    member.name
                }
            };

            views.push(BorrowingView {
                borrowing,
                book_details,
                member_name,
            });
        }

        Ok(views)
    }
}

fn dangling(id: BorrowingId, what: &str) -> ShelfError {
    ShelfError::Internal(format!("borrowing {id} points at a missing {what}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use shelf_model::{Book, LibraryId, Member};

    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::database::ports::books::MockBookRepository;
    use crate::database::ports::borrowings::MockBorrowingRepository;
    use crate::database::ports::members::MockMemberRepository;

    fn book(available: i32) -> Book {
        Book {
            id: BookId(7),
            title: "Dune".into(),
            isbn: "9780441013593".into(),
            library_id: LibraryId(1),
            author_ids: vec![],
            category_ids: vec![],
            publication_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            publisher: "Chilton".into(),
            total_copies: 1,
            available_copies: available,
            description: String::new(),
        }
    }

    fn member(is_active: bool) -> Member {
        Member {
            id: MemberId(3),
            name: "Paul".into(),
            email: "paul@arrakis.test".into(),
            phone: "1".into(),
            address: "Sietch Tabr".into(),
            library_id: LibraryId(1),
            membership_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            is_active,
        }
    }

    fn service(
        books: MockBookRepository,
        members: MockMemberRepository,
        borrowings: MockBorrowingRepository,
    ) -> CirculationService {
        let uow = AppUnitOfWork::builder()
            .with_memory(InMemoryDatabase::new())
            .with_books(Arc::new(books))
            .with_members(Arc::new(members))
            .with_borrowings(Arc::new(borrowings))
            .build()
            .expect("all repositories provided");
        CirculationService::new(uow, LoanPolicy::default())
    }

    #[tokio::test]
    async fn losing_the_checkout_race_is_book_unavailable() {
        let mut books = MockBookRepository::new();
        books.expect_get_book().returning(|_| Ok(Some(book(1))));
        let mut members = MockMemberRepository::new();
        members.expect_get_member().returning(|_| Ok(Some(member(true))));
        let mut borrowings = MockBorrowingRepository::new();
        borrowings
            .expect_checkout()
            .times(1)
            .returning(|_| Ok(CheckoutOutcome::Unavailable));

        let err = service(books, members, borrowings)
            .borrow_book(BookId(7), MemberId(3), None)
            .await
            .unwrap_err();
        assert_eq!(err.conflict(), Some(ConflictKind::BookUnavailable));
    }

    #[tokio::test]
    async fn unavailable_book_is_checked_before_inactive_member() {
        let mut books = MockBookRepository::new();
        books.expect_get_book().returning(|_| Ok(Some(book(0))));
        let mut members = MockMemberRepository::new();
        members.expect_get_member().returning(|_| Ok(Some(member(false))));
        let mut borrowings = MockBorrowingRepository::new();
        borrowings.expect_checkout().never();

        let err = service(books, members, borrowings)
            .borrow_book(BookId(7), MemberId(3), Some(7))
            .await
            .unwrap_err();
        assert_eq!(err.conflict(), Some(ConflictKind::BookUnavailable));
    }

    #[tokio::test]
    async fn missing_member_is_not_found_after_book_lookup() {
        let mut books = MockBookRepository::new();
        books.expect_get_book().times(1).returning(|_| Ok(Some(book(1))));
        let mut members = MockMemberRepository::new();
        members.expect_get_member().returning(|_| Ok(None));

        let err = service(books, members, MockBorrowingRepository::new())
            .borrow_book(BookId(7), MemberId(99), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(EntityKind::Member)));
    }

    #[tokio::test]
    async fn due_date_follows_requested_days() {
        let mut books = MockBookRepository::new();
        books.expect_get_book().returning(|_| Ok(Some(book(1))));
        let mut members = MockMemberRepository::new();
        members.expect_get_member().returning(|_| Ok(Some(member(true))));
        let mut borrowings = MockBorrowingRepository::new();
        borrowings.expect_checkout().returning(|loan| {
            Ok(CheckoutOutcome::Recorded(Borrowing {
                id: BorrowingId(1),
                book_id: loan.book_id,
                member_id: loan.member_id,
                borrow_date: loan.borrow_date,
                due_date: loan.due_date,
                return_date: None,
                is_returned: false,
            }))
        });

        let borrowing = service(books, members, borrowings)
            .borrow_book(BookId(7), MemberId(3), Some(21))
            .await
            .unwrap();
        let expected = borrowing.borrow_date.date_naive() + chrono::Days::new(21);
        assert_eq!(borrowing.due_date, expected);
    }

    #[tokio::test]
    async fn overflowing_check_in_is_an_invariant_fault() {
        let mut borrowings = MockBorrowingRepository::new();
        borrowings
            .expect_check_in()
            .returning(|_, _| Ok(CheckInOutcome::CopiesOverflow { book_id: BookId(7) }));

        let err = service(
            MockBookRepository::new(),
            MockMemberRepository::new(),
            borrowings,
        )
        .return_book(BorrowingId(5))
        .await
        .unwrap_err();
        assert!(matches!(err, ShelfError::Invariant(_)));
    }

    #[tokio::test]
    async fn check_in_outcomes_map_to_errors() {
        let mut borrowings = MockBorrowingRepository::new();
        let mut outcomes =
            vec![CheckInOutcome::Missing, CheckInOutcome::AlreadyReturned].into_iter();
        borrowings
            .expect_check_in()
            .times(2)
            .returning(move |_, _| Ok(outcomes.next().unwrap()));
        let svc = service(
            MockBookRepository::new(),
            MockMemberRepository::new(),
            borrowings,
        );

        let missing = svc.return_book(BorrowingId(1)).await.unwrap_err();
        assert!(matches!(missing, ShelfError::NotFound(EntityKind::Borrowing)));
        let again = svc.return_book(BorrowingId(1)).await.unwrap_err();
        assert_eq!(again.conflict(), Some(ConflictKind::AlreadyReturned));
    }
}
