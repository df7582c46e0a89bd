use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use shelf_model::{
    Borrowing, BorrowingId, Member, MemberId, NewBorrowing, NewMember,
    NewReview, Review, ReviewId, review::check_rating,
};
use tracing::{info, warn};

use super::{InMemoryDatabase, next_id};
use crate::database::ports::borrowings::{
    BorrowingFilter, BorrowingRepository, CheckInOutcome, CheckoutOutcome,
};
use crate::database::ports::{members::MemberRepository, reviews::ReviewRepository};
use crate::error::{EntityKind, Result, ShelfError};

#[async_trait]
impl MemberRepository for InMemoryDatabase {
    async fn create_member(&self, member: NewMember) -> Result<Member> {
        let mut state = self.state.lock().await;

        let mut stored = Member {
            id: MemberId(0),
            name: member.name,
            email: member.email,
            phone: member.phone,
            address: member.address,
            library_id: member.library_id,
            membership_date: Utc::now().date_naive(),
            is_active: member.is_active,
        };
        state.check_member_row(&stored, "Failed to create member")?;

        stored.id = MemberId(next_id(&mut state.sequences.member));
        state.members.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        let state = self.state.lock().await;
        Ok(state.members.get(&id).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>> {
        let state = self.state.lock().await;
        Ok(state.members.values().cloned().collect())
    }

    async fn update_member(&self, member: &Member) -> Result<Member> {
        let mut state = self.state.lock().await;
        let membership_date = state
            .members
            .get(&member.id)
            .map(|stored| stored.membership_date)
            .ok_or(ShelfError::NotFound(EntityKind::Member))?;

        let updated = Member {
            membership_date,
            ..member.clone()
        };
        state.check_member_row(&updated, "Failed to update member")?;

        state.members.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete_member(&self, id: MemberId) -> Result<bool> {
        let mut state = self.state.lock().await;
        if !state.members.contains_key(&id) {
            return Ok(false);
        }

        state.release_held_copies(|loan| loan.member_id == id)?;
        state.members.remove(&id);
        state.drop_member_rows(id);

        info!(member_id = %id, "member deleted");
        Ok(true)
    }

    async fn count_members(&self) -> Result<u64> {
        let state = self.state.lock().await;
        Ok(state.members.len() as u64)
    }
}

#[async_trait]
impl BorrowingRepository for InMemoryDatabase {
    async fn get_borrowing(&self, id: BorrowingId) -> Result<Option<Borrowing>> {
        let state = self.state.lock().await;
        Ok(state.borrowings.get(&id).cloned())
    }

    async fn list_borrowings(
        &self,
        filter: BorrowingFilter,
    ) -> Result<Vec<Borrowing>> {
        let state = self.state.lock().await;
        let mut loans: Vec<Borrowing> = state
            .borrowings
            .values()
            .filter(|loan| filter.matches(loan))
            .cloned()
            .collect();
        loans.sort_by_key(|loan| Reverse((loan.borrow_date, loan.id)));
        Ok(loans)
    }

    async fn count_borrowings(&self, filter: BorrowingFilter) -> Result<u64> {
        let state = self.state.lock().await;
        let count = state
            .borrowings
            .values()
            .filter(|loan| filter.matches(loan))
            .count();
        Ok(count as u64)
    }

    async fn checkout(&self, loan: NewBorrowing) -> Result<CheckoutOutcome> {
        let mut state = self.state.lock().await;

        let has_copy = state
            .books
            .get(&loan.book_id)
            .is_some_and(|book| book.available_copies > 0);
        if !has_copy {
            return Ok(CheckoutOutcome::Unavailable);
        }
        state.ensure_book_and_member(
            loan.book_id,
            loan.member_id,
            "Failed to record borrowing",
        )?;

        if let Some(book) = state.books.get_mut(&loan.book_id) {
            book.available_copies -= 1;
        }
        let id = BorrowingId(next_id(&mut state.sequences.borrowing));
        let borrowing = Borrowing {
            id,
            book_id: loan.book_id,
            member_id: loan.member_id,
            borrow_date: loan.borrow_date,
            due_date: loan.due_date,
            return_date: None,
            is_returned: false,
        };
        state.borrowings.insert(id, borrowing.clone());
        Ok(CheckoutOutcome::Recorded(borrowing))
    }

    async fn record_returned(&self, loan: NewBorrowing) -> Result<Borrowing> {
        let mut state = self.state.lock().await;
        state.ensure_book_and_member(
            loan.book_id,
            loan.member_id,
            "Failed to record borrowing",
        )?;
        let return_date = loan.return_date.ok_or_else(|| {
            ShelfError::validation(
                "return_date",
                "required once a borrowing is returned",
            )
        })?;

        let id = BorrowingId(next_id(&mut state.sequences.borrowing));
        let borrowing = Borrowing {
            id,
            book_id: loan.book_id,
            member_id: loan.member_id,
            borrow_date: loan.borrow_date,
            due_date: loan.due_date,
            return_date: Some(return_date),
            is_returned: true,
        };
        state.borrowings.insert(id, borrowing.clone());
        Ok(borrowing)
    }

    async fn check_in(
        &self,
        id: BorrowingId,
        returned_on: NaiveDate,
    ) -> Result<CheckInOutcome> {
        let mut state = self.state.lock().await;

        let Some(loan) = state.borrowings.get(&id) else {
            return Ok(CheckInOutcome::Missing);
        };
        if loan.is_returned {
            return Ok(CheckInOutcome::AlreadyReturned);
        }
        let book_id = loan.book_id;

        let has_room = state
            .books
            .get(&book_id)
            .is_some_and(|book| book.available_copies < book.total_copies);
        if !has_room {
            warn!(
                borrowing_id = %id,
                book_id = %book_id,
                "check-in would exceed total copies, rolled back"
            );
            return Ok(CheckInOutcome::CopiesOverflow { book_id });
        }

        if let Some(book) = state.books.get_mut(&book_id) {
            book.available_copies += 1;
        }
        let Some(loan) = state.borrowings.get_mut(&id) else {
            return Ok(CheckInOutcome::Missing);
        };
        loan.is_returned = true;
        loan.return_date = Some(returned_on);
        Ok(CheckInOutcome::Returned(loan.clone()))
    }

    async fn update_due_date(
        &self,
        id: BorrowingId,
        due_date: NaiveDate,
    ) -> Result<Option<Borrowing>> {
        let mut state = self.state.lock().await;
        Ok(state.borrowings.get_mut(&id).map(|loan| {
            loan.due_date = due_date;
            loan.clone()
        }))
    }

    async fn delete_borrowing(&self, id: BorrowingId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some(loan) = state.borrowings.get(&id) else {
            return Ok(false);
        };

        if loan.is_active() {
            let book_id = loan.book_id;
            state.release_held_copies(|held| held.id == id)?;
            info!(borrowing_id = %id, book_id = %book_id, "active loan deleted, copy released");
        }
        state.borrowings.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryDatabase {
    async fn create_review(&self, review: NewReview) -> Result<Review> {
        let mut state = self.state.lock().await;
        state.ensure_book_and_member(
            review.book_id,
            review.member_id,
            "Failed to create review",
        )?;
        check_rating(review.rating)?;

        let duplicate = state.reviews.values().any(|existing| {
            existing.book_id == review.book_id
                && existing.member_id == review.member_id
        });
        if duplicate {
            return Err(ShelfError::validation(
                "non_field_errors",
                "The fields book, member must make a unique set.",
            ));
        }

        let id = ReviewId(next_id(&mut state.sequences.review));
        let review = Review {
            id,
            book_id: review.book_id,
            member_id: review.member_id,
            rating: review.rating,
            comment: review.comment,
            created_at: Utc::now(),
        };
        state.reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
        let state = self.state.lock().await;
        Ok(state.reviews.get(&id).cloned())
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let state = self.state.lock().await;
        Ok(state.reviews.values().cloned().collect())
    }

    async fn update_review(&self, review: &Review) -> Result<Review> {
        check_rating(review.rating)?;

        let mut state = self.state.lock().await;
        let stored = state
            .reviews
            .get_mut(&review.id)
            .ok_or(ShelfError::NotFound(EntityKind::Review))?;
        stored.rating = review.rating;
        stored.comment = review.comment.clone();
        Ok(stored.clone())
    }

    async fn delete_review(&self, id: ReviewId) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state.reviews.remove(&id).is_some())
    }

    async fn average_rating(&self) -> Result<Option<f64>> {
        let state = self.state.lock().await;
        if state.reviews.is_empty() {
            return Ok(None);
        }
        let sum: f64 = state.reviews.values().map(|r| f64::from(r.rating)).sum();
        Ok(Some(sum / state.reviews.len() as f64))
    }
}
