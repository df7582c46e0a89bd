use std::collections::HashMap;

use shelf_model::{NewReview, Review, ReviewId, review::check_rating};

use super::PatronService;
use crate::api_types::{ReviewInput, ReviewPatch, ReviewUpdate, ReviewView};
use crate::domain::validation::invalid_pk;
use crate::error::{EntityKind, Result, ShelfError};

impl PatronService {
    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.uow.reviews.list_reviews().await
    }

    pub async fn get_review(&self, id: ReviewId) -> Result<Review> {
        self.uow
            .reviews
            .get_review(id)
            .await?
            .ok_or(ShelfError::NotFound(EntityKind::Review))
    }

    /// One review per (book, member); a second one fails with `Validation`.
    pub async fn create_review(&self, input: ReviewInput) -> Result<Review> {
        check_rating(input.rating)?;
        if self.uow.books.get_book(input.book).await?.is_none() {
            return Err(invalid_pk("book", input.book));
        }
        if self.uow.members.get_member(input.member).await?.is_none() {
            return Err(invalid_pk("member", input.member));
        }

        self.uow
            .reviews
            .create_review(NewReview {
                book_id: input.book,
                member_id: input.member,
                rating: input.rating,
                comment: input.comment,
            })
            .await
    }

    pub async fn update_review(
        &self,
        id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review> {
        self.patch_review(id, update.into()).await
    }

    pub async fn patch_review(&self, id: ReviewId, patch: ReviewPatch) -> Result<Review> {
        let mut review = self.get_review(id).await?;

        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(comment) = patch.comment {
            review.comment = comment;
        }
        check_rating(review.rating)?;

        self.uow.reviews.update_review(&review).await
    }

    pub async fn delete_review(&self, id: ReviewId) -> Result<()> {
        if self.uow.reviews.delete_review(id).await? {
            Ok(())
        } else {
            Err(ShelfError::NotFound(EntityKind::Review))
        }
    }

    pub async fn review_view(&self, review: Review) -> Result<ReviewView> {
        let member = self
            .uow
            .members
            .get_member(review.member_id)
            .await?
            .ok_or_else(|| {
                ShelfError::Internal(format!(
                    "review {} points at a missing member",
                    review.id
                ))
            })?;

        Ok(ReviewView {
            review,
            member_name: member.name,
        })
    }

    pub async fn review_views(&self, reviews: Vec<Review>) -> Result<Vec<ReviewView>> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let names: HashMap<_, _> = self
            .uow
            .members
            .list_members()
            .await?
            .into_iter()
            .map(|member| (member.id, member.name))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| {
                let member_name =
                    names.get(&review.member_id).cloned().unwrap_or_default();
                ReviewView {
                    review,
                    member_name,
                }
            })
            .collect())
    }
}
