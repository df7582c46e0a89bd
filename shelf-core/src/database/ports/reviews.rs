use async_trait::async_trait;
use shelf_model::{NewReview, Review, ReviewId};

use crate::error::Result;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// A second review for the same (book, member) fails with `Validation`.
    async fn create_review(&self, review: NewReview) -> Result<Review>;

    async fn get_review(&self, id: ReviewId) -> Result<Option<Review>>;

    async fn list_reviews(&self) -> Result<Vec<Review>>;

    /// Persist rating and comment.
    async fn update_review(&self, review: &Review) -> Result<Review>;

    async fn delete_review(&self, id: ReviewId) -> Result<bool>;

    /// Mean rating over all reviews, `None` when there are none.
    async fn average_rating(&self) -> Result<Option<f64>>;
}
