pub mod category_repository;
pub mod course_repository;
pub mod enrollment_repository;
pub mod payment_repository;
pub mod quiz_repository;
pub mod refresh_token_repository;
pub mod user_repository;

pub use category_repository::{CategoryRepository, MongoCategoryRepository};
pub use course_repository::{CourseRepository, MongoCourseRepository};
pub use enrollment_repository::{EnrollmentRepository, MongoEnrollmentRepository};
pub use payment_repository::{MongoPaymentRepository, PaymentRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use refresh_token_repository::{MongoRefreshTokenRepository, RefreshTokenRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

use mongodb::bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

/// Parses a caller-supplied hex document id, rejecting malformed input before
/// it reaches a query.
pub fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError(format!("Invalid id '{}'", id)))
}
