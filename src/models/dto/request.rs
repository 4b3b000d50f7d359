use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::course::{
    CourseDuration, CourseLanguage, CourseStatus, CurriculumSection, Difficulty, Price,
};
use crate::models::domain::enrollment::{
    Currency, EnrollmentStatus, PaymentInfo, PaymentMethod, PaymentStatus,
};
use crate::models::domain::quiz::{QuizQuestion, QuizSettings, QuizStatus};
use crate::models::domain::user::{InstructorProfile, Preferences, UserProfile, UserRole};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Defaults to student when omitted.
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub profile: Option<UserProfile>,
    pub instructor_profile: Option<InstructorProfile>,
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Derived from the title when omitted.
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 200))]
    pub short_description: String,

    /// Admins may assign any instructor; instructors always create for
    /// themselves and may omit this.
    pub instructor_id: Option<String>,

    pub category_id: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub thumbnail_url: Option<String>,
    pub trailer_url: Option<String>,

    pub price: Price,
    pub duration: CourseDuration,
    pub difficulty: Difficulty,
    pub language: CourseLanguage,

    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub what_you_will_learn: Vec<String>,
    #[serde(default)]
    pub curriculum: Vec<CurriculumSection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub short_description: Option<String>,

    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub thumbnail_url: Option<String>,
    pub trailer_url: Option<String>,
    pub price: Option<Price>,
    pub duration: Option<CourseDuration>,
    pub difficulty: Option<Difficulty>,
    pub language: Option<CourseLanguage>,
    pub requirements: Option<Vec<String>>,
    pub what_you_will_learn: Option<Vec<String>>,
    pub curriculum: Option<Vec<CurriculumSection>>,
    pub status: Option<CourseStatus>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,

    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,

    pub currency: Option<Currency>,
}

impl From<PaymentInput> for PaymentInfo {
    fn from(input: PaymentInput) -> Self {
        let paid_at = match input.status {
            PaymentStatus::Completed => Some(chrono::Utc::now()),
            _ => None,
        };
        PaymentInfo {
            method: input.method,
            status: input.status,
            transaction_id: input.transaction_id,
            amount: input.amount,
            currency: input.currency.unwrap_or_default(),
            paid_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct EnrollRequest {
    pub course_id: String,

    /// Admins may enroll any student; students always enroll themselves and
    /// may omit this.
    pub student_id: Option<String>,

    #[validate(nested)]
    pub payment: Option<PaymentInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct LessonCompletionRequest {
    #[validate(length(min = 1))]
    pub lesson_id: String,

    pub watch_time_seconds: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, InputObject)]
pub struct SetEnrollmentStatusRequest {
    pub status: EnrollmentStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct ReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub course_id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub questions: Vec<QuizQuestion>,

    pub settings: Option<QuizSettings>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub questions: Option<Vec<QuizQuestion>>,
    pub settings: Option<QuizSettings>,
    pub status: Option<QuizStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
