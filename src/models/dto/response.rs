use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::user::{InstructorProfile, Preferences, UserProfile, UserRole};
use crate::models::domain::User;

/// User shape safe to return to callers: no password hash.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_profile: Option<InstructorProfile>,
    pub preferences: Preferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id_hex().unwrap_or_default(),
            name: user.name,
            email: user.email,
            role: user.role,
            profile: user.profile,
            instructor_profile: user.instructor_profile,
            preferences: user.preferences,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Course analytics computed on read from the enrollment ledger; never stored.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct CourseAnalytics {
    pub enrollment_count: i64,
    /// Share of enrollments with completed status, 0-100.
    pub completion_rate: f64,
    /// Mean of embedded review ratings, 0 when unreviewed.
    pub average_rating: f64,
    /// Sum of completed payment amounts in USD.
    pub total_revenue: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        HealthResponse {
            status: "healthy",
            timestamp: Utc::now(),
            database: "connected",
            platform: Some("MaLearn E-Learning Platform"),
            version: Some(env!("CARGO_PKG_VERSION")),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        HealthResponse {
            status: "unhealthy",
            timestamp: Utc::now(),
            database: "disconnected",
            platform: None,
            version: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_omits_password_hash() {
        let user = User::test_student("student@example.com");
        let dto: UserDto = user.into();

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "student@example.com");
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn test_health_response_shapes() {
        let healthy = HealthResponse::healthy();
        assert_eq!(healthy.status, "healthy");
        assert_eq!(healthy.database, "connected");
        assert!(healthy.error.is_none());

        let unhealthy = HealthResponse::unhealthy("connection refused".to_string());
        assert_eq!(unhealthy.status, "unhealthy");
        assert_eq!(unhealthy.database, "disconnected");
        assert!(unhealthy.error.is_some());
    }
}
