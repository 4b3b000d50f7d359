use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        CategoryRepository, CourseRepository, EnrollmentRepository, MongoCategoryRepository,
        MongoCourseRepository, MongoEnrollmentRepository, MongoPaymentRepository,
        MongoQuizRepository, MongoRefreshTokenRepository, MongoUserRepository, PaymentRepository,
        QuizRepository, RefreshTokenRepository, UserRepository,
    },
    services::{
        AuthService, CategoryService, CourseService, EnrollmentService, QuizService, UserService,
    },
};

/// Process-wide state, constructed once at startup and shared by handle. The
/// store connection lives here explicitly rather than in a framework-managed
/// singleton.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub category_service: Arc<CategoryService>,
    pub course_service: Arc<CourseService>,
    pub enrollment_service: Arc<EnrollmentService>,
    pub quiz_service: Arc<QuizService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));
        let category_repository: Arc<dyn CategoryRepository> =
            Arc::new(MongoCategoryRepository::new(&db));
        let course_repository: Arc<dyn CourseRepository> =
            Arc::new(MongoCourseRepository::new(&db));
        let enrollment_repository: Arc<dyn EnrollmentRepository> =
            Arc::new(MongoEnrollmentRepository::new(&db));
        let payment_repository: Arc<dyn PaymentRepository> =
            Arc::new(MongoPaymentRepository::new(&db));
        let quiz_repository: Arc<dyn QuizRepository> = Arc::new(MongoQuizRepository::new(&db));
        let refresh_token_repository: Arc<dyn RefreshTokenRepository> =
            Arc::new(MongoRefreshTokenRepository::new(&db));

        user_repository.ensure_indexes().await?;
        category_repository.ensure_indexes().await?;
        course_repository.ensure_indexes().await?;
        enrollment_repository.ensure_indexes().await?;
        payment_repository.ensure_indexes().await?;
        quiz_repository.ensure_indexes().await?;
        refresh_token_repository.ensure_indexes().await?;

        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.refresh_expiration_hours,
        ));

        let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_service),
            Arc::clone(&refresh_token_repository),
            Arc::clone(&jwt_service),
        ));
        let category_service = Arc::new(CategoryService::new(Arc::clone(&category_repository)));
        let course_service = Arc::new(CourseService::new(
            Arc::clone(&course_repository),
            Arc::clone(&category_repository),
            Arc::clone(&enrollment_repository),
        ));
        let enrollment_service = Arc::new(EnrollmentService::new(
            Arc::clone(&enrollment_repository),
            Arc::clone(&course_repository),
            Arc::clone(&payment_repository),
        ));
        let quiz_service = Arc::new(QuizService::new(
            Arc::clone(&quiz_repository),
            Arc::clone(&course_repository),
            Arc::clone(&enrollment_repository),
        ));

        auth_service.purge_expired_tokens().await?;

        Ok(Self {
            db,
            user_service,
            auth_service,
            category_service,
            course_service,
            enrollment_service,
            quiz_service,
            jwt_service,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
