pub mod auth_service;
pub mod category_service;
pub mod course_service;
pub mod enrollment_service;
pub mod quiz_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use category_service::CategoryService;
pub use course_service::CourseService;
pub use enrollment_service::EnrollmentService;
pub use quiz_service::QuizService;
pub use user_service::UserService;
