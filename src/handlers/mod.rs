pub mod auth_handler;
pub mod category_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod user_handler;

pub use auth_handler::{login, logout, me, refresh_token, register};
pub use category_handler::{create_category, delete_category, list_categories};
pub use course_handler::{
    course_analytics, create_course, delete_course, get_course_by_slug, list_courses, my_courses,
    update_course,
};
pub use enrollment_handler::{
    add_review, course_enrollments, delete_enrollment, enroll, get_enrollment, issue_certificate,
    my_enrollments, record_lesson_completion, set_enrollment_status,
};
pub use health_handler::health_check;
pub use quiz_handler::{create_quiz, delete_quiz, get_quiz, list_course_quizzes, update_quiz};
pub use user_handler::{delete_user, get_all_users, get_user, update_user};
