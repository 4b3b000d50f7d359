use std::sync::Arc;

use validator::Validate;

use crate::{
    access,
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::Quiz,
    models::dto::request::{CreateQuizRequest, UpdateQuizRequest},
    repositories::{CourseRepository, EnrollmentRepository, QuizRepository},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            quizzes,
            courses,
            enrollments,
        }
    }

    pub async fn create_quiz(&self, claims: &Claims, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let course = self
            .courses
            .find_by_id(&request.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", request.course_id))
            })?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;

        let quiz = Quiz::new(
            &request.course_id,
            &request.title,
            request.description,
            request.questions,
            request.settings.unwrap_or_default(),
        );
        quiz.validate()?;

        let quiz = self.quizzes.create(quiz).await?;
        log::info!(
            "Quiz '{}' ({} questions) created for course '{}'",
            quiz.title,
            quiz.question_count,
            course.slug
        );
        Ok(quiz)
    }

    /// Quiz reads are scoped to the owning course: admins, the course's
    /// instructor, and enrolled students.
    pub async fn get_quiz(&self, claims: &Claims, id: &str) -> AppResult<Quiz> {
        let quiz = self
            .quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        let course = self
            .courses
            .find_by_id(&quiz.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", quiz.course_id))
            })?;

        access::require_course_access(claims, &course, self.enrollments.as_ref()).await?;
        Ok(quiz)
    }

    pub async fn list_course_quizzes(&self, claims: &Claims, course_id: &str) -> AppResult<Vec<Quiz>> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))?;

        access::require_course_access(claims, &course, self.enrollments.as_ref()).await?;
        self.quizzes.find_by_course(course_id).await
    }

    pub async fn update_quiz(
        &self,
        claims: &Claims,
        id: &str,
        request: UpdateQuizRequest,
    ) -> AppResult<Quiz> {
        request.validate()?;

        let mut quiz = self
            .quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        let course = self
            .courses
            .find_by_id(&quiz.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", quiz.course_id))
            })?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;

        if let Some(title) = request.title {
            quiz.title = title;
        }
        if let Some(description) = request.description {
            quiz.description = Some(description);
        }
        if let Some(questions) = request.questions {
            quiz.questions = questions;
        }
        if let Some(settings) = request.settings {
            quiz.settings = settings;
        }
        if let Some(status) = request.status {
            quiz.status = status;
        }
        // The stored count tracks the question list on every save
        quiz.recount_questions();
        quiz.validate()?;

        self.quizzes.update(quiz).await
    }

    pub async fn delete_quiz(&self, claims: &Claims, id: &str) -> AppResult<()> {
        let quiz = self
            .quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        let course = self
            .courses
            .find_by_id(&quiz.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", quiz.course_id))
            })?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;
        self.quizzes.delete(id).await
    }
}
