//! Service-level tests against in-memory repository implementations. These
//! exercise the enrollment lifecycle, registration defaults, slug derivation,
//! and quiz bookkeeping without a running MongoDB.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use malearn_server::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::course::{
        Course, CourseDuration, CourseLanguage, CourseStatus, CurriculumSection, Difficulty,
        Lesson, LessonContent, Price, TextContent,
    },
    models::domain::enrollment::EnrollmentStatus,
    models::domain::quiz::{AnswerOption, QuestionKind, QuizQuestion, TrueFalseQuestion},
    models::domain::user::{User, UserRole},
    models::domain::{Category, Enrollment, Payment, Quiz},
    models::dto::request::{
        CreateCourseRequest, CreateQuizRequest, EnrollRequest, LessonCompletionRequest,
        RegisterRequest, ReviewRequest, UpdateQuizRequest,
    },
    repositories::{
        CategoryRepository, CourseRepository, EnrollmentRepository, PaymentRepository,
        QuizRepository, UserRepository,
    },
    services::{CategoryService, CourseService, EnrollmentService, QuizService, UserService},
};

// ---------------------------------------------------------------------------
// In-memory repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        let id = ObjectId::new();
        user.id = Some(id);
        users.insert(id.to_hex(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut items: Vec<_> = users.values().cloned().collect();
        items.sort_by(|a, b| a.email.cmp(&b.email));
        let total = items.len() as i64;
        let page = page_of(items, offset, limit);
        Ok((page, total))
    }

    async fn update(&self, id: &str, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(id) {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }
        users.insert(id.to_string(), user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.users.write().await.remove(id).is_none() {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<String, Category>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, mut category: Category) -> AppResult<Category> {
        let mut categories = self.categories.write().await;
        if categories
            .values()
            .any(|c| c.name == category.name || c.slug == category.slug)
        {
            return Err(AppError::AlreadyExists(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        let id = ObjectId::new();
        category.id = Some(id);
        categories.insert(id.to_hex(), category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>> {
        Ok(self.categories.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let mut items: Vec<_> = self.categories.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn delete(&self, slug: &str) -> AppResult<()> {
        let mut categories = self.categories.write().await;
        let key = categories
            .iter()
            .find(|(_, c)| c.slug == slug)
            .map(|(k, _)| k.clone());
        match key {
            Some(key) => {
                categories.remove(&key);
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "Category with slug '{}' not found",
                slug
            ))),
        }
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryCourseRepository {
    courses: RwLock<HashMap<String, Course>>,
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, mut course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if courses.values().any(|c| c.slug == course.slug) {
            return Err(AppError::AlreadyExists(format!(
                "Course with slug '{}' already exists",
                course.slug
            )));
        }
        let id = ObjectId::new();
        course.id = Some(id);
        courses.insert(id.to_hex(), course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>> {
        Ok(self
            .courses
            .read()
            .await
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn find_paginated(
        &self,
        status: Option<CourseStatus>,
        category_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Course>, i64)> {
        let courses = self.courses.read().await;
        let mut items: Vec<_> = courses
            .values()
            .filter(|c| status.map(|s| c.status == s).unwrap_or(true))
            .filter(|c| category_id.map(|id| c.category_id == id).unwrap_or(true))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.slug.cmp(&b.slug));
        let total = items.len() as i64;
        let page = page_of(items, offset, limit);
        Ok((page, total))
    }

    async fn find_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<Course>> {
        Ok(self
            .courses
            .read()
            .await
            .values()
            .filter(|c| c.instructor_id == instructor_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if !courses.contains_key(id) {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                id
            )));
        }
        courses.insert(id.to_string(), course.clone());
        Ok(course)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.courses.write().await.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryEnrollmentRepository {
    enrollments: RwLock<HashMap<String, Enrollment>>,
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn create(&self, mut enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        if enrollments
            .values()
            .any(|e| e.student_id == enrollment.student_id && e.course_id == enrollment.course_id)
        {
            return Err(AppError::DuplicateEnrollment(format!(
                "student '{}' is already enrolled in course '{}'",
                enrollment.student_id, enrollment.course_id
            )));
        }
        let id = ObjectId::new();
        enrollment.id = Some(id);
        enrollments.insert(id.to_hex(), enrollment.clone());
        Ok(enrollment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Enrollment>> {
        Ok(self.enrollments.read().await.get(id).cloned())
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;
        if !enrollments.contains_key(id) {
            return Err(AppError::NotFound(format!(
                "Enrollment with id '{}' not found",
                id
            )));
        }
        enrollments.insert(id.to_string(), enrollment.clone());
        Ok(enrollment)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.enrollments.write().await.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Enrollment with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn count_by_course(&self, course_id: &str) -> AppResult<i64> {
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .filter(|e| e.course_id == course_id)
            .count() as i64)
    }

    async fn count_completed_by_course(&self, course_id: &str) -> AppResult<i64> {
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .filter(|e| e.course_id == course_id && e.status == EnrollmentStatus::Completed)
            .count() as i64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<String, Payment>>,
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, mut payment: Payment) -> AppResult<Payment> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.transaction_id) {
            return Err(AppError::AlreadyExists(format!(
                "Payment with transaction id '{}' already exists",
                payment.transaction_id
            )));
        }
        payment.id = Some(ObjectId::new());
        payments.insert(payment.transaction_id.clone(), payment.clone());
        Ok(payment)
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> AppResult<Option<Payment>> {
        Ok(self.payments.read().await.get(transaction_id).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .values()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if !quizzes.contains_key(&quiz.id) {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        if self.quizzes.write().await.remove(id).is_none() {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

fn page_of<T: Clone>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    let end = (start + limit.max(0) as usize).min(items.len());
    if start >= items.len() {
        vec![]
    } else {
        items[start..end].to_vec()
    }
}

// ---------------------------------------------------------------------------
// Test harness
// ---------------------------------------------------------------------------

struct Harness {
    users: Arc<InMemoryUserRepository>,
    user_service: UserService,
    category_service: CategoryService,
    course_service: CourseService,
    enrollment_service: EnrollmentService,
    quiz_service: QuizService,
    categories: Arc<InMemoryCategoryRepository>,
    courses: Arc<InMemoryCourseRepository>,
    payments: Arc<InMemoryPaymentRepository>,
}

impl Harness {
    fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let categories = Arc::new(InMemoryCategoryRepository::default());
        let courses = Arc::new(InMemoryCourseRepository::default());
        let enrollments = Arc::new(InMemoryEnrollmentRepository::default());
        let payments = Arc::new(InMemoryPaymentRepository::default());
        let quizzes = Arc::new(InMemoryQuizRepository::default());

        Self {
            user_service: UserService::new(users.clone()),
            category_service: CategoryService::new(categories.clone()),
            course_service: CourseService::new(
                courses.clone(),
                categories.clone(),
                enrollments.clone(),
            ),
            enrollment_service: EnrollmentService::new(
                enrollments.clone(),
                courses.clone(),
                payments.clone(),
            ),
            quiz_service: QuizService::new(quizzes, courses.clone(), enrollments),
            users,
            categories,
            courses,
            payments,
        }
    }

    async fn seed_user(&self, name: &str, email: &str, role: UserRole) -> (User, Claims) {
        let user = self
            .users
            .create(User::new(name, email, "argon2id-test-hash", role))
            .await
            .expect("user should insert");
        let claims = Claims::new(&user, 1);
        (user, claims)
    }

    async fn seed_category(&self) -> Category {
        self.categories
            .create(Category::new("Web Development", None))
            .await
            .expect("category should insert")
    }

    /// Creates a published course with a four-lesson curriculum owned by the
    /// given instructor, returning (course_id, lesson_ids).
    async fn seed_course(&self, instructor_id: &str, category_id: &str) -> (String, Vec<String>) {
        let lesson = |title: &str| {
            Lesson::new(
                title,
                LessonContent::Text(TextContent {
                    body: format!("{} body", title),
                }),
            )
        };

        let curriculum = vec![
            CurriculumSection {
                title: "Basics".to_string(),
                lessons: vec![lesson("one"), lesson("two")],
            },
            CurriculumSection {
                title: "Advanced".to_string(),
                lessons: vec![lesson("three"), lesson("four")],
            },
        ];
        let lesson_ids: Vec<String> = curriculum
            .iter()
            .flat_map(|s| s.lessons.iter().map(|l| l.id.clone()))
            .collect();

        let course = Course {
            id: None,
            title: "Sample Course".to_string(),
            slug: "sample-course".to_string(),
            description: "A sample".to_string(),
            short_description: "Sample".to_string(),
            instructor_id: instructor_id.to_string(),
            category_id: category_id.to_string(),
            tags: vec![],
            thumbnail_url: None,
            trailer_url: None,
            price: Price {
                fiat_price: 49.99,
                crypto_prices: vec![],
            },
            duration: CourseDuration {
                hours: 8.0,
                lessons: 4,
            },
            difficulty: Difficulty::Beginner,
            language: CourseLanguage::En,
            requirements: vec![],
            what_you_will_learn: vec![],
            curriculum,
            status: CourseStatus::Published,
            featured: false,
            certificate_template_url: None,
            created_at: None,
            updated_at: None,
        };

        let course = self.courses.create(course).await.expect("course should insert");
        (course.id_hex().unwrap(), lesson_ids)
    }
}

fn enroll_request(course_id: &str) -> EnrollRequest {
    EnrollRequest {
        course_id: course_id.to_string(),
        student_id: None,
        payment: None,
    }
}

fn true_false_question(prompt: &str) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        kind: QuestionKind::TrueFalse(TrueFalseQuestion {
            options: vec![
                AnswerOption {
                    text: "True".to_string(),
                    is_correct: true,
                },
                AnswerOption {
                    text: "False".to_string(),
                    is_correct: false,
                },
            ],
        }),
        explanation: None,
        points: 1,
    }
}

// ---------------------------------------------------------------------------
// Enrollment lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_enrollment_for_same_pair_is_rejected() {
    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let first = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await
        .expect("first enrollment should succeed");
    assert_eq!(first.status, EnrollmentStatus::Active);
    assert!(first.progress.completed_lessons.is_empty());

    let second = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await;
    assert!(matches!(second, Err(AppError::DuplicateEnrollment(_))));
}

#[tokio::test]
async fn lesson_completion_recomputes_overall_progress() {
    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, lesson_ids) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let enrollment = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await
        .unwrap();
    let enrollment_id = enrollment.id_hex().unwrap();

    let updated = h
        .enrollment_service
        .record_lesson_completion(
            &student,
            &enrollment_id,
            LessonCompletionRequest {
                lesson_id: lesson_ids[0].clone(),
                watch_time_seconds: Some(300),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.progress.overall_progress, 25);

    let updated = h
        .enrollment_service
        .record_lesson_completion(
            &student,
            &enrollment_id,
            LessonCompletionRequest {
                lesson_id: lesson_ids[1].clone(),
                watch_time_seconds: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.progress.overall_progress, 50);
    assert_eq!(updated.progress.completed_lessons.len(), 2);
}

#[tokio::test]
async fn unknown_lesson_is_rejected() {
    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let enrollment = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await
        .unwrap();

    let result = h
        .enrollment_service
        .record_lesson_completion(
            &student,
            &enrollment.id_hex().unwrap(),
            LessonCompletionRequest {
                lesson_id: "not-a-lesson".to_string(),
                watch_time_seconds: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn certificate_issues_without_progress_precondition() {
    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let enrollment = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await
        .unwrap();
    assert_eq!(enrollment.progress.overall_progress, 0);

    // No progress has been recorded, yet issuance succeeds
    let updated = h
        .enrollment_service
        .issue_certificate(&student, &enrollment.id_hex().unwrap())
        .await
        .unwrap();
    assert!(updated.certificate.issued);
    assert!(updated.certificate.issued_at.is_some());
    assert!(updated.certificate.certificate_url.is_some());
}

#[tokio::test]
async fn status_overwrite_permits_any_transition() {
    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let enrollment = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await
        .unwrap();
    let id = enrollment.id_hex().unwrap();

    let updated = h
        .enrollment_service
        .set_status(&student, &id, EnrollmentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated.status, EnrollmentStatus::Completed);

    let updated = h
        .enrollment_service
        .set_status(&student, &id, EnrollmentStatus::Active)
        .await
        .unwrap();
    assert_eq!(updated.status, EnrollmentStatus::Active);
}

#[tokio::test]
async fn other_students_cannot_touch_an_enrollment() {
    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (_, stranger) = h
        .seed_user("Eve", "eve@example.com", UserRole::Student)
        .await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let enrollment = h
        .enrollment_service
        .enroll(&student, enroll_request(&course_id))
        .await
        .unwrap();
    let id = enrollment.id_hex().unwrap();

    // Denied as not-found so existence is not leaked
    let result = h
        .enrollment_service
        .set_status(&stranger, &id, EnrollmentStatus::Dropped)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn paid_enrollment_records_a_payment_transaction() {
    use malearn_server::models::domain::enrollment::{PaymentMethod, PaymentStatus};
    use malearn_server::models::dto::request::PaymentInput;

    let h = Harness::new();
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (instructor, _) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let request = EnrollRequest {
        course_id: course_id.clone(),
        student_id: None,
        payment: Some(PaymentInput {
            method: PaymentMethod::Stripe,
            status: PaymentStatus::Completed,
            transaction_id: Some("txn_42".to_string()),
            amount: Some(49.99),
            currency: None,
        }),
    };

    h.enrollment_service.enroll(&student, request).await.unwrap();

    let payment = h
        .payments
        .find_by_transaction_id("txn_42")
        .await
        .unwrap()
        .expect("transaction should be recorded");
    assert_eq!(payment.course_id, course_id);
    assert_eq!(payment.amount, 49.99);
}

// ---------------------------------------------------------------------------
// Users and registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registration_without_role_defaults_to_student() {
    let h = Harness::new();

    let user = h
        .user_service
        .register(RegisterRequest {
            name: "No Role".to_string(),
            email: "norole@example.com".to_string(),
            password: "supersecret".to_string(),
            role: None,
        })
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Student);
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let h = Harness::new();

    let request = RegisterRequest {
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        password: "supersecret".to_string(),
        role: None,
    };

    h.user_service.register(request.clone()).await.unwrap();
    let second = h.user_service.register(request).await;
    assert!(matches!(second, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn registered_password_verifies() {
    let h = Harness::new();

    h.user_service
        .register(RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "supersecret".to_string(),
            role: None,
        })
        .await
        .unwrap();

    assert!(h
        .user_service
        .authenticate("jane@example.com", "supersecret")
        .await
        .is_ok());
    assert!(h
        .user_service
        .authenticate("jane@example.com", "wrong")
        .await
        .is_err());
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn course_slug_is_derived_from_title() {
    let h = Harness::new();
    let (_, instructor) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;

    let course = h
        .course_service
        .create_course(
            &instructor,
            CreateCourseRequest {
                title: "Intro to Go!".to_string(),
                slug: None,
                description: "Learn Go".to_string(),
                short_description: "Go basics".to_string(),
                instructor_id: None,
                category_id: category.id.unwrap().to_hex(),
                tags: vec![],
                thumbnail_url: None,
                trailer_url: None,
                price: Price {
                    fiat_price: 0.0,
                    crypto_prices: vec![],
                },
                duration: CourseDuration {
                    hours: 2.0,
                    lessons: 1,
                },
                difficulty: Difficulty::Beginner,
                language: CourseLanguage::En,
                requirements: vec![],
                what_you_will_learn: vec![],
                curriculum: vec![],
            },
        )
        .await
        .unwrap();

    assert_eq!(course.slug, "intro-to-go");
    assert_eq!(course.status, CourseStatus::Draft);
}

#[tokio::test]
async fn unpublished_courses_are_hidden_from_other_callers() {
    let h = Harness::new();
    let (_, instructor) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let category = h.seed_category().await;

    h.course_service
        .create_course(
            &instructor,
            CreateCourseRequest {
                title: "Hidden Draft".to_string(),
                slug: None,
                description: "Unfinished".to_string(),
                short_description: "Draft".to_string(),
                instructor_id: None,
                category_id: category.id.unwrap().to_hex(),
                tags: vec![],
                thumbnail_url: None,
                trailer_url: None,
                price: Price {
                    fiat_price: 0.0,
                    crypto_prices: vec![],
                },
                duration: CourseDuration {
                    hours: 1.0,
                    lessons: 1,
                },
                difficulty: Difficulty::Beginner,
                language: CourseLanguage::En,
                requirements: vec![],
                what_you_will_learn: vec![],
                curriculum: vec![],
            },
        )
        .await
        .unwrap();

    // Owner sees the draft
    assert!(h
        .course_service
        .get_course_by_slug(Some(&instructor), "hidden-draft")
        .await
        .is_ok());

    // Another caller gets the same shape as a genuine miss
    let result = h
        .course_service
        .get_course_by_slug(Some(&student), "hidden-draft")
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // And anonymous listings exclude it
    let page = h.course_service.list_courses(None, None, 0, 20).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn analytics_are_computed_from_the_ledger() {
    let h = Harness::new();
    let (instructor_user, instructor) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let (_, sam) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (_, amy) = h.seed_user("Amy", "amy@example.com", UserRole::Student).await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor_user.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let e1 = h
        .enrollment_service
        .enroll(&sam, enroll_request(&course_id))
        .await
        .unwrap();
    h.enrollment_service
        .enroll(&amy, enroll_request(&course_id))
        .await
        .unwrap();

    let e1_id = e1.id_hex().unwrap();
    h.enrollment_service
        .set_status(&sam, &e1_id, EnrollmentStatus::Completed)
        .await
        .unwrap();
    h.enrollment_service
        .add_review(
            &sam,
            &e1_id,
            ReviewRequest {
                rating: 4,
                comment: Some("Solid course".to_string()),
            },
        )
        .await
        .unwrap();

    let analytics = h
        .course_service
        .course_analytics(&instructor, &course_id)
        .await
        .unwrap();

    assert_eq!(analytics.enrollment_count, 2);
    assert!((analytics.completion_rate - 50.0).abs() < f64::EPSILON);
    assert!((analytics.average_rating - 4.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn question_count_tracks_the_question_list() {
    let h = Harness::new();
    let (instructor_user, instructor) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor_user.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    let quiz = h
        .quiz_service
        .create_quiz(
            &instructor,
            CreateQuizRequest {
                course_id,
                title: "Checkpoint".to_string(),
                description: None,
                questions: vec![
                    true_false_question("q1"),
                    true_false_question("q2"),
                    true_false_question("q3"),
                ],
                settings: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(quiz.question_count, 3);

    let updated = h
        .quiz_service
        .update_quiz(
            &instructor,
            &quiz.id,
            UpdateQuizRequest {
                title: None,
                description: None,
                questions: Some(vec![true_false_question("only one")]),
                settings: None,
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.question_count, 1);
}

#[tokio::test]
async fn quiz_access_is_scoped_to_the_course() {
    let h = Harness::new();
    let (instructor_user, instructor) = h
        .seed_user("Ivan", "ivan@example.com", UserRole::Instructor)
        .await;
    let (_, enrolled) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;
    let (_, outsider) = h.seed_user("Eve", "eve@example.com", UserRole::Student).await;
    let category = h.seed_category().await;
    let (course_id, _) = h
        .seed_course(&instructor_user.id_hex().unwrap(), &category.id.unwrap().to_hex())
        .await;

    h.enrollment_service
        .enroll(&enrolled, enroll_request(&course_id))
        .await
        .unwrap();

    let quiz = h
        .quiz_service
        .create_quiz(
            &instructor,
            CreateQuizRequest {
                course_id,
                title: "Checkpoint".to_string(),
                description: None,
                questions: vec![true_false_question("q1")],
                settings: None,
            },
        )
        .await
        .unwrap();

    assert!(h.quiz_service.get_quiz(&enrolled, &quiz.id).await.is_ok());
    assert!(matches!(
        h.quiz_service.get_quiz(&outsider, &quiz.id).await,
        Err(AppError::Forbidden(_))
    ));
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn category_creation_requires_admin() {
    let h = Harness::new();
    let (_, admin) = h.seed_user("Ada", "ada@example.com", UserRole::Admin).await;
    let (_, student) = h.seed_user("Sam", "sam@example.com", UserRole::Student).await;

    let request = malearn_server::models::dto::request::CreateCategoryRequest {
        name: "Data Science".to_string(),
        slug: None,
    };

    assert!(matches!(
        h.category_service
            .create_category(&student, request.clone())
            .await,
        Err(AppError::Forbidden(_))
    ));

    let category = h
        .category_service
        .create_category(&admin, request)
        .await
        .unwrap();
    assert_eq!(category.slug, "data-science");
}
