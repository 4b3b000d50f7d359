//! Command-line seeder: populates baseline users, categories, and a sample
//! course for local and staging environments. Safe to re-run; existing
//! records are left in place.

use malearn_server::{
    app_state::AppState,
    auth::Claims,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::course::{
        CourseDuration, CourseLanguage, CourseStatus, CurriculumSection, Difficulty, Lesson,
        LessonContent, Price, TextContent, VideoContent,
    },
    models::domain::quiz::{AnswerOption, QuestionKind, QuizQuestion, TrueFalseQuestion},
    models::domain::user::{User, UserRole},
    models::dto::request::{
        CreateCategoryRequest, CreateCourseRequest, CreateQuizRequest, RegisterRequest,
        UpdateCourseRequest,
    },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect: {}", e)))?;

    log::info!("🌱 Seeding MaLearn E-Learning Platform...");

    if let Err(e) = seed(&state).await {
        log::error!("Seeding failed: {}", e);
        return Err(std::io::Error::other(e.to_string()));
    }

    log::info!("✓ Seeding complete");
    Ok(())
}

async fn seed(state: &AppState) -> AppResult<()> {
    let admin = ensure_user(
        state,
        "MaLearn Admin",
        "admin@malearn.com",
        "admin123",
        UserRole::Admin,
    )
    .await?;
    let instructor = ensure_user(
        state,
        "John Doe",
        "instructor@malearn.com",
        "instructor123",
        UserRole::Instructor,
    )
    .await?;
    ensure_user(
        state,
        "Jane Smith",
        "student@malearn.com",
        "student123",
        UserRole::Student,
    )
    .await?;

    let admin_claims = Claims::new(&admin, 1);
    let instructor_claims = Claims::new(&instructor, 1);

    let web_dev = ensure_category(state, &admin_claims, "Web Development").await?;
    ensure_category(state, &admin_claims, "Data Science").await?;
    ensure_category(state, &admin_claims, "Design").await?;

    ensure_sample_course(state, &instructor_claims, &web_dev).await?;

    Ok(())
}

async fn ensure_user(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> AppResult<User> {
    if let Some(existing) = state.user_service.find_by_email(email).await? {
        log::info!("- User already exists: {}", email);
        return Ok(existing);
    }

    let response = state
        .auth_service
        .register(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Some(role),
        })
        .await?;
    log::info!("✓ Created {:?} user: {}", role, email);

    state
        .user_service
        .get_user_for_token(&response.user.id)
        .await
}

async fn ensure_category(
    state: &AppState,
    admin: &Claims,
    name: &str,
) -> AppResult<malearn_server::models::domain::Category> {
    let request = CreateCategoryRequest {
        name: name.to_string(),
        slug: None,
    };

    match state.category_service.create_category(admin, request).await {
        Ok(category) => {
            log::info!("✓ Created category: {}", name);
            Ok(category)
        }
        Err(AppError::AlreadyExists(_)) => {
            log::info!("- Category already exists: {}", name);
            let slug = malearn_server::models::domain::course::slugify(name);
            state
                .category_service
                .list_categories()
                .await?
                .into_iter()
                .find(|c| c.slug == slug)
                .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", name)))
        }
        Err(e) => Err(e),
    }
}

async fn ensure_sample_course(
    state: &AppState,
    instructor: &Claims,
    category: &malearn_server::models::domain::Category,
) -> AppResult<()> {
    let slug = "complete-react-developer-course";
    if state
        .course_service
        .get_course_by_slug(Some(instructor), slug)
        .await
        .is_ok()
    {
        log::info!("- Sample course already exists: {}", slug);
        return Ok(());
    }

    let category_id = category
        .id
        .as_ref()
        .map(|oid| oid.to_hex())
        .ok_or_else(|| AppError::InternalError("Category has no id".to_string()))?;

    let curriculum = vec![
        CurriculumSection {
            title: "Getting Started".to_string(),
            lessons: vec![
                Lesson::new(
                    "Welcome to the Course",
                    LessonContent::Video(VideoContent {
                        video_url: "/media/react/welcome.mp4".to_string(),
                    }),
                ),
                Lesson::new(
                    "Setting Up Your Environment",
                    LessonContent::Text(TextContent {
                        body: "Install Node.js, a code editor, and create your first project."
                            .to_string(),
                    }),
                ),
            ],
        },
        CurriculumSection {
            title: "React Fundamentals".to_string(),
            lessons: vec![
                Lesson::new(
                    "Components and Props",
                    LessonContent::Video(VideoContent {
                        video_url: "/media/react/components.mp4".to_string(),
                    }),
                ),
                Lesson::new(
                    "State and Lifecycle",
                    LessonContent::Video(VideoContent {
                        video_url: "/media/react/state.mp4".to_string(),
                    }),
                ),
            ],
        },
    ];

    let course = state
        .course_service
        .create_course(
            instructor,
            CreateCourseRequest {
                title: "Complete React Developer Course".to_string(),
                slug: Some(slug.to_string()),
                description:
                    "Master React from basics to advanced topics including hooks, context, and modern patterns."
                        .to_string(),
                short_description:
                    "Learn React from scratch with hands-on projects and real-world examples."
                        .to_string(),
                instructor_id: None,
                category_id,
                tags: vec!["React".to_string(), "JavaScript".to_string()],
                thumbnail_url: Some("/media/react/thumbnail.png".to_string()),
                trailer_url: None,
                price: Price {
                    fiat_price: 49.99,
                    crypto_prices: vec![],
                },
                duration: CourseDuration {
                    hours: 12.0,
                    lessons: 4,
                },
                difficulty: Difficulty::Beginner,
                language: CourseLanguage::En,
                requirements: vec!["Basic HTML, CSS and JavaScript".to_string()],
                what_you_will_learn: vec![
                    "Build complete React applications".to_string(),
                    "Understand hooks and state management".to_string(),
                ],
                curriculum,
            },
        )
        .await?;

    let course_id = course
        .id_hex()
        .ok_or_else(|| AppError::InternalError("Course has no id after save".to_string()))?;

    // Publish so the catalog has something to show
    state
        .course_service
        .update_course(
            instructor,
            &course_id,
            UpdateCourseRequest {
                title: None,
                description: None,
                short_description: None,
                category_id: None,
                tags: None,
                thumbnail_url: None,
                trailer_url: None,
                price: None,
                duration: None,
                difficulty: None,
                language: None,
                requirements: None,
                what_you_will_learn: None,
                curriculum: None,
                status: Some(CourseStatus::Published),
                featured: Some(true),
            },
        )
        .await?;

    state
        .quiz_service
        .create_quiz(
            instructor,
            CreateQuizRequest {
                course_id,
                title: "React Fundamentals Check".to_string(),
                description: Some("Quick check after the fundamentals section.".to_string()),
                questions: vec![QuizQuestion {
                    prompt: "React components re-render when their state changes.".to_string(),
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
                    explanation: Some("State changes schedule a re-render.".to_string()),
                    points: 1,
                }],
                settings: None,
            },
        )
        .await?;

    log::info!("✓ Created sample course: {}", slug);
    Ok(())
}
