use async_graphql::{ComplexObject, Enum, SimpleObject, Union};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid regex"));

/// Derives a URL slug from a title: lowercased, non-alphanumerics stripped,
/// whitespace runs collapsed to single hyphens, hyphen runs collapsed.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(stripped.trim(), "-");
    HYPHEN_RUN.replace_all(&hyphenated, "-").to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

impl Default for CourseStatus {
    fn default() -> Self {
        CourseStatus::Draft
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CourseLanguage {
    En,
    Th,
    Es,
    Fr,
    De,
    Zh,
    Ja,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CryptoCurrency {
    Eth,
    Btc,
    Matic,
    Bnb,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct CryptoPrice {
    pub currency: CryptoCurrency,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct Price {
    pub fiat_price: f64,
    #[serde(default)]
    pub crypto_prices: Vec<CryptoPrice>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct CourseDuration {
    pub hours: f64,
    pub lessons: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Video,
    Text,
    Quiz,
    Assignment,
    Download,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct VideoContent {
    pub video_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct TextContent {
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuizContent {
    pub quiz_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct AssignmentContent {
    pub instructions: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct DownloadContent {
    pub file_url: String,
}

/// Lesson payload, one variant per lesson type. The discriminant is the serde
/// tag, so a document can never carry a populated variant that disagrees with
/// its type field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Union)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonContent {
    Video(VideoContent),
    Text(TextContent),
    Quiz(QuizContent),
    Assignment(AssignmentContent),
    Download(DownloadContent),
}

impl LessonContent {
    pub fn lesson_type(&self) -> LessonType {
        match self {
            LessonContent::Video(_) => LessonType::Video,
            LessonContent::Text(_) => LessonType::Text,
            LessonContent::Quiz(_) => LessonType::Quiz,
            LessonContent::Assignment(_) => LessonType::Assignment,
            LessonContent::Download(_) => LessonType::Download,
        }
    }

    fn validate(&self) -> AppResult<()> {
        let empty = match self {
            LessonContent::Video(c) => c.video_url.is_empty(),
            LessonContent::Text(c) => c.body.is_empty(),
            LessonContent::Quiz(c) => c.quiz_id.is_empty(),
            LessonContent::Assignment(c) => c.instructions.is_empty(),
            LessonContent::Download(c) => c.file_url.is_empty(),
        };
        if empty {
            return Err(AppError::ValidationError(format!(
                "Lesson content of type {:?} must not be empty",
                self.lesson_type()
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub content: LessonContent,
    #[serde(default)]
    pub is_free: bool,
}

impl Lesson {
    pub fn new(title: &str, content: LessonContent) -> Self {
        Lesson {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            duration_minutes: None,
            content,
            is_free: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct CurriculumSection {
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
#[graphql(complex)]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[graphql(skip)]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub instructor_id: String,
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
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
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_template_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[ComplexObject]
impl Course {
    /// Hex document id, once persisted.
    async fn id(&self) -> Option<String> {
        self.id_hex()
    }
}

impl Course {
    pub fn id_hex(&self) -> Option<String> {
        self.id.as_ref().map(|oid| oid.to_hex())
    }

    /// Total number of lessons across all curriculum sections. Authoritative
    /// denominator for enrollment progress.
    pub fn total_lessons(&self) -> usize {
        self.curriculum.iter().map(|s| s.lessons.len()).sum()
    }

    pub fn contains_lesson(&self, lesson_id: &str) -> bool {
        self.curriculum
            .iter()
            .flat_map(|s| s.lessons.iter())
            .any(|l| l.id == lesson_id)
    }

    /// Validates the curriculum tree: every lesson carries a well-formed
    /// content variant and a non-empty title.
    pub fn validate_curriculum(&self) -> AppResult<()> {
        for section in &self.curriculum {
            if section.title.is_empty() {
                return Err(AppError::ValidationError(
                    "Curriculum section title must not be empty".to_string(),
                ));
            }
            for lesson in &section.lessons {
                if lesson.title.is_empty() {
                    return Err(AppError::ValidationError(
                        "Lesson title must not be empty".to_string(),
                    ));
                }
                lesson.content.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Course {
    pub fn test_course(curriculum: Vec<CurriculumSection>) -> Course {
        Course {
            id: Some(ObjectId::new()),
            title: "Test Course".to_string(),
            slug: "test-course".to_string(),
            description: "A course used in tests".to_string(),
            short_description: "Test".to_string(),
            instructor_id: "instructor".to_string(),
            category_id: "category".to_string(),
            tags: vec![],
            thumbnail_url: None,
            trailer_url: None,
            price: Price {
                fiat_price: 49.99,
                crypto_prices: vec![],
            },
            duration: CourseDuration {
                hours: 10.0,
                lessons: 3,
            },
            difficulty: Difficulty::Beginner,
            language: CourseLanguage::En,
            requirements: vec![],
            what_you_will_learn: vec![],
            curriculum,
            status: CourseStatus::Draft,
            featured: false,
            certificate_template_url: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    pub fn test_text_lesson(title: &str) -> Lesson {
        Lesson::new(
            title,
            LessonContent::Text(TextContent {
                body: "content".to_string(),
            }),
        )
    }
}
