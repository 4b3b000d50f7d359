use async_graphql::{ComplexObject, Enum, SimpleObject};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
    Suspended,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    Stripe,
    Crypto,
    Free,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eth,
    Btc,
    Matic,
    Bnb,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Usd
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentInfo {
    pub fn free() -> Self {
        PaymentInfo {
            method: PaymentMethod::Free,
            status: PaymentStatus::Completed,
            transaction_id: None,
            amount: None,
            currency: Currency::Usd,
            paid_at: Some(Utc::now()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct CompletedLesson {
    pub lesson_id: String,
    pub completed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_time_seconds: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Progress {
    #[serde(default)]
    pub completed_lessons: Vec<CompletedLesson>,
    /// Percentage 0-100, recomputed from the completed set against the course
    /// curriculum on every completion write.
    #[serde(default)]
    pub overall_progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Progress {
    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|l| l.lesson_id == lesson_id)
    }

    /// Percentage of `total_lessons` covered by the completed set, rounded to
    /// the nearest whole percent. Zero-lesson courses report zero.
    pub fn percent_of(&self, total_lessons: usize) -> u8 {
        if total_lessons == 0 {
            return 0;
        }
        let completed = self.completed_lessons.len().min(total_lessons);
        ((completed as f64 / total_lessons as f64) * 100.0).round() as u8
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Certificate {
    #[serde(default)]
    pub issued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Review {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// One ledger entry per (student, course) pair; uniqueness is enforced by the
/// storage layer index, the only guarded invariant of the lifecycle.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
#[graphql(complex)]
pub struct Enrollment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[graphql(skip)]
    pub id: Option<ObjectId>,
    pub student_id: String,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub progress: Progress,
    pub payment: PaymentInfo,
    #[serde(default)]
    pub certificate: Certificate,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[ComplexObject]
impl Enrollment {
    /// Hex document id, once persisted.
    async fn id(&self) -> Option<String> {
        self.id_hex()
    }
}

impl Enrollment {
    pub fn new(student_id: &str, course_id: &str, payment: PaymentInfo) -> Self {
        Enrollment {
            id: None,
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            enrolled_at: Utc::now(),
            status: EnrollmentStatus::Active,
            progress: Progress::default(),
            payment,
            certificate: Certificate::default(),
            reviews: vec![],
            notes: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    pub fn id_hex(&self) -> Option<String> {
        self.id.as_ref().map(|oid| oid.to_hex())
    }

    /// Marks the lesson completed, idempotently, and recomputes the overall
    /// percentage against `total_lessons`.
    pub fn complete_lesson(
        &mut self,
        lesson_id: &str,
        watch_time_seconds: Option<u32>,
        total_lessons: usize,
    ) {
        if !self.progress.is_lesson_completed(lesson_id) {
            self.progress.completed_lessons.push(CompletedLesson {
                lesson_id: lesson_id.to_string(),
                completed_at: Utc::now(),
                watch_time_seconds,
            });
        }
        self.progress.overall_progress = self.progress.percent_of(total_lessons);
        self.progress.last_accessed_at = Some(Utc::now());
        self.updated_at = Some(Utc::now());
    }

    /// Issues the certificate unconditionally. Callers are expected to have
    /// checked whatever policy applies; the ledger itself imposes none.
    pub fn issue_certificate(&mut self) -> &Certificate {
        let certificate_id = Uuid::new_v4().to_string();
        self.certificate = Certificate {
            issued: true,
            issued_at: Some(Utc::now()),
            certificate_url: Some(format!("/certificates/{}", certificate_id)),
            certificate_id: Some(certificate_id),
        };
        self.updated_at = Some(Utc::now());
        &self.certificate
    }

    /// Unconditional status overwrite; any transition is permitted.
    pub fn set_status(&mut self, status: EnrollmentStatus) {
        self.status = status;
        self.updated_at = Some(Utc::now());
    }

    pub fn add_review(&mut self, rating: u8, comment: Option<String>) {
        self.reviews.push(Review {
            rating,
            comment,
            reviewed_at: Utc::now(),
        });
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
impl Enrollment {
    pub fn test_enrollment(student_id: &str, course_id: &str) -> Self {
        let mut enrollment = Enrollment::new(student_id, course_id, PaymentInfo::free());
        enrollment.id = Some(ObjectId::new());
        enrollment
    }
}
