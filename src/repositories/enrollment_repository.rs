use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Enrollment,
    repositories::parse_object_id,
};

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Inserts a new ledger entry. The storage-level unique index on
    /// (student_id, course_id) serializes concurrent attempts; the loser gets
    /// `DuplicateEnrollment` with no retry.
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Enrollment>>;
    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Enrollment>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Enrollment>>;
    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Enrollment>>;
    async fn update(&self, id: &str, enrollment: Enrollment) -> AppResult<Enrollment>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn count_by_course(&self, course_id: &str) -> AppResult<i64>;
    async fn count_completed_by_course(&self, course_id: &str) -> AppResult<i64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoEnrollmentRepository {
    collection: Collection<Enrollment>,
}

impl MongoEnrollmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("enrollments");
        Self { collection }
    }
}

#[async_trait]
impl EnrollmentRepository for MongoEnrollmentRepository {
    async fn create(&self, mut enrollment: Enrollment) -> AppResult<Enrollment> {
        let result = self.collection.insert_one(&enrollment).await.map_err(|e| {
            let student_id = enrollment.student_id.clone();
            let course_id = enrollment.course_id.clone();
            AppError::from_mongo_write(e, || {
                AppError::DuplicateEnrollment(format!(
                    "student '{}' is already enrolled in course '{}'",
                    student_id, course_id
                ))
            })
        })?;

        enrollment.id = result.inserted_id.as_object_id();
        Ok(enrollment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Enrollment>> {
        let oid = parse_object_id(id)?;
        let enrollment = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(enrollment)
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<Enrollment>> {
        let enrollment = self
            .collection
            .find_one(doc! { "student_id": student_id, "course_id": course_id })
            .await?;
        Ok(enrollment)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Enrollment>> {
        let cursor = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "enrolled_at": -1 })
            .await?;
        let enrollments: Vec<Enrollment> = cursor.try_collect().await?;
        Ok(enrollments)
    }

    async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<Enrollment>> {
        let cursor = self
            .collection
            .find(doc! { "course_id": course_id })
            .sort(doc! { "enrolled_at": -1 })
            .await?;
        let enrollments: Vec<Enrollment> = cursor.try_collect().await?;
        Ok(enrollments)
    }

    async fn update(&self, id: &str, enrollment: Enrollment) -> AppResult<Enrollment> {
        let oid = parse_object_id(id)?;
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, &enrollment)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Enrollment with id '{}' not found",
                id
            )));
        }

        Ok(enrollment)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = parse_object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Enrollment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn count_by_course(&self, course_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "course_id": course_id })
            .await?;
        Ok(count as i64)
    }

    async fn count_completed_by_course(&self, course_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "course_id": course_id, "status": "completed" })
            .await?;
        Ok(count as i64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_course_unique".to_string())
                    .build(),
            )
            .build();
        let course_index = IndexModel::builder().keys(doc! { "course_id": 1 }).build();

        self.collection.create_index(pair_index).await?;
        self.collection.create_index(course_index).await?;
        log::info!("✓ Created unique index on enrollments.(student_id, course_id)");

        Ok(())
    }
}
