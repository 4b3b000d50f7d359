use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::course::CourseStatus,
    models::domain::Course,
    repositories::parse_object_id,
};

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: Course) -> AppResult<Course>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>>;
    async fn find_paginated(
        &self,
        status: Option<CourseStatus>,
        category_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Course>, i64)>;
    async fn find_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<Course>>;
    async fn update(&self, id: &str, course: Course) -> AppResult<Course>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoCourseRepository {
    collection: Collection<Course>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("courses");
        Self { collection }
    }

    fn status_filter(status: CourseStatus) -> &'static str {
        match status {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn create(&self, mut course: Course) -> AppResult<Course> {
        let result = self.collection.insert_one(&course).await.map_err(|e| {
            let slug = course.slug.clone();
            AppError::from_mongo_write(e, || {
                AppError::AlreadyExists(format!("Course with slug '{}' already exists", slug))
            })
        })?;

        course.id = result.inserted_id.as_object_id();
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let oid = parse_object_id(id)?;
        let course = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(course)
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>> {
        let course = self.collection.find_one(doc! { "slug": slug }).await?;
        Ok(course)
    }

    async fn find_paginated(
        &self,
        status: Option<CourseStatus>,
        category_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Course>, i64)> {
        let mut filter = Document::new();
        if let Some(status) = status {
            filter.insert("status", Self::status_filter(status));
        }
        if let Some(category_id) = category_id {
            filter.insert("category_id", category_id);
        }

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(offset.max(0) as u64)
            .limit(limit.max(0))
            .await?;
        let courses: Vec<Course> = cursor.try_collect().await?;

        Ok((courses, total))
    }

    async fn find_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<Course>> {
        let cursor = self
            .collection
            .find(doc! { "instructor_id": instructor_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let courses: Vec<Course> = cursor.try_collect().await?;
        Ok(courses)
    }

    async fn update(&self, id: &str, course: Course) -> AppResult<Course> {
        let oid = parse_object_id(id)?;
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, &course)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                id
            )));
        }

        Ok(course)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = parse_object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            )
            .build();
        let instructor_index = IndexModel::builder()
            .keys(doc! { "instructor_id": 1 })
            .build();
        let status_index = IndexModel::builder().keys(doc! { "status": 1 }).build();

        self.collection.create_index(slug_index).await?;
        self.collection.create_index(instructor_index).await?;
        self.collection.create_index(status_index).await?;
        log::info!("✓ Created indexes on courses (slug unique, instructor, status)");

        Ok(())
    }
}
