use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    access,
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::course::{slugify, Course, CourseStatus},
    models::domain::user::UserRole,
    models::dto::request::{CreateCourseRequest, UpdateCourseRequest},
    models::dto::response::{CourseAnalytics, Paginated},
    repositories::{CategoryRepository, CourseRepository, EnrollmentRepository},
};

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    categories: Arc<dyn CategoryRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        categories: Arc<dyn CategoryRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            courses,
            categories,
            enrollments,
        }
    }

    pub async fn create_course(
        &self,
        claims: &Claims,
        request: CreateCourseRequest,
    ) -> AppResult<Course> {
        access::require_admin_or_instructor(claims)?;
        request.validate()?;

        // Instructors always create for themselves; admins must name one
        let instructor_id = match claims.role {
            UserRole::Instructor => claims.sub.clone(),
            _ => request.instructor_id.clone().ok_or_else(|| {
                AppError::ValidationError("instructor_id is required".to_string())
            })?,
        };

        if self
            .categories
            .find_by_id(&request.category_id)
            .await?
            .is_none()
        {
            return Err(AppError::ValidationError(format!(
                "Category '{}' does not exist",
                request.category_id
            )));
        }

        let slug = request
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&request.title));

        let course = Course {
            id: None,
            title: request.title,
            slug,
            description: request.description,
            short_description: request.short_description,
            instructor_id,
            category_id: request.category_id,
            tags: request.tags,
            thumbnail_url: request.thumbnail_url,
            trailer_url: request.trailer_url,
            price: request.price,
            duration: request.duration,
            difficulty: request.difficulty,
            language: request.language,
            requirements: request.requirements,
            what_you_will_learn: request.what_you_will_learn,
            curriculum: request.curriculum,
            status: CourseStatus::Draft,
            featured: false,
            certificate_template_url: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        course.validate_curriculum()?;

        let course = self.courses.create(course).await?;
        log::info!("Course '{}' created by {}", course.slug, claims.sub);
        Ok(course)
    }

    pub async fn update_course(
        &self,
        claims: &Claims,
        id: &str,
        request: UpdateCourseRequest,
    ) -> AppResult<Course> {
        request.validate()?;

        let mut course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", id)))?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;

        if let Some(title) = request.title {
            course.title = title;
        }
        if let Some(description) = request.description {
            course.description = description;
        }
        if let Some(short_description) = request.short_description {
            course.short_description = short_description;
        }
        if let Some(category_id) = request.category_id {
            if self.categories.find_by_id(&category_id).await?.is_none() {
                return Err(AppError::ValidationError(format!(
                    "Category '{}' does not exist",
                    category_id
                )));
            }
            course.category_id = category_id;
        }
        if let Some(tags) = request.tags {
            course.tags = tags;
        }
        if let Some(thumbnail_url) = request.thumbnail_url {
            course.thumbnail_url = Some(thumbnail_url);
        }
        if let Some(trailer_url) = request.trailer_url {
            course.trailer_url = Some(trailer_url);
        }
        if let Some(price) = request.price {
            course.price = price;
        }
        if let Some(duration) = request.duration {
            course.duration = duration;
        }
        if let Some(difficulty) = request.difficulty {
            course.difficulty = difficulty;
        }
        if let Some(language) = request.language {
            course.language = language;
        }
        if let Some(requirements) = request.requirements {
            course.requirements = requirements;
        }
        if let Some(outcomes) = request.what_you_will_learn {
            course.what_you_will_learn = outcomes;
        }
        if let Some(curriculum) = request.curriculum {
            course.curriculum = curriculum;
        }
        if let Some(status) = request.status {
            course.status = status;
        }
        if let Some(featured) = request.featured {
            course.featured = featured;
        }
        course.updated_at = Some(Utc::now());
        course.validate_curriculum()?;

        self.courses.update(id, course).await
    }

    /// Published courses are visible to anyone, including unauthenticated
    /// browsers; drafts and archived courses only to their owner and admins.
    pub async fn get_course_by_slug(
        &self,
        claims: Option<&Claims>,
        slug: &str,
    ) -> AppResult<Course> {
        let course = self
            .courses
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course '{}' not found", slug)))?;

        if course.status != CourseStatus::Published
            && !access::is_admin_or_owner(claims, &course.instructor_id)
        {
            // Same shape as a genuine miss so existence is not leaked
            return Err(AppError::NotFound(format!("Course '{}' not found", slug)));
        }

        Ok(course)
    }

    pub async fn get_course_by_id(&self, id: &str) -> AppResult<Course> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", id)))
    }

    pub async fn list_courses(
        &self,
        claims: Option<&Claims>,
        category_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Paginated<Course>> {
        // Only admins see unpublished inventory in listings
        let status = if access::is_admin(claims) {
            None
        } else {
            Some(CourseStatus::Published)
        };

        let (courses, total) = self
            .courses
            .find_paginated(status, category_id, offset, limit)
            .await?;

        Ok(Paginated {
            items: courses,
            total,
            offset,
            limit,
        })
    }

    pub async fn list_instructor_courses(&self, claims: &Claims) -> AppResult<Vec<Course>> {
        access::require_admin_or_instructor(claims)?;
        self.courses.find_by_instructor(&claims.sub).await
    }

    pub async fn delete_course(&self, claims: &Claims, id: &str) -> AppResult<()> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", id)))?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;
        self.courses.delete(id).await
    }

    /// Analytics are never stored; each read recomputes them from the
    /// enrollment ledger, the authoritative source.
    pub async fn course_analytics(&self, claims: &Claims, id: &str) -> AppResult<CourseAnalytics> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", id)))?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;

        let enrollment_count = self.enrollments.count_by_course(id).await?;
        let completed_count = self.enrollments.count_completed_by_course(id).await?;
        let completion_rate = if enrollment_count > 0 {
            (completed_count as f64 / enrollment_count as f64) * 100.0
        } else {
            0.0
        };

        let enrollments = self.enrollments.find_by_course(id).await?;
        let ratings: Vec<u8> = enrollments
            .iter()
            .flat_map(|e| e.reviews.iter().map(|r| r.rating))
            .collect();
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|&r| r as f64).sum::<f64>() / ratings.len() as f64
        };

        let total_revenue = enrollments
            .iter()
            .filter(|e| {
                e.payment.status == crate::models::domain::enrollment::PaymentStatus::Completed
            })
            .filter_map(|e| e.payment.amount)
            .sum();

        Ok(CourseAnalytics {
            enrollment_count,
            completion_rate,
            average_rating,
            total_revenue,
        })
    }
}
