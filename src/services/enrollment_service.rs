use std::sync::Arc;

use validator::Validate;

use crate::{
    access,
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::enrollment::{Enrollment, EnrollmentStatus, PaymentInfo},
    models::domain::user::UserRole,
    models::domain::Payment,
    repositories::{CourseRepository, EnrollmentRepository, PaymentRepository},
};
use crate::models::dto::request::{
    EnrollRequest, LessonCompletionRequest, ReviewRequest,
};

/// The enrollment lifecycle: one ledger entry per (student, course), mutated
/// by single-document writes. Uniqueness of the pair is the only guarded
/// invariant; everything else accepts what an authorized caller supplies.
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentRepository>,
    courses: Arc<dyn CourseRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl EnrollmentService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        courses: Arc<dyn CourseRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            enrollments,
            courses,
            payments,
        }
    }

    /// Creates the ledger entry with active status and empty progress. Fails
    /// with `DuplicateEnrollment` when the pair already exists. Note that the
    /// course's published status is NOT checked here; callers reach this
    /// point for any course they can name.
    pub async fn enroll(&self, claims: &Claims, request: EnrollRequest) -> AppResult<Enrollment> {
        request.validate()?;

        // Students always enroll themselves; other roles must name a student
        let student_id = match claims.role {
            UserRole::Student => claims.sub.clone(),
            _ => request
                .student_id
                .clone()
                .ok_or_else(|| AppError::ValidationError("student_id is required".to_string()))?,
        };

        let course = self
            .courses
            .find_by_id(&request.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Course with id '{}' not found", request.course_id))
            })?;

        if self
            .enrollments
            .find_by_student_and_course(&student_id, &request.course_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateEnrollment(format!(
                "student '{}' is already enrolled in course '{}'",
                student_id, request.course_id
            )));
        }

        let payment: PaymentInfo = request
            .payment
            .map(Into::into)
            .unwrap_or_else(PaymentInfo::free);

        let enrollment = Enrollment::new(&student_id, &request.course_id, payment);
        // A concurrent winner makes this the losing write; the unique index
        // maps it to DuplicateEnrollment with no retry.
        let enrollment = self.enrollments.create(enrollment).await?;

        // Mirror paid transactions into the payments collection. There is no
        // cross-document transaction: a failure here leaves the enrollment in
        // place and propagates.
        if let (Some(transaction_id), Some(amount)) = (
            enrollment.payment.transaction_id.as_deref(),
            enrollment.payment.amount,
        ) {
            let record = Payment::new(
                &student_id,
                &request.course_id,
                enrollment.payment.method,
                enrollment.payment.status,
                transaction_id,
                amount,
                enrollment.payment.currency,
            );
            self.payments.create(record).await?;
        }

        log::info!(
            "Student {} enrolled in course '{}'",
            student_id,
            course.slug
        );
        Ok(enrollment)
    }

    /// Appends a completed-lesson record and recomputes the overall
    /// percentage from the completed set against the course curriculum.
    pub async fn record_lesson_completion(
        &self,
        claims: &Claims,
        enrollment_id: &str,
        request: LessonCompletionRequest,
    ) -> AppResult<Enrollment> {
        request.validate()?;

        let mut enrollment = self.get_enrollment(claims, enrollment_id).await?;

        let course = self
            .courses
            .find_by_id(&enrollment.course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Course with id '{}' not found",
                    enrollment.course_id
                ))
            })?;

        if !course.contains_lesson(&request.lesson_id) {
            return Err(AppError::ValidationError(format!(
                "Lesson '{}' is not part of course '{}'",
                request.lesson_id, course.slug
            )));
        }

        enrollment.complete_lesson(
            &request.lesson_id,
            request.watch_time_seconds,
            course.total_lessons(),
        );

        self.enrollments.update(enrollment_id, enrollment).await
    }

    /// Sets the certificate flag and metadata. No precondition on progress or
    /// status is enforced; issuing at zero progress succeeds.
    pub async fn issue_certificate(
        &self,
        claims: &Claims,
        enrollment_id: &str,
    ) -> AppResult<Enrollment> {
        let mut enrollment = self.get_enrollment(claims, enrollment_id).await?;

        if enrollment.progress.overall_progress < 100 {
            log::warn!(
                "Issuing certificate for enrollment {} at {}% progress",
                enrollment_id,
                enrollment.progress.overall_progress
            );
        }

        enrollment.issue_certificate();
        self.enrollments.update(enrollment_id, enrollment).await
    }

    /// Unconditional status overwrite; any transition is permitted, including
    /// semantically odd ones like completed back to active.
    pub async fn set_status(
        &self,
        claims: &Claims,
        enrollment_id: &str,
        status: EnrollmentStatus,
    ) -> AppResult<Enrollment> {
        let mut enrollment = self.get_enrollment(claims, enrollment_id).await?;
        enrollment.set_status(status);
        self.enrollments.update(enrollment_id, enrollment).await
    }

    pub async fn add_review(
        &self,
        claims: &Claims,
        enrollment_id: &str,
        request: ReviewRequest,
    ) -> AppResult<Enrollment> {
        request.validate()?;

        let mut enrollment = self
            .enrollments
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Enrollment with id '{}' not found", enrollment_id))
            })?;

        // Only the enrolled student reviews their own enrollment
        access::require_admin_or_owner(claims, &enrollment.student_id)?;

        enrollment.add_review(request.rating, request.comment);
        self.enrollments.update(enrollment_id, enrollment).await
    }

    pub async fn get_enrollment(
        &self,
        claims: &Claims,
        enrollment_id: &str,
    ) -> AppResult<Enrollment> {
        let enrollment = self
            .enrollments
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Enrollment with id '{}' not found", enrollment_id))
            })?;

        if !self.has_write_access(claims, &enrollment).await? {
            // Deny without confirming the record exists
            return Err(AppError::NotFound(format!(
                "Enrollment with id '{}' not found",
                enrollment_id
            )));
        }

        Ok(enrollment)
    }

    pub async fn my_enrollments(&self, claims: &Claims) -> AppResult<Vec<Enrollment>> {
        self.enrollments.find_by_student(&claims.sub).await
    }

    pub async fn course_enrollments(
        &self,
        claims: &Claims,
        course_id: &str,
    ) -> AppResult<Vec<Enrollment>> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))?;

        access::require_admin_or_owner(claims, &course.instructor_id)?;
        self.enrollments.find_by_course(course_id).await
    }

    /// Ledger entries are never removed in the normal flow; only an explicit
    /// admin delete reaches this.
    pub async fn delete_enrollment(&self, claims: &Claims, enrollment_id: &str) -> AppResult<()> {
        access::require_admin(claims)?;
        self.enrollments.delete(enrollment_id).await
    }

    /// Write access to a ledger entry: admins, the enrolled student, or the
    /// instructor who owns the course.
    async fn has_write_access(&self, claims: &Claims, enrollment: &Enrollment) -> AppResult<bool> {
        if access::is_admin_or_owner(Some(claims), &enrollment.student_id) {
            return Ok(true);
        }
        if claims.role == UserRole::Instructor {
            let course = self.courses.find_by_id(&enrollment.course_id).await?;
            return Ok(matches!(course, Some(c) if c.instructor_id == claims.sub));
        }
        Ok(false)
    }
}
