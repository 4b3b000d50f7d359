//! Access policy layer: pure predicates from (caller identity, optional
//! resource owner) to permit/deny, consulted by handlers before every store
//! operation. Denials carry a generic message so callers learn nothing about
//! records they cannot see.

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
    models::domain::Course,
    repositories::EnrollmentRepository,
};

pub fn is_admin(user: Option<&Claims>) -> bool {
    matches!(user, Some(claims) if claims.role == UserRole::Admin)
}

pub fn is_instructor(user: Option<&Claims>) -> bool {
    matches!(user, Some(claims) if claims.role == UserRole::Instructor)
}

pub fn is_student(user: Option<&Claims>) -> bool {
    matches!(user, Some(claims) if claims.role == UserRole::Student)
}

pub fn is_owner(user: Option<&Claims>, resource_owner_id: &str) -> bool {
    matches!(user, Some(claims) if claims.sub == resource_owner_id)
}

pub fn is_admin_or_instructor(user: Option<&Claims>) -> bool {
    is_admin(user) || is_instructor(user)
}

pub fn is_admin_or_owner(user: Option<&Claims>, resource_owner_id: &str) -> bool {
    is_admin(user) || is_owner(user, resource_owner_id)
}

pub fn is_instructor_or_owner(user: Option<&Claims>, resource_owner_id: &str) -> bool {
    is_instructor(user) || is_owner(user, resource_owner_id)
}

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if !is_admin(Some(claims)) {
        return Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ));
    }
    Ok(())
}

pub fn require_admin_or_instructor(claims: &Claims) -> AppResult<()> {
    if !is_admin_or_instructor(Some(claims)) {
        return Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ));
    }
    Ok(())
}

pub fn require_admin_or_owner(claims: &Claims, resource_owner_id: &str) -> AppResult<()> {
    if !is_admin_or_owner(Some(claims), resource_owner_id) {
        return Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ));
    }
    Ok(())
}

/// Course-scoped access: admins always, instructors for courses they own,
/// students for courses they are enrolled in. Ownership and enrollment are
/// checked against the stores rather than assumed from the role alone.
pub async fn can_access_course(
    claims: &Claims,
    course: &Course,
    enrollments: &dyn EnrollmentRepository,
) -> AppResult<bool> {
    if claims.role == UserRole::Admin {
        return Ok(true);
    }

    if claims.role == UserRole::Instructor {
        return Ok(course.instructor_id == claims.sub);
    }

    let course_id = match course.id_hex() {
        Some(id) => id,
        None => return Ok(false),
    };
    let enrollment = enrollments
        .find_by_student_and_course(&claims.sub, &course_id)
        .await?;
    Ok(enrollment.is_some())
}

pub async fn require_course_access(
    claims: &Claims,
    course: &Course,
    enrollments: &dyn EnrollmentRepository,
) -> AppResult<()> {
    if !can_access_course(claims, course, enrollments).await? {
        return Err(AppError::Forbidden(
            "You do not have access to this course".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: &str, role: UserRole) -> Claims {
        Claims::test_claims(id, role)
    }

    #[test]
    fn test_role_predicates() {
        let admin = claims("a", UserRole::Admin);
        let instructor = claims("i", UserRole::Instructor);
        let student = claims("s", UserRole::Student);

        assert!(is_admin(Some(&admin)));
        assert!(!is_admin(Some(&instructor)));
        assert!(!is_admin(None));

        assert!(is_instructor(Some(&instructor)));
        assert!(!is_instructor(Some(&student)));

        assert!(is_student(Some(&student)));
        assert!(!is_student(Some(&admin)));
    }

    #[test]
    fn test_is_admin_or_owner_truth_table() {
        let admin = claims("admin-id", UserRole::Admin);
        let owner = claims("owner-id", UserRole::Student);
        let other = claims("other-id", UserRole::Student);

        // Admin passes regardless of ownership
        assert!(is_admin_or_owner(Some(&admin), "owner-id"));
        // Owner passes on their own id
        assert!(is_admin_or_owner(Some(&owner), "owner-id"));
        // Non-admin non-owner is denied
        assert!(!is_admin_or_owner(Some(&other), "owner-id"));
        // Unauthenticated is always denied
        assert!(!is_admin_or_owner(None, "owner-id"));
    }

    #[test]
    fn test_is_instructor_or_owner() {
        let instructor = claims("i", UserRole::Instructor);
        let owner = claims("owner-id", UserRole::Student);

        assert!(is_instructor_or_owner(Some(&instructor), "someone-else"));
        assert!(is_instructor_or_owner(Some(&owner), "owner-id"));
        assert!(!is_instructor_or_owner(Some(&owner), "someone-else"));
        assert!(!is_instructor_or_owner(None, "owner-id"));
    }

    #[test]
    fn test_require_admin_denies_with_generic_message() {
        let student = claims("s", UserRole::Student);
        let err = require_admin(&student).unwrap_err();
        match err {
            AppError::Forbidden(msg) => assert!(!msg.contains("admin")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
