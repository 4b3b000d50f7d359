use crate::models::domain::user::{User, UserRole};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates a standard test student
    pub fn test_student() -> User {
        User::test_user("Test Student", "student@example.com", UserRole::Student)
    }

    /// Creates a test user with a custom email and role
    pub fn test_user_with_role(email: &str, role: UserRole) -> User {
        User::test_user("Test User", email, role)
    }

    /// Creates one user per role for access tests
    pub fn one_of_each_role() -> Vec<User> {
        vec![
            User::test_user("Ada Admin", "admin@example.com", UserRole::Admin),
            User::test_user("Ivan Instructor", "instructor@example.com", UserRole::Instructor),
            User::test_user("Sam Student", "student@example.com", UserRole::Student),
        ]
    }
}
