//! Authentication and access rules.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Ownership checks for per-user resources

mod password;

pub use password::{MIN_PASSWORD_LENGTH, PasswordError, hash_password, verify_password};

use fintrack_shared::Role;

/// Returns true when `actor` may read or change data owned by `owner`.
///
/// Administrators may act on any account; everyone else only on their own.
#[must_use]
pub fn can_access<K: PartialEq>(role: Role, actor: &K, owner: &K) -> bool {
    role == Role::Admin || actor == owner
}

/// Resolves the role a signup request ends up with.
///
/// Unknown or missing roles fall back to `USER`. `ADMIN` is only granted when
/// `allow_admin` is set.
#[must_use]
pub fn resolve_signup_role(requested: Option<&str>, allow_admin: bool) -> Role {
    match requested.and_then(|r| r.parse::<Role>().ok()) {
        Some(Role::Admin) if allow_admin => Role::Admin,
        _ => Role::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_access_own_data() {
        assert!(can_access(Role::User, &7_u64, &7_u64));
        assert!(!can_access(Role::User, &7_u64, &8_u64));
    }

    #[test]
    fn test_admin_can_access_any_data() {
        assert!(can_access(Role::Admin, &1_u64, &2_u64));
    }

    #[test]
    fn test_signup_role_resolution() {
        assert_eq!(resolve_signup_role(None, false), Role::User);
        assert_eq!(resolve_signup_role(Some("bogus"), true), Role::User);
        assert_eq!(resolve_signup_role(Some("ADMIN"), false), Role::User);
        assert_eq!(resolve_signup_role(Some("admin"), true), Role::Admin);
        assert_eq!(resolve_signup_role(Some("USER"), true), Role::User);
    }
}
