//! Authentication and authorization tests
//!
//! Tests for credential validation, role parsing and the permission
//! rules enforced by the API handlers.

use proptest::prelude::*;

use shared::models::UserRole;
use shared::validation::{validate_email, validate_password, validate_username};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last@sub.domain.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("a@b").is_err());
    }

    /// Passwords need at least eight characters
    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("exactly8").is_ok());
        assert!(validate_password("a-much-longer-passphrase").is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("warehouse_admin").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(" leading").is_err());
        assert!(validate_username("trailing ").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
    }

    /// Role labels round-trip through parse
    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Consultant, UserRole::Sales] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("superuser"), None);
    }

    /// New accounts default to the read-only role
    #[test]
    fn test_default_role_is_consultant() {
        assert_eq!(UserRole::default(), UserRole::Consultant);
    }

    /// Only admins administer users and the catalog
    #[test]
    fn test_admin_permissions() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Sales.is_admin());
        assert!(!UserRole::Consultant.is_admin());
    }

    /// Admins and sales staff move inventory; consultants only read
    #[test]
    fn test_inventory_permissions() {
        assert!(UserRole::Admin.can_manage_inventory());
        assert!(UserRole::Sales.can_manage_inventory());
        assert!(!UserRole::Consultant.can_manage_inventory());
    }

    /// Token lifetime arithmetic used when issuing claim pairs
    #[test]
    fn test_token_expiry_ordering() {
        let issued_at = 1_700_000_000i64;
        let access_expiry = issued_at + 15 * 60;
        let refresh_expiry = issued_at + 7 * 24 * 3600;

        assert!(access_expiry > issued_at);
        assert!(refresh_expiry > access_expiry);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn role_strategy() -> impl Strategy<Value = UserRole> {
        prop_oneof![
            Just(UserRole::Admin),
            Just(UserRole::Consultant),
            Just(UserRole::Sales),
        ]
    }

    /// Strategy for syntactically valid emails
    fn email_strategy() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9]{0,15}", "[a-z]{2,10}")
            .prop_map(|(local, domain)| format!("{}@{}.com", local, domain))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Generated well-formed emails always validate
        #[test]
        fn prop_wellformed_emails_accepted(email in email_strategy()) {
            prop_assert!(validate_email(&email).is_ok());
        }

        /// Strings without an at sign never validate
        #[test]
        fn prop_emails_require_at_sign(s in "[a-z0-9 .]{0,40}") {
            prop_assert!(validate_email(&s).is_err());
        }

        /// Password acceptance depends only on length
        #[test]
        fn prop_password_length_threshold(password in "[ -~]{0,40}") {
            let result = validate_password(&password);
            if password.len() >= 8 {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.is_err());
            }
        }

        /// Every role serializes to a label that parses back to itself
        #[test]
        fn prop_role_labels_stable(role in role_strategy()) {
            prop_assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }

        /// Admin capability implies inventory capability
        #[test]
        fn prop_admin_can_always_manage_inventory(role in role_strategy()) {
            if role.is_admin() {
                prop_assert!(role.can_manage_inventory());
            }
        }

        /// Exactly one role is read-only
        #[test]
        fn prop_consultant_is_read_only(role in role_strategy()) {
            prop_assert_eq!(
                !role.can_manage_inventory(),
                role == UserRole::Consultant
            );
        }
    }
}
