//! Ownership and role gate shared by every mutating operation.
//!
//! Services look the resource up first (so a missing record is reported as
//! not found) and only then consult the gate.

use super::{Error, Principal, Role, UserId};

/// Roles allowed to publish bootcamps, courses and photos.
pub const PUBLISHER_ROLES: &[Role] = &[Role::Publisher, Role::Admin];
/// Roles allowed to write reviews.
pub const REVIEWER_ROLES: &[Role] = &[Role::User, Role::Admin];
/// Roles allowed to administer accounts.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// The principal owns the resource or is an admin.
pub fn can_mutate(owner: &UserId, principal: &Principal) -> bool {
    principal.id == *owner || principal.is_admin()
}

/// The principal's role belongs to `allowed`.
pub fn can_create(principal: &Principal, allowed: &[Role]) -> bool {
    allowed.contains(&principal.role)
}

/// Fail with `Forbidden` unless [`can_create`] holds.
pub fn ensure_role(principal: &Principal, allowed: &[Role]) -> Result<(), Error> {
    if can_create(principal, allowed) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "User role {} is not authorized to access this route",
            principal.role
        )))
    }
}

/// Fail with `Forbidden` unless [`can_mutate`] holds.
pub fn ensure_can_mutate(owner: &UserId, principal: &Principal, resource: &str) -> Result<(), Error> {
    if can_mutate(owner, principal) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "User {} is not authorized to modify this {resource}",
            principal.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn principal(role: Role) -> Principal {
        Principal {
            id: UserId::random(),
            role,
        }
    }

    #[rstest]
    #[case(Role::User, false)]
    #[case(Role::Publisher, false)]
    #[case(Role::Admin, true)]
    fn only_owner_or_admin_may_mutate(#[case] role: Role, #[case] expected: bool) {
        let owner = UserId::random();
        assert_eq!(can_mutate(&owner, &principal(role)), expected);
    }

    #[rstest]
    fn owner_may_mutate_regardless_of_role() {
        let caller = principal(Role::User);
        assert!(can_mutate(&caller.id, &caller));
    }

    #[rstest]
    #[case(Role::User, PUBLISHER_ROLES, false)]
    #[case(Role::Publisher, PUBLISHER_ROLES, true)]
    #[case(Role::Publisher, REVIEWER_ROLES, false)]
    #[case(Role::User, REVIEWER_ROLES, true)]
    #[case(Role::Publisher, ADMIN_ROLES, false)]
    #[case(Role::Admin, ADMIN_ROLES, true)]
    fn role_sets_gate_creation(
        #[case] role: Role,
        #[case] allowed: &[Role],
        #[case] expected: bool,
    ) {
        assert_eq!(can_create(&principal(role), allowed), expected);
    }

    #[rstest]
    fn failed_gates_are_forbidden() {
        let caller = principal(Role::Publisher);
        let role_err = ensure_role(&caller, REVIEWER_ROLES).expect_err("publisher cannot review");
        assert_eq!(role_err.code(), ErrorCode::Forbidden);
        assert_eq!(
            role_err.message(),
            "User role publisher is not authorized to access this route"
        );

        let owner_err = ensure_can_mutate(&UserId::random(), &caller, "bootcamp")
            .expect_err("stranger cannot mutate");
        assert_eq!(owner_err.code(), ErrorCode::Forbidden);
        assert_eq!(
            owner_err.message(),
            format!("User {} is not authorized to modify this bootcamp", caller.id)
        );
    }
}
