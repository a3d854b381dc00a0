//! Access policy: role gates for route groups and ownership of bookings.

use uuid::Uuid;

use crate::models::{Caller, Role};

/// Whether the caller's role is one of `allowed`.
pub fn authorize(caller: &Caller, allowed: &[Role]) -> bool {
    allowed.contains(&caller.role)
}

/// Whether the caller is the owner recorded on a resource.
pub fn is_owner(caller: &Caller, resource_owner_id: Uuid) -> bool {
    caller.user_id == resource_owner_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> Caller {
        Caller {
            user_id: Uuid::new_v4(),
            name: "Dimas".to_string(),
            email: "dimas@example.com".to_string(),
            role,
            token_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn role_must_be_listed() {
        let owner = caller(Role::Owner);
        let user = caller(Role::User);

        assert!(authorize(&owner, &[Role::Owner]));
        assert!(!authorize(&user, &[Role::Owner]));
        assert!(authorize(&user, &[Role::Owner, Role::User]));
        assert!(!authorize(&owner, &[]));
    }

    #[test]
    fn ownership_compares_user_ids() {
        let user = caller(Role::User);
        assert!(is_owner(&user, user.user_id));
        assert!(!is_owner(&user, Uuid::new_v4()));
    }
}
