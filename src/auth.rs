//! Access guard.
//!
//! Identity issuance (token minting, password hashing, session
//! validation) is an external concern. This module models the result of
//! that resolution — a [`CurrentUser`] capability — and the ownership
//! and privilege checks every cart/order entry point performs before
//! touching data.

use thiserror::Error;

use crate::uuids::entity_uuid;

entity_uuid!(
    /// User UUID
    UserId
);

/// The caller lacks ownership of the resource or the required privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access denied")]
pub struct Forbidden;

/// An authenticated caller, as resolved by the external identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub admin: bool,
}

impl CurrentUser {
    /// A regular customer.
    #[must_use]
    pub const fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            admin: false,
        }
    }

    /// A privileged back-office actor.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            admin: true,
        }
    }

    /// Require administrative privilege.
    ///
    /// # Errors
    ///
    /// Returns [`Forbidden`] when the caller is not an admin.
    pub const fn require_admin(&self) -> Result<(), Forbidden> {
        if self.admin { Ok(()) } else { Err(Forbidden) }
    }

    /// Require that the caller owns the resource. Admins pass regardless
    /// of ownership.
    ///
    /// # Errors
    ///
    /// Returns [`Forbidden`] when the resource belongs to another user
    /// and the caller is not an admin.
    pub fn require_owner(&self, owner: UserId) -> Result<(), Forbidden> {
        if self.admin || self.user_id == owner {
            Ok(())
        } else {
            Err(Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_cannot_act_as_admin() {
        let user = CurrentUser::customer(UserId::new());

        assert_eq!(user.require_admin(), Err(Forbidden));
    }

    #[test]
    fn admin_passes_both_checks() {
        let admin = CurrentUser::admin(UserId::new());

        assert_eq!(admin.require_admin(), Ok(()));
        assert_eq!(admin.require_owner(UserId::new()), Ok(()));
    }

    #[test]
    fn owner_passes_ownership_check_only_for_own_resources() {
        let user = CurrentUser::customer(UserId::new());

        assert_eq!(user.require_owner(user.user_id), Ok(()));
        assert_eq!(user.require_owner(UserId::new()), Err(Forbidden));
    }
}
