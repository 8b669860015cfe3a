//! Authorization Policy
//!
//! Pure decision table over (requester, operation, target). No IO, no
//! panics, no business logic beyond the rules themselves; callers load
//! whatever target state a rule needs before asking.
//!
//! Rules are evaluated in precedence order; the first match decides:
//! 1. Deactivating an Admin target is denied for everyone, always.
//! 2. CreateOwner requires an Admin requester.
//! 3. ReadOne/Update: Customers only on themselves; Owner/Admin on anyone.
//! 4. Deactivate: Customers only themselves; Owners only Customer targets;
//!    Admins anyone not covered by rule 1.
//! 5. List requires Owner or Admin.
//! 6. Restore is never role-authorized; possession of a restore token is the
//!    proof, and that path bypasses this table entirely.
//! 7. Everything else is denied.

use thiserror::Error;

use crate::domain::value_object::{AccountId, Role};

/// Operations subject to the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    ReadOne,
    Update,
    Deactivate,
    CreateOwner,
    Restore,
}

/// The authenticated principal making the request.
#[derive(Debug, Clone, Copy)]
pub struct Requester {
    pub id: AccountId,
    pub role: Role,
}

/// The account an operation is aimed at.
///
/// The role is optional because some rules (ReadOne/Update) decide on ids
/// alone and callers check them before loading the record. Rules that need
/// the role deny when it is absent.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub id: AccountId,
    pub role: Option<Role>,
}

impl Target {
    pub fn id_only(id: AccountId) -> Self {
        Self { id, role: None }
    }

    pub fn with_role(id: AccountId, role: Role) -> Self {
        Self {
            id,
            role: Some(role),
        }
    }
}

/// Typed denial; the message is what the HTTP boundary shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyDenial {
    #[error("Admin accounts cannot be deactivated")]
    AdminImmutable,

    #[error("Only admins can create an owner")]
    AdminRequired,

    #[error("Access denied")]
    NotOwnAccount,

    #[error("You are not allowed to deactivate another user's account")]
    DeactivateNotOwnAccount,

    #[error("Owners can only deactivate customer accounts")]
    OwnerDeactivatesCustomersOnly,

    #[error("You do not have permission to list accounts")]
    ListRestricted,

    #[error("Account restoration requires a restore token")]
    RestoreRequiresToken,

    #[error("Operation requires a target account")]
    TargetRequired,
}

/// Decide whether `requester` may perform `operation` on `target`.
///
/// `target` is `None` only for [`Operation::List`] and
/// [`Operation::CreateOwner`], which have no single target account.
pub fn authorize(
    requester: &Requester,
    operation: Operation,
    target: Option<&Target>,
) -> Result<(), PolicyDenial> {
    use Operation::*;

    // Rule 1: no path may deactivate an Admin, not even another Admin.
    if operation == Deactivate {
        if let Some(target) = target {
            if target.role == Some(Role::Admin) {
                return Err(PolicyDenial::AdminImmutable);
            }
        }
    }

    match operation {
        CreateOwner => {
            // Rule 2
            if requester.role.is_admin() {
                Ok(())
            } else {
                Err(PolicyDenial::AdminRequired)
            }
        }
        ReadOne | Update => {
            // Rule 3
            let target = target.ok_or(PolicyDenial::TargetRequired)?;
            match requester.role {
                Role::Customer if requester.id != target.id => Err(PolicyDenial::NotOwnAccount),
                _ => Ok(()),
            }
        }
        Deactivate => {
            // Rule 4 (rule 1 already excluded Admin targets)
            let target = target.ok_or(PolicyDenial::TargetRequired)?;
            match requester.role {
                Role::Customer if requester.id != target.id => {
                    Err(PolicyDenial::DeactivateNotOwnAccount)
                }
                Role::Customer => Ok(()),
                Role::Owner if target.role != Some(Role::Customer) => {
                    Err(PolicyDenial::OwnerDeactivatesCustomersOnly)
                }
                Role::Owner => Ok(()),
                Role::Admin => Ok(()),
            }
        }
        List => {
            // Rule 5
            if requester.role.is_owner_or_higher() {
                Ok(())
            } else {
                Err(PolicyDenial::ListRestricted)
            }
        }
        // Rule 6: never role-authorized.
        Restore => Err(PolicyDenial::RestoreRequiresToken),
    }
}
