//! Who may do what to which resource.

use crate::error::{ApiError, ApiResult};
use crate::store::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Delete,
}

impl Action {
    pub fn is_read(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Planets are readable by anyone and writable by any authenticated user.
pub fn planet_policy(actor: Option<&User>, action: Action) -> Decision {
    if action.is_read() || actor.is_some() {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Anyone may sign up or read profiles; only the owner may change or
/// delete one. `target` is `None` for collection actions.
pub fn user_policy(actor: Option<&User>, target: Option<&User>, action: Action) -> Decision {
    match action {
        Action::List | Action::Retrieve | Action::Create => Decision::Allow,
        Action::Update | Action::PartialUpdate | Action::Delete => match (actor, target) {
            (Some(actor), Some(target)) if actor.id == target.id => Decision::Allow,
            _ => Decision::Deny,
        },
    }
}

/// Turns a deny into 401 for anonymous callers and 403 otherwise.
pub fn enforce(decision: Decision, actor: Option<&User>) -> ApiResult<()> {
    match (decision, actor) {
        (Decision::Allow, _) => Ok(()),
        (Decision::Deny, None) => Err(ApiError::NotAuthenticated),
        (Decision::Deny, Some(_)) => Err(ApiError::PermissionDenied),
    }
}
