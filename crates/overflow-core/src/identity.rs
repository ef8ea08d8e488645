//! Who is acting.
//!
//! Authentication lives outside this crate. Mutations only need the acting
//! user's id, supplied through an [`IdentityProvider`].

use crate::error::ForumError;
use crate::ids::UserId;
use crate::memory::Forum;

pub trait IdentityProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<&UserId>;
}

/// A fixed identity, e.g. one chosen on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity(Option<UserId>);

impl StaticIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(id: impl Into<UserId>) -> Self {
        Self(Some(id.into()))
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

/// Resolve the acting user, refusing anonymous or unknown identities.
pub fn require_user(
    provider: &impl IdentityProvider,
    forum: &Forum,
) -> Result<UserId, ForumError> {
    let Some(id) = provider.current_user() else {
        return Err(ForumError::permission("sign in required"));
    };
    if forum.user(id).is_none() {
        return Err(ForumError::permission(format!("unknown user: {id}")));
    }
    Ok(id.clone())
}
