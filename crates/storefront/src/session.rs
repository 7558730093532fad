//! Explicit session context.
//!
//! The cart is owned by the active session. Rather than reading a user id
//! from ambient global storage, the session is constructed once and handed
//! to [`crate::cart::CartModel`], which makes the model testable without
//! any browser-like environment.

use tradewind_core::UserId;

/// The active session for a storefront visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: Option<UserId>,
}

impl SessionContext {
    /// A session with no signed-in user. Cart mutations fail with
    /// `NotAuthenticated` until the visitor signs in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// A session for a signed-in user.
    #[must_use]
    pub const fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}
