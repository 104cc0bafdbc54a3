//! Access guard — only allow-listed identities may start a session.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Chat identity of a user, as resolved by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fixed set of identities permitted to initiate sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAllowList(BTreeSet<UserId>);

impl AdminAllowList {
    /// Build the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoAdmins`] when `ids` is empty.
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Result<Self, ValidationError> {
        let set: BTreeSet<UserId> = ids.into_iter().collect();
        if set.is_empty() {
            return Err(ValidationError::NoAdmins);
        }
        Ok(Self(set))
    }

    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.0.contains(&user)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rejection returned by [`AccessGuard::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Access denied for you ({user})!")]
pub struct AccessDenied {
    pub user: UserId,
}

/// Pure predicate over the allow-list. Holds no conversation state.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    admins: AdminAllowList,
}

impl AccessGuard {
    #[must_use]
    pub fn new(admins: AdminAllowList) -> Self {
        Self { admins }
    }

    /// # Errors
    ///
    /// Returns [`AccessDenied`] when `user` is not an admin.
    pub fn check(&self, user: UserId) -> Result<(), AccessDenied> {
        if self.admins.contains(user) {
            Ok(())
        } else {
            Err(AccessDenied { user })
        }
    }
}
