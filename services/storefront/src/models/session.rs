//! Session payload stored server-side for a logged-in caller

use serde::{Deserialize, Serialize};

/// Identity of the caller a session belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub username: String,
}

/// A resolved session: the cookie token plus the stored identity
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub user: SessionUser,
}
