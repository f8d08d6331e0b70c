//! Session identity model

use serde::{Deserialize, Serialize};

/// Identity carried in the `session` cookie.
///
/// This is not a stored entity: it is reconstructed per-request from the
/// cookie's JSON payload and trusted as-is, with no signature check and no
/// lookup against persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Identity derived from the login email
    pub id: String,
    /// Email submitted at login
    pub email: String,
}
