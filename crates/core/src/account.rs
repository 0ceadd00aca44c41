use serde::{Deserialize, Serialize};

/// Numeric chat-style user identifier.
pub type UserId = i64;

/// An advertising account as seen by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Platform account identifier.
    pub id: String,
    /// Human-readable account name shown in digests.
    pub display_name: String,
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}
