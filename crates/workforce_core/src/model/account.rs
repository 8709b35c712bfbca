//! Login account owned by exactly one employee.

use serde::{Deserialize, Serialize};

/// Credentials row keyed by `(user_name, business_tag)`.
///
/// `stored_password` is already hashed by the caller; this layer never sees
/// plain text and never serializes the hash back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_name: String,
    pub business_tag: String,
    #[serde(skip_serializing, default)]
    pub stored_password: String,
    pub email: String,
}

impl Account {
    pub fn new(
        user_name: impl Into<String>,
        business_tag: impl Into<String>,
        stored_password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            business_tag: business_tag.into(),
            stored_password: stored_password.into(),
            email: email.into(),
        }
    }

    /// Key string used when reporting constraint violations.
    pub fn key(&self) -> String {
        format!("{}/{}", self.business_tag, self.user_name)
    }
}
