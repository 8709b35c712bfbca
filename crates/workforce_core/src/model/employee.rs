//! Employee of a business, arranged in a parent/child hierarchy.
//!
//! # Invariants
//! - Identity is the account key `(user_name, business_tag)`.
//! - `parent` is only populated on reads; writes persist `parent_user_name`.
//! - The hierarchy is acyclic by convention only; readers bound the walk.

use super::account::Account;
use super::validation::{require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub account: Account,
    pub first_name: String,
    pub sur_name: String,
    /// Manager within the same business, if any.
    pub parent_user_name: Option<String>,
    pub job_role: String,
    /// Resolved manager chain, filled in by employee reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Employee>>,
}

impl Employee {
    pub fn new(
        account: Account,
        first_name: impl Into<String>,
        sur_name: impl Into<String>,
        job_role: impl Into<String>,
    ) -> Self {
        Self {
            account,
            first_name: first_name.into(),
            sur_name: sur_name.into(),
            parent_user_name: None,
            job_role: job_role.into(),
            parent: None,
        }
    }

    pub fn with_parent_user_name(mut self, parent_user_name: impl Into<String>) -> Self {
        self.parent_user_name = Some(parent_user_name.into());
        self
    }

    pub fn user_name(&self) -> &str {
        &self.account.user_name
    }

    pub fn business_tag(&self) -> &str {
        &self.account.business_tag
    }

    /// Number of resolved managers above this employee.
    pub fn chain_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("userName", self.user_name())?;
        require_non_empty("businessTag", self.business_tag())
    }
}
