//! Data models for the credential store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The value stored under a website key in the data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoginDetails {
    pub email: String,
    pub password: String,
}

/// Website name to login details, in the order websites were first saved.
pub type CredentialMap = IndexMap<String, LoginDetails>;

/// A single stored credential, keyed by website.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub website: String,
    pub email: String,
    pub password: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(
        website: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Build a credential from a map entry.
    pub fn from_entry(website: &str, details: &LoginDetails) -> Self {
        Self {
            website: website.to_string(),
            email: details.email.clone(),
            password: details.password.clone(),
        }
    }

    /// Split into the map key and the persisted value.
    pub fn into_entry(self) -> (String, LoginDetails) {
        (
            self.website,
            LoginDetails {
                email: self.email,
                password: self.password,
            },
        )
    }

    /// Password replaced by asterisks of the same length.
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}
