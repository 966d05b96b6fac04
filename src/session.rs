//! Form state and actions shared by the front ends.

use crate::error::Result;
use crate::generator::{self, PasswordConfig};
use crate::models::Credential;
use crate::store::CredentialStore;
use rand::Rng;
use zeroize::Zeroize;

/// Current values of the three input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub website: String,
    pub email: String,
    pub password: String,
}

impl Form {
    /// Empty form with the email field pre-filled.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Clear the fields a successful save consumes. Email is kept.
    pub fn reset_after_save(&mut self) {
        self.website.clear();
        self.password.zeroize();
    }

    /// Clear every field.
    pub fn clear(&mut self) {
        self.website.clear();
        self.email.clear();
        self.password.zeroize();
    }
}

/// Result of a search action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Credential),
    /// Nothing has been saved yet.
    NoDataFile,
    NotFound(String),
}

/// All mutable state of one front-end session.
pub struct Session {
    store: CredentialStore,
    config: PasswordConfig,
    pub form: Form,
}

impl Session {
    pub fn new(store: CredentialStore, config: PasswordConfig, default_email: &str) -> Self {
        Self {
            store,
            config,
            form: Form::with_email(default_email),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn config(&self) -> &PasswordConfig {
        &self.config
    }

    /// Look up the website currently in the form.
    pub fn search(&self) -> Result<SearchOutcome> {
        let website = self.form.website.as_str();
        if !self.store.exists() {
            return Ok(SearchOutcome::NoDataFile);
        }

        Ok(match self.store.find(website)? {
            Some(credential) => SearchOutcome::Found(credential),
            None => SearchOutcome::NotFound(website.to_string()),
        })
    }

    /// Save the form. Website and password are cleared only on success.
    pub fn save(&mut self) -> Result<Credential> {
        let credential = Credential::new(
            self.form.website.clone(),
            self.form.email.clone(),
            self.form.password.clone(),
        );
        self.store.save(&credential)?;
        self.form.reset_after_save();
        Ok(credential)
    }

    /// Fill the password field with a new password from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        self.form.password.zeroize();
        self.form.password = generator::generate(&self.config, rng);
        &self.form.password
    }

    /// Fill the password field with a new password.
    pub fn generate(&mut self) -> &str {
        self.generate_with(&mut rand::thread_rng())
    }
}
