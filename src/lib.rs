//! passkeeper: a local password manager with a password generator.

pub mod cli;
pub mod clipboard;
pub mod error;
pub mod generator;
pub mod interactive;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use error::{PassError, Result, ValidationError};
pub use generator::{generate, generate_password, PasswordConfig};
pub use models::{Credential, CredentialMap, LoginDetails};
pub use session::{Form, SearchOutcome, Session};
pub use store::CredentialStore;
