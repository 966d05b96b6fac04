//! File-backed credential store.
//!
//! The whole mapping is read on every lookup and written back in full on
//! every save. Writes go to a temporary file in the same directory which is
//! then renamed over the data file, so a failed save never leaves a
//! half-written file behind. There is no locking: two processes saving at
//! the same time race and the last rename wins.

use crate::error::{PassError, Result, ValidationError};
use crate::models::{Credential, CredentialMap};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data.json";

const TEMP_FILE_PREFIX: &str = ".passkeeper-";

/// Credential store bound to a single JSON file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl CredentialStore {
    /// Create a store for the given data file. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the data file has been created yet.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the full mapping. A missing file is an empty mapping.
    pub fn load(&self) -> Result<CredentialMap> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file absent, using empty store");
                return Ok(CredentialMap::new());
            }
            Err(e) => return Err(PassError::Io(e)),
        };

        let map: CredentialMap =
            serde_json::from_slice(&content).map_err(|source| PassError::CorruptStore {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), entries = map.len(), "loaded data file");
        Ok(map)
    }

    /// Look up a website by exact key. `Ok(None)` means no such entry.
    pub fn find(&self, website: &str) -> Result<Option<Credential>> {
        let map = self.load()?;
        Ok(map
            .get(website)
            .map(|details| Credential::from_entry(website, details)))
    }

    /// Insert or fully replace the entry for `website`.
    pub fn upsert(&self, website: &str, email: &str, password: &str) -> Result<()> {
        validate(website, password)?;

        let mut map = self.load()?;
        let (key, details) = Credential::new(website, email, password).into_entry();
        let replaced = map.insert(key, details).is_some();

        self.write_atomic(&map)?;
        info!(website, replaced, "saved credential");
        Ok(())
    }

    /// Save a credential. Same as [`CredentialStore::upsert`].
    pub fn save(&self, credential: &Credential) -> Result<()> {
        self.upsert(
            &credential.website,
            &credential.email,
            &credential.password,
        )
    }

    /// Serialize the mapping and swap it in over the data file.
    fn write_atomic(&self, map: &CredentialMap) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        map.serialize(&mut serializer).map_err(io::Error::from)?;
        buf.push(b'\n');

        // NamedTempFile is created 0600 on unix and the mode survives the rename.
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&dir)?;
        temp.write_all(&buf)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| PassError::Io(e.error))?;

        debug!(path = %self.path.display(), entries = map.len(), "wrote data file");
        Ok(())
    }
}

/// Website and password are required; email may be empty.
pub fn validate(website: &str, password: &str) -> std::result::Result<(), ValidationError> {
    if website.is_empty() {
        return Err(ValidationError::EmptyWebsite);
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}
