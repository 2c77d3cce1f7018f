// SPDX-License-Identifier: AGPL-3.0
// ResuCraft Core - Durable credential storage
//
// The bearer token survives process restarts. Storage is a capability
// trait so frontends can substitute an OS-keyring implementation for
// the plain-file default.

use crate::types::AppError;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Durable storage for the bearer credential
pub trait CredentialStorage: Send + Sync {
    /// Load the stored token, if any
    fn load(&self) -> Result<Option<String>, AppError>;

    /// Store a token, replacing any previous one
    fn store(&self, token: &str) -> Result<(), AppError>;

    /// Remove the stored token
    fn clear(&self) -> Result<(), AppError>;
}

/// File-based credential store. The token is kept as-is in a single
/// file; it is opaque to this crate.
pub struct FileCredentialStore {
    file_path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the given token file
    pub fn open(path: PathBuf) -> Self {
        Self { file_path: path }
    }

    /// Create a store backed by the default token location
    pub fn from_default_location() -> Result<Self, AppError> {
        let config_dir = directories::ProjectDirs::from("com", "resucraft", "resucraft")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        // Ensure the directory exists
        fs::create_dir_all(&config_dir)
            .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;

        Ok(Self::open(config_dir.join("auth_token")))
    }
}

impl CredentialStorage for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, AppError> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let token = fs::read_to_string(&self.file_path)
            .map_err(|e| AppError::FileIo(format!("Failed to read credential: {}", e)))?;

        let token = token.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    fn store(&self, token: &str) -> Result<(), AppError> {
        fs::write(&self.file_path, token)
            .map_err(|e| AppError::FileIo(format!("Failed to write credential: {}", e)))
    }

    fn clear(&self) -> Result<(), AppError> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)
                .map_err(|e| AppError::FileIo(format!("Failed to remove credential: {}", e)))?;
        }
        Ok(())
    }
}

/// In-memory credential store for embedding contexts without durable
/// storage, and for tests
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>, AppError> {
        Ok(self.token.read().unwrap().clone())
    }

    fn store(&self, token: &str) -> Result<(), AppError> {
        *self.token.write().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.token.write().unwrap() = None;
        Ok(())
    }
}
