//! services/client/src/adapters/token_file.rs
//!
//! File-backed implementation of the `TokenStore` port. The token file is
//! the only durable state the client keeps; everything else about a session
//! is re-derived from `/auth/me`.

use std::fs;
use std::path::PathBuf;

use controlpet_core::ports::TokenStore;

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        fs::write(&self.path, token)
    }

    fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
