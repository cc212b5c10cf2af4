use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};
use crate::models::browser::{AuthState, Cookie};
use crate::utils::time;

/// Persists the browser's login cookies between launches.
#[derive(Clone, Debug)]
pub struct AuthService {
    storage_path: PathBuf,
}

impl AuthService {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        let storage_path = if storage_path.is_absolute() {
            storage_path
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&storage_path))
                .unwrap_or(storage_path)
        };
        Self { storage_path }
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.storage_path).await.unwrap_or(false)
    }

    pub async fn save_state(&self, cookies: Vec<Cookie>) -> Result<PathBuf> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let state = AuthState {
            cookies,
            saved_at: time::now(),
        };
        fs::write(&self.storage_path, serde_json::to_vec_pretty(&state)?).await?;
        tracing::info!(
            cookies = state.cookies.len(),
            "State saved to {}",
            self.storage_path.display()
        );
        Ok(self.storage_path.clone())
    }

    pub async fn load_state(&self) -> Result<Option<AuthState>> {
        match fs::read(&self.storage_path).await {
            Ok(bytes) => {
                tracing::info!("Loading auth state from {}", self.storage_path.display());
                serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                    Error::Internal(format!("corrupt auth state file: {}", e))
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
