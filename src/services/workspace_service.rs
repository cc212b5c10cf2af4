use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::error::{Error, Result};
use crate::models::course::CoursePlan;
use crate::models::scrape::ScrapedPage;

const SCRAPE_FILE: &str = "latest_scrape.json";
const PLAN_FILE: &str = "course_plan.json";

/// File-backed storage for the latest scrape and the generated course plan.
#[derive(Clone, Debug)]
pub struct WorkspaceService {
    data_dir: PathBuf,
}

impl WorkspaceService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn scrape_path(&self) -> PathBuf {
        self.data_dir.join(SCRAPE_FILE)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.data_dir.join(PLAN_FILE)
    }

    pub fn screenshot_path(&self, timestamp: i64) -> PathBuf {
        self.data_dir.join(format!("screenshot_{}.png", timestamp))
    }

    pub async fn has_scrape(&self) -> bool {
        fs::try_exists(self.scrape_path()).await.unwrap_or(false)
    }

    pub async fn save_scrape(&self, page: &ScrapedPage) -> Result<PathBuf> {
        let path = self.scrape_path();
        self.write_json(&path, page).await?;
        tracing::info!("Scraped data saved to {}", path.display());
        Ok(path)
    }

    pub async fn load_scrape(&self) -> Result<Option<ScrapedPage>> {
        self.read_json(&self.scrape_path()).await
    }

    pub async fn save_plan(&self, plan: &CoursePlan) -> Result<PathBuf> {
        let path = self.plan_path();
        self.write_json(&path, plan).await?;
        tracing::info!("Course plan saved to {}", path.display());
        Ok(path)
    }

    pub async fn load_plan(&self) -> Result<Option<CoursePlan>> {
        self.read_json(&self.plan_path()).await
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir().await?;
        let body = serde_json::to_vec_pretty(value)?;
        fs::write(path, body).await?;
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                Error::Internal(format!("corrupt {}: {}", file_label(path), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
