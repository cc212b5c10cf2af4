use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub webdriver_url: String,
    pub data_dir: PathBuf,
    pub media_dir: PathBuf,
    pub auth_state_path: PathBuf,
    pub ai_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "127.0.0.1:8000"),
            llm_api_key: env::var("GROQ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            llm_base_url: get_env_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_model: get_env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            webdriver_url: get_env_or("WEBDRIVER_URL", "http://localhost:9515"),
            data_dir: get_env_or("DATA_DIR", "scraped_data").into(),
            media_dir: get_env_or("MEDIA_DIR", "media").into(),
            auth_state_path: get_env_or("AUTH_STATE_PATH", "auth_state.json").into(),
            ai_rps: get_env_parse_or("AI_RPS", 5)?,
        })
    }

    /// Settings rooted in `root`, with no API key. Used by tests and local tooling.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            server_address: "127.0.0.1:0".to_string(),
            llm_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            data_dir: root.join("scraped_data"),
            media_dir: root.join("media"),
            auth_state_path: root.join("auth_state.json"),
            ai_rps: 100,
        }
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
