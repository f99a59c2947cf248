//! Client configuration.
//!
//! Resolution order: built-in defaults, then the optional JSON file at
//! `<config dir>/formation/config.json`, then `FORMATION_*` environment
//! variables.

use crate::error::{CoreError, Result};
use directories::ProjectDirs;
use formation_model::Locale;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const CONFIG_FILE: &str = "config.json";

pub mod env {
    pub const API_ORIGIN: &str = "FORMATION_API_ORIGIN";
    pub const BASE_PATH: &str = "FORMATION_BASE_PATH";
    pub const DATA_DIR: &str = "FORMATION_DATA_DIR";
    pub const DEMO_MODE: &str = "FORMATION_DEMO_MODE";
    pub const LOCALE: &str = "FORMATION_LOCALE";
    pub const CAROUSEL_INTERVAL_SECS: &str = "FORMATION_CAROUSEL_INTERVAL_SECS";
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend origin; `None` runs fully offline on built-in data
    pub api_origin: Option<Url>,
    pub base_path: String,
    /// Directory holding the profile store file
    pub data_dir: PathBuf,
    /// Accept any credential pair at login
    pub demo_mode: bool,
    pub locale: Locale,
    pub carousel_interval: Duration,
    /// Resume prompts are offered only past this offset
    pub resume_threshold_secs: f64,
    /// Playback seconds between progress reports to the backend
    pub progress_report_step_secs: u64,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_origin: None,
            base_path: "/".to_string(),
            data_dir: default_data_dir(),
            demo_mode: false,
            locale: Locale::Ko,
            carousel_interval: Duration::from_secs(5),
            resume_threshold_secs: 5.0,
            progress_report_step_secs: 10,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// On-disk shape. Every field is optional so partial files work.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_origin: Option<String>,
    base_path: Option<String>,
    data_dir: Option<PathBuf>,
    demo_mode: Option<bool>,
    locale: Option<String>,
    carousel_interval: Option<String>,
    resume_threshold_secs: Option<f64>,
    progress_report_step_secs: Option<u64>,
    request_timeout: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("click", "exampleott", "formation")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".formation"))
}

/// Location of the optional config file.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl AppConfig {
    /// Load from the user's config file and the process environment.
    pub fn load() -> Result<Self> {
        let file = config_path().and_then(|path| {
            match std::fs::read_to_string(&path) {
                Ok(raw) => {
                    debug!(path = %path.display(), "read config file");
                    Some(raw)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config file unreadable");
                    None
                }
            }
        });
        Self::from_sources(file.as_deref(), std::env::vars())
    }

    /// Resolve from raw config file contents and environment pairs.
    pub fn from_sources(
        file: Option<&str>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = file {
            match serde_json::from_str::<FileConfig>(raw) {
                Ok(file) => config.apply_file(file)?,
                Err(e) => warn!(error = %e, "malformed config file ignored"),
            }
        }

        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with("FORMATION_"))
            .collect();
        config.apply_env(&vars)?;

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if let Some(origin) = file.api_origin {
            self.api_origin = parse_origin(&origin)?;
        }
        if let Some(base_path) = file.base_path {
            self.base_path = base_path;
        }
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(demo_mode) = file.demo_mode {
            self.demo_mode = demo_mode;
        }
        if let Some(tag) = file.locale {
            self.set_locale(&tag);
        }
        if let Some(raw) = file.carousel_interval {
            self.carousel_interval = parse_duration("carousel_interval", &raw)?;
        }
        if let Some(secs) = file.resume_threshold_secs {
            self.resume_threshold_secs = secs;
        }
        if let Some(step) = file.progress_report_step_secs {
            self.progress_report_step_secs = step.max(1);
        }
        if let Some(raw) = file.request_timeout {
            self.request_timeout = parse_duration("request_timeout", &raw)?;
        }
        Ok(())
    }

    fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(origin) = vars.get(env::API_ORIGIN) {
            self.api_origin = parse_origin(origin)?;
        }
        if let Some(base_path) = vars.get(env::BASE_PATH) {
            self.base_path = base_path.clone();
        }
        if let Some(data_dir) = vars.get(env::DATA_DIR) {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Some(flag) = vars.get(env::DEMO_MODE) {
            self.demo_mode = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        if let Some(tag) = vars.get(env::LOCALE) {
            self.set_locale(tag);
        }
        if let Some(secs) = vars.get(env::CAROUSEL_INTERVAL_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                CoreError::Config(format!(
                    "{}: not a number of seconds: {secs}",
                    env::CAROUSEL_INTERVAL_SECS
                ))
            })?;
            self.carousel_interval = Duration::from_secs(secs.max(1));
        }
        Ok(())
    }

    fn set_locale(&mut self, tag: &str) {
        match Locale::from_tag(tag) {
            Some(locale) => self.locale = locale,
            None => warn!(tag, "unsupported locale, keeping {}", self.locale),
        }
    }
}

/// An empty origin disables the backend.
fn parse_origin(raw: &str) -> Result<Option<Url>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    Url::parse(raw)
        .map(Some)
        .map_err(|e| CoreError::Config(format!("invalid API origin {raw}: {e}")))
}

fn parse_duration(field: &str, raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim())
        .map_err(|e| CoreError::Config(format!("{field}: {e}")))
}
