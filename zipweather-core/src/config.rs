use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://public.opendatasoft.com";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weather.gov";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// listen_addr = "0.0.0.0:8080"
/// user_agent = "zipweather/0.1 (me@example.com)"
/// request_timeout_secs = 10
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the web server binds to.
    pub listen_addr: String,

    pub geocoder_base_url: String,
    pub weather_base_url: String,

    /// api.weather.gov rejects requests without an identifying User-Agent.
    pub user_agent: String,

    /// Deadline for each upstream request.
    pub request_timeout_secs: u64,

    /// Deadline for a whole zip code lookup (all three upstream calls).
    pub lookup_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            user_agent: default_user_agent(None),
            request_timeout_secs: 10,
            lookup_timeout_secs: 30,
        }
    }
}

/// `zipweather/<version>`, with an optional contact appended the way
/// api.weather.gov asks for.
pub fn default_user_agent(contact: Option<&str>) -> String {
    let base = concat!("zipweather/", env!("CARGO_PKG_VERSION"));
    match contact.map(str::trim).filter(|c| !c.is_empty()) {
        Some(contact) => format!("{base} ({contact})"),
        None => base.to_string(),
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Replace the port of `listen_addr`, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or(self.listen_addr.as_str());
        self.listen_addr = format!("{host}:{port}");
    }

    /// Load config from the platform location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 || self.lookup_timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be at least one second"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }
        for (name, value) in [
            ("geocoder_base_url", &self.geocoder_base_url),
            ("weather_base_url", &self.weather_base_url),
        ] {
            url::Url::parse(value).with_context(|| format!("{name} is not a valid URL: {value}"))?;
        }
        Ok(())
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "zipweather", "zipweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
