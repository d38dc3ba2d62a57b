use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::ensure_prp_home;

pub const BACKEND_URL_ENV: &str = "PRP_BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub base_url: String,
    /// Per-request timeout. Absent means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// tracing filter directive, e.g. "warn" or "prp_client=debug".
    pub level: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ServiceSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Flag beats environment beats file.
    pub fn resolve_base_url(&self, env: Option<String>, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or(env.filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| self.base_url.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_prp_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        println!("\n# {BACKEND_URL_ENV} is set and overrides service.base_url: {url}");
    }
    Ok(())
}
