use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_tally_home, tally_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseSection,
    pub review: ReviewSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSection {
    /// Reject transactions dated outside the statement window
    pub strict_window: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSection {
    pub exclude_hidden: bool,
    pub drop_boundary_months: bool,
}

impl Default for ReviewSection {
    fn default() -> Self {
        Self {
            exclude_hidden: true,
            drop_boundary_months: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Used when RUST_LOG is unset
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_tally_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    println!("# {}", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str("[parse]\nstrict_window = true\n").unwrap();
        assert!(cfg.parse.strict_window);
        assert!(cfg.review.exclude_hidden);
        assert!(cfg.review.drop_boundary_months);
        assert_eq!(cfg.log.level, "warn");
    }

    #[test]
    fn test_defaults_survive_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg: Config = toml::from_str(&s).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_config_from(Path::new("/nonexistent/tally/config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
