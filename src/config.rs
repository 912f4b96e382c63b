use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Stop the self-test run at the first failing scenario.
    #[serde(default)]
    pub stop_on_failure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "text" or "json"
    #[serde(default)]
    pub format: OutputFormat,
    /// Stamp reports with the local time.
    #[serde(default = "default_true")]
    pub timestamp: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset (e.g. "warn", "circbuf=debug").
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_true() -> bool { true }
fn default_level() -> String { "warn".into() }

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: OutputFormat::Text, timestamp: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl Config {
    /// Load the per-user config, writing a defaults file on first run.
    ///
    /// Never fails: on any error the defaults are used and the reason is
    /// handed back so the caller can log it once logging is up.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        match try_load() {
            Ok(c)  => (c, None),
            Err(e) => {
                // Write defaults on first run (best-effort)
                let reason = match try_write_defaults() {
                    Ok(()) => e,
                    Err(w) => anyhow::anyhow!("{:#}; could not write default config: {:#}", e, w),
                };
                (Config::default(), Some(reason))
            }
        }
    }

    /// Load an explicitly named config file. Unlike [`Config::load`], errors
    /// are returned to the caller.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("circbuf").join("circbuf.toml"))
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    Config::load_from(&path)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() {
        // present but unreadable or malformed; leave it for the user to fix
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# circbuf configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::parse("").unwrap();
        assert!(!cfg.general.stop_on_failure);
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert!(cfg.output.timestamp);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = Config::parse("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert!(cfg.output.timestamp);
        assert!(!cfg.general.stop_on_failure);
    }

    #[test]
    fn full_file_round_trips_through_defaults_writer() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = Config::parse(&text).unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Config::parse("[output]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn load_from_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("reading config"));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circbuf.toml");
        fs::write(&path, "[general]\nstop_on_failure = true\n[logging]\nlevel = \"debug\"\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert!(cfg.general.stop_on_failure);
        assert_eq!(cfg.logging.level, "debug");
    }
}
