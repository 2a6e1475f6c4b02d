//! Configuration file loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use paper_scanner_core::scan::UnparsableDatePolicy;

/// Key = value file configuration for scan defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// `max_results` sent to arXiv (1..=100).
    pub arxiv_max_results: Option<usize>,
    /// `per_page` sent to OpenAlex (1..=200).
    pub openalex_per_page: Option<usize>,
    /// Per-source deadline in seconds.
    pub source_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    /// Relay prefix for arXiv requests.
    pub cors_proxy: Option<String>,
    /// Contact address for the OpenAlex polite pool.
    pub mailto: Option<String>,
    /// API host overrides (mirrors, local mocks).
    pub arxiv_base_url: Option<String>,
    pub openalex_base_url: Option<String>,
    pub unparsable_dates: Option<UnparsableDatePolicy>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        validate_range("arxiv_max_results", self.arxiv_max_results, 1, 100)?;
        validate_range("openalex_per_page", self.openalex_per_page, 1, 200)?;
        validate_timeout_secs("source_timeout_secs", self.source_timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        validate_url("cors_proxy", self.cors_proxy.as_deref())?;
        validate_url("arxiv_base_url", self.arxiv_base_url.as_deref())?;
        validate_url("openalex_base_url", self.openalex_base_url.as_deref())?;

        Ok(())
    }
}

fn validate_url(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value
        && url::Url::parse(value).is_err()
    {
        bail!("Invalid config value for `{field}`: '{value}'. Expected an absolute URL");
    }
    Ok(())
}

fn validate_range(field: &str, value: Option<usize>, min: usize, max: usize) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(min..=max).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: {min}..={max}");
    }
    Ok(())
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log filter used when neither `RUST_LOG` nor a CLI flag decides.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/paper-scanner/config.toml`
/// 2. `$HOME/.config/paper-scanner/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("paper-scanner")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("paper-scanner")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` (must exist) or the default path (optional).
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return read_config_file(path);
    }

    match resolve_default_config_path() {
        Some(path) if path.exists() => read_config_file(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "arxiv_max_results" => {
                cfg.arxiv_max_results = Some(parse_integer_usize(value).with_context(invalid)?);
            }
            "openalex_per_page" => {
                cfg.openalex_per_page = Some(parse_integer_usize(value).with_context(invalid)?);
            }
            "source_timeout_secs" => {
                cfg.source_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "cors_proxy" => {
                cfg.cors_proxy = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "mailto" => {
                cfg.mailto = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "arxiv_base_url" => {
                cfg.arxiv_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "openalex_base_url" => {
                cfg.openalex_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "unparsable_dates" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                let Some(policy) = UnparsableDatePolicy::from_label(&parsed) else {
                    bail!(
                        "Invalid `unparsable_dates` value '{parsed}' on line {line_no}: expected one of: drop, retain"
                    );
                };
                cfg.unparsable_dates = Some(policy);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    raw_value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(ToString::to_string)
        .context("Expected double-quoted string")
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_integer_usize(raw_value: &str) -> Result<usize> {
    let value = parse_integer_u64(raw_value)?;
    usize::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for usize"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}
