use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory relative paths resolve against. Relative to the config file;
    /// defaults to the config file's directory.
    #[serde(default)]
    pub root: Option<String>,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Directory of the file the config was read from; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Source of the sales snapshot. Passed explicitly to the loader.
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: String,
    /// chrono format of the order date column (day-month-year)
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table on stdout
    #[default]
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl DatasetConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date_format: default_date_format(),
            delimiter: default_delimiter(),
        }
    }

    /// Delimiter as the single byte the csv reader expects
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("delimiter {:?} is not an ASCII character", self.delimiter))
    }
}

fn default_date_format() -> String {
    "%d-%m-%Y".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_output_dir() -> String {
    "target/reports".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[dataset]
path = "data/coffee_sales.csv"
date_format = "%d-%m-%Y"
delimiter = ","

[output]
dir = "target/reports"
format = "table"
"#;

/// Load configuration
///
/// Search order:
/// 1. Explicit path (from the command line)
/// 2. config.toml next to the executable
/// 3. Embedded default config
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        tracing::info!("Loading config from: {}", path.display());
        return load_config_file(path);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return load_config_file(&config_path);
            }
            tracing::debug!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let mut config =
        parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
    config.base_dir = Some(match &config.root {
        Some(root) => config_dir.join(root),
        None => config_dir.to_path_buf(),
    });
    Ok(config)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Resolve a configured path. Absolute paths are kept; relative ones are
/// joined onto the config file's directory, or the working directory for the
/// embedded default.
pub fn resolve_path(config: &Config, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    match &config.base_dir {
        Some(dir) => dir.join(p),
        None => PathBuf::from(path),
    }
}

/// Dataset file path from configuration
pub fn get_dataset_path(config: &Config) -> PathBuf {
    resolve_path(config, &config.dataset.path)
}
