use crate::source::SourceConfig;
use anyhow::{Context, Result};
use clap::Parser;
use derivative::Derivative;
use downloader::{SearchPage, search};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Parser, Debug, Default)]
#[command(version, about = "Elementary image-processing demos")]
pub struct Cli {
    /// Demo to run: 1 basic, 2 color space, 3 filtering, 4 edge detection
    #[arg(short, long)]
    pub example: Option<u8>,

    /// Cached input image; fetched from the search page when it can't be decoded
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// PNG written by the basic demo
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Search keyword used when fetching a sample image
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write every view as PNG into this directory instead of opening windows
    #[arg(long)]
    pub headless: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[derivative(Default(value = "4"))]
    pub example: u8,

    #[derivative(Default(value = "PathBuf::from(\"download.jpg\")"))]
    pub image_path: PathBuf,

    #[derivative(Default(value = "PathBuf::from(\"xxx.png\")"))]
    pub output_path: PathBuf,

    #[derivative(Default(value = "\"ian goodfellow deep learning\".to_string()"))]
    pub keyword: String,

    #[derivative(Default(value = "search::DEFAULT_PREFIX.to_string()"))]
    pub search_prefix: String,

    #[derivative(Default(value = "search::DEFAULT_SUFFIX.to_string()"))]
    pub search_suffix: String,

    #[derivative(Default(value = "30"))]
    pub timeout_secs: u64,

    pub headless_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {} failed", path.display()))?;
        let config = toml::from_str::<Config>(&text)
            .with_context(|| format!("parse config {} failed", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Command line flags win over the file, the file over the defaults.
    pub fn from_cli(cli: Cli) -> Result<Config> {
        let mut config = match &cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(example) = cli.example {
            config.example = example;
        }
        if let Some(image) = cli.image {
            config.image_path = image;
        }
        if let Some(output) = cli.output {
            config.output_path = output;
        }
        if let Some(keyword) = cli.keyword {
            config.keyword = keyword;
        }
        if cli.headless.is_some() {
            config.headless_dir = cli.headless;
        }

        Ok(config)
    }

    pub fn source(&self) -> SourceConfig {
        let timeout = Duration::from_secs(self.timeout_secs);
        SourceConfig {
            path: self.image_path.clone(),
            keyword: self.keyword.clone(),
            search: SearchPage::new()
                .with_prefix(self.search_prefix.as_str())
                .with_suffix(self.search_suffix.as_str())
                .with_timeout(timeout),
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.example, 4);
        assert_eq!(config.image_path, PathBuf::from("download.jpg"));
        assert_eq!(config.output_path, PathBuf::from("xxx.png"));
        assert_eq!(config.keyword, "ian goodfellow deep learning");
        assert!(config.headless_dir.is_none());

        let source = config.source();
        let page = SearchPage::new();
        assert_eq!(source.search.query_url("x"), page.query_url("x"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() -> Result<()> {
        let config: Config = toml::from_str("example = 2\nkeyword = \"rust\"\n")?;
        assert_eq!(config.example, 2);
        assert_eq!(config.keyword, "rust");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.search_suffix, "/cat/all");
        Ok(())
    }

    #[test]
    fn test_cli_overrides_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cvdemo.toml");
        fs::write(&path, "example = 2\nimage_path = \"cached.jpg\"\n")?;

        let cli = Cli::parse_from([
            "cvdemo",
            "--config",
            path.to_str().unwrap(),
            "--example",
            "3",
            "--headless",
            "views",
        ]);
        let config = Config::from_cli(cli)?;

        assert_eq!(config.example, 3);
        assert_eq!(config.image_path, PathBuf::from("cached.jpg"));
        assert_eq!(config.headless_dir, Some(PathBuf::from("views")));
        Ok(())
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/cvdemo.toml")),
            ..Default::default()
        };
        assert!(Config::from_cli(cli).is_err());
    }

    #[test]
    fn test_source_config() {
        let config = Config {
            keyword: "deep learning".to_string(),
            ..Default::default()
        };
        let source = config.source();
        assert_eq!(source.path, PathBuf::from("download.jpg"));
        assert_eq!(
            source.search.query_url(&source.keyword),
            "https://search.books.com.tw/search/query/key/deep%20learning/cat/all"
        );
    }
}
