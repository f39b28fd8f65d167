//! Elementary image-processing demos
//!
//! Loads a cached sample image (fetching one from a book search page when
//! the cache is empty), runs one of four fixed pipelines over it and shows
//! every intermediate result until a key is pressed.
//!
//! # Architecture
//! - `config`: defaults, TOML file and command line merge
//! - `source`: cached image lookup and download fallback
//! - `pipeline`: the four demo pipelines and their dispatcher
//! - `viewer`: Slint windows or headless PNG snapshots

pub mod config;
pub mod pipeline;
pub mod source;
pub mod viewer;

use anyhow::{Context, Result};
use config::Config;
use log::Level;
use viewer::{SnapshotViewer, Viewer};

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERR",
        Level::Warn => "WRN",
        Level::Info => "INF",
        Level::Debug => "DBG",
        Level::Trace => "TRC",
    }
}

/// Initializes the logger.
///
/// Lines look like `[INF] 12:30:05 source.rs:88 message`. The default
/// filter is `info`; `RUST_LOG` overrides it.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{style}{}{style:#}] {} {}:{} {}",
                level_tag(record.level()),
                ts,
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub fn make_viewer(config: &Config) -> Result<Box<dyn Viewer>> {
    if let Some(dir) = &config.headless_dir {
        return Ok(Box::new(SnapshotViewer::new(dir)?));
    }

    #[cfg(feature = "gui")]
    {
        Ok(Box::new(viewer::SlintViewer::new()))
    }

    #[cfg(not(feature = "gui"))]
    {
        anyhow::bail!("built without the `gui` feature, pass --headless <DIR>")
    }
}

pub async fn run(config: Config) -> Result<()> {
    let resolved = source::resolve(&config.source())
        .await
        .with_context(|| format!("no usable image at {}", config.image_path.display()))?;

    let result = make_viewer(&config).and_then(|mut viewer| {
        pipeline::run(
            config.example,
            &resolved.frame,
            viewer.as_mut(),
            &config.output_path,
        )
    });

    resolved
        .cleanup()
        .with_context(|| format!("remove {} failed", config.image_path.display()))?;

    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(Level::Info), "INF");
        assert_eq!(level_tag(Level::Warn), "WRN");
        assert_eq!(level_tag(Level::Error), "ERR");
    }
}
