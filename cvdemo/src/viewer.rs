//! Where pipeline views end up: Slint windows or PNG snapshots.

use crate::pipeline::View;
use anyhow::{Context, Result};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub trait Viewer {
    fn show(&mut self, view: &View) -> Result<()>;

    /// Blocks until a key is pressed, then closes every shown view.
    fn wait_key(&mut self) -> Result<()>;
}

/// `"sobel - abs_x"` -> `"sobel_-_abs_x"`
pub fn snapshot_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{stem}.png")
}

/// Writes every view as a PNG; nothing to wait for.
#[derive(Debug)]
pub struct SnapshotViewer {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SnapshotViewer {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {} failed", dir.display()))?;
        Ok(Self {
            dir,
            written: vec![],
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Viewer for SnapshotViewer {
    fn show(&mut self, view: &View) -> Result<()> {
        let path = self.dir.join(snapshot_name(view.title));
        view.frame
            .save(&path)
            .with_context(|| format!("write {} failed", path.display()))?;
        self.written.push(path);
        Ok(())
    }

    fn wait_key(&mut self) -> Result<()> {
        info!("Wrote {} views to {}", self.written.len(), self.dir.display());
        Ok(())
    }
}

#[cfg(feature = "gui")]
mod window {
    use super::Viewer;
    use crate::pipeline::View;
    use anyhow::Result;
    use slint::{ComponentHandle, Image, Rgba8Pixel, SharedPixelBuffer};

    slint::slint! {
        export component PreviewWindow inherits Window {
            in property <image> frame;
            in property <string> label;
            callback key-pressed();

            title: root.label;
            preferred-width: root.frame.width * 1px;
            preferred-height: root.frame.height * 1px;

            scope := FocusScope {
                width: parent.width;
                height: parent.height;

                key-pressed(event) => {
                    root.key-pressed();
                    accept
                }

                Image {
                    width: parent.width;
                    height: parent.height;
                    source: root.frame;
                    image-fit: contain;
                }
            }

            init => {
                scope.focus();
            }
        }
    }

    /// One native window per view; any key in any window closes them all.
    #[derive(Default)]
    pub struct SlintViewer {
        windows: Vec<PreviewWindow>,
    }

    impl SlintViewer {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Viewer for SlintViewer {
        fn show(&mut self, view: &View) -> Result<()> {
            let rgba = view.frame.to_display_rgba();
            let buffer =
                SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(rgba.as_raw(), rgba.width(), rgba.height());

            let window = PreviewWindow::new()?;
            window.set_frame(Image::from_rgba8(buffer));
            window.set_label(view.title.into());
            window.on_key_pressed(|| {
                _ = slint::quit_event_loop();
            });
            window.show()?;

            self.windows.push(window);
            Ok(())
        }

        fn wait_key(&mut self) -> Result<()> {
            if self.windows.is_empty() {
                return Ok(());
            }

            slint::run_event_loop()?;

            for window in self.windows.drain(..) {
                _ = window.hide();
            }
            Ok(())
        }
    }
}

#[cfg(feature = "gui")]
pub use window::SlintViewer;
