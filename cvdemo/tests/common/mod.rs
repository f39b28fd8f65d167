#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use log::{Level, LevelFilter, Metadata, Record};
use std::{
    io::Cursor,
    sync::{
        Arc, Mutex, Once,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, ThreadId},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Minimal HTTP/1.1 server answering `/search/...` with `page` and
/// `/img/...` with `image`; everything else is a 404.
pub struct MockSite {
    pub base: String,
    pub hits: Arc<AtomicUsize>,
}

impl MockSite {
    pub async fn start(page: impl Fn(&str) -> String + Send + Sync + 'static, image: Vec<u8>) -> MockSite {
        Self::start_with(page, image, 0).await
    }

    /// Like `start`, but the image response announces `missing` more bytes
    /// than it sends before closing the connection.
    pub async fn start_with(
        page: impl Fn(&str) -> String + Send + Sync + 'static,
        image: Vec<u8>,
        missing: usize,
    ) -> MockSite {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));

        let page_base = base.clone();
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);

                let mut buf = vec![0u8; 4096];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let (status, content_type, body, extra) = if path.starts_with("/search/") {
                    ("200 OK", "text/html", page(&page_base).into_bytes(), 0)
                } else if path.starts_with("/img/") {
                    ("200 OK", "image/png", image.clone(), missing)
                } else {
                    ("404 Not Found", "text/plain", b"missing".to_vec(), 0)
                };

                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len() + extra
                );
                _ = stream.write_all(head.as_bytes()).await;
                _ = stream.write_all(&body).await;
                _ = stream.shutdown().await;
            }
        });

        MockSite { base, hits }
    }

    pub fn search_prefix(&self) -> String {
        format!("{}/search/", self.base)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn result_page(base: &str) -> String {
    format!(
        r#"<html><body><div class="table-td">
        <img class="itemcov" alt="Deep Learning" data-original="{base}/getImage?i={base}/img/cover.png&v=5c&w=187&h=187">
        </div></body></html>"#
    )
}

pub fn empty_page(_base: &str) -> String {
    r#"<html><body><p>no results</p></body></html>"#.to_string()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// Dark background with a bright rectangle, so every edge filter has work.
pub fn edged_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside = x > width / 4 && x < 3 * width / 4 && y > height / 4 && y < 3 * height / 4;
        if inside { Rgb([240, 220, 40]) } else { Rgb([15, 30, 90]) }
    })
}

pub fn gray_at(img: &GrayImage, x: u32, y: u32) -> u8 {
    let Luma([v]) = *img.get_pixel(x, y);
    v
}

/// Log records kept per thread so parallel tests don't see each other's output.
struct CapturedLogs {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl log::Log for CapturedLogs {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGS: CapturedLogs = CapturedLogs {
    records: Mutex::new(Vec::new()),
};
static LOGS_INIT: Once = Once::new();

pub fn capture_logs() {
    LOGS_INIT.call_once(|| {
        _ = log::set_logger(&LOGS);
        log::set_max_level(LevelFilter::Trace);
    });
    take_logs();
}

/// Drains the records logged on the calling thread.
pub fn take_logs() -> Vec<(Level, String)> {
    let id = thread::current().id();
    let mut records = LOGS.records.lock().unwrap();
    let (mine, others): (Vec<_>, Vec<_>) = records.drain(..).partition(|(tid, _, _)| *tid == id);
    *records = others;
    mine.into_iter().map(|(_, level, msg)| (level, msg)).collect()
}

pub fn warnings(records: &[(Level, String)]) -> Vec<&str> {
    records
        .iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, msg)| msg.as_str())
        .collect()
}
