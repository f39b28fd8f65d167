use downloader::{DownloadError, Downloader, SearchPage};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), DownloadError> {
    let save_path = "./cover.jpg";
    let keyword = "ian goodfellow deep learning";

    let page = SearchPage::new();
    println!("Searching: {}", page.query_url(keyword));

    let url = page.find_image_url(keyword).await?;
    println!("Downloading: {}", url);

    let result = Downloader::new(url, save_path)
        .start(|downloaded, total| {
            match total {
                Some(total) => print!("\rProgress: {downloaded}/{total} bytes"),
                None => print!("\rProgress: {downloaded} bytes"),
            }
            _ = std::io::stdout().flush();
        })
        .await;

    match result {
        Ok(()) => println!("\n✓ Saved to {}", save_path),
        Err(DownloadError::IncompleteDownload { downloaded, total }) => {
            println!("\n✗ Download was incomplete: {downloaded}/{total} bytes")
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
