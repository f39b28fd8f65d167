//! Locates a cover image on a book search results page.

use crate::{DownloadError, Result};
use derivative::Derivative;
use derive_setters::Setters;
use scraper::{Html, Selector};
use std::time::Duration;

pub const DEFAULT_PREFIX: &str = "https://search.books.com.tw/search/query/key/";
pub const DEFAULT_SUFFIX: &str = "/cat/all";

/// Replace spaces so the keyword can sit inside a URL path segment.
pub fn encode_keyword(keyword: &str) -> String {
    keyword.replace(' ', "%20")
}

/// Pull the nested image URL out of a thumbnail link such as
/// `https://im.example/getImage?i=https://cdn.example/cover.jpg&v=1&w=187`.
pub fn nested_image_url(attr: &str) -> Option<&str> {
    let query = attr.split('?').nth(1)?;
    let first_param = query.split('&').next()?;
    first_param.split('=').nth(1).filter(|url| !url.is_empty())
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_", into)]
#[non_exhaustive]
pub struct SearchPage {
    #[derivative(Default(value = "DEFAULT_PREFIX.to_string()"))]
    prefix: String,

    #[derivative(Default(value = "DEFAULT_SUFFIX.to_string()"))]
    suffix: String,

    #[derivative(Default(value = "\"img.itemcov\".to_string()"))]
    selector: String,

    #[derivative(Default(value = "\"data-original\".to_string()"))]
    attribute: String,

    #[derivative(Default(value = "Duration::from_secs(30)"))]
    timeout: Duration,
}

impl SearchPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_url(&self, keyword: &str) -> String {
        format!("{}{}{}", self.prefix, encode_keyword(keyword), self.suffix)
    }

    pub async fn fetch_html(&self, keyword: &str) -> Result<String> {
        let url = self.query_url(keyword);
        log::debug!("search page: {url}");

        let request_error = |error| DownloadError::RequestError {
            error,
            url: url.clone(),
        };

        crate::client(self.timeout)?
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(request_error)?
            .text()
            .await
            .map_err(request_error)
    }

    /// First matching element's attribute, reduced to the nested image URL.
    pub fn extract_image_url(&self, html: &str) -> Result<String> {
        let selector =
            Selector::parse(&self.selector).map_err(|e| DownloadError::InvalidSelector {
                selector: self.selector.clone(),
                reason: format!("{e:?}"),
            })?;

        let document = Html::parse_document(html);
        let element = document.select(&selector).next().ok_or_else(|| {
            DownloadError::PageStructureMismatch(format!("no element matches `{}`", self.selector))
        })?;

        let attr = element.value().attr(&self.attribute).ok_or_else(|| {
            DownloadError::PageStructureMismatch(format!(
                "`{}` has no `{}` attribute",
                self.selector, self.attribute
            ))
        })?;

        nested_image_url(attr).map(str::to_string).ok_or_else(|| {
            DownloadError::PageStructureMismatch(format!("unexpected `{}` value: {attr}", self.attribute))
        })
    }

    pub async fn find_image_url(&self, keyword: &str) -> Result<String> {
        let html = self.fetch_html(keyword).await?;
        self.extract_image_url(&html)
    }
}
