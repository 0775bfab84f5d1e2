use crate::error::Result;
use async_trait::async_trait;

mod document;
mod request;

pub use document::{Document, Page};
pub use request::HttpDocumentSource;

/// Source of pages for the crawler.
///
/// Fetching is the only place a crawl waits on I/O, so it is the one async
/// seam. Parsing happens afterwards through [`Page::parse`].
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}
