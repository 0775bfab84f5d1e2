use super::{selector, Extractor};
use crate::error::Result;
use crate::fetchers::Document;

/// Returns the `href` of every `<a>` nested under a `<table>`.
///
/// Category pages list their sub-pages in tables; recipe pages have none,
/// which is how the crawler tells the two apart.
pub struct TableLinkExtractor;

impl Extractor for TableLinkExtractor {
    type Item = String;

    fn extract(&self, document: &Document) -> Result<Vec<String>> {
        let links = selector("table a")?;

        Ok(document
            .html()
            .select(&links)
            .filter_map(|link| link.value().attr("href"))
            .filter(|href| !href.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}
