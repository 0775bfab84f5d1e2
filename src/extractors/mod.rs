use crate::error::{Result, SearchError};
use crate::fetchers::Document;
use log::{debug, error};
use scraper::Selector;

mod recipe;
mod table_links;

pub use recipe::RecipeExtractor;
pub use table_links::TableLinkExtractor;

/// Pulls a list of items out of a single document.
pub trait Extractor {
    type Item;

    fn extract(&self, document: &Document) -> Result<Vec<Self::Item>>;
}

/// Run an extractor, logging any failure and falling back to an empty list.
///
/// A broken page only costs its own items, never the whole crawl.
pub fn extract_or_empty<E>(extractor: &E, document: &Document) -> Vec<E::Item>
where
    E: Extractor + ?Sized,
{
    debug!("Extracting data from: {}", document.location());

    match extractor.extract(document) {
        Ok(items) => items,
        Err(e) => {
            error!(
                "Cannot extract data from document {}, skipping document: {}",
                document.location(),
                e
            );
            Vec::new()
        }
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SearchError::InvalidSelector(format!("{css}: {e:?}")))
}
