pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod nutrition;
pub mod search;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use model::RecipeVariant;
pub use search::{SearchReport, TopRecipeSearch};

/// Crawl from `root_url + root_section` over HTTP and return the top recipe.
///
/// Settings other than the root come from [`SearchConfig::load`].
pub async fn find_top_recipe(root_url: &str, root_section: &str) -> Result<Option<RecipeVariant>> {
    let config = SearchConfig::load()?;
    let search = TopRecipeSearch::from_config(&config)?;

    Ok(search.find_top_recipe(root_url, root_section).await)
}
