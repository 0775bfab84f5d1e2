use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::extractors::{extract_or_empty, Extractor, RecipeExtractor, TableLinkExtractor};
use crate::fetchers::{DocumentSource, HttpDocumentSource, Page};
use crate::model::RecipeVariant;
use log::{error, info};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

type CrawlFuture = Pin<Box<dyn Future<Output = Vec<RecipeVariant>> + Send>>;

/// Outcome of one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub top_recipe: Option<RecipeVariant>,
    pub pages_loaded: usize,
    pub recipes_found: usize,
}

/// Searches the site for the recipe with the best protein to net carb ratio
/// among recipes with the required star rating (5 by default).
pub struct TopRecipeSearch<L = TableLinkExtractor, R = RecipeExtractor> {
    source: Arc<dyn DocumentSource>,
    link_extractor: Arc<L>,
    recipe_extractor: Arc<R>,
    parallelism: usize,
    required_rating: u8,
    progress_interval: usize,
}

impl TopRecipeSearch {
    /// Search with the standard page grammar over the given source
    pub fn new(source: Arc<dyn DocumentSource>) -> Result<Self> {
        Ok(Self::with_extractors(
            source,
            TableLinkExtractor,
            RecipeExtractor::new()?,
        ))
    }

    /// HTTP search configured from [`SearchConfig`]
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let source = Arc::new(HttpDocumentSource::from_config(config)?);

        Ok(Self::new(source)?
            .parallelism(config.parallelism)
            .required_rating(config.required_rating)
            .progress_interval(config.progress_interval))
    }
}

impl<L, R> TopRecipeSearch<L, R>
where
    L: Extractor<Item = String> + Send + Sync + 'static,
    R: Extractor<Item = RecipeVariant> + Send + Sync + 'static,
{
    pub fn with_extractors(
        source: Arc<dyn DocumentSource>,
        link_extractor: L,
        recipe_extractor: R,
    ) -> Self {
        let defaults = SearchConfig::default();

        Self {
            source,
            link_extractor: Arc::new(link_extractor),
            recipe_extractor: Arc::new(recipe_extractor),
            parallelism: defaults.parallelism,
            required_rating: defaults.required_rating,
            progress_interval: defaults.progress_interval,
        }
    }

    /// Maximum number of pages fetched and extracted at the same time
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn required_rating(mut self, rating: u8) -> Self {
        self.required_rating = rating;
        self
    }

    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Find the top recipe under `root_url + root_section`.
    ///
    /// Returns `None` when no recipe with the required rating was found,
    /// including when the root page itself cannot be loaded.
    pub async fn find_top_recipe(
        &self,
        root_url: &str,
        root_section: &str,
    ) -> Option<RecipeVariant> {
        self.search(root_url, root_section).await.top_recipe
    }

    /// Like [`find_top_recipe`](Self::find_top_recipe), with crawl statistics
    pub async fn search(&self, root_url: &str, root_section: &str) -> SearchReport {
        info!("Starting top recipe search");

        let session = Arc::new(CrawlSession {
            source: Arc::clone(&self.source),
            link_extractor: Arc::clone(&self.link_extractor),
            recipe_extractor: Arc::clone(&self.recipe_extractor),
            root_url: root_url.to_string(),
            loaded_pages: AtomicUsize::new(0),
            workers: Semaphore::new(self.parallelism),
            progress_interval: self.progress_interval,
        });

        let recipes = Arc::clone(&session).crawl(root_section.to_string()).await;
        let pages_loaded = session.loaded_pages();
        let recipes_found = recipes.len();
        let top_recipe = top_recipe(recipes, self.required_rating);

        info!(
            "Finished, number of loaded pages: {}, recipe variants found: {}",
            pages_loaded, recipes_found
        );

        SearchReport {
            top_recipe,
            pages_loaded,
            recipes_found,
        }
    }
}

/// Pick the recipe with the highest protein to net carb ratio among those
/// rated `required_rating`. On ties the first one wins.
pub fn top_recipe<I>(recipes: I, required_rating: u8) -> Option<RecipeVariant>
where
    I: IntoIterator<Item = RecipeVariant>,
{
    recipes
        .into_iter()
        .filter(|recipe| recipe.star_rating() == required_rating)
        .fold(None, |best, recipe| match best {
            Some(best) if best.protein_to_net_carb() >= recipe.protein_to_net_carb() => Some(best),
            _ => Some(recipe),
        })
}

enum Node {
    /// Page lists sub-pages
    Branch(Vec<String>),
    /// Recipe page
    Leaf(Vec<RecipeVariant>),
    /// Page could not be loaded
    Unavailable,
}

/// State of a single search. Dropped when the search finishes.
///
/// Links are neither deduplicated nor checked for cycles: a page linked
/// twice is loaded and counted twice.
pub struct CrawlSession<L, R> {
    source: Arc<dyn DocumentSource>,
    link_extractor: Arc<L>,
    recipe_extractor: Arc<R>,
    root_url: String,
    loaded_pages: AtomicUsize,
    workers: Semaphore,
    progress_interval: usize,
}

impl<L, R> CrawlSession<L, R>
where
    L: Extractor<Item = String> + Send + Sync + 'static,
    R: Extractor<Item = RecipeVariant> + Send + Sync + 'static,
{
    /// Number of pages requested so far, failed loads included
    pub fn loaded_pages(&self) -> usize {
        self.loaded_pages.load(Ordering::SeqCst)
    }

    /// Collect every recipe variant reachable from `link`.
    ///
    /// The worker permit is released before sub-pages are spawned, so waiting
    /// parents never hold one.
    fn crawl(self: Arc<Self>, link: String) -> CrawlFuture {
        Box::pin(async move {
            let links = match self.visit(&link).await {
                Node::Branch(links) => links,
                Node::Leaf(recipes) => return recipes,
                Node::Unavailable => return Vec::new(),
            };

            let mut children = JoinSet::new();
            for sub_page in links {
                children.spawn(Arc::clone(&self).crawl(sub_page));
            }

            let mut recipes = Vec::new();
            while let Some(joined) = children.join_next().await {
                match joined {
                    Ok(found) => recipes.extend(found),
                    Err(e) => error!("Skipping sub-pages of {}: {}", link, SearchError::from(e)),
                }
            }
            recipes
        })
    }

    async fn visit(&self, link: &str) -> Node {
        let url = format!("{}{}", self.root_url, link);

        // the semaphore is never closed
        let Ok(_permit) = self.workers.acquire().await else {
            return Node::Unavailable;
        };

        let loaded = self.loaded_pages.fetch_add(1, Ordering::SeqCst) + 1;
        if self.progress_interval > 0 && loaded % self.progress_interval == 0 {
            info!("Already visited {} pages and running", loaded);
        }

        match self.source.fetch(&url).await {
            Ok(page) => self.classify(&page),
            Err(e) => {
                error!("Cannot load {}, skipping document: {}", url, e);
                Node::Unavailable
            }
        }
    }

    fn classify(&self, page: &Page) -> Node {
        let document = page.parse();

        let links = extract_or_empty(self.link_extractor.as_ref(), &document);
        if links.is_empty() {
            Node::Leaf(extract_or_empty(self.recipe_extractor.as_ref(), &document))
        } else {
            Node::Branch(links)
        }
    }
}
