use async_trait::async_trait;
use genaw_search::extractors::Extractor;
use genaw_search::fetchers::{Document, DocumentSource, Page};
use genaw_search::{RecipeVariant, SearchError, TopRecipeSearch};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const ROOT_URL: &str = "http://root/";

fn create_category_html(links: &[&str]) -> String {
    let rows: String = links
        .iter()
        .map(|link| format!(r#"<tr><td><a href="{link}">{link}</a></td></tr>"#))
        .collect();

    format!(
        r#"
        <html>
        <body>
            <p><a href="index.html">Home</a></p>
            <table>{rows}</table>
        </body>
        </html>
        "#
    )
}

fn create_recipe_html(name: &str, stars: u8, protein: u32, net_carbs: u32) -> String {
    format!(
        r#"
        <html>
        <body>
            <img src="images/{stars}_star.gif">
            <p><b>{name}</b></p>
            <i>Per Serving: 100 Calories; 5g Fat; {protein}g Protein; 6g Carbohydrate; 1g Dietary Fiber; {net_carbs}g Net Carbs</i>
        </body>
        </html>
        "#
    )
}

/// Pages of the test site:
///
/// ```text
/// root
/// -- section1
/// ------ recipe1, 5-star, ratio 1
/// -- section2
/// ------ sub-section1
/// ---------- recipe2, 5-star, ratio 2
/// ---------- recipe3, 3-star, ratio 3
/// ------ sub-section2
/// ---------- recipe4, 4-star, ratio 4
/// ---------- recipe5, cannot be loaded
/// ```
fn site_pages() -> Vec<(&'static str, String)> {
    vec![
        ("root", create_category_html(&["section1", "section2"])),
        ("section1", create_category_html(&["recipe1"])),
        ("section2", create_category_html(&["sub-section1", "sub-section2"])),
        ("sub-section1", create_category_html(&["recipe2", "recipe3"])),
        ("sub-section2", create_category_html(&["recipe4", "recipe5"])),
        ("recipe1", create_recipe_html("recipe1", 5, 2, 2)),
        ("recipe2", create_recipe_html("recipe2", 5, 4, 2)),
        ("recipe3", create_recipe_html("recipe3", 3, 6, 2)),
        ("recipe4", create_recipe_html("recipe4", 4, 8, 2)),
    ]
}

/// Serves pages from memory; unknown URLs fail like a broken link would.
struct InMemorySource {
    pages: HashMap<String, String>,
}

impl InMemorySource {
    fn new(base_url: &str, pages: Vec<(&str, String)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(link, html)| (format!("{base_url}{link}"), html))
                .collect(),
        }
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn fetch(&self, url: &str) -> genaw_search::Result<Page> {
        self.pages
            .get(url)
            .map(|html| Page::new(url, html.clone()))
            .ok_or_else(|| SearchError::Extraction(format!("no page at {url}")))
    }
}

#[tokio::test]
async fn test_search_root_url_no_document() {
    let source = Arc::new(InMemorySource::new(ROOT_URL, Vec::new()));
    let search = TopRecipeSearch::new(source).unwrap();

    let report = search.search(ROOT_URL, "root").await;

    assert!(report.top_recipe.is_none());
    assert_eq!(report.pages_loaded, 1);
    assert_eq!(report.recipes_found, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_search_with_sub_pages() {
    let source = Arc::new(InMemorySource::new(ROOT_URL, site_pages()));
    let search = TopRecipeSearch::new(source).unwrap();

    let report = search.search(ROOT_URL, "root").await;

    let top = report.top_recipe.unwrap();
    assert_eq!(top.name(), "recipe2");
    assert_eq!(top.url(), "http://root/recipe2");
    assert_eq!(top.variant(), "Per Serving");
    assert_eq!(top.star_rating(), 5);
    assert_eq!(top.protein_to_net_carb(), 2.0);
    assert_eq!(report.pages_loaded, 10);
    assert_eq!(report.recipes_found, 4);
}

/// Root with 8 sections of 8 recipes each, all 5-star. Recipe ratios are
/// unique, `recipe-7-7` has the highest one.
fn wide_site_pages() -> Vec<(String, String)> {
    let mut pages = Vec::new();
    let sections: Vec<String> = (0..8).map(|s| format!("section-{s}")).collect();
    let section_links: Vec<&str> = sections.iter().map(String::as_str).collect();
    pages.push(("root".to_string(), create_category_html(&section_links)));

    for (s, section) in sections.iter().enumerate() {
        let recipes: Vec<String> = (0..8).map(|r| format!("recipe-{s}-{r}")).collect();
        let recipe_links: Vec<&str> = recipes.iter().map(String::as_str).collect();
        pages.push((section.clone(), create_category_html(&recipe_links)));

        for (r, recipe) in recipes.iter().enumerate() {
            let protein = (s * 8 + r + 1) as u32;
            pages.push((recipe.clone(), create_recipe_html(recipe, 5, protein, 1)));
        }
    }

    pages
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_search_wide_site_on_parallel_workers() {
    let pages = wide_site_pages();
    let source = Arc::new(InMemorySource::new(
        ROOT_URL,
        pages
            .iter()
            .map(|(link, html)| (link.as_str(), html.clone()))
            .collect(),
    ));
    let search = TopRecipeSearch::new(source).unwrap().parallelism(4);

    for _ in 0..3 {
        let report = search.search(ROOT_URL, "root").await;

        let top = report.top_recipe.unwrap();
        assert_eq!(top.name(), "recipe-7-7");
        assert_eq!(top.protein_to_net_carb(), 64.0);
        assert_eq!(report.pages_loaded, 1 + 8 + 64);
        assert_eq!(report.recipes_found, 64);
    }
}

#[tokio::test]
async fn test_search_single_worker() {
    let source = Arc::new(InMemorySource::new(ROOT_URL, site_pages()));
    let search = TopRecipeSearch::new(source).unwrap().parallelism(1);

    let top = search.find_top_recipe(ROOT_URL, "root").await.unwrap();

    assert_eq!(top.name(), "recipe2");
}

#[tokio::test]
async fn test_search_is_repeatable() {
    let source = Arc::new(InMemorySource::new(ROOT_URL, site_pages()));
    let search = TopRecipeSearch::new(source).unwrap();

    let first = search.search(ROOT_URL, "root").await;
    let second = search.search(ROOT_URL, "root").await;

    assert_eq!(first.top_recipe, second.top_recipe);
    assert_eq!(first.pages_loaded, 10);
    assert_eq!(second.pages_loaded, 10);
}

#[tokio::test]
async fn test_search_other_required_rating() {
    let source = Arc::new(InMemorySource::new(ROOT_URL, site_pages()));
    let search = TopRecipeSearch::new(source).unwrap().required_rating(4);

    let top = search.find_top_recipe(ROOT_URL, "root").await.unwrap();

    assert_eq!(top.name(), "recipe4");
    assert_eq!(top.protein_to_net_carb(), 4.0);
}

#[tokio::test]
async fn test_search_recipe_page_as_root() {
    let source = Arc::new(InMemorySource::new(ROOT_URL, site_pages()));
    let search = TopRecipeSearch::new(source).unwrap();

    let report = search.search(ROOT_URL, "recipe3").await;

    // a recipe page is a leaf, its only recipe is 3-star
    assert!(report.top_recipe.is_none());
    assert_eq!(report.pages_loaded, 1);
    assert_eq!(report.recipes_found, 1);
}

/// Link extractor driven by a page-to-links table
struct FakeLinks(HashMap<String, Vec<String>>);

impl Extractor for FakeLinks {
    type Item = String;

    fn extract(&self, document: &Document) -> genaw_search::Result<Vec<String>> {
        Ok(self.0.get(document.location()).cloned().unwrap_or_default())
    }
}

/// Recipe extractor that records which pages it was asked about
struct FakeRecipes {
    recipes: HashMap<String, Vec<RecipeVariant>>,
    visited: Arc<Mutex<Vec<String>>>,
}

impl Extractor for FakeRecipes {
    type Item = RecipeVariant;

    fn extract(&self, document: &Document) -> genaw_search::Result<Vec<RecipeVariant>> {
        self.visited
            .lock()
            .unwrap()
            .push(document.location().to_string());

        match self.recipes.get(document.location()) {
            Some(recipes) => Ok(recipes.clone()),
            None => Err(SearchError::Extraction("not a recipe page".to_string())),
        }
    }
}

#[tokio::test]
async fn test_search_visits_every_recipe_page() {
    let url = |link: &str| format!("{ROOT_URL}{link}");
    let links = |children: &[&str]| children.iter().map(|c| c.to_string()).collect::<Vec<_>>();

    let pages = [
        "root",
        "section1",
        "section2",
        "sub-section1",
        "sub-section2",
        "recipe1",
        "recipe2",
        "recipe3",
        "recipe4",
    ];
    let source = Arc::new(InMemorySource::new(
        ROOT_URL,
        pages
            .iter()
            .map(|page| (*page, String::from("<html></html>")))
            .collect(),
    ));

    let structure = FakeLinks(HashMap::from([
        (url("root"), links(&["section1", "section2"])),
        (url("section1"), links(&["recipe1"])),
        (url("section2"), links(&["sub-section1", "sub-section2"])),
        (url("sub-section1"), links(&["recipe2", "recipe3"])),
        (url("sub-section2"), links(&["recipe4", "recipe5"])),
    ]));

    let visited = Arc::new(Mutex::new(Vec::new()));
    let recipes = FakeRecipes {
        recipes: HashMap::from([
            (url("recipe1"), vec![RecipeVariant::new("recipe1", "url1", "v1", "info1", 5, 1.0)]),
            (url("recipe2"), vec![RecipeVariant::new("recipe2", "url2", "v2", "info2", 5, 2.0)]),
            (url("recipe3"), vec![RecipeVariant::new("recipe3", "url3", "v3", "info3", 3, 3.0)]),
            (url("recipe4"), vec![RecipeVariant::new("recipe4", "url4", "v4", "info4", 4, 4.0)]),
        ]),
        visited: Arc::clone(&visited),
    };

    let search = TopRecipeSearch::with_extractors(source, structure, recipes);

    assert_eq!(
        search.find_top_recipe(ROOT_URL, "root").await,
        Some(RecipeVariant::new("recipe2", "url2", "v2", "info2", 5, 2.0))
    );

    let mut visited = visited.lock().unwrap().clone();
    visited.sort();
    assert_eq!(
        visited,
        vec![url("recipe1"), url("recipe2"), url("recipe3"), url("recipe4")]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_search_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();

    for (link, html) in site_pages() {
        let mock = server
            .mock("GET", format!("/{link}").as_str())
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(html)
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }
    let missing = server
        .mock("GET", "/recipe5")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let root_url = format!("{}/", server.url());
    let source = Arc::new(genaw_search::fetchers::HttpDocumentSource::new(None, None).unwrap());
    let search = TopRecipeSearch::new(source).unwrap();

    let report = search.search(&root_url, "root").await;

    let top = report.top_recipe.unwrap();
    assert_eq!(top.name(), "recipe2");
    assert_eq!(top.url(), format!("{root_url}recipe2"));
    assert_eq!(report.pages_loaded, 10);

    for mock in mocks {
        mock.assert_async().await;
    }
    missing.assert_async().await;
}
