use super::{selector, Extractor};
use crate::error::{Result, SearchError};
use crate::fetchers::Document;
use crate::model::RecipeVariant;
use crate::nutrition::NutritionParser;
use log::debug;

const STAR_RATING_IMAGE_SUFFIX: &str = "_star.gif";

/// Returns every recipe variant found on a single recipe page.
///
/// A page can list several nutrition variants for one recipe name, e.g.:
///
/// ```text
/// ZESTY CHEDDAR WAFERS
/// Per 4 Wafers: 117 Calories; 10g Fat; 6g Protein; 2g Carbohydrate; 1g Dietary Fiber; 1g Net Carb
/// <br>
/// Per 8 Wafers: 235 Calories; 20g Fat; 13g Protein; 3g Carbohydrate; 1.5g Dietary Fiber; 1.5g Net Carbs
/// ```
///
/// Each line becomes its own [`RecipeVariant`] since the protein to net carb
/// ratio differs between them.
pub struct RecipeExtractor {
    parser: NutritionParser,
}

impl RecipeExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: NutritionParser::new()?,
        })
    }

    fn recipe_name(&self, document: &Document) -> Result<String> {
        let bold = selector("b")?;

        document
            .html()
            .select(&bold)
            .next()
            .map(|element| normalize_whitespace(&element.text().collect::<String>()))
            .ok_or_else(|| SearchError::Extraction("no recipe name found".to_string()))
    }

    /// Rating comes from the star image, e.g. `4_star.gif`. Pages without one rate 0.
    fn star_rating(&self, document: &Document) -> Result<u8> {
        let images = selector("img")?;

        let Some(src) = document
            .html()
            .select(&images)
            .filter_map(|image| image.value().attr("src"))
            .find(|src| src.ends_with(STAR_RATING_IMAGE_SUFFIX))
        else {
            return Ok(0);
        };

        let file_name = src.rsplit('/').next().unwrap_or(src);
        file_name
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|digit| digit as u8)
            .ok_or_else(|| SearchError::Extraction(format!("invalid star rating image: {src}")))
    }

    /// Text directly inside `<i>` elements, one entry per text node, so lines
    /// separated by `<br>` stay apart. Whitespace runs are collapsed but not
    /// trimmed: a leading space can separate the first amount from the line start.
    fn nutrition_infos(&self, document: &Document) -> Result<Vec<String>> {
        let italics = selector("i")?;

        Ok(document
            .html()
            .select(&italics)
            .flat_map(|element| {
                element
                    .children()
                    .filter_map(|child| child.value().as_text().map(|text| collapse_whitespace(text)))
            })
            .collect())
    }
}

impl Extractor for RecipeExtractor {
    type Item = RecipeVariant;

    fn extract(&self, document: &Document) -> Result<Vec<RecipeVariant>> {
        let name = self.recipe_name(document)?;
        let star_rating = self.star_rating(document)?;
        let nutrition_infos = self.nutrition_infos(document)?;

        debug!(
            "Recipe {} ({} stars) has {} nutrition candidates",
            name,
            star_rating,
            nutrition_infos.len()
        );

        Ok(nutrition_infos
            .iter()
            .filter(|nutrition_info| !nutrition_info.trim().is_empty())
            .filter_map(|nutrition_info| {
                self.parser
                    .parse_variant(nutrition_info, &name, document.location(), star_rating)
            })
            .collect())
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut last_was_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                collapsed.push(' ');
            }
            last_was_space = true;
        } else {
            collapsed.push(c);
            last_was_space = false;
        }
    }

    collapsed
}
