use serde::Serialize;
use std::fmt;

/// One protein to net carb reading taken from a single nutrition annotation.
///
/// A recipe page can list several servings ("Per 4 Wafers", "Per 8 Wafers"),
/// each of them becomes its own variant since the ratio differs per serving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeVariant {
    name: String,
    url: String,
    variant: String,
    nutrition_info: String,
    star_rating: u8,
    protein_to_net_carb: f64,
}

impl RecipeVariant {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        variant: impl Into<String>,
        nutrition_info: impl Into<String>,
        star_rating: u8,
        protein_to_net_carb: f64,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            variant: variant.into(),
            nutrition_info: nutrition_info.into(),
            star_rating,
            protein_to_net_carb,
        }
    }

    /// Recipe name, shared by every variant found on the same page
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the page the variant was extracted from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Serving label, e.g. "Per Cup". Empty when the annotation has none.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Nutrition text as shown on the page, "trace" left untouched
    pub fn nutrition_info(&self) -> &str {
        &self.nutrition_info
    }

    pub fn star_rating(&self) -> u8 {
        self.star_rating
    }

    pub fn protein_to_net_carb(&self) -> f64 {
        self.protein_to_net_carb
    }
}

impl fmt::Display for RecipeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "URL: {}", self.url)?;
        if self.variant.is_empty() {
            writeln!(f, "Nutrition info: {}", self.nutrition_info)?;
        } else {
            writeln!(f, "Nutrition info: {}: {}", self.variant, self.nutrition_info)?;
        }
        write!(f, "Protein to Net Carb Ratio: {}", self.protein_to_net_carb)
    }
}
