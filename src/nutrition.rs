use crate::error::Result;
use crate::model::RecipeVariant;
use log::debug;
use regex::Regex;

// e.g. "16g Protein", gram unit is optional
const PROTEIN_PATTERN: &str = r"(?i)^.*[\s;]([0-9.]+)g?\s+Protein.*$";
// e.g. "1.5g Net Carbs", gram unit and "Net" keyword are optional; "Carb" also matches "Carbohydrate"
const NET_CARB_PATTERN: &str = r"(?i)^.*[\s;]([0-9.]+)g?\s+(?:Net\s+)?Carb.*$";
const TRACE_PATTERN: &str = r"(?i)trace";

/// Protein and net carb amounts read from one annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutrition {
    pub protein: f64,
    pub net_carb: f64,
}

impl Nutrition {
    pub fn protein_to_net_carb(&self) -> f64 {
        self.protein / self.net_carb
    }
}

pub struct NutritionParser {
    protein: Regex,
    net_carb: Regex,
    trace: Regex,
}

impl NutritionParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            protein: Regex::new(PROTEIN_PATTERN)?,
            net_carb: Regex::new(NET_CARB_PATTERN)?,
            trace: Regex::new(TRACE_PATTERN)?,
        })
    }

    /// Build a recipe variant from a single nutrition annotation.
    ///
    /// Returns `None` when the annotation cannot be read or when protein or
    /// net carbs are zero ("trace" counts as zero), since no ratio can be
    /// computed for those. Unrelated italic text is common on recipe pages,
    /// so this is not treated as an error.
    pub fn parse_variant(
        &self,
        annotation: &str,
        recipe_name: &str,
        url: &str,
        star_rating: u8,
    ) -> Option<RecipeVariant> {
        let (variant, nutrition_info) = split_variant(annotation);

        let Some(nutrition) = self.parse_nutrition(nutrition_info) else {
            debug!(
                "Cannot parse protein and/or net carb data from {}: {}, skipping variant",
                url, nutrition_info
            );
            return None;
        };

        if nutrition.protein == 0.0 || nutrition.net_carb == 0.0 {
            debug!(
                "Skipping {}: variants with trace protein or trace net carb are not evaluated",
                url
            );
            return None;
        }

        Some(RecipeVariant::new(
            recipe_name,
            url,
            variant,
            nutrition_info,
            star_rating,
            nutrition.protein_to_net_carb(),
        ))
    }

    /// Read protein and net carbs from the nutrition part of an annotation.
    ///
    /// "trace" amounts are read as `0`.
    pub fn parse_nutrition(&self, nutrition_info: &str) -> Option<Nutrition> {
        let no_trace = self.trace.replace_all(nutrition_info, "0g");

        let protein = capture_amount(&self.protein, &no_trace)?;
        let net_carb = capture_amount(&self.net_carb, &no_trace)?;

        Some(Nutrition { protein, net_carb })
    }
}

/// Split "Per 4 Wafers: 117 Calories; ..." into the serving label and the
/// nutrition text. The label is empty when there is no colon.
pub fn split_variant(annotation: &str) -> (&str, &str) {
    match annotation.split_once(':') {
        Some((variant, nutrition_info)) => (variant.trim(), nutrition_info.trim()),
        None => ("", annotation),
    }
}

fn capture_amount(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().parse::<f64>().ok())
}
