use scraper::Html;

/// Raw markup returned by a [`DocumentSource`](super::DocumentSource).
#[derive(Debug, Clone)]
pub struct Page {
    pub location: String,
    pub markup: String,
}

impl Page {
    pub fn new(location: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            markup: markup.into(),
        }
    }

    pub fn parse(&self) -> Document {
        Document::parse(&self.markup, &self.location)
    }
}

/// Parsed page together with the location it was loaded from.
pub struct Document {
    location: String,
    html: Html,
}

impl Document {
    pub fn parse(raw_markup: &str, source_label: &str) -> Self {
        Self {
            location: source_label.to_string(),
            html: Html::parse_document(raw_markup),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}
