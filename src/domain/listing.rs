use serde::{Deserialize, Serialize};

/// A product link found on a catalog listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub link: String,
}

impl RawListing {
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }
}

/// Cursor over a paginated catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    pub url: String,
    /// 1-based page number
    pub number: usize,
}

impl ListingPage {
    pub fn first(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            number: 1,
        }
    }
}

/// Which physical attribute a variation axis changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    MemoryCapacity,
    Color,
    SkuVariant,
}

impl AxisKind {
    /// Map a site's variation label (e.g. the `<th>` text) to an axis kind.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "capacity" | "memory" | "memory size" | "size" => Some(AxisKind::MemoryCapacity),
            "color" | "colour" => Some(AxisKind::Color),
            "version" | "variant" | "model" | "type" => Some(AxisKind::SkuVariant),
            _ => None,
        }
    }

    /// Whether options on this axis describe distinct physical SKUs.
    pub fn is_physical(&self) -> bool {
        matches!(self, AxisKind::MemoryCapacity | AxisKind::Color)
    }
}

/// One selectable option on a variation axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationOption {
    pub label: String,
    /// Price read from the live page after selecting this option, if probed
    #[serde(default)]
    pub raw_price: Option<String>,
}

impl VariationOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            raw_price: None,
        }
    }

    pub fn with_price(label: impl Into<String>, raw_price: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            raw_price: Some(raw_price.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAxis {
    pub kind: AxisKind,
    /// Label as shown by the site
    pub label: String,
    pub options: Vec<VariationOption>,
}

/// Everything scraped from a single product detail page.
///
/// Lives only for the duration of one product's transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductDetail {
    pub link: String,
    pub original_name: String,
    #[serde(default)]
    pub raw_price: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub variation_axes: Vec<VariationAxis>,
}

impl RawProductDetail {
    pub fn new(link: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            original_name: original_name.into(),
            ..Default::default()
        }
    }

    /// Best available image reference: full URL, else the bare filename.
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or(self.image_filename.as_deref())
    }
}

/// Last path segment of an image URL.
pub fn image_filename_from_url(src: &str) -> Option<String> {
    let path = match url::Url::parse(src) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => src.split(['?', '#']).next().unwrap_or(src).to_string(),
    };
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(String::from)
}
