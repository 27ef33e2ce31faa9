use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Silicon vendor behind a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Brand {
    Amd,
    Nvidia,
    Intel,
    #[default]
    Unknown,
}

impl Brand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Amd => "AMD",
            Brand::Nvidia => "NVIDIA",
            Brand::Intel => "INTEL",
            Brand::Unknown => "UNKNOWN",
        }
    }

    /// The brand's contribution to an identifier; unknown contributes nothing.
    pub fn identifier_part(&self) -> &'static str {
        match self {
            Brand::Unknown => "",
            known => known.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "AMD" => Brand::Amd,
            "NVIDIA" => Brand::Nvidia,
            "INTEL" => Brand::Intel,
            _ => Brand::Unknown,
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes derived from a product title. A pure function of the title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAttributes {
    /// Board partner, as written in the title
    pub manufacturer: String,
    pub brand: Brand,
    /// Chipset line, e.g. "RTX"
    pub family: String,
    pub model_number: String,
    /// Canonical space-separated suffix, e.g. "TI SUPER"
    pub performance_suffix: String,
    /// Lowercase series tokens joined with "_", e.g. "twin_edge"
    pub series: String,
    /// family + model + suffix, e.g. "RTX 4070 TI"
    pub general_model: String,
    pub memory_type: Option<String>,
    pub memory_size_gb: Option<u32>,
    /// Manufacturer part number such as "TUF-RTX4070TI-O12G"
    pub product_code: Option<String>,
    /// Title with marketing noise removed
    pub display_name: String,
}

/// One canonical GPU, keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuCanonicalRecord {
    pub identifier: String,
    pub general_model: String,
    pub image: Option<String>,
    pub brand: Brand,
    pub manufacturer: String,
    pub memory_type: Option<String>,
    pub memory_size: Option<u32>,
    pub product_code: Option<String>,
    pub power_consumption: Option<u32>,
    pub dimensions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GpuCanonicalRecord {
    pub fn from_attributes(identifier: String, attrs: &NormalizedAttributes) -> Self {
        Self {
            identifier,
            general_model: attrs.general_model.clone(),
            image: None,
            brand: attrs.brand,
            manufacturer: attrs.manufacturer.clone(),
            memory_type: attrs.memory_type.clone(),
            memory_size: attrs.memory_size_gb,
            product_code: attrs.product_code.clone(),
            power_consumption: None,
            dimensions: None,
            created_at: Utc::now(),
        }
    }
}

/// A vendor's offer for one canonical GPU at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldListing {
    pub identifier: String,
    pub vendor_name: String,
    pub link: String,
    pub price: i64,
    pub original_name: String,
    /// Selected option label when the listing came from a variation
    pub variant_label: Option<String>,
    pub scraped_at: DateTime<Utc>,
}
