//! Memory type and size inference.
//!
//! The title is searched first; when it names no memory technology the
//! chipset's general model is looked up in static per-vendor tables.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Brand, Extracted};

static MEMORY_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bGDDR\d{1,2}X?\b").expect("valid memory type regex"));

static MEMORY_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s?GB?\b").expect("valid memory size regex"));

/// Every Intel Arc board ships with this.
pub const INTEL_MEMORY_TYPE: &str = "GDDR6";

const NVIDIA_MEMORY_TYPES: &[(&str, &str)] = &[
    ("GT 730", "GDDR5"),
    ("GT 1030", "GDDR5"),
    ("GTX 1050", "GDDR5"),
    ("GTX 1050 TI", "GDDR5"),
    ("GTX 1060", "GDDR5"),
    ("GTX 1070", "GDDR5"),
    ("GTX 1070 TI", "GDDR5"),
    ("GTX 1080", "GDDR5X"),
    ("GTX 1080 TI", "GDDR5X"),
    ("GTX 1630", "GDDR6"),
    ("GTX 1650", "GDDR6"),
    ("GTX 1650 SUPER", "GDDR6"),
    ("GTX 1660", "GDDR5"),
    ("GTX 1660 SUPER", "GDDR6"),
    ("GTX 1660 TI", "GDDR6"),
    ("RTX 2060", "GDDR6"),
    ("RTX 2060 SUPER", "GDDR6"),
    ("RTX 2070", "GDDR6"),
    ("RTX 2070 SUPER", "GDDR6"),
    ("RTX 2080", "GDDR6"),
    ("RTX 2080 SUPER", "GDDR6"),
    ("RTX 2080 TI", "GDDR6"),
    ("RTX 3050", "GDDR6"),
    ("RTX 3060", "GDDR6"),
    ("RTX 3060 TI", "GDDR6"),
    ("RTX 3070", "GDDR6"),
    ("RTX 3070 TI", "GDDR6X"),
    ("RTX 3080", "GDDR6X"),
    ("RTX 3080 TI", "GDDR6X"),
    ("RTX 3090", "GDDR6X"),
    ("RTX 3090 TI", "GDDR6X"),
    ("RTX 4060", "GDDR6"),
    ("RTX 4060 TI", "GDDR6"),
    ("RTX 4070", "GDDR6X"),
    ("RTX 4070 SUPER", "GDDR6X"),
    ("RTX 4070 TI", "GDDR6X"),
    ("RTX 4070 TI SUPER", "GDDR6X"),
    ("RTX 4080", "GDDR6X"),
    ("RTX 4080 SUPER", "GDDR6X"),
    ("RTX 4090", "GDDR6X"),
    ("RTX 5050", "GDDR6"),
    ("RTX 5060", "GDDR7"),
    ("RTX 5060 TI", "GDDR7"),
    ("RTX 5070", "GDDR7"),
    ("RTX 5070 TI", "GDDR7"),
    ("RTX 5080", "GDDR7"),
    ("RTX 5090", "GDDR7"),
];

const AMD_MEMORY_TYPES: &[(&str, &str)] = &[
    ("RX 550", "GDDR5"),
    ("RX 560", "GDDR5"),
    ("RX 570", "GDDR5"),
    ("RX 580", "GDDR5"),
    ("RX 590", "GDDR5"),
    ("RX 5500 XT", "GDDR6"),
    ("RX 5600 XT", "GDDR6"),
    ("RX 5700", "GDDR6"),
    ("RX 5700 XT", "GDDR6"),
    ("RX 6400", "GDDR6"),
    ("RX 6500 XT", "GDDR6"),
    ("RX 6600", "GDDR6"),
    ("RX 6600 XT", "GDDR6"),
    ("RX 6650 XT", "GDDR6"),
    ("RX 6700", "GDDR6"),
    ("RX 6700 XT", "GDDR6"),
    ("RX 6750 XT", "GDDR6"),
    ("RX 6800", "GDDR6"),
    ("RX 6800 XT", "GDDR6"),
    ("RX 6900 XT", "GDDR6"),
    ("RX 6950 XT", "GDDR6"),
    ("RX 7600", "GDDR6"),
    ("RX 7600 XT", "GDDR6"),
    ("RX 7700 XT", "GDDR6"),
    ("RX 7800 XT", "GDDR6"),
    ("RX 7900 GRE", "GDDR6"),
    ("RX 7900 XT", "GDDR6"),
    ("RX 7900 XTX", "GDDR6"),
    ("RX 9060 XT", "GDDR6"),
    ("RX 9070", "GDDR6"),
    ("RX 9070 XT", "GDDR6"),
];

/// Memory technology named verbatim in the title, e.g. "GDDR6X".
pub fn memory_type_in_text(title: &str) -> Extracted<String> {
    Extracted::from_match(
        MEMORY_TYPE_RE.find(title).map(|m| m.as_str().to_string()),
        "memory_type",
    )
}

/// Static lookup keyed by brand and general model ("RTX 3070").
pub fn lookup_memory_type(brand: Brand, general_model: &str) -> Option<&'static str> {
    let table = match brand {
        Brand::Nvidia => NVIDIA_MEMORY_TYPES,
        Brand::Amd => AMD_MEMORY_TYPES,
        Brand::Intel => return Some(INTEL_MEMORY_TYPE),
        Brand::Unknown => return None,
    };

    let key = general_model.trim().to_uppercase();
    table
        .iter()
        .find(|(model, _)| *model == key)
        .map(|(_, memory)| *memory)
}

/// Text match first, then the lookup table. An empty result is a gap, not an error.
pub fn infer_memory_type(title: &str, brand: Brand, general_model: &str) -> Extracted<String> {
    match memory_type_in_text(title) {
        found @ Extracted::Found(_) => found,
        Extracted::Missing { .. } => Extracted::from_match(
            lookup_memory_type(brand, general_model).map(String::from),
            "memory_type_lookup",
        ),
    }
}

/// First "<n>GB" / "<n>G" token in the text.
pub fn memory_size_of(text: &str) -> Extracted<u32> {
    let size = MEMORY_SIZE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    Extracted::from_match(size, "memory_size")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_memory_type_and_size() {
        let title = "ASUS RTX 3060 12GB GDDR6";
        assert_eq!(memory_type_in_text(title).or_empty(), "GDDR6");
        assert_eq!(memory_size_of(title).into_option(), Some(12));
    }

    #[test]
    fn test_direct_match_skips_table() {
        // The table says GDDR6 for an RTX 3060; the title wins.
        let memory = infer_memory_type("Odd RTX 3060 8GB gddr6x", Brand::Nvidia, "RTX 3060");
        assert_eq!(memory.or_empty(), "gddr6x");
    }

    #[test]
    fn test_nvidia_table_fallback() {
        let memory = infer_memory_type("ZOTAC RTX 3070 Twin Edge", Brand::Nvidia, "RTX 3070");
        assert_eq!(memory.or_empty(), "GDDR6");
    }

    #[test]
    fn test_amd_table_fallback() {
        assert_eq!(lookup_memory_type(Brand::Amd, "RX 7900 XTX"), Some("GDDR6"));
        assert_eq!(lookup_memory_type(Brand::Amd, "rx 580"), Some("GDDR5"));
    }

    #[test]
    fn test_intel_defaults() {
        assert_eq!(lookup_memory_type(Brand::Intel, ""), Some("GDDR6"));
        assert_eq!(lookup_memory_type(Brand::Intel, "ARC B580"), Some("GDDR6"));
    }

    #[test]
    fn test_unmapped_model_is_gap() {
        assert!(!infer_memory_type("NVIDIA RTX 9999", Brand::Nvidia, "RTX 9999").is_found());
        assert!(!infer_memory_type("Mystery Card", Brand::Unknown, "").is_found());
    }

    #[test]
    fn test_memory_size_forms() {
        assert_eq!(memory_size_of("RTX 4060 8G").into_option(), Some(8));
        assert_eq!(memory_size_of("RX 7600 XT 16 GB").into_option(), Some(16));
        assert_eq!(memory_size_of("16GB").into_option(), Some(16));
    }

    #[test]
    fn test_memory_size_absent_is_not_zero() {
        assert_eq!(memory_size_of("ZOTAC RTX 3070 Twin Edge").into_option(), None);
        assert_eq!(memory_size_of("0GB").into_option(), Some(0));
    }

    #[test]
    fn test_memory_size_ignores_memory_type_token() {
        assert_eq!(memory_size_of("RTX 4070 GDDR6X").into_option(), None);
    }
}
