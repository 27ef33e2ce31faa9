//! Fixed text-matching rules for decomposing GPU product titles.
//!
//! Every regex here is compiled once on first use. Matchers return
//! [`Extracted`] so a title that doesn't fit a rule yields an absent field
//! instead of an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Brand, Extracted};

static MEMORY_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+\s?GB?$").expect("valid memory token regex"));

static FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(RTX|GTX|GT|RX|ARC)(?:\b|\d)").expect("valid family regex")
});

// Either digits after a family token (glued or spaced) or an Intel Arc code.
static MODEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:RTX|GTX|GT|RX)\s*(\d{3,4})(?:\b|[a-z])|\b([AB]\d{3})\b")
        .expect("valid model regex")
});

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b|\d)(TI\s+SUPER|SUPER\s+TI|TI|SUPER|XT\s?X|XT|GRE)\b")
        .expect("valid suffix regex")
});

/// Board partners with a known series vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manufacturer {
    Msi,
    Asus,
    Palit,
    Sapphire,
    Zotac,
    Inno3d,
    Gigabyte,
    Asrock,
    Colorful,
    Galax,
    PowerColor,
    Xfx,
    Pny,
    Other,
}

impl Manufacturer {
    pub fn from_token(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "msi" => Manufacturer::Msi,
            "asus" => Manufacturer::Asus,
            "palit" => Manufacturer::Palit,
            "sapphire" => Manufacturer::Sapphire,
            "zotac" => Manufacturer::Zotac,
            "inno3d" => Manufacturer::Inno3d,
            "gigabyte" => Manufacturer::Gigabyte,
            "asrock" => Manufacturer::Asrock,
            "colorful" => Manufacturer::Colorful,
            "galax" => Manufacturer::Galax,
            "powercolor" => Manufacturer::PowerColor,
            "xfx" => Manufacturer::Xfx,
            "pny" => Manufacturer::Pny,
            _ => Manufacturer::Other,
        }
    }

    fn series_vocabulary(&self) -> &'static [&'static str] {
        match self {
            Manufacturer::Msi => &[
                "suprim", "vanguard", "expert", "gaming", "slim", "inspire", "ventus", "shadow",
            ],
            Manufacturer::Asus => &[
                "astral", "matrix", "strix", "tuf", "gaming", "proart", "prime", "ko", "dual",
                "mini", "turbo", "phoenix",
            ],
            Manufacturer::Palit => &[
                "gamerock", "gamingpro", "jetstream", "dual", "infinity", "stormx",
            ],
            Manufacturer::Sapphire => &["toxic", "pure", "nitro", "pulse"],
            Manufacturer::Zotac => &[
                "zone", "gaming", "twin", "eco", "solo", "solid", "edge", "amp", "trinity",
                "extreme", "airo", "infinity", "ultra", "core", "sff", "spider-man",
            ],
            Manufacturer::Inno3d => &[
                "twin", "x2", "compact", "ichill", "x3", "frostbite", "gaming", "ultra",
            ],
            Manufacturer::Gigabyte => &[
                "d6", "mini", "itx", "gaming", "xtr", "turbo", "pro", "master", "stealth",
                "elite", "vision", "xtreme", "windforce", "waterforce", "ice", "eagle", "low",
                "profile",
            ],
            Manufacturer::Asrock => &[
                "aqua", "formula", "phantom", "gaming", "steel", "legend", "challenger",
                "creator", "passive",
            ],
            Manufacturer::Colorful => &["igame", "colorfire", "battle", "ax", "duo", "ultra"],
            Manufacturer::Galax => &["ex", "gamer", "1-click"],
            Manufacturer::PowerColor => &[
                "fighter", "spectral", "hellhound", "itx", "liquid", "devil", "low", "profile",
                "reaper", "red", "dragon",
            ],
            Manufacturer::Xfx => &[
                "speedster", r"qick\s?\d{3}", r"merc\s?\d{3}", "swift", "mercury",
                "quicksilver", "core",
            ],
            Manufacturer::Pny => &["verto", "xlr8", "epic-x"],
            Manufacturer::Other => &[],
        }
    }

    /// Immutable series pattern set for this manufacturer, if it has one.
    pub fn series_patterns(&self) -> Option<&'static Regex> {
        SERIES_PATTERNS.get(self)
    }
}

const KNOWN_MANUFACTURERS: [Manufacturer; 13] = [
    Manufacturer::Msi,
    Manufacturer::Asus,
    Manufacturer::Palit,
    Manufacturer::Sapphire,
    Manufacturer::Zotac,
    Manufacturer::Inno3d,
    Manufacturer::Gigabyte,
    Manufacturer::Asrock,
    Manufacturer::Colorful,
    Manufacturer::Galax,
    Manufacturer::PowerColor,
    Manufacturer::Xfx,
    Manufacturer::Pny,
];

static SERIES_PATTERNS: LazyLock<HashMap<Manufacturer, Regex>> = LazyLock::new(|| {
    KNOWN_MANUFACTURERS
        .iter()
        .map(|m| {
            let pattern = format!(r"(?i)\b(?:{})\b", m.series_vocabulary().join("|"));
            (*m, Regex::new(&pattern).expect("valid series regex"))
        })
        .collect()
});

/// First title token, or the second when the first is a memory size like "8GB".
pub fn manufacturer_of(title: &str) -> Extracted<String> {
    let mut tokens = title.split_whitespace();
    let first = tokens.next();
    let token = match first {
        Some(t) if MEMORY_TOKEN_RE.is_match(t) => tokens.next(),
        other => other,
    };
    Extracted::from_match(token.map(String::from), "manufacturer")
}

/// Silicon vendor by keyword. Rules run NVIDIA, AMD, INTEL and each match
/// overwrites the previous one, so the last matching rule wins.
pub fn brand_of(title: &str) -> Brand {
    let lower = title.to_lowercase();
    let mut brand = Brand::Unknown;

    if ["rtx", "gtx", "gt ", "nvidia", "geforce"]
        .iter()
        .any(|k| lower.contains(k))
    {
        brand = Brand::Nvidia;
    }

    if ["rx", "amd"].iter().any(|k| lower.contains(k)) {
        brand = Brand::Amd;
    }

    if ["arc", "intel"].iter().any(|k| lower.contains(k)) {
        brand = Brand::Intel;
    }

    brand
}

pub fn family_of(title: &str) -> Extracted<String> {
    let family = FAMILY_RE
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase());
    Extracted::from_match(family, "family")
}

pub fn model_number_of(title: &str) -> Extracted<String> {
    let model = MODEL_RE
        .captures(title)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_uppercase());
    Extracted::from_match(model, "model_number")
}

/// Performance suffix in canonical form: uppercase, single-spaced, "XT X" as "XTX".
pub fn performance_suffix_of(title: &str) -> Extracted<String> {
    let suffix = SUFFIX_RE.captures(title).and_then(|c| c.get(1)).map(|m| {
        let words: Vec<String> = m
            .as_str()
            .split_whitespace()
            .map(str::to_uppercase)
            .collect();
        match words.as_slice() {
            [xt, x] if xt == "XT" && x == "X" => "XTX".to_string(),
            _ => words.join(" "),
        }
    });
    Extracted::from_match(suffix, "performance_suffix")
}

/// Distinct lowercase series matches in text order, joined with "_".
pub fn series_of(title: &str, manufacturer: Manufacturer) -> Extracted<String> {
    let Some(re) = manufacturer.series_patterns() else {
        return Extracted::parse_failure("series");
    };

    let mut seen: Vec<String> = Vec::new();
    for m in re.find_iter(title) {
        let key = m.as_str().to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
        }
    }

    if seen.is_empty() {
        Extracted::parse_failure("series")
    } else {
        Extracted::Found(seen.join("_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_is_first_token() {
        assert_eq!(manufacturer_of("ASUS RTX 4070").or_empty(), "ASUS");
    }

    #[test]
    fn test_manufacturer_skips_leading_memory_token() {
        assert_eq!(manufacturer_of("8GB MSI RTX 4060 VENTUS").or_empty(), "MSI");
        assert_eq!(manufacturer_of("12G Zotac RTX 3060").or_empty(), "Zotac");
    }

    #[test]
    fn test_manufacturer_missing_for_blank_title() {
        assert!(!manufacturer_of("   ").is_found());
    }

    #[test]
    fn test_brand_keywords() {
        assert_eq!(brand_of("MSI GeForce RTX 4060"), Brand::Nvidia);
        assert_eq!(brand_of("ZOTAC GT 1030"), Brand::Nvidia);
        assert_eq!(brand_of("Sapphire Pulse RX 7600"), Brand::Amd);
        assert_eq!(brand_of("ASRock Arc B580 Steel Legend"), Brand::Intel);
        // plain substring search: "research" contains "arc"
        assert_eq!(brand_of("Research Edition Card"), Brand::Intel);
        assert_eq!(brand_of("Mystery Card"), Brand::Unknown);
    }

    #[test]
    fn test_brand_later_rule_overwrites_earlier() {
        // NVIDIA is evaluated first, AMD overwrites it
        assert_eq!(brand_of("RTX 4070 bundle with AMD Ryzen"), Brand::Amd);
        // INTEL overwrites both
        assert_eq!(brand_of("RTX 4070 AMD Intel"), Brand::Intel);
    }

    #[test]
    fn test_family() {
        assert_eq!(family_of("ASUS RTX 4070 TI").or_empty(), "RTX");
        assert_eq!(family_of("sapphire rx 7900 xtx").or_empty(), "RX");
        assert_eq!(family_of("Intel Arc A770").or_empty(), "ARC");
        assert_eq!(family_of("MSI RTX4060 VENTUS").or_empty(), "RTX");
        assert!(!family_of("Quadro P2000").is_found());
    }

    #[test]
    fn test_model_number() {
        assert_eq!(model_number_of("ASUS RTX 4070 TI").or_empty(), "4070");
        assert_eq!(model_number_of("GIGABYTE GTX1650 D6").or_empty(), "1650");
        assert_eq!(model_number_of("MSI RTX 4070Ti SUPER").or_empty(), "4070");
        assert_eq!(model_number_of("Intel Arc a770 16GB").or_empty(), "A770");
        assert_eq!(model_number_of("ASRock Arc B580").or_empty(), "B580");
        assert!(!model_number_of("ASUS Dual Fan Card").is_found());
    }

    #[test]
    fn test_performance_suffix_variants() {
        assert_eq!(performance_suffix_of("RTX 4070 Ti").or_empty(), "TI");
        assert_eq!(performance_suffix_of("RTX 4070 Ti Super").or_empty(), "TI SUPER");
        assert_eq!(performance_suffix_of("RTX 4070Ti").or_empty(), "TI");
        assert_eq!(performance_suffix_of("RX 7900 XTX").or_empty(), "XTX");
        assert_eq!(performance_suffix_of("RX 7900 XT X").or_empty(), "XTX");
        assert_eq!(performance_suffix_of("RX 7600XT").or_empty(), "XT");
        assert_eq!(performance_suffix_of("RX 7900 GRE").or_empty(), "GRE");
    }

    #[test]
    fn test_performance_suffix_ignores_embedded_letters() {
        assert!(!performance_suffix_of("MSI RTX 4070 SUPRIM").is_found());
        assert!(!performance_suffix_of("Gigabyte RTX 4060 Xtreme Edition").is_found());
        assert!(!performance_suffix_of("ZOTAC RTX 3070 Twin Edge").is_found());
    }

    #[test]
    fn test_series_collects_distinct_matches_in_order() {
        let series = series_of("ZOTAC Gaming RTX 3070 Twin Edge gaming", Manufacturer::Zotac);
        assert_eq!(series.or_empty(), "gaming_twin_edge");
    }

    #[test]
    fn test_series_is_manufacturer_specific() {
        // "nitro" belongs to Sapphire, not ASUS
        assert!(!series_of("ASUS RX 7600 NITRO", Manufacturer::Asus).is_found());
        assert_eq!(
            series_of("Sapphire NITRO+ RX 7600", Manufacturer::Sapphire).or_empty(),
            "nitro"
        );
    }

    #[test]
    fn test_series_unknown_manufacturer_is_missing() {
        assert!(!series_of("Acme RTX 4060 Strix", Manufacturer::Other).is_found());
    }

    #[test]
    fn test_xfx_numbered_series() {
        assert_eq!(
            series_of("XFX Speedster MERC 310 RX 7900 XTX", Manufacturer::Xfx).or_empty(),
            "speedster_merc 310"
        );
    }

    #[test]
    fn test_gigabyte_pro_does_not_swallow_profile() {
        assert_eq!(
            series_of("Gigabyte RTX 3050 OC Low Profile", Manufacturer::Gigabyte).or_empty(),
            "low_profile"
        );
    }
}
