//! Title cleanup for display and product-code extraction.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

use crate::domain::Extracted;

static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:graphics card|video card|geforce)\b|\bGDDR\d+X?\b")
        .expect("valid noise regex")
});

static MEMORY_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s?GB\s*\|\s*\d+\s?GB").expect("valid pair regex"));

static BUS_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*-?\s*bit\b").expect("valid bus width regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

static PRODUCT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{2,}(?:-[A-Z0-9]{2,})+\b").expect("valid product code regex")
});

/// Strip marketing noise, memory-pair listings, bus width and stray pipes.
pub fn clean_display_name(title: &str) -> String {
    let decoded = decode_html_entities(title);
    let without_pairs = MEMORY_PAIR_RE.replace_all(&decoded, " ");
    let without_noise = NOISE_RE.replace_all(&without_pairs, " ");
    let without_bus = BUS_WIDTH_RE.replace_all(&without_noise, " ");
    let without_pipes = without_bus.replace('|', " ");
    WHITESPACE_RE
        .replace_all(&without_pipes, " ")
        .trim()
        .to_string()
}

/// Manufacturer part number, e.g. "TUF-RTX4070TI-O12G-GAMING".
pub fn product_code_of(title: &str) -> Extracted<String> {
    Extracted::from_match(
        PRODUCT_CODE_RE.find(title).map(|m| m.as_str().to_string()),
        "product_code",
    )
}
