use crate::domain::NormalizedAttributes;

/// Canonical identifier: manufacturer, brand, family, model, suffix and series,
/// empty parts dropped, joined with "-", uppercased.
pub fn build_identifier(attrs: &NormalizedAttributes) -> String {
    let suffix = attrs
        .performance_suffix
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    [
        attrs.manufacturer.trim(),
        attrs.brand.identifier_part(),
        attrs.family.trim(),
        attrs.model_number.trim(),
        suffix.as_str(),
        attrs.series.trim(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join("-")
    .to_uppercase()
}

/// Identifier of one physical variant, e.g. `"...-DUAL(16GB)"`.
pub fn variant_identifier(base: &str, option: &str) -> String {
    let option = option.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}({})", base, option.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Brand;

    fn attrs(
        manufacturer: &str,
        brand: Brand,
        family: &str,
        model: &str,
        suffix: &str,
        series: &str,
    ) -> NormalizedAttributes {
        NormalizedAttributes {
            manufacturer: manufacturer.into(),
            brand,
            family: family.into(),
            model_number: model.into(),
            performance_suffix: suffix.into(),
            series: series.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_identifier() {
        let a = attrs("ASUS", Brand::Nvidia, "RTX", "4070", "TI", "strix");
        assert_eq!(build_identifier(&a), "ASUS-NVIDIA-RTX-4070-TI-STRIX");
    }

    #[test]
    fn test_empty_parts_dropped() {
        let a = attrs("MSI", Brand::Nvidia, "RTX", "4070", "", "suprim");
        assert_eq!(build_identifier(&a), "MSI-NVIDIA-RTX-4070-SUPRIM");

        let a = attrs("Acme", Brand::Unknown, "", "", "", "");
        assert_eq!(build_identifier(&a), "ACME");
    }

    #[test]
    fn test_multi_word_suffix_and_series_joined() {
        let a = attrs("Zotac", Brand::Nvidia, "RTX", "4070", "TI SUPER", "twin_edge");
        assert_eq!(
            build_identifier(&a),
            "ZOTAC-NVIDIA-RTX-4070-TI_SUPER-TWIN_EDGE"
        );
    }

    #[test]
    fn test_identifier_is_pure() {
        let a = attrs("Sapphire", Brand::Amd, "RX", "7900", "XTX", "nitro");
        let first = build_identifier(&a);
        let second = build_identifier(&a);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_variant_identifier() {
        assert_eq!(
            variant_identifier("ASUS-NVIDIA-RTX-4060-TI-DUAL", "16gb"),
            "ASUS-NVIDIA-RTX-4060-TI-DUAL(16GB)"
        );
        assert_eq!(
            variant_identifier("MSI-NVIDIA-RTX-4060", " White  Edition "),
            "MSI-NVIDIA-RTX-4060(WHITE EDITION)"
        );
    }
}
