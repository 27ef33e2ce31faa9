//! Fan a single product out into one priced entry per selectable option.

use serde::{Deserialize, Serialize};

use crate::domain::{Extracted, VariationAxis};
use crate::normalizer::price::parse_price_range;

/// How to treat a product that exposes more than one variation axis.
///
/// `Independent` expands each axis on its own without a cross-join, which is
/// how the catalog has always been recorded. `PrimaryOnly` keeps only the
/// first axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiAxisPolicy {
    #[default]
    Independent,
    PrimaryOnly,
}

impl MultiAxisPolicy {
    pub fn select<'a>(&self, axes: &'a [VariationAxis]) -> &'a [VariationAxis] {
        match self {
            MultiAxisPolicy::Independent => axes,
            MultiAxisPolicy::PrimaryOnly => &axes[..axes.len().min(1)],
        }
    }
}

/// The product-level price as listed before any option is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListedPrice {
    Absent,
    Single(i64),
    Range(Vec<i64>),
}

impl ListedPrice {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return ListedPrice::Absent;
        };
        match parse_price_range(raw) {
            Ok(bounds) if bounds.len() == 1 => ListedPrice::Single(bounds[0]),
            Ok(bounds) if bounds.len() > 1 => ListedPrice::Range(bounds),
            Ok(_) => ListedPrice::Absent,
            Err(e) => {
                tracing::debug!("unparsable listed price: {}", e);
                ListedPrice::Absent
            }
        }
    }

    /// Lowest listed amount, used when there is nothing to expand.
    pub fn lowest(&self) -> Option<i64> {
        match self {
            ListedPrice::Absent => None,
            ListedPrice::Single(p) => Some(*p),
            ListedPrice::Range(bounds) => bounds.iter().min().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedOption {
    pub label: String,
    pub price: Extracted<i64>,
}

/// One entry per option, in input order.
///
/// An option's price comes from, in order: the price probed on the live page
/// after selecting it; its position in a listed range with one bound per
/// option; the single listed price. Anything else leaves the price missing.
pub fn expand_axis(axis: &VariationAxis, listed: &ListedPrice) -> Vec<ExpandedOption> {
    let count = axis.options.len();

    axis.options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let probed = option
                .raw_price
                .as_deref()
                .and_then(|raw| match parse_price_range(raw) {
                    Ok(bounds) => bounds.first().copied(),
                    Err(e) => {
                        tracing::debug!("unparsable probed price for {}: {}", option.label, e);
                        None
                    }
                });

            let price = probed.or_else(|| match listed {
                ListedPrice::Range(bounds) if bounds.len() == count => Some(bounds[idx]),
                ListedPrice::Single(p) => Some(*p),
                _ => None,
            });

            ExpandedOption {
                label: option.label.trim().to_string(),
                price: Extracted::from_match(price, "variation_price"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AxisKind, VariationOption};

    fn axis(options: Vec<VariationOption>) -> VariationAxis {
        VariationAxis {
            kind: AxisKind::MemoryCapacity,
            label: "Capacity".into(),
            options,
        }
    }

    fn prices(expanded: &[ExpandedOption]) -> Vec<(String, Option<i64>)> {
        expanded
            .iter()
            .map(|e| (e.label.clone(), e.price.clone().into_option()))
            .collect()
    }

    #[test]
    fn test_single_option_single_price() {
        let a = axis(vec![VariationOption::new("8GB")]);
        let listed = ListedPrice::parse(Some("₱18,500.00"));
        assert_eq!(
            prices(&expand_axis(&a, &listed)),
            vec![("8GB".to_string(), Some(18500))]
        );
    }

    #[test]
    fn test_two_options_range_by_position() {
        let a = axis(vec![VariationOption::new("8GB"), VariationOption::new("16GB")]);
        let listed = ListedPrice::parse(Some("₱20,000 – ₱22,000"));
        let expanded = expand_axis(&a, &listed);
        assert_eq!(expanded.len(), 2);
        assert_eq!(
            prices(&expanded),
            vec![
                ("8GB".to_string(), Some(20000)),
                ("16GB".to_string(), Some(22000)),
            ]
        );
    }

    #[test]
    fn test_probed_prices_win() {
        let a = axis(vec![
            VariationOption::with_price("8GB", "₱19,000"),
            VariationOption::with_price("12GB", "₱21,500.00"),
            VariationOption::with_price("16GB", "₱24,000"),
        ]);
        let listed = ListedPrice::parse(Some("₱19,000 – ₱24,000"));
        assert_eq!(
            prices(&expand_axis(&a, &listed)),
            vec![
                ("8GB".to_string(), Some(19000)),
                ("12GB".to_string(), Some(21500)),
                ("16GB".to_string(), Some(24000)),
            ]
        );
    }

    #[test]
    fn test_three_options_without_probe_are_unpriced() {
        let a = axis(vec![
            VariationOption::new("Black"),
            VariationOption::new("White"),
            VariationOption::new("Pink"),
        ]);
        let listed = ListedPrice::parse(Some("₱19,000 – ₱24,000"));
        let expanded = expand_axis(&a, &listed);
        assert_eq!(expanded.len(), 3);
        assert!(expanded.iter().all(|e| !e.price.is_found()));
    }

    #[test]
    fn test_single_listed_price_applies_to_every_option() {
        let a = axis(vec![VariationOption::new("Black"), VariationOption::new("White")]);
        let listed = ListedPrice::parse(Some("₱30,000"));
        assert_eq!(
            prices(&expand_axis(&a, &listed)),
            vec![
                ("Black".to_string(), Some(30000)),
                ("White".to_string(), Some(30000)),
            ]
        );
    }

    #[test]
    fn test_listed_price_parse() {
        assert_eq!(ListedPrice::parse(None), ListedPrice::Absent);
        assert_eq!(ListedPrice::parse(Some("n/a")), ListedPrice::Absent);
        assert_eq!(ListedPrice::parse(Some("1,000")), ListedPrice::Single(1000));
        assert_eq!(
            ListedPrice::parse(Some("₱22,000 – ₱20,000")).lowest(),
            Some(20000)
        );
    }

    #[test]
    fn test_policy_selects_axes() {
        let axes = vec![
            axis(vec![VariationOption::new("8GB")]),
            VariationAxis {
                kind: AxisKind::Color,
                label: "Color".into(),
                options: vec![VariationOption::new("White")],
            },
        ];
        assert_eq!(MultiAxisPolicy::Independent.select(&axes).len(), 2);
        assert_eq!(MultiAxisPolicy::PrimaryOnly.select(&axes).len(), 1);
        assert_eq!(MultiAxisPolicy::PrimaryOnly.select(&[]).len(), 0);
    }
}
