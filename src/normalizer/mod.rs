//! Title normalization and record building.
//!
//! ```text
//! RawProductDetail → attributes → identifier → variation fan-out → records
//! ```

pub mod cleanup;
pub mod identifier;
pub mod memory;
pub mod patterns;
pub mod price;
pub mod variation;

use chrono::Utc;

use crate::domain::{
    AxisKind, GpuCanonicalRecord, NormalizedAttributes, RawProductDetail, SoldListing,
};
use identifier::{build_identifier, variant_identifier};
use patterns::Manufacturer;
use variation::{expand_axis, ListedPrice, MultiAxisPolicy};

pub use price::{normalize_price, parse_price_range, PriceError};

/// Everything one product page turns into.
#[derive(Debug, Clone, Default)]
pub struct NormalizedProduct {
    /// One per distinct identifier
    pub records: Vec<GpuCanonicalRecord>,
    pub listings: Vec<SoldListing>,
}

impl NormalizedProduct {
    fn push_record(&mut self, record: GpuCanonicalRecord) {
        if !self
            .records
            .iter()
            .any(|r| r.identifier == record.identifier)
        {
            self.records.push(record);
        }
    }
}

#[derive(Clone, Default)]
pub struct Normalizer {
    policy: MultiAxisPolicy,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MultiAxisPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MultiAxisPolicy {
        self.policy
    }

    /// Decompose a title. Deterministic; no field failure is fatal.
    pub fn attributes(&self, title: &str) -> NormalizedAttributes {
        let manufacturer = patterns::manufacturer_of(title).or_empty();
        let brand = patterns::brand_of(title);
        let family = patterns::family_of(title).or_empty();
        let model_number = patterns::model_number_of(title).or_empty();
        let performance_suffix = patterns::performance_suffix_of(title).or_empty();
        let series =
            patterns::series_of(title, Manufacturer::from_token(&manufacturer)).or_empty();

        let general_model = [
            family.as_str(),
            model_number.as_str(),
            performance_suffix.as_str(),
        ]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

        let memory_type = memory::infer_memory_type(title, brand, &general_model).into_option();
        let memory_size_gb = memory::memory_size_of(title).into_option();

        NormalizedAttributes {
            manufacturer,
            brand,
            family,
            model_number,
            performance_suffix,
            series,
            general_model,
            memory_type,
            memory_size_gb,
            product_code: cleanup::product_code_of(title).into_option(),
            display_name: cleanup::clean_display_name(title),
        }
    }

    pub fn identifier(&self, title: &str) -> String {
        build_identifier(&self.attributes(title))
    }

    /// Build canonical records and sold listings for one scraped product.
    ///
    /// Without variations a product yields one record and, when its price
    /// parses, one listing. Each option on a physical axis (memory, color)
    /// gets its own identifier; SKU-variant options share the base one.
    pub fn normalize(&self, vendor_name: &str, detail: &RawProductDetail) -> NormalizedProduct {
        let attrs = self.attributes(&detail.original_name);
        let base_identifier = build_identifier(&attrs);
        let image = detail.image().map(String::from);
        let listed = ListedPrice::parse(detail.raw_price.as_deref());
        let scraped_at = Utc::now();

        let mut product = NormalizedProduct::default();
        let axes = self.policy.select(&detail.variation_axes);

        let new_record = |identifier: String| {
            let mut record = GpuCanonicalRecord::from_attributes(identifier, &attrs);
            record.image = image.clone();
            record
        };

        if axes.iter().all(|axis| axis.options.is_empty()) {
            product.push_record(new_record(base_identifier.clone()));
            match listed.lowest() {
                Some(price) => product.listings.push(SoldListing {
                    identifier: base_identifier,
                    vendor_name: vendor_name.to_string(),
                    link: detail.link.clone(),
                    price,
                    original_name: detail.original_name.clone(),
                    variant_label: None,
                    scraped_at,
                }),
                None => tracing::warn!(
                    "No usable price for {} ({}), listing skipped",
                    detail.original_name,
                    detail.link
                ),
            }
            return product;
        }

        for axis in axes {
            for option in expand_axis(axis, &listed) {
                let identifier = if axis.kind.is_physical() {
                    variant_identifier(&base_identifier, &option.label)
                } else {
                    base_identifier.clone()
                };

                let mut record = new_record(identifier.clone());
                if axis.kind == AxisKind::MemoryCapacity {
                    if let Some(size) = memory::memory_size_of(&option.label).into_option() {
                        record.memory_size = Some(size);
                    }
                }
                product.push_record(record);

                let Some(price) = option.price.into_option() else {
                    tracing::warn!(
                        "No price for option {} of {}, listing skipped",
                        option.label,
                        detail.original_name
                    );
                    continue;
                };

                product.listings.push(SoldListing {
                    identifier,
                    vendor_name: vendor_name.to_string(),
                    link: detail.link.clone(),
                    price,
                    original_name: detail.original_name.clone(),
                    variant_label: Some(option.label),
                    scraped_at,
                });
            }
        }

        product
    }
}
