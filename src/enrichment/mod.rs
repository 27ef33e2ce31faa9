//! Optional backfill of attributes the title patterns could not derive.
//!
//! The completion service is opaque: it takes a prompt and returns text. A
//! failed or unparseable reply leaves the record as it was.

mod config;
mod http;

pub use config::EnrichmentConfig;
pub use http::HttpEnricher;

use async_trait::async_trait;
use serde::Deserialize;

use crate::app::{Result, ScoutError};
use crate::domain::GpuCanonicalRecord;

#[async_trait]
pub trait Enricher: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Fields a completion may supply. Anything absent or malformed is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnrichedFields {
    pub memory_type: Option<String>,
    pub memory_size: Option<u32>,
    pub power_consumption: Option<u32>,
    pub dimensions: Option<String>,
}

impl EnrichedFields {
    /// Copy into the record's empty fields. Returns how many were filled.
    pub fn apply(self, record: &mut GpuCanonicalRecord) -> usize {
        let mut filled = 0;
        let text = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        let positive = |n: Option<u32>| n.filter(|&n| n > 0);

        fill(&mut record.memory_type, text(self.memory_type), &mut filled);
        fill(&mut record.memory_size, positive(self.memory_size), &mut filled);
        fill(&mut record.power_consumption, positive(self.power_consumption), &mut filled);
        fill(&mut record.dimensions, text(self.dimensions), &mut filled);
        filled
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>, filled: &mut usize) {
    if slot.is_none() && value.is_some() {
        *slot = value;
        *filled += 1;
    }
}

pub fn needs_enrichment(record: &GpuCanonicalRecord) -> bool {
    record.memory_type.is_none()
        || record.memory_size.is_none()
        || record.power_consumption.is_none()
        || record.dimensions.is_none()
}

pub fn build_prompt(record: &GpuCanonicalRecord, original_name: &str) -> String {
    let mut missing = Vec::new();
    if record.memory_type.is_none() {
        missing.push("\"memory_type\" (string, e.g. \"GDDR6X\")");
    }
    if record.memory_size.is_none() {
        missing.push("\"memory_size\" (integer, gigabytes)");
    }
    if record.power_consumption.is_none() {
        missing.push("\"power_consumption\" (integer, board power in watts)");
    }
    if record.dimensions.is_none() {
        missing.push("\"dimensions\" (string, \"L x W x H mm\")");
    }

    format!(
        "Product listing: {original_name}\n\
         Manufacturer: {}\nBrand: {}\nModel: {}\n\n\
         Return a JSON object with these keys: {}. \
         Use null for anything you are not sure about.",
        record.manufacturer,
        record.brand,
        record.general_model,
        missing.join(", ")
    )
}

/// Parse the first `{...}` block of a reply.
pub fn parse_reply(reply: &str) -> Result<EnrichedFields> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            Ok(serde_json::from_str(&reply[start..=end])?)
        }
        _ => Err(ScoutError::Enrichment("reply contained no JSON object".into())),
    }
}

/// Ask the enricher for the record's gaps and fill them.
///
/// Never fails: errors are logged and the record is left untouched.
pub async fn backfill(
    enricher: &dyn Enricher,
    record: &mut GpuCanonicalRecord,
    original_name: &str,
) -> usize {
    if !needs_enrichment(record) {
        return 0;
    }

    let prompt = build_prompt(record, original_name);
    let fields = match enricher.complete(&prompt).await.and_then(|r| parse_reply(&r)) {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!("Enrichment failed for {}: {}", record.identifier, e);
            return 0;
        }
    };

    let filled = fields.apply(record);
    tracing::debug!("Enrichment filled {} field(s) on {}", filled, record.identifier);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Brand;
    use chrono::Utc;

    struct CannedEnricher(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl Enricher for CannedEnricher {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.0
                .map(String::from)
                .map_err(|e| ScoutError::Enrichment(e.to_string()))
        }
    }

    fn record() -> GpuCanonicalRecord {
        GpuCanonicalRecord {
            identifier: "ZOTAC-NVIDIA-RTX-3070-TWIN_EDGE".into(),
            general_model: "RTX 3070".into(),
            image: None,
            brand: Brand::Nvidia,
            manufacturer: "ZOTAC".into(),
            memory_type: Some("GDDR6".into()),
            memory_size: None,
            product_code: None,
            power_consumption: None,
            dimensions: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_reply_with_surrounding_text() {
        let reply = "Sure!\n```json\n{\"memory_size\": 8, \"power_consumption\": 220}\n```";
        let fields = parse_reply(reply).unwrap();
        assert_eq!(fields.memory_size, Some(8));
        assert_eq!(fields.power_consumption, Some(220));
        assert_eq!(fields.dimensions, None);
    }

    #[test]
    fn test_parse_reply_without_json() {
        assert!(parse_reply("no idea").is_err());
    }

    #[test]
    fn test_prompt_lists_only_missing_fields() {
        let prompt = build_prompt(&record(), "ZOTAC RTX 3070 Twin Edge");
        assert!(prompt.contains("memory_size"));
        assert!(!prompt.contains("memory_type"));
        assert!(prompt.contains("ZOTAC RTX 3070 Twin Edge"));
    }

    #[tokio::test]
    async fn test_backfill_never_overwrites() {
        let enricher = CannedEnricher(Ok(
            r#"{"memory_type": "GDDR6X", "memory_size": 8, "dimensions": "232 x 111 x 41 mm"}"#,
        ));
        let mut record = record();
        let filled = backfill(&enricher, &mut record, "ZOTAC RTX 3070 Twin Edge").await;

        assert_eq!(filled, 2);
        assert_eq!(record.memory_type.as_deref(), Some("GDDR6"));
        assert_eq!(record.memory_size, Some(8));
        assert_eq!(record.power_consumption, None);
        assert_eq!(record.dimensions.as_deref(), Some("232 x 111 x 41 mm"));
    }

    #[tokio::test]
    async fn test_backfill_failure_leaves_record() {
        let enricher = CannedEnricher(Err("rate limited"));
        let mut record = record();
        let before = record.clone();
        assert_eq!(backfill(&enricher, &mut record, "ZOTAC RTX 3070").await, 0);
        assert_eq!(record, before);
    }
}
