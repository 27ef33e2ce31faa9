use std::sync::Arc;

use gpuscout::crawler::Crawler;
use gpuscout::domain::Brand;
use gpuscout::normalizer::Normalizer;
use gpuscout::scraper::FixtureFetcher;
use gpuscout::store::{SqliteStore, Store};

const RECORDING: &str = r#"{
  "vendor_name": "Bermor Techzone",
  "start_url": "https://shop.example/video-cards/",
  "pages": [
    { "links": [
        "https://shop.example/p/eagle-4060",
        "https://shop.example/p/dual-4070-super"
    ] },
    { "links": ["https://shop.example/p/titan-b580"] }
  ],
  "products": [
    {
      "link": "https://shop.example/p/eagle-4060",
      "original_name": "GIGABYTE RTX 4060 EAGLE OC 8GB",
      "raw_price": "₱18,500.00 – ₱19,000.00",
      "image_url": "https://shop.example/img/eagle-4060.jpg",
      "variation_axes": [
        { "kind": "color", "label": "Color", "options": [
            { "label": "Black", "raw_price": "₱18,500.00" },
            { "label": "White", "raw_price": "₱19,000.00" }
        ] }
      ]
    },
    {
      "link": "https://shop.example/p/dual-4070-super",
      "original_name": "PALIT RTX 4070 SUPER DUAL 12GB GDDR6X",
      "raw_price": "₱36,000.00",
      "variation_axes": [
        { "kind": "sku_variant", "label": "Version", "options": [
            { "label": "Standard" },
            { "label": "OC" }
        ] }
      ]
    },
    {
      "link": "https://shop.example/p/titan-b580",
      "original_name": "SPARKLE Intel Arc B580 TITAN OC 12GB"
    }
  ]
}"#;

#[tokio::test]
async fn test_replayed_crawl_builds_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let recording = dir.path().join("recording.json");
    std::fs::write(&recording, RECORDING).unwrap();

    let store = Arc::new(SqliteStore::new(dir.path().join("gpuscout.db")).unwrap());
    let fetcher = Arc::new(FixtureFetcher::from_path(&recording).unwrap());
    let summary = Crawler::with_workers(fetcher, Normalizer::new(), 2)
        .crawl(store.clone())
        .await
        .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.products, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.records, 4);
    assert_eq!(summary.listings, 4);

    // Colors are distinct SKUs, each at its probed price
    let white = store
        .get_sold_listings("GIGABYTE-NVIDIA-RTX-4060-EAGLE(WHITE)")
        .unwrap();
    assert_eq!(white.len(), 1);
    assert_eq!(white[0].price, 19000);
    assert_eq!(white[0].variant_label.as_deref(), Some("White"));
    let black = store
        .get_gpu("GIGABYTE-NVIDIA-RTX-4060-EAGLE(BLACK)")
        .unwrap()
        .unwrap();
    assert_eq!(
        black.image.as_deref(),
        Some("https://shop.example/img/eagle-4060.jpg")
    );

    // SKU variants share one identifier and the single listed price
    let dual = store
        .get_sold_listings("PALIT-NVIDIA-RTX-4070-SUPER-DUAL")
        .unwrap();
    assert_eq!(dual.len(), 2);
    assert!(dual.iter().all(|l| l.price == 36000));

    // No price: the GPU is still catalogued, without a listing
    let intel: Vec<_> = store
        .get_all_gpus()
        .unwrap()
        .into_iter()
        .filter(|g| g.brand == Brand::Intel)
        .collect();
    assert_eq!(intel.len(), 1);
    assert_eq!(intel[0].memory_type.as_deref(), Some("GDDR6"));
    assert_eq!(
        store.count_sold_listings(&intel[0].identifier).unwrap(),
        0
    );
}
