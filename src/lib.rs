//! # gpuscout
//!
//! Scrapes GPU listings from retail catalogs and files them under canonical
//! identifiers, so the same card sold by different shops lines up.
//!
//! ## Architecture
//!
//! ```text
//! PageFetcher → Normalizer → (Enricher) → Store
//! ```
//!
//! - [`scraper`]: headless Chrome page fetcher and recorded-fixture replay
//! - [`normalizer`]: title decomposition, identifiers, prices, variations
//! - [`crawler`]: paginated crawl with bounded concurrency
//! - [`store`]: SQLite persistence layer
//!
//! ## Quick Start
//!
//! ```bash
//! # See how a title is read
//! gpuscout normalize "ASUS ROG STRIX RTX 4070 Ti OC 12GB GDDR6X"
//!
//! # Crawl the default site
//! gpuscout crawl
//!
//! # Browse what was recorded
//! gpuscout list
//! gpuscout show ASUS-NVIDIA-RTX-4070-TI-STRIX
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, config, normalizer.
pub mod app;

/// Command-line interface using clap.
///
/// - `crawl` - Crawl a site (or replay a fixture) into the store
/// - `normalize <title>` - Decompose a title without touching the store
/// - `list` - List canonical GPUs
/// - `show <identifier>` - One GPU with its listings
/// - `sites` - Supported sites
pub mod cli;

/// Configuration loaded from `~/.config/gpuscout/config.toml`.
pub mod config;

/// Paginated crawl driving a [`PageFetcher`](scraper::PageFetcher).
pub mod crawler;

/// Core domain models.
///
/// - [`RawProductDetail`](domain::RawProductDetail): what a product page yields
/// - [`GpuCanonicalRecord`](domain::GpuCanonicalRecord): one distinct SKU
/// - [`SoldListing`](domain::SoldListing): one vendor offer for a SKU
/// - [`Extracted`](domain::Extracted): a value or the reason it is absent
pub mod domain;

/// Optional attribute backfill through a text-completion service.
pub mod enrichment;

/// Title decomposition and record building.
///
/// Turns free-text titles into manufacturer, brand, family, model, suffix
/// and series, infers memory specs, parses prices and fans variations out
/// into per-option records.
pub mod normalizer;

/// Page fetching for product catalogs.
///
/// - [`ChromeFetcher`](scraper::ChromeFetcher): Chrome-based fetcher
/// - [`FixtureFetcher`](scraper::FixtureFetcher): recorded crawl replay
/// - [`PageFetcher`](scraper::PageFetcher): Async trait both implement
pub mod scraper;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
