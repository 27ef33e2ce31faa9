//! Page fetching for product catalogs.
//!
//! The crawler only talks to a [`PageFetcher`]; how pages are obtained is an
//! implementation detail.
//!
//! # Architecture
//!
//! ```text
//! ListingPage → product links → RawProductDetail (per tab) → Normalizer
//! ```
//!
//! - [`ChromeFetcher`]: drives headless Chrome through chromiumoxide
//! - [`FixtureFetcher`]: replays a recorded JSON crawl, for tests and offline runs
//!
//! # Usage
//!
//! ```rust,ignore
//! use gpuscout::scraper::{ChromeFetcher, PageFetcher, ScraperConfig, BERMOR};
//!
//! let fetcher = ChromeFetcher::launch(ScraperConfig::default(), &BERMOR).await?;
//! let page = fetcher.open_listing().await?;
//! let links = fetcher.list_product_links(&page).await?;
//! ```

mod chrome;
mod config;
mod extractor;
mod fixture;
pub mod settle;
mod site;

pub use chrome::ChromeFetcher;
pub use config::ScraperConfig;
pub use extractor::{DetailExtractor, DetailSnapshot};
pub use fixture::{Fixture, FixtureFetcher, FixturePage};
pub use site::{Site, SiteSelectors, BERMOR, SITES};

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{ListingPage, RawListing, RawProductDetail};

/// Source of catalog pages.
///
/// Errors from `open_listing`, `list_product_links`, `has_next_page` and
/// `advance_page` mean the listing itself is lost and end the crawl; errors
/// from `fetch_product_detail` only cost that one product.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Vendor recorded on every sold listing from this source
    fn vendor_name(&self) -> &str;

    /// Position the cursor on the first listing page
    async fn open_listing(&self) -> Result<ListingPage>;

    /// Product links on the current listing page, in page order
    async fn list_product_links(&self, page: &ListingPage) -> Result<Vec<RawListing>>;

    /// Scrape one product detail page
    async fn fetch_product_detail(&self, listing: &RawListing) -> Result<RawProductDetail>;

    async fn has_next_page(&self, page: &ListingPage) -> Result<bool>;

    /// Move the cursor to the next listing page
    async fn advance_page(&self, page: &ListingPage) -> Result<ListingPage>;
}
