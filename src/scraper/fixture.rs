use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::{Result, ScoutError};
use crate::domain::{ListingPage, RawListing, RawProductDetail};
use crate::scraper::PageFetcher;

/// A recorded crawl: listing pages in order plus every product's detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub vendor_name: String,
    pub start_url: String,
    pub pages: Vec<FixturePage>,
    #[serde(default)]
    pub products: Vec<RawProductDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturePage {
    pub links: Vec<String>,
}

/// Replays a [`Fixture`]. Links with no recorded product fail as navigation errors.
pub struct FixtureFetcher {
    fixture: Fixture,
}

impl FixtureFetcher {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&content)?;
        Ok(Self::new(fixture))
    }

    fn page_url(&self, number: usize) -> String {
        if number <= 1 {
            self.fixture.start_url.clone()
        } else {
            format!("{}page/{}/", self.fixture.start_url, number)
        }
    }

    fn page(&self, page: &ListingPage) -> Result<&FixturePage> {
        page.number
            .checked_sub(1)
            .and_then(|idx| self.fixture.pages.get(idx))
            .ok_or_else(|| ScoutError::Browser(format!("listing page lost: {}", page.url)))
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    fn vendor_name(&self) -> &str {
        &self.fixture.vendor_name
    }

    async fn open_listing(&self) -> Result<ListingPage> {
        if self.fixture.pages.is_empty() {
            return Err(ScoutError::Browser(format!(
                "listing page lost: {}",
                self.fixture.start_url
            )));
        }
        Ok(ListingPage::first(self.page_url(1)))
    }

    async fn list_product_links(&self, page: &ListingPage) -> Result<Vec<RawListing>> {
        Ok(self
            .page(page)?
            .links
            .iter()
            .map(|l| RawListing::new(l.clone()))
            .collect())
    }

    async fn fetch_product_detail(&self, listing: &RawListing) -> Result<RawProductDetail> {
        self.fixture
            .products
            .iter()
            .find(|p| p.link == listing.link)
            .cloned()
            .ok_or_else(|| ScoutError::Navigation {
                url: listing.link.clone(),
                reason: "page failed to load".into(),
            })
    }

    async fn has_next_page(&self, page: &ListingPage) -> Result<bool> {
        Ok(page.number < self.fixture.pages.len())
    }

    async fn advance_page(&self, page: &ListingPage) -> Result<ListingPage> {
        let number = page.number + 1;
        let next = ListingPage {
            url: self.page_url(number),
            number,
        };
        self.page(&next)?;
        Ok(next)
    }
}
