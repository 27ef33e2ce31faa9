use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::app::{Result, ScoutError};
use crate::domain::{
    image_filename_from_url, AxisKind, Extracted, ListingPage, RawListing, RawProductDetail,
    VariationAxis, VariationOption,
};
use crate::scraper::config::ScraperConfig;
use crate::scraper::extractor::{AxisSnapshot, DetailExtractor, DetailSnapshot, ListingSnapshot};
use crate::scraper::settle::wait_for_change;
use crate::scraper::site::Site;
use crate::scraper::PageFetcher;

/// State of the shared listing tab: the page itself plus what was read from it.
struct ListingTab {
    page: Page,
    snapshot: ListingSnapshot,
}

/// Chrome-based page fetcher using chromiumoxide
///
/// One browser process is shared by the listing tab and every product tab.
/// The listing tab is only touched by the sequential pagination calls.
pub struct ChromeFetcher {
    browser: Arc<Browser>,
    config: ScraperConfig,
    site: &'static Site,
    extractor: DetailExtractor,
    listing: Mutex<Option<ListingTab>>,
    handler: JoinHandle<()>,
}

impl ChromeFetcher {
    /// Launch Chrome for the given site
    pub async fn launch(config: ScraperConfig, site: &'static Site) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .window_size(config.window_width, config.window_height)
            .request_timeout(config.timeout());

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScoutError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ScoutError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Spawn the browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            extractor: DetailExtractor::new(site.selectors),
            config,
            site,
            listing: Mutex::new(None),
            handler,
        })
    }

    async fn open_tab(&self, url: &str) -> Result<Page> {
        let page = self.browser.new_page(url).await.map_err(|e| ScoutError::Navigation {
            url: url.to_string(),
            reason: format!("Failed to create page: {}", e),
        })?;

        let prepared = self.prepare_tab(&page).await;
        let page = keep_or_close(page, prepared, |page| async move {
            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close tab: {}", e);
            }
        })
        .await
        .map_err(|reason| ScoutError::Navigation {
            url: url.to_string(),
            reason,
        })?;

        // Additional wait for dynamic content
        tokio::time::sleep(self.config.wait_after_load()).await;

        Ok(page)
    }

    async fn prepare_tab(&self, page: &Page) -> std::result::Result<(), String> {
        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| format!("Failed to set user agent: {}", e))?;
        }

        page.wait_for_navigation()
            .await
            .map_err(|e| format!("Navigation failed: {}", e))?;

        Ok(())
    }

    async fn evaluate<T: DeserializeOwned>(page: &Page, url: &str, script: String) -> Result<T> {
        page.evaluate(script)
            .await
            .map_err(|e| ScoutError::Navigation {
                url: url.to_string(),
                reason: format!("Script execution failed: {}", e),
            })?
            .into_value()
            .map_err(|e| ScoutError::Navigation {
                url: url.to_string(),
                reason: format!("Failed to parse result: {:?}", e),
            })
    }

    async fn read_listing(&self, page: &Page, url: &str) -> Result<ListingSnapshot> {
        Self::evaluate(page, url, self.extractor.listing_script())
            .await
            .map_err(|e| ScoutError::Browser(format!("listing page lost: {}", e)))
    }

    async fn scrape_detail(&self, page: &Page, link: &str) -> Result<RawProductDetail> {
        let snapshot: DetailSnapshot =
            Self::evaluate(page, link, self.extractor.detail_script()).await?;
        let (mut detail, sources) = detail_from_snapshot(link, snapshot)?;

        for (axis, source) in detail.variation_axes.iter_mut().zip(&sources) {
            if source.options.len() >= self.config.probe_threshold {
                axis.options = self.probe_options(page, link, source).await;
            }
        }

        Ok(detail)
    }

    /// Select each option in turn and read the price once it settles.
    ///
    /// Runs sequentially on the product's own tab.
    async fn probe_options(
        &self,
        page: &Page,
        link: &str,
        axis: &AxisSnapshot,
    ) -> Vec<VariationOption> {
        let mut options = Vec::with_capacity(axis.options.len());
        let mut previous: Option<String> = None;

        for option in &axis.options {
            let script = self.extractor.select_option_script(&axis.select, &option.value);
            if let Err(e) = Self::evaluate::<bool>(page, link, script).await {
                tracing::warn!("Failed to select option {} on {}: {}", option.label, link, e);
                options.push(VariationOption::new(option.label.clone()));
                continue;
            }

            let extractor = &self.extractor;
            let read_price = move || {
                let script = extractor.variation_price_script();
                async move {
                    Self::evaluate::<Option<String>>(page, link, script)
                        .await
                        .ok()
                        .flatten()
                }
            };

            let price = wait_for_change(
                read_price,
                previous.as_deref(),
                self.config.price_settle_timeout(),
                self.config.price_poll_interval(),
            )
            .await;

            if price.is_some() {
                previous = price.clone();
            }
            options.push(VariationOption {
                label: option.label.clone(),
                raw_price: price,
            });
        }

        options
    }

    /// Close the browser and stop the handler task
    pub async fn shutdown(self) -> Result<()> {
        if let Some(tab) = self.listing.lock().await.take() {
            let _ = tab.page.close().await;
        }

        match Arc::try_unwrap(self.browser) {
            Ok(mut browser) => {
                browser
                    .close()
                    .await
                    .map_err(|e| ScoutError::Browser(format!("Failed to close browser: {}", e)))?;
                let _ = browser.wait().await;
            }
            Err(_) => tracing::warn!("Browser still shared at shutdown; leaving it to drop"),
        }

        self.handler.abort();
        Ok(())
    }
}

/// Keep a freshly opened tab when its setup succeeded, otherwise close it.
async fn keep_or_close<T, C, CF>(
    tab: T,
    prepared: std::result::Result<(), String>,
    close: C,
) -> std::result::Result<T, String>
where
    C: FnOnce(T) -> CF,
    CF: Future<Output = ()>,
{
    match prepared {
        Ok(()) => Ok(tab),
        Err(reason) => {
            close(tab).await;
            Err(reason)
        }
    }
}

/// Turn one detail-page read into a product, before any option probing.
///
/// Returns the recognized axes' snapshots alongside, index-aligned with
/// `variation_axes`. Only a missing title fails: without it there is nothing
/// to build an identifier from. Other misses leave their field empty.
fn detail_from_snapshot(
    link: &str,
    snapshot: DetailSnapshot,
) -> Result<(RawProductDetail, Vec<AxisSnapshot>)> {
    let Some(original_name) = snapshot.title.filter(|t| !t.is_empty()) else {
        return Err(ScoutError::Navigation {
            url: link.to_string(),
            reason: "product title not found".into(),
        });
    };

    let mut detail = RawProductDetail::new(link, original_name);

    detail.image_url = found_or_miss(snapshot.image, "image");
    detail.image_filename = detail.image_url.as_deref().and_then(image_filename_from_url);

    // The regular price wins when both are shown.
    detail.raw_price = found_or_miss(snapshot.regular_price.or(snapshot.sale_price), "price");

    let mut sources = Vec::new();
    for axis in snapshot.axes {
        let Some(kind) = AxisKind::from_label(&axis.label) else {
            tracing::debug!("Ignoring variation axis '{}' on {}", axis.label, link);
            continue;
        };

        detail.variation_axes.push(VariationAxis {
            kind,
            label: axis.label.clone(),
            options: axis
                .options
                .iter()
                .map(|o| VariationOption::new(o.label.clone()))
                .collect(),
        });
        sources.push(axis);
    }

    Ok((detail, sources))
}

fn found_or_miss(value: Option<String>, marker: &'static str) -> Option<String> {
    value
        .map_or_else(|| Extracted::selector_miss(marker), Extracted::Found)
        .into_option()
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    fn vendor_name(&self) -> &str {
        self.site.vendor_name
    }

    async fn open_listing(&self) -> Result<ListingPage> {
        let url = self.site.start_url;
        let page = self
            .open_tab(url)
            .await
            .map_err(|e| ScoutError::Browser(format!("listing page lost: {}", e)))?;
        let snapshot = self.read_listing(&page, url).await?;

        tracing::info!("Opened listing {} ({} products)", url, snapshot.links.len());
        *self.listing.lock().await = Some(ListingTab { page, snapshot });
        Ok(ListingPage::first(url))
    }

    async fn list_product_links(&self, page: &ListingPage) -> Result<Vec<RawListing>> {
        let guard = self.listing.lock().await;
        let tab = guard
            .as_ref()
            .ok_or_else(|| ScoutError::Browser(format!("listing page lost: {}", page.url)))?;

        Ok(tab
            .snapshot
            .links
            .iter()
            .map(|l| RawListing::new(l.clone()))
            .collect())
    }

    async fn fetch_product_detail(&self, listing: &RawListing) -> Result<RawProductDetail> {
        let page = self.open_tab(&listing.link).await?;
        let result = self.scrape_detail(&page, &listing.link).await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab for {}: {}", listing.link, e);
        }

        result
    }

    async fn has_next_page(&self, _page: &ListingPage) -> Result<bool> {
        let guard = self.listing.lock().await;
        Ok(guard
            .as_ref()
            .is_some_and(|tab| tab.snapshot.next_url.is_some()))
    }

    async fn advance_page(&self, page: &ListingPage) -> Result<ListingPage> {
        let mut guard = self.listing.lock().await;
        let tab = guard
            .as_mut()
            .ok_or_else(|| ScoutError::Browser(format!("listing page lost: {}", page.url)))?;
        let next_url = tab
            .snapshot
            .next_url
            .clone()
            .ok_or_else(|| ScoutError::Browser(format!("no page after {}", page.url)))?;

        tab.page
            .goto(next_url.as_str())
            .await
            .map_err(|e| ScoutError::Browser(format!("listing page lost: {}", e)))?;
        tokio::time::sleep(self.config.wait_after_load()).await;

        tab.snapshot = self.read_listing(&tab.page, &next_url).await?;
        tracing::info!(
            "Advanced to listing page {} ({} products)",
            page.number + 1,
            tab.snapshot.links.len()
        );

        Ok(ListingPage {
            url: next_url,
            number: page.number + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::normalizer::Normalizer;

    fn snapshot(value: serde_json::Value) -> DetailSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_listed_range_prices_two_options_by_position() {
        let snapshot = snapshot(serde_json::json!({
            "title": "ASUS DUAL RTX 4060 TI",
            "regularPrice": "₱20,000.00 – ₱22,000.00",
            "axes": [{ "label": "Capacity", "select": "select#pa_capacity",
                       "options": [{ "value": "8gb", "label": "8GB" },
                                   { "value": "16gb", "label": "16GB" }] }]
        }));
        let (detail, sources) =
            detail_from_snapshot("https://shop.example/p/dual-4060-ti", snapshot).unwrap();
        assert_eq!(sources.len(), 1);

        let product = Normalizer::new().normalize("Test Shop", &detail);
        let prices: Vec<_> = product
            .listings
            .iter()
            .map(|l| (l.identifier.as_str(), l.price))
            .collect();
        assert_eq!(
            prices,
            vec![
                ("ASUS-NVIDIA-RTX-4060-TI-DUAL(8GB)", 20000),
                ("ASUS-NVIDIA-RTX-4060-TI-DUAL(16GB)", 22000),
            ]
        );
    }

    #[test]
    fn test_regular_price_beats_sale_price() {
        let snapshot = snapshot(serde_json::json!({
            "title": "MSI RTX 4070 SUPRIM",
            "regularPrice": "₱45,000.00",
            "salePrice": "₱41,500.00"
        }));
        let (detail, _) = detail_from_snapshot("https://shop.example/p/1", snapshot).unwrap();
        assert_eq!(detail.raw_price.as_deref(), Some("₱45,000.00"));
    }

    #[test]
    fn test_partial_detail_keeps_what_was_read() {
        let snapshot = snapshot(serde_json::json!({
            "title": "ZOTAC RTX 3070 Twin Edge",
            "axes": [{ "label": "Warranty", "select": "select#warranty",
                       "options": [{ "value": "1y", "label": "1 Year" }] }]
        }));
        let (detail, sources) = detail_from_snapshot("https://shop.example/p/2", snapshot).unwrap();
        assert_eq!(detail.original_name, "ZOTAC RTX 3070 Twin Edge");
        assert_eq!(detail.raw_price, None);
        assert_eq!(detail.image_url, None);
        assert!(detail.variation_axes.is_empty());
        assert!(sources.is_empty());
    }

    #[test]
    fn test_missing_title_skips_product() {
        let snapshot = snapshot(serde_json::json!({ "regularPrice": "₱9,999.00" }));
        let err = detail_from_snapshot("https://shop.example/p/3", snapshot).unwrap_err();
        assert!(matches!(err, ScoutError::Navigation { .. }));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_failed_tab_setup_closes_tab() {
        let closed = &AtomicUsize::new(0);
        let close = |_tab: &'static str| async move {
            closed.fetch_add(1, Ordering::SeqCst);
        };

        let err = keep_or_close("tab", Err("Navigation failed: timeout".into()), close)
            .await
            .unwrap_err();
        assert_eq!(err, "Navigation failed: timeout");
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        let tab = keep_or_close("tab", Ok(()), close).await.unwrap();
        assert_eq!(tab, "tab");
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
