//! Bounded-concurrency crawl of one catalog.
//!
//! Pages are walked one at a time. Within a page, detail fetches fan out up
//! to the worker limit and are persisted in page order once they finish.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::app::{Result, ScoutError};
use crate::domain::RawListing;
use crate::enrichment::{self, Enricher};
use crate::normalizer::{NormalizedProduct, Normalizer};
use crate::scraper::PageFetcher;
use crate::store::Store;

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Counts for one crawl run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages: usize,
    pub products: usize,
    pub failed: usize,
    /// Canonical records created by this run
    pub records: usize,
    pub listings: usize,
}

pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    semaphore: Arc<Semaphore>,
    normalizer: Normalizer,
    enricher: Option<Arc<dyn Enricher>>,
    max_pages: usize,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, normalizer: Normalizer) -> Self {
        Self::with_workers(fetcher, normalizer, DEFAULT_WORKERS)
    }

    pub fn with_workers(
        fetcher: Arc<dyn PageFetcher>,
        normalizer: Normalizer,
        workers: usize,
    ) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            normalizer,
            enricher: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Walk every listing page and persist what each product yields.
    ///
    /// A product that fails to load is logged and skipped. Losing the
    /// listing, the browser, or the store ends the run with an error.
    pub async fn crawl<S: Store + Send + Sync + 'static>(
        &self,
        store: Arc<S>,
    ) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();
        let mut page = self.fetcher.open_listing().await?;

        loop {
            let links = dedupe(self.fetcher.list_product_links(&page).await?);
            tracing::info!("Page {}: {} products at {}", page.number, links.len(), page.url);

            let handles: Vec<_> = links
                .into_iter()
                .map(|listing| self.spawn_product(listing, store.clone()))
                .collect();
            self.drain(handles, store.as_ref(), &mut summary).await?;
            summary.pages += 1;

            if summary.pages >= self.max_pages {
                tracing::info!("Stopping after {} pages", summary.pages);
                break;
            }
            if !self.fetcher.has_next_page(&page).await? {
                break;
            }
            page = self.fetcher.advance_page(&page).await?;
        }

        tracing::info!(
            "Crawl finished: {} pages, {} products ({} failed), {} new GPUs, {} listings",
            summary.pages,
            summary.products,
            summary.failed,
            summary.records,
            summary.listings
        );
        Ok(summary)
    }

    fn spawn_product<S: Store + Send + Sync + 'static>(
        &self,
        listing: RawListing,
        store: Arc<S>,
    ) -> JoinHandle<(RawListing, Result<NormalizedProduct>)> {
        let fetcher = self.fetcher.clone();
        let semaphore = self.semaphore.clone();
        let normalizer = self.normalizer.clone();
        let enricher = self.enricher.clone();

        tokio::spawn(async move {
            let result = async {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| ScoutError::Other(e.to_string()))?;

                let detail = fetcher.fetch_product_detail(&listing).await?;
                let mut product = normalizer.normalize(fetcher.vendor_name(), &detail);

                if let Some(enricher) = enricher {
                    for record in product.records.iter_mut() {
                        let known = store.get_gpu(&record.identifier)?;
                        if known.is_some_and(|gpu| !enrichment::needs_enrichment(&gpu)) {
                            continue;
                        }
                        enrichment::backfill(enricher.as_ref(), record, &detail.original_name)
                            .await;
                    }
                }

                Ok::<_, ScoutError>(product)
            }
            .await;
            (listing, result)
        })
    }

    /// Await handles in spawn order and persist each product.
    async fn drain<S: Store + Sync>(
        &self,
        handles: Vec<JoinHandle<(RawListing, Result<NormalizedProduct>)>>,
        store: &S,
        summary: &mut CrawlSummary,
    ) -> Result<()> {
        let mut handles = handles.into_iter();

        while let Some(handle) = handles.next() {
            let (listing, result) = match handle.await {
                Ok(joined) => joined,
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                    summary.failed += 1;
                    continue;
                }
            };
            summary.products += 1;

            match result.and_then(|product| persist(store, &product)) {
                Ok((records, listings)) => {
                    tracing::debug!("{}: {} listing(s)", listing.link, listings);
                    summary.records += records;
                    summary.listings += listings;
                }
                Err(e) if e.is_fatal() => {
                    handles.for_each(|h| h.abort());
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", listing.link, e);
                    summary.failed += 1;
                }
            }
        }

        Ok(())
    }
}

fn persist<S: Store + ?Sized>(store: &S, product: &NormalizedProduct) -> Result<(usize, usize)> {
    let mut created = 0;
    for record in &product.records {
        if store.upsert_canonical_record(record)? {
            created += 1;
        }
    }
    for listing in &product.listings {
        store.insert_sold_listing(listing)?;
    }
    Ok((created, product.listings.len()))
}

/// Drop repeated links, keeping first-seen order.
fn dedupe(links: Vec<RawListing>) -> Vec<RawListing> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|l| seen.insert(l.link.clone()))
        .collect()
}
