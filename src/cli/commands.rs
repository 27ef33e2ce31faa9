use std::sync::Arc;

use crate::app::{AppContext, Result, ScoutError};
use crate::cli::CrawlArgs;
use crate::crawler::{CrawlSummary, Crawler};
use crate::enrichment::{Enricher, HttpEnricher};
use crate::normalizer::identifier::build_identifier;
use crate::scraper::{ChromeFetcher, FixtureFetcher, PageFetcher, Site, SITES};
use crate::store::Store;

pub async fn crawl(ctx: &AppContext, args: &CrawlArgs, workers: Option<usize>) -> Result<()> {
    let workers = workers.unwrap_or(ctx.config.scraper.max_concurrency);
    let max_pages = args.max_pages.unwrap_or(ctx.config.crawl.max_pages);

    if let Some(path) = &args.fixture {
        println!("Replaying {}", path.display());
        let fetcher = Arc::new(FixtureFetcher::from_path(path)?);
        let summary = run_crawl(ctx, fetcher, workers, max_pages, args.enrich).await?;
        print_summary(&summary);
        return Ok(());
    }

    let name = args.site.as_deref().unwrap_or(&ctx.config.crawl.site);
    let site = Site::by_name(name).ok_or_else(|| ScoutError::UnknownSite(name.to_string()))?;

    println!("Crawling {} ({})", site.vendor_name, site.start_url);
    let chrome = Arc::new(ChromeFetcher::launch(ctx.config.scraper.clone(), site).await?);
    let result = run_crawl(ctx, chrome.clone(), workers, max_pages, args.enrich).await;

    match Arc::try_unwrap(chrome) {
        Ok(chrome) => {
            if let Err(e) = chrome.shutdown().await {
                tracing::warn!("Browser shutdown failed: {}", e);
            }
        }
        Err(_) => tracing::warn!("Browser still in use; leaving it to exit with the process"),
    }

    print_summary(&result?);
    Ok(())
}

async fn run_crawl(
    ctx: &AppContext,
    fetcher: Arc<dyn PageFetcher>,
    workers: usize,
    max_pages: usize,
    enrich: bool,
) -> Result<CrawlSummary> {
    let mut crawler = Crawler::with_workers(fetcher, ctx.normalizer.clone(), workers)
        .max_pages(max_pages);

    if enrich || ctx.config.enrichment.enabled {
        match HttpEnricher::new(&ctx.config.enrichment) {
            Ok(enricher) => {
                let enricher: Arc<dyn Enricher> = Arc::new(enricher);
                crawler = crawler.enricher(enricher);
            }
            Err(e) => eprintln!("Enrichment disabled: {}", e),
        }
    }

    crawler.crawl(ctx.store.clone()).await
}

fn print_summary(summary: &CrawlSummary) {
    println!(
        "Crawl complete: {} pages, {} products, {} new GPUs, {} listings, {} errors",
        summary.pages, summary.products, summary.records, summary.listings, summary.failed
    );
}

pub fn normalize(ctx: &AppContext, title: &str) -> Result<()> {
    let attrs = ctx.normalizer.attributes(title);
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    println!("{}", build_identifier(&attrs));
    println!("  Display name:  {}", attrs.display_name);
    println!("  Manufacturer:  {}", or_dash(&attrs.manufacturer));
    println!("  Brand:         {}", attrs.brand);
    println!("  Family:        {}", or_dash(&attrs.family));
    println!("  Model:         {}", or_dash(&attrs.model_number));
    println!("  Suffix:        {}", or_dash(&attrs.performance_suffix));
    println!("  Series:        {}", or_dash(&attrs.series));
    println!("  General model: {}", or_dash(&attrs.general_model));
    println!(
        "  Memory:        {} {}",
        attrs
            .memory_size_gb
            .map(|n| format!("{}GB", n))
            .unwrap_or_else(|| "-".to_string()),
        attrs.memory_type.as_deref().unwrap_or("-")
    );
    if let Some(code) = &attrs.product_code {
        println!("  Product code:  {}", code);
    }

    Ok(())
}

pub fn list_gpus(ctx: &AppContext) -> Result<()> {
    let gpus = ctx.store.get_all_gpus()?;

    if gpus.is_empty() {
        println!("No GPUs");
        return Ok(());
    }

    for gpu in gpus {
        let listings = ctx.store.count_sold_listings(&gpu.identifier)?;
        println!(
            "{} ({} listings)\n  {} {}",
            gpu.identifier, listings, gpu.brand, gpu.general_model
        );
    }

    Ok(())
}

pub fn show_gpu(ctx: &AppContext, identifier: &str) -> Result<()> {
    let gpu = ctx
        .store
        .get_gpu(identifier)?
        .ok_or_else(|| ScoutError::GpuNotFound(identifier.to_string()))?;

    println!("{}", gpu.identifier);
    println!("  Model:        {} {}", gpu.brand, gpu.general_model);
    println!("  Manufacturer: {}", gpu.manufacturer);
    if let Some(size) = gpu.memory_size {
        println!("  Memory size:  {}GB", size);
    }
    if let Some(memory_type) = &gpu.memory_type {
        println!("  Memory type:  {}", memory_type);
    }
    if let Some(code) = &gpu.product_code {
        println!("  Product code: {}", code);
    }
    if let Some(watts) = gpu.power_consumption {
        println!("  Power:        {}W", watts);
    }
    if let Some(dimensions) = &gpu.dimensions {
        println!("  Dimensions:   {}", dimensions);
    }
    if let Some(image) = &gpu.image {
        println!("  Image:        {}", image);
    }

    let listings = ctx.store.get_sold_listings(identifier)?;
    println!("\n{} listings", listings.len());
    for listing in listings {
        println!(
            "{} {:>10} {}{}\n  {}",
            listing.scraped_at.format("%Y-%m-%d"),
            format_price(listing.price),
            listing.vendor_name,
            listing
                .variant_label
                .map(|v| format!(" [{}]", v))
                .unwrap_or_default(),
            listing.link
        );
    }

    Ok(())
}

pub fn list_sites() -> Result<()> {
    for site in SITES {
        println!("{} - {}\n  {}", site.name, site.vendor_name, site.start_url);
    }
    Ok(())
}

/// Whole-unit price with thousands separators
fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if price < 0 {
        out.insert(0, '-');
    }
    out
}
