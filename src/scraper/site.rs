//! Hardcoded catalog sites.
//!
//! Selectors are tied to each shop's theme; when a shop changes its markup,
//! update the entry here.

/// DOM locations for one catalog theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteSelectors {
    /// One element per product on a listing page
    pub product_card: &'static str,
    /// Anchor inside a product card
    pub product_link: &'static str,
    pub next_page: &'static str,
    pub title: &'static str,
    pub image: &'static str,
    pub sale_price: &'static str,
    pub regular_price: &'static str,
    /// Variation rows; each holds a label cell and a select
    pub variation_row: &'static str,
    pub variation_label: &'static str,
    pub variation_select: &'static str,
    /// Price shown after a variation is selected
    pub variation_price: &'static str,
    pub variation_price_fallback: &'static str,
    /// Placeholder option text to skip
    pub placeholder_option: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub name: &'static str,
    pub vendor_name: &'static str,
    pub start_url: &'static str,
    pub selectors: SiteSelectors,
}

pub const BERMOR: Site = Site {
    name: "bermor",
    vendor_name: "Bermor Techzone",
    start_url: "https://bermorzone.com.ph/product-category/video-cards/",
    selectors: SiteSelectors {
        product_card: "li.product.type-product",
        product_link: "div.product-loop-header.product-item__header \
                       a.woocommerce-LoopProduct-link.woocommerce-loop-product__link",
        next_page: "nav.woocommerce-pagination a.next.page-numbers",
        title: "h1.product_title.entry-title",
        image: "div.woocommerce-product-gallery.woocommerce-product-gallery--with-images \
                div.flex-viewport div[data-thumb] a img[width='600']",
        sale_price: "p.price span.electro-price ins span bdi",
        regular_price: "p.price span.electro-price bdi",
        variation_row: "table.variations tr",
        variation_label: "th.label",
        variation_select: "td.value select",
        variation_price: "div.woocommerce-variation-price span.electro-price ins span bdi",
        variation_price_fallback: "div.woocommerce-variation-price span.electro-price bdi",
        placeholder_option: "Choose an option",
    },
};

pub const SITES: &[Site] = &[BERMOR];

impl Site {
    pub fn by_name(name: &str) -> Option<&'static Site> {
        SITES.iter().find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_lookup() {
        assert_eq!(Site::by_name("bermor"), Some(&BERMOR));
        assert_eq!(Site::by_name(" Bermor "), Some(&BERMOR));
        assert_eq!(Site::by_name("unknown-shop"), None);
    }

    #[test]
    fn test_site_names_unique() {
        for (i, a) in SITES.iter().enumerate() {
            for b in &SITES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
