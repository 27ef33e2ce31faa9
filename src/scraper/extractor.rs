use serde::Deserialize;

use crate::scraper::site::SiteSelectors;

/// Raw values read from a product detail page in one script evaluation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailSnapshot {
    pub title: Option<String>,
    pub image: Option<String>,
    pub sale_price: Option<String>,
    pub regular_price: Option<String>,
    pub axes: Vec<AxisSnapshot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisSnapshot {
    pub label: String,
    /// CSS selector that uniquely addresses the axis' `<select>`
    pub select: String,
    pub options: Vec<OptionSnapshot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptionSnapshot {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingSnapshot {
    pub links: Vec<String>,
    pub next_url: Option<String>,
}

/// Builds the in-page scripts for one site's selectors
pub struct DetailExtractor {
    selectors: SiteSelectors,
}

fn js_str(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl DetailExtractor {
    pub fn new(selectors: SiteSelectors) -> Self {
        Self { selectors }
    }

    /// Product links plus the next-page href on a listing page
    pub fn listing_script(&self) -> String {
        let card = js_str(self.selectors.product_card);
        let link = js_str(self.selectors.product_link);
        let next = js_str(self.selectors.next_page);

        format!(
            r#"
            (() => {{
                const links = [];
                document.querySelectorAll({card}).forEach(card => {{
                    const a = card.querySelector({link});
                    const href = a && a.getAttribute('href');
                    if (href) links.push(new URL(href, location.href).href);
                }});
                const next = document.querySelector({next});
                return {{
                    links: links,
                    nextUrl: next && next.getAttribute('href')
                        ? new URL(next.getAttribute('href'), location.href).href
                        : null
                }};
            }})()
            "#
        )
    }

    /// Title, image, both prices and the variation axes of a detail page
    pub fn detail_script(&self) -> String {
        let s = &self.selectors;
        let title = js_str(s.title);
        let image = js_str(s.image);
        let sale = js_str(s.sale_price);
        let regular = js_str(s.regular_price);
        let row = js_str(s.variation_row);
        let label = js_str(s.variation_label);
        let select = js_str(s.variation_select);
        let placeholder = js_str(s.placeholder_option);

        format!(
            r#"
            (() => {{
                const text = (sel) => {{
                    const el = document.querySelector(sel);
                    return el && el.textContent ? el.textContent.trim() : null;
                }};
                // Every amount under the selector, so "low – high" ranges survive.
                // With skipIns, the discounted half of a del/ins pair is left out.
                const amounts = (sel, skipIns) => {{
                    const parts = Array.from(document.querySelectorAll(sel))
                        .filter(el => !(skipIns && el.closest('ins')))
                        .map(el => (el.textContent || '').trim())
                        .filter(t => t);
                    return parts.length ? parts.join(' – ') : null;
                }};
                const img = document.querySelector({image});
                const axes = [];
                document.querySelectorAll({row}).forEach((tr, idx) => {{
                    const th = tr.querySelector({label});
                    const sel = tr.querySelector({select});
                    if (!th || !sel) return;
                    const selector = sel.id
                        ? 'select#' + CSS.escape(sel.id)
                        : 'select[name="' + CSS.escape(sel.getAttribute('name') || '') + '"]';
                    const options = Array.from(sel.querySelectorAll('option'))
                        .filter(o => o.value && o.textContent.trim() !== {placeholder})
                        .map(o => ({{ value: o.value, label: o.textContent.trim() }}));
                    axes.push({{ label: th.textContent.trim(), select: selector, options: options }});
                }});
                return {{
                    title: text({title}),
                    image: img ? (img.currentSrc || img.src || null) : null,
                    salePrice: amounts({sale}, false),
                    regularPrice: amounts({regular}, true),
                    axes: axes
                }};
            }})()
            "#
        )
    }

    /// Select an option and fire the change event the variation form listens for
    pub fn select_option_script(&self, select: &str, value: &str) -> String {
        let select = js_str(select);
        let value = js_str(value);

        format!(
            r#"
            (() => {{
                const el = document.querySelector({select});
                if (!el) return false;
                if (window.jQuery) {{
                    window.jQuery(el).val({value}).trigger('change');
                }} else {{
                    el.value = {value};
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                }}
                return true;
            }})()
            "#
        )
    }

    /// Currently displayed variation price, or null
    pub fn variation_price_script(&self) -> String {
        let primary = js_str(self.selectors.variation_price);
        let fallback = js_str(self.selectors.variation_price_fallback);

        format!(
            r#"
            (() => {{
                const el = document.querySelector({primary}) || document.querySelector({fallback});
                return el && el.textContent ? el.textContent.trim() : null;
            }})()
            "#
        )
    }
}
