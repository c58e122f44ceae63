//! Parsed HTML document with lookups used by structural checks

use crate::http::Response;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parsed body of a response.
///
/// Relative URLs found in the document are resolved against the
/// response's effective URL.
pub struct DocumentTree {
    html: Html,
    base: Option<Url>,
}

/// Parse a response body as HTML. Never fails; garbage in gives a
/// document with no useful elements.
pub fn parse_document(response: &Response) -> DocumentTree {
    DocumentTree::parse(&response.body, &response.url)
}

/// Resolve `href` against `base`, keeping only http(s) targets.
///
/// Fragments, `javascript:`, `mailto:`, `tel:` and `data:` references
/// yield `None`.
pub fn resolve_url(href: &str, base: Option<&Url>) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
        Err(_) => return None,
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Resolve a possibly relative reference against a page URL.
///
/// Returns `href` unchanged when it is already absolute or cannot be
/// resolved.
pub fn absolutize_url(href: &str, base: &str) -> String {
    let Ok(base) = Url::parse(base) else {
        return href.to_string();
    };
    match base.join(href.trim()) {
        Ok(joined) => joined.to_string(),
        Err(_) => href.to_string(),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl DocumentTree {
    pub fn parse(body: &str, base_url: &str) -> Self {
        Self {
            html: Html::parse_document(body),
            base: Url::parse(base_url).ok(),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Elements matching a CSS selector; an invalid selector matches nothing
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(sel) => self.html.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    /// Whitespace-collapsed text of every element matching `css`
    pub fn select_text(&self, css: &str) -> Vec<String> {
        self.select(css).iter().map(element_text).collect()
    }

    /// Text of the first `<title>`, if non-empty
    pub fn title(&self) -> Option<String> {
        self.select_text("title")
            .into_iter()
            .next()
            .filter(|t| !t.is_empty())
    }

    /// `content` of the first `<meta name=...>` (name compared case-insensitively)
    pub fn meta_name(&self, name: &str) -> Option<String> {
        self.meta_by("name", name)
    }

    /// `content` of the first `<meta property=...>`
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.meta_by("property", property)
    }

    fn meta_by(&self, attr: &str, key: &str) -> Option<String> {
        self.select("meta")
            .into_iter()
            .filter(|el| {
                el.value()
                    .attr(attr)
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            })
            .find_map(|el| el.value().attr("content").map(|c| c.trim().to_string()))
    }

    /// `lang` attribute of the root `<html>` element
    pub fn lang(&self) -> Option<String> {
        self.html
            .root_element()
            .value()
            .attr("lang")
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
    }

    /// Text of all headings of the given level (1-6)
    pub fn headings(&self, level: u8) -> Vec<String> {
        if !(1..=6).contains(&level) {
            return Vec::new();
        }
        self.select_text(&format!("h{}", level))
    }

    /// Resolved targets of every `<a href>`, in document order
    pub fn links(&self) -> Vec<Url> {
        self.resolved_attr("a[href]", "href")
    }

    /// Resolved sources of every `<img src>`
    pub fn images(&self) -> Vec<Url> {
        self.resolved_attr("img[src]", "src")
    }

    /// Resolved URLs of resources the browser loads with the page
    /// (images, scripts, stylesheets, frames, media sources)
    pub fn resources(&self) -> Vec<Url> {
        let mut urls = self.resolved_attr(
            "img[src], script[src], iframe[src], source[src], audio[src], video[src]",
            "src",
        );
        urls.extend(self.resolved_attr("link[rel~=\"stylesheet\"][href]", "href"));
        urls
    }

    fn resolved_attr(&self, css: &str, attr: &str) -> Vec<Url> {
        self.select(css)
            .into_iter()
            .filter_map(|el| el.value().attr(attr))
            .filter_map(|v| resolve_url(v, self.base.as_ref()))
            .collect()
    }
}
