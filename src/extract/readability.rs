//! Main-content extraction
//!
//! Candidate blocks (paragraphs, preformatted text, table cells, quotes)
//! are scored by text length and comma count; each score propagates to
//! the parent in full and to the grandparent at half weight. Containers
//! are weighted by class/id hints and penalised by link density. The
//! best-scoring container wins, falling back to `<body>` when nothing
//! qualifies.

use crate::http::Response;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Blocks shorter than this are not scored
const MIN_BLOCK_CHARS: usize = 25;

const CLASS_WEIGHT: f64 = 25.0;

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "head", "nav", "header", "footer", "aside",
    "form", "button", "input", "select", "textarea", "iframe", "object", "embed",
];

const SCORED_TAGS: &[&str] = &["p", "pre", "td", "blockquote"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

static UNLIKELY: OnceLock<Regex> = OnceLock::new();
static POSITIVE: OnceLock<Regex> = OnceLock::new();
static NEGATIVE: OnceLock<Regex> = OnceLock::new();

fn unlikely() -> &'static Regex {
    UNLIKELY.get_or_init(|| {
        Regex::new(
            r"(?i)banner|breadcrumb|combx|comment|cookie|disqus|menu|modal|popup|related|remark|rss|share|shoutbox|sidebar|skyscraper|social|sponsor|ad-break|agegate|pagination|pager",
        )
        .expect("valid regex")
    })
}

fn positive() -> &'static Regex {
    POSITIVE.get_or_init(|| {
        Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story")
            .expect("valid regex")
    })
}

fn negative() -> &'static Regex {
    NEGATIVE.get_or_init(|| {
        Regex::new(
            r"(?i)hidden|combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget",
        )
        .expect("valid regex")
    })
}

/// Readable main text of a response, one block per line.
///
/// Returns `None` for an empty or text-less body.
pub fn extract_readable_text(response: &Response) -> Option<String> {
    if response.body.trim().is_empty() {
        return None;
    }

    let html = Html::parse_document(&response.body);
    let root = main_content(&html)?;

    let mut raw = String::new();
    collect_text(root, &mut raw);
    let text = normalize_lines(&raw);
    (!text.is_empty()).then_some(text)
}

fn main_content(html: &Html) -> Option<ElementRef<'_>> {
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| html.select(&sel).next())
        .unwrap_or_else(|| html.root_element());

    best_candidate(body).or(Some(body))
}

fn best_candidate(body: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut candidates: Vec<(ElementRef<'_>, f64)> = Vec::new();

    for el in body.descendants().filter_map(ElementRef::wrap) {
        if !SCORED_TAGS.contains(&el.value().name()) || inside_skipped(&el) {
            continue;
        }

        let mut raw = String::new();
        collect_text(el, &mut raw);
        let text = normalize_lines(&raw);
        let len = text.chars().count();
        if len < MIN_BLOCK_CHARS {
            continue;
        }

        let score = 1.0 + text.matches(',').count() as f64 + ((len / 100) as f64).min(3.0);

        let Some(parent) = el.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        credit(&mut candidates, parent, score);
        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            credit(&mut candidates, grandparent, score / 2.0);
        }
    }

    let mut best: Option<(ElementRef<'_>, f64)> = None;
    for (el, score) in candidates {
        let adjusted = score * (1.0 - link_density(&el));
        if best.map_or(true, |(_, top)| adjusted > top) {
            best = Some((el, adjusted));
        }
    }
    best.map(|(el, _)| el)
}

fn credit<'a>(candidates: &mut Vec<(ElementRef<'a>, f64)>, el: ElementRef<'a>, amount: f64) {
    match candidates.iter_mut().find(|(c, _)| c.id() == el.id()) {
        Some((_, score)) => *score += amount,
        None => candidates.push((el, initial_score(&el) + amount)),
    }
}

fn initial_score(el: &ElementRef<'_>) -> f64 {
    let base = match el.value().name() {
        "article" | "main" => 10.0,
        "div" | "section" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    base + class_weight(el)
}

fn class_weight(el: &ElementRef<'_>) -> f64 {
    let mut weight = 0.0;
    for value in [el.value().attr("class"), el.value().attr("id")].into_iter().flatten() {
        if negative().is_match(value) {
            weight -= CLASS_WEIGHT;
        }
        if positive().is_match(value) {
            weight += CLASS_WEIGHT;
        }
    }
    weight
}

fn link_density(el: &ElementRef<'_>) -> f64 {
    let total: usize = el.text().map(|t| t.trim().chars().count()).sum();
    if total == 0 {
        return 0.0;
    }
    let linked: usize = Selector::parse("a")
        .map(|sel| {
            el.select(&sel)
                .flat_map(|a| a.text())
                .map(|t| t.trim().chars().count())
                .sum()
        })
        .unwrap_or(0);
    (linked as f64 / total as f64).min(1.0)
}

fn is_skipped(el: &ElementRef<'_>) -> bool {
    let value = el.value();
    if SKIPPED_TAGS.contains(&value.name()) || value.attr("hidden").is_some() {
        return true;
    }
    if value.attr("aria-hidden") == Some("true") {
        return true;
    }

    let hints = format!(
        "{} {}",
        value.attr("class").unwrap_or_default(),
        value.attr("id").unwrap_or_default()
    );
    unlikely().is_match(&hints) && !positive().is_match(&hints)
}

fn inside_skipped(el: &ElementRef<'_>) -> bool {
    is_skipped(el) || el.ancestors().filter_map(ElementRef::wrap).any(|a| is_skipped(&a))
}

/// Append the visible text of `el` to `out`, with block boundaries as newlines
fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_skipped(&child_el) {
                    continue;
                }
                let name = element.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                collect_text(child_el, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Response {
        Response::new(200, "https://example.com/article", body)
    }

    #[test]
    fn test_empty_body_has_no_content() {
        assert_eq!(extract_readable_text(&page("")), None);
        assert_eq!(extract_readable_text(&page("   \n ")), None);
        assert_eq!(extract_readable_text(&page("<html><body></body></html>")), None);
    }

    #[test]
    fn test_single_paragraph_text_is_exact() {
        let text = "a".repeat(2100);
        let html = format!("<html><body><p>{}</p></body></html>", text);
        let extracted = extract_readable_text(&page(&html)).expect("content");
        assert_eq!(extracted.chars().count(), 2100);
    }

    #[test]
    fn test_picks_article_over_navigation() {
        let html = r#"<html><body>
            <nav><a href="/">Home</a><a href="/about">About</a></nav>
            <div class="sidebar"><p>Subscribe to our newsletter, it is great, really great.</p></div>
            <div id="content">
              <h1>Title</h1>
              <p>First paragraph of the story, with commas, and enough text to count.</p>
              <p>Second paragraph of the story goes on and on for a while longer here.</p>
            </div>
            <footer>Copyright notice that is long enough to be considered text</footer>
        </body></html>"#;

        let text = extract_readable_text(&page(html)).expect("content");
        assert!(text.contains("First paragraph"));
        assert!(text.contains("Second paragraph"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Subscribe"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn test_scripts_and_styles_are_ignored() {
        let html = "<body><script>var x = 'hidden';</script><style>p{}</style><p>Visible text</p></body>";
        let text = extract_readable_text(&page(html)).expect("content");
        assert_eq!(text, "Visible text");
    }

    #[test]
    fn test_falls_back_to_body_for_short_pages() {
        let html = "<body><div>Short</div><span>bits</span></body>";
        let text = extract_readable_text(&page(html)).expect("content");
        assert_eq!(text, "Short\nbits");
    }

    #[test]
    fn test_link_heavy_container_loses() {
        let links: String = (0..10)
            .map(|i| format!("<p><a href=\"/p{i}\">A link to another page number {i}</a></p>"))
            .collect();
        let html = format!(
            "<body><div id=\"links\">{links}</div><div id=\"story\"><p>The real story is told in this paragraph, with detail.</p></div></body>"
        );
        let text = extract_readable_text(&page(&html)).expect("content");
        assert!(text.starts_with("The real story"));
    }
}
