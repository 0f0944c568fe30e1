//! HTML to Markdown content conversion
//!
//! This module turns a fetched page into the normalized Markdown document
//! that gets written to disk, and independently extracts the page's
//! outbound links for the crawl frontier.
//!
//! The conversion pipeline:
//! 1. Determine the title (`<title>`, first `<h1>`, or "Untitled")
//! 2. Drop `script`/`style`/`nav`/`footer`/`header` subtrees entirely
//! 3. Select the main content root (`main` > `article` > content/main
//!    `div` > `body`)
//! 4. Render headings, paragraphs, lists, code, and blockquotes as Markdown
//! 5. Normalize whitespace and prepend the header metadata block

use crate::crawler::AdmissionFilter;
use crate::url::{canonicalize, CanonicalUrl};
use chrono::{DateTime, Utc};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Elements whose subtrees carry no page content
const PRUNED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// A page converted to Markdown, with its extracted outbound links
#[derive(Debug, Clone)]
pub struct ConvertedPage {
    /// The page title used for the top-level heading
    pub title: String,

    /// The full Markdown document, including the header metadata block
    pub markdown: String,

    /// Admissible outbound links, canonicalized and de-duplicated
    pub links: Vec<CanonicalUrl>,
}

/// Converts a fetched HTML page into Markdown and extracts its links
///
/// # Arguments
///
/// * `html` - The raw HTML body
/// * `url` - The canonical URL the page was fetched from
/// * `filter` - The frontier's admission predicate, applied to extracted links
/// * `crawled_at` - Timestamp recorded in the header metadata block
pub fn convert_page(
    html: &str,
    url: &CanonicalUrl,
    filter: &AdmissionFilter,
    crawled_at: DateTime<Utc>,
) -> ConvertedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let body = render_body(&document);
    let links = extract_links(&document, url, filter);

    let mut markdown = format!("# {}\n\n", title);
    markdown.push_str(&format!("**Source URL:** {}\n", url));
    markdown.push_str(&format!(
        "**Crawled on:** {}\n\n",
        crawled_at.format("%Y-%m-%d %H:%M:%S")
    ));
    markdown.push_str("---\n\n");
    markdown.push_str(&body);

    ConvertedPage {
        title,
        markdown,
        links,
    }
}

/// Extracts the page title: `<title>`, then the first `<h1>`, then "Untitled"
fn extract_title(document: &Html) -> String {
    for selector_str in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = collect_text(element);
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    "Untitled".to_string()
}

/// Selects the content root and renders it as normalized Markdown body text
fn render_body(document: &Html) -> String {
    let root = select_content_root(document);

    let mut out = String::new();
    if let Some(root) = root {
        for child in root.children() {
            render_node(child, &mut out);
        }
    }

    normalize_whitespace(&out)
}

/// Picks the most specific content container available
///
/// Priority: explicit `<main>`, then `<article>`, then a `div` whose class
/// mentions content/main, then `<body>`.
fn select_content_root(document: &Html) -> Option<ElementRef<'_>> {
    const CANDIDATES: &[&str] = &[
        "main",
        "article",
        "div[class*=\"content\"], div[class*=\"main\"]",
        "body",
    ];

    for &selector_str in CANDIDATES {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }

    None
}

/// Renders one DOM node (and its subtree) into the Markdown buffer
fn render_node(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let name = element.name();

            if PRUNED_ELEMENTS.contains(&name) {
                return;
            }

            match name {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let level = name[1..].parse::<usize>().unwrap_or(1);
                    let text = subtree_text(node);
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push_str(&format!("\n{} {}\n\n", "#".repeat(level), text));
                    }
                }
                "p" => {
                    let mut text = String::new();
                    inline_text(node, &mut text);
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push_str(text);
                        out.push_str("\n\n");
                    }
                }
                "ul" | "ol" => {
                    render_list(node, name == "ul", out);
                }
                "pre" => {
                    render_pre(node, out);
                }
                "code" => {
                    // Bare inline code; <pre><code> is handled by the pre arm
                    out.push('`');
                    out.push_str(&subtree_text(node));
                    out.push('`');
                }
                "blockquote" => {
                    let mut text = String::new();
                    inline_text(node, &mut text);
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push_str(&format!("\n> {}\n\n", text));
                    }
                }
                "br" => out.push('\n'),
                _ => {
                    for child in node.children() {
                        render_node(child, out);
                    }
                }
            }
        }
        _ => {
            for child in node.children() {
                render_node(child, out);
            }
        }
    }
}

/// Renders a list element: one line per `li`, with a literal prefix
///
/// Ordered lists use the literal prefix `1. ` for every item, never an
/// incrementing counter; this reproduces the observed output contract.
fn render_list(node: ego_tree::NodeRef<'_, Node>, unordered: bool, out: &mut String) {
    let prefix = if unordered { "- " } else { "1. " };
    let mut items = Vec::new();

    for descendant in node.descendants() {
        if let Node::Element(element) = descendant.value() {
            if element.name() == "li" {
                let text = subtree_text(descendant);
                let text = text.trim();
                if !text.is_empty() {
                    items.push(format!("{}{}", prefix, text));
                }
            }
        }
    }

    if !items.is_empty() {
        out.push('\n');
        out.push_str(&items.join("\n"));
        out.push_str("\n\n");
    }
}

/// Renders a `<pre>` element: fenced block when it wraps `<code>`
fn render_pre(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    for descendant in node.descendants() {
        if let Node::Element(element) = descendant.value() {
            if element.name() == "code" {
                let code = subtree_text(descendant);
                out.push_str(&format!("\n```\n{}\n```\n\n", code.trim_end()));
                return;
            }
        }
    }

    // pre without code: keep the text as-is
    out.push_str(&subtree_text(node));
    out.push_str("\n\n");
}

/// Renders a subtree's inline content, backticking `<code>` spans
fn inline_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(element) => {
                let name = element.name();
                if PRUNED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "code" {
                    out.push('`');
                    out.push_str(&subtree_text(child));
                    out.push('`');
                } else {
                    inline_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Concatenates the text content of a subtree, skipping pruned elements
fn subtree_text(node: ego_tree::NodeRef<'_, Node>) -> String {
    let mut text = String::new();
    collect_subtree_text(node, &mut text);
    text
}

fn collect_subtree_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(t) => out.push_str(t),
        Node::Element(element) => {
            if PRUNED_ELEMENTS.contains(&element.name()) {
                return;
            }
            for child in node.children() {
                collect_subtree_text(child, out);
            }
        }
        _ => {
            for child in node.children() {
                collect_subtree_text(child, out);
            }
        }
    }
}

/// Concatenates the text of an element's subtree (scraper convenience)
fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Normalizes body whitespace
///
/// Runs of horizontal whitespace collapse to a single space, runs of blank
/// lines collapse to one empty line (so three or more newlines become
/// exactly two), and the result is trimmed.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::new();
    let mut pending_blank = false;

    for line in text.lines() {
        let line = collapse_spaces(line);
        let line = line.trim();

        if line.is_empty() {
            pending_blank = true;
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(line);
        pending_blank = false;
    }

    out
}

/// Collapses runs of spaces and tabs into a single space
fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_run = false;

    for c in line.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

/// Extracts every admissible outbound link from a page
///
/// Each `a[href]` is resolved and canonicalized against the page URL; links
/// rejected by the admission predicate are dropped, and duplicates are
/// removed while preserving document order.
pub fn extract_links(
    document: &Html,
    page_url: &CanonicalUrl,
    filter: &AdmissionFilter,
) -> Vec<CanonicalUrl> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return links,
    };

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        let canonical = match canonicalize(href, page_url.as_url()) {
            Ok(c) => c,
            Err(_) => continue,
        };

        if !filter.is_admissible(&canonical) {
            continue;
        }

        if seen.insert(canonical.clone()) {
            links.push(canonical);
        }
    }

    links
}
