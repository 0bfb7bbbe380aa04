// src/parser/html.rs
// =============================================================================
// This module extracts words and links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Parse and validate URLs
// - Resolve relative URLs to absolute URLs
//
// Words:
// - Only visible body text counts (<script> and <style> are skipped)
// - Tokens are split on whitespace, lowercased, and stripped of anything
//   that isn't a letter or digit ("Rust's" -> "rusts", "2024," -> "2024")
// =============================================================================

use super::PageContent;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

// Parses an HTML document into word counts and absolute links
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base_url: the URL of the page (for resolving relative links)
//
// Example:
//   html = "<body><a href='/docs'>Read the docs</a></body>"
//   base_url = "https://example.com"
//   result.links = ["https://example.com/docs"]
//   result.word_counts = {"read": 1, "the": 1, "docs": 1}
pub fn parse_html(html: &str, base_url: &str) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        word_counts: count_words(&document),
        links: extract_links(&document, base_url),
    }
}

fn count_words(document: &Html) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    // Selector::parse only fails on invalid CSS; "body" is a known-good constant
    let body_selector = Selector::parse("body").unwrap();

    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };

            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .map(|name| name == "script" || name == "style")
                .unwrap_or(false);
            if hidden {
                continue;
            }

            for token in text.split_whitespace() {
                if let Some(word) = normalize_word(token) {
                    *counts.entry(word).or_insert(0) += 1;
                }
            }
        }
    }

    counts
}

// Lowercases a token and keeps only its alphanumeric characters
fn normalize_word(token: &str) -> Option<String> {
    let word: String = token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

fn extract_links(document: &Html, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    // Same as above: a constant selector that is known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    // Parse the base URL once
    // We'll use this to resolve relative links
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(base_url, error = %e, "invalid base URL, skipping links");
            return links;
        }
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href) {
                if is_crawlable_link(&absolute_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "#top" -> None (same page)
//   href = "mailto:me@example.com" -> None (not a page)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both cases: absolute hrefs replace the base entirely,
    // relative ones are resolved against it
    base.join(href).ok().map(|url| url.to_string())
}

// Pages we know how to fetch
fn is_crawlable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("file://")
}
