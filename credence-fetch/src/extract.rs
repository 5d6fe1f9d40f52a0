//! Main-content extraction from article HTML
//!
//! A small readability pass: pick the element most likely to hold the
//! article body, then emit its visible text one trimmed line per text node.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never belongs to the article body
const EXCLUDED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "template", "svg",
];

/// Paragraph text a container needs before it beats `<body>`
const MIN_CONTAINER_CHARS: usize = 200;

/// Main article text of an HTML page, one line per visible text node
pub fn extract_article(html: &str) -> String {
    let document = Html::parse_document(html);

    content_root(&document)
        .map(visible_lines)
        .unwrap_or_default()
        .join("\n")
}

/// `<article>`, then `<main>`, then the densest paragraph container, then `<body>`
fn content_root(document: &Html) -> Option<ElementRef<'_>> {
    for tag in ["article", "main"] {
        let selector = Selector::parse(tag).unwrap();
        if let Some(el) = document.select(&selector).next() {
            return Some(el);
        }
    }

    if let Some(el) = densest_container(document) {
        return Some(el);
    }

    let body_selector = Selector::parse("body").unwrap();
    document.select(&body_selector).next()
}

/// Element whose direct `<p>` children carry the most text.
///
/// Ties go to the container that appears first in the document.
fn densest_container(document: &Html) -> Option<ElementRef<'_>> {
    let p_selector = Selector::parse("p").unwrap();
    // Document order
    let mut totals: Vec<(_, usize)> = Vec::new();

    for p in document.select(&p_selector) {
        let Some(parent) = p.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if !matches!(parent.value().name(), "div" | "section" | "td") {
            continue;
        }
        let len: usize = p.text().map(|t| t.trim().len()).sum();
        match totals.iter_mut().find(|(id, _)| *id == parent.id()) {
            Some((_, total)) => *total += len,
            None => totals.push((parent.id(), len)),
        }
    }

    totals
        .into_iter()
        .filter(|(_, len)| *len >= MIN_CONTAINER_CHARS)
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .and_then(|(id, _)| document.tree.get(id))
        .and_then(ElementRef::wrap)
}

fn visible_lines(root: ElementRef<'_>) -> Vec<String> {
    let root_id = root.id();
    let mut lines = Vec::new();

    for node_ref in root.descendants() {
        let Node::Text(text_node) = node_ref.value() else {
            continue;
        };

        let excluded = node_ref
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root_id)
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| EXCLUDED_ELEMENTS.contains(&el.name()))
                    .unwrap_or(false)
            });

        if excluded {
            continue;
        }

        lines.extend(
            text_node
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article_element() {
        let html = r#"
            <html>
            <head><title> Budget Story </title></head>
            <body>
                <nav><a href="/">Home</a></nav>
                <article>
                    <h1>Council passes budget</h1>
                    <p>The council voted on Monday.</p>
                    <script>track();</script>
                </article>
                <footer>Copyright</footer>
            </body>
            </html>
        "#;

        let text = extract_article(html);
        assert_eq!(text, "Council passes budget\nThe council voted on Monday.");
    }

    #[test]
    fn test_densest_container_wins_over_body() {
        let paragraph = "This sentence is part of the story body and adds length. ".repeat(5);
        let html = format!(
            r#"<html><body>
                <div class="sidebar"><p>Short promo</p></div>
                <div class="story"><p>{paragraph}</p><p>{paragraph}</p></div>
                <div class="comments"><p>Nice!</p></div>
            </body></html>"#
        );

        let text = extract_article(&html);
        assert!(text.contains("story body"));
        assert!(!text.contains("Short promo"));
        assert!(!text.contains("Nice!"));
    }

    #[test]
    fn test_equal_containers_resolve_to_first_in_document() {
        let first = "First story text alpha. ".repeat(10);
        let second = "Other story text omega. ".repeat(10);
        let html = format!(
            r#"<html><body>
                <section><p>{first}</p></section>
                <div><p>{second}</p></div>
            </body></html>"#
        );

        for _ in 0..5 {
            let text = extract_article(&html);
            assert!(text.contains("alpha"));
            assert!(!text.contains("omega"));
        }
    }

    #[test]
    fn test_falls_back_to_body_without_chrome() {
        let html = r#"
            <html><body>
                <header>Site header</header>
                <div><p>Tiny</p></div>
                <style>.x { color: red; }</style>
                <span>Visible text</span>
            </body></html>
        "#;

        let text = extract_article(html);
        assert!(text.contains("Tiny"));
        assert!(text.contains("Visible text"));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_article(""), "");
    }
}
