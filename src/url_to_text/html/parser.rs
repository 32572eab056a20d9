use log::debug;
use scraper::{ElementRef, Html, Selector};

use super::selectors::{
    BOILERPLATE_PHRASES, MAIN_CONTENT_SELECTORS, MIN_LINE_CHARS, NOISE_SELECTORS,
};
use crate::error::ParseError;

/// Extracts recipe-relevant text from a raw HTML page.
///
/// Structured data wins outright: the first `application/ld+json` block that
/// mentions a recipe is returned verbatim. Otherwise the page is stripped of
/// chrome and the main content container (or the body) is flattened to text.
/// This is best-effort and favors dropping junk over keeping every line.
pub struct ContentParser {
    json_ld: Selector,
    noise: Selector,
    main_content: Selector,
    body: Selector,
}

impl ContentParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            json_ld: selector(r#"script[type="application/ld+json"]"#)?,
            noise: selector(&NOISE_SELECTORS.join(", "))?,
            main_content: selector(&MAIN_CONTENT_SELECTORS.join(", "))?,
            body: selector("body")?,
        })
    }

    pub fn parse(&self, html: &str) -> Result<String, ParseError> {
        let mut document = Html::parse_document(html);

        if let Some(structured) = self.find_recipe_json_ld(&document) {
            debug!("Using JSON-LD recipe block ({} bytes)", structured.len());
            return Ok(structured);
        }

        self.clean_document(&mut document);
        let content = self.extract_content(&document);

        if content.is_empty() {
            return Err(ParseError::NoContentFound);
        }
        Ok(content)
    }

    fn find_recipe_json_ld(&self, document: &Html) -> Option<String> {
        document
            .select(&self.json_ld)
            .map(|script| script.text().collect::<String>())
            .find(|text| text.to_lowercase().contains("recipe"))
    }

    fn clean_document(&self, document: &mut Html) {
        let noise: Vec<_> = document.select(&self.noise).map(|el| el.id()).collect();
        for id in noise {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let empty: Vec<_> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.text().all(|t| t.trim().is_empty()))
            .map(|el| el.id())
            .collect();
        for id in empty {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn extract_content(&self, document: &Html) -> String {
        let root = match document.select(&self.main_content).next() {
            Some(main) => {
                debug!("Found main content container <{}>", main.value().name());
                Some(main)
            }
            None => document.select(&self.body).next(),
        };
        let Some(root) = root else {
            return String::new();
        };

        let mut blocks: Vec<String> = Vec::new();
        for element in root.descendants().skip(1).filter_map(ElementRef::wrap) {
            let text = collapse_whitespace(&element.text().collect::<String>());
            // A wrapper with a single child repeats the child's text verbatim
            if text.is_empty() || blocks.last() == Some(&text) {
                continue;
            }
            blocks.push(text);
        }

        clean_extracted_content(&blocks.join("\n\n"))
    }
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::InvalidSelector(format!("{css}: {e:?}")))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_boilerplate(line: &str) -> String {
    let mut out = line.to_string();
    for phrase in BOILERPLATE_PHRASES {
        // ASCII lowercasing keeps byte offsets aligned with `out`
        while let Some(start) = out.to_ascii_lowercase().find(phrase) {
            out.replace_range(start..start + phrase.len(), "");
        }
    }
    out
}

fn clean_extracted_content(content: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = collapse_whitespace(&strip_boilerplate(&collapse_whitespace(raw)));
        if line.is_empty() {
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push(String::new());
            }
        } else if line.chars().count() >= MIN_LINE_CHARS {
            lines.push(line);
        }
    }

    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ContentParser {
        ContentParser::new().unwrap()
    }

    #[test]
    fn test_selector_lists_compile() {
        assert!(ContentParser::new().is_ok());
    }

    #[test]
    fn test_recipe_json_ld_wins_verbatim() {
        let recipe_block = r#"{"@context":"https://schema.org","@type":"Recipe","name":"Soup"}"#;
        let html = format!(
            r#"<html><head>
                <script type="application/ld+json">{{"@type":"Organization","name":"Site"}}</script>
                <script type="application/ld+json">{recipe_block}</script>
                <script type="application/ld+json">{{"@type":"RECIPE","name":"Second"}}</script>
            </head><body>
                <nav>Home | Recipes | About us and more</nav>
                <main><p>This paragraph is long enough to count.</p></main>
            </body></html>"#
        );

        let text = parser().parse(&html).unwrap();
        assert_eq!(text, recipe_block);
    }

    #[test]
    fn test_json_ld_match_is_case_insensitive() {
        let html = r#"<html><head><script type="application/ld+json">{"@type":"RECIPE"}</script></head><body></body></html>"#;
        assert_eq!(parser().parse(html).unwrap(), r#"{"@type":"RECIPE"}"#);
    }

    #[test]
    fn test_main_content_is_preferred_over_body() {
        let html = r#"
            <html><body>
                <div class="intro">Outside text that should not appear anywhere</div>
                <article>
                    <h1>Grandma's Tomato Soup</h1>
                    <ul><li>2 cups chopped tomatoes</li></ul>
                    <p>Simmer everything for twenty minutes.</p>
                </article>
            </body></html>
        "#;

        let text = parser().parse(html).unwrap();
        assert!(text.contains("Grandma's Tomato Soup"));
        assert!(text.contains("2 cups chopped tomatoes"));
        assert!(text.contains("Simmer everything for twenty minutes."));
        assert!(!text.contains("Outside text"));
    }

    #[test]
    fn test_noise_elements_are_removed() {
        let html = r#"
            <html><body>
                <nav>Navigation links for the whole site</nav>
                <div class="social-share">Share on every network you know</div>
                <div role="complementary">Sidebar content about other things</div>
                <div class="recipe">
                    <p>Whisk the eggs until they are fluffy.</p>
                    <div class="comments">Great recipe, loved it so much!</div>
                </div>
            </body></html>
        "#;

        let text = parser().parse(html).unwrap();
        assert!(text.contains("Whisk the eggs until they are fluffy."));
        assert!(!text.contains("Navigation"));
        assert!(!text.contains("Share on"));
        assert!(!text.contains("Sidebar"));
        assert!(!text.contains("loved it"));
    }

    #[test]
    fn test_short_lines_are_dropped() {
        let html = r#"
            <html><body><main>
                <p>Print</p>
                <p>Preheat the oven to 200C.</p>
                <p>Jump</p>
            </main></body></html>
        "#;

        let text = parser().parse(html).unwrap();
        assert_eq!(text, "Preheat the oven to 200C.");
    }

    #[test]
    fn test_boilerplate_phrases_are_stripped_case_insensitively() {
        let html = r#"
            <html><body><main>
                <p>ADVERTISEMENT Bake the bread for forty minutes.</p>
                <p>Subscribe to our Newsletter for weekly meal plans</p>
            </main></body></html>
        "#;

        let text = parser().parse(html).unwrap();
        assert!(text.contains("Bake the bread for forty minutes."));
        assert!(!text.to_lowercase().contains("advertisement"));
        assert!(!text.to_lowercase().contains("subscribe to our newsletter"));
        assert!(text.contains("for weekly meal plans"));
    }

    #[test]
    fn test_blocks_are_separated_by_blank_lines() {
        let html = r#"
            <html><body><main>
                <p>First paragraph of the recipe.</p>
                <p>Second paragraph of the recipe.</p>
            </main></body></html>
        "#;

        let text = parser().parse(html).unwrap();
        assert_eq!(
            text,
            "First paragraph of the recipe.\n\nSecond paragraph of the recipe."
        );
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let html = r#"
            <html><body><main>
                <p>Pre<em>heat</em> the oven to <strong>200</strong> degrees.</p>
            </main></body></html>
        "#;

        let text = parser().parse(html).unwrap();
        assert_eq!(text, "Preheat the oven to 200 degrees.");
    }

    #[test]
    fn test_empty_page_has_no_content() {
        let html = r#"<html><body><nav>Only navigation here</nav><p>tiny</p></body></html>"#;
        assert!(matches!(
            parser().parse(html),
            Err(ParseError::NoContentFound)
        ));
    }

    #[test]
    fn test_clean_extracted_content_collapses_blank_runs() {
        let cleaned = clean_extracted_content("Line number one here\n\n\n\nok\n\nLine number two here\n\n");
        assert_eq!(cleaned, "Line number one here\n\nLine number two here");
    }
}
