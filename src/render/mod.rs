mod anchor;
mod expand;
mod fence;
mod number;
mod pulldown;
mod rewrite;
mod slug;
mod toc;

use pulldown_cmark::{escape, Event};

use crate::prelude::*;

use self::slug::Slugger;

/// Settings for a single render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prepended to every generated heading ID.
    pub prefix: String,
    pub smart_punctuation: bool,
    pub lazy_images: bool,
    pub toc_heading: String,
    pub toc_max_depth: u8,
    /// Base URL that relative image sources are resolved against. `None` leaves them alone.
    pub image_base: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            prefix: String::new(),
            smart_punctuation: false,
            lazy_images: true,
            toc_heading: "目次".to_string(),
            toc_max_depth: 5,
            image_base: None,
        }
    }
}

/// Applies the text-level transforms to raw Markdown, in order:
/// 1. Inline list expansion.
/// 2. Color tag expansion.
/// 3. Section numbering and cross-reference resolution.
/// 4. Anchor normalization.
///
/// The result is still Markdown.
pub fn annotate(source: &str) -> String {
    let text = expand::inline_lists(source);
    let text = expand::colorize(&text);
    // Numbering must run before normalization: it produces fragments like `#1.1. setup`
    // that only become valid link destinations once normalized.
    let text = number::number_sections(&text);
    anchor::normalize_anchors(&text)
}

/// Renders a Markdown document to HTML.
///
/// After [`annotate`], the document is parsed and every heading without an explicit ID is
/// given one from a slug registry that lives only for this call. A table of contents is
/// inserted under the configured heading, the events are serialized to HTML, and finally
/// `<img>` tags are rewritten.
pub fn render(source: &str, options: &RenderOptions) -> Result<String> {
    let annotated = annotate(source);

    let events: Vec<Event> = pulldown::init(&annotated, options).collect();
    let mut slugger = Slugger::default();
    let (events, headings) = slug::assign_ids(events, &mut slugger, &options.prefix);
    debug!("Assigned IDs to {} heading(s).", headings.len());

    let events = toc::insert_toc(events, &headings, &options.toc_heading, options.toc_max_depth);
    let hypertext = pulldown::write(events, annotated.len());

    rewrite::rewrite(&hypertext, options)
        .wrap_err("An error occurred while rewriting rendered HTML.")
}

/// Escapes text for use in HTML content and double-quoted attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing into a `String` can't fail.
    let _ = escape::escape_html(&mut escaped, text);
    escaped
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn annotate_pipeline() {
        let input = indoc! {"
            # Manual
            ## Intro
            {{color(red)::Read [Setup](#setup) first.}}
            ### Setup
            {{inline(list)::
            - one
            - two
            }}"};

        let expected = indoc! {r#"
            # Manual
            ## 1. Intro
            <font color="red">Read [1.1. Setup](#11-setup) first.</font>
            ### 1.1. Setup
            <ul><li>one</li><li>two</li></ul>"#};

        assert_eq!(annotate(input), expected);
    }

    #[test]
    fn cross_reference_resolves_to_heading_id() {
        let input = "## Intro\n### Setup\n\nSee [Setup](#setup).\n";
        let html = render(input, &RenderOptions::default()).unwrap();

        assert!(html.contains(r#"<h2 id="1-intro">1. Intro</h2>"#));
        assert!(html.contains(r#"<h3 id="11-setup">1.1. Setup</h3>"#));
        assert!(html.contains(r##"<a href="#11-setup">1.1. Setup</a>"##));
    }

    #[test]
    fn unresolved_reference_does_not_fail() {
        let html = render("## Intro\n\n[Missing](#missing)\n", &RenderOptions::default()).unwrap();
        assert!(html.contains(r##"<a href="#missing">Missing</a>"##));
    }

    #[test]
    fn registry_is_per_render() {
        let options = RenderOptions::default();
        let first = render("## A\n\n## A\n", &options).unwrap();
        let second = render("## A\n\n## A\n", &options).unwrap();

        assert_eq!(first, second);
        assert!(first.contains(r#"<h2 id="1-a">1. A</h2>"#));
        assert!(first.contains(r#"<h2 id="2-a">2. A</h2>"#));
    }

    #[test]
    fn unique_ids_for_identical_text() {
        // Titles aren't numbered, so identical text collides and gets a suffix.
        let html = render("# Notes\n\n# Notes\n", &RenderOptions::default()).unwrap();
        assert!(html.contains(r#"<h1 id="notes">Notes</h1>"#));
        assert!(html.contains(r#"<h1 id="notes-1">Notes</h1>"#));
    }

    #[test]
    fn prefix_and_explicit_ids() {
        let options = RenderOptions {
            prefix: "user-content-".to_string(),
            ..RenderOptions::default()
        };
        let html = render("# Title\n\n# Kept {#kept}\n", &options).unwrap();

        assert!(html.contains(r#"<h1 id="user-content-title">Title</h1>"#));
        assert!(html.contains(r#"<h1 id="kept">Kept</h1>"#));
    }

    #[test]
    fn raw_markup_passes_through() {
        let input = "{{color(red)::Warning}}\n\n{{inline(list)::\n- a\n- b\n}}\n";
        let html = render(input, &RenderOptions::default()).unwrap();

        assert!(html.contains(r#"<font color="red">Warning</font>"#));
        assert!(html.contains("<ul><li>a</li><li>b</li></ul>"));
    }

    #[test]
    fn table_of_contents() {
        let input = indoc! {"
            # Guide

            ## 目次

            ## Intro

            ### Setup
        "};
        let html = render(input, &RenderOptions::default()).unwrap();

        let toc = concat!(
            r##"<ul><li><a href="#2-intro">2. Intro</a>"##,
            r##"<ul><li><a href="#21-setup">2.1. Setup</a></li></ul></li></ul>"##,
        );
        let heading = r#"<h2 id="1-目次">1. 目次</h2>"#;

        let heading_at = html.find(heading).unwrap();
        let toc_at = html.find(toc).unwrap();
        assert!(heading_at < toc_at);
        assert!(toc_at < html.find(r#"<h2 id="2-intro">"#).unwrap());
    }

    #[test]
    fn images_are_absolutized() {
        let options = RenderOptions {
            image_base: Some("http://localhost:3000/projects/notes/".to_string()),
            ..RenderOptions::default()
        };
        let html = render("![cat](img/cat.png)\n", &options).unwrap();

        assert!(html.contains(r#"src="http://localhost:3000/projects/notes/img/cat.png""#));
        assert!(html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn fenced_links_are_verbatim() {
        let input = "## Setup\n\n```md\n## Usage\nSee [Usage](#Usage Notes).\n```\n";
        let annotated = annotate(input);

        assert!(annotated.starts_with("## 1. Setup\n"));
        assert!(annotated.contains("\n## Usage\nSee [Usage](#Usage Notes).\n"));
    }

    #[test]
    fn explicit_id_cross_reference() {
        let input = "## Setup {#setup}\n\nSee [Setup](#setup).\n";
        let html = render(input, &RenderOptions::default()).unwrap();

        assert!(html.contains(r#"<h2 id="setup">1. Setup</h2>"#));
        assert!(html.contains(r##"<a href="#setup">1. Setup</a>"##));
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_html(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
