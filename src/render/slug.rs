//! Heading ID assignment over the parsed event stream.

use std::collections::HashSet;

use pulldown_cmark::{Event, HeadingLevel, Tag};

use super::anchor::anchorize;
use super::escape_html;

/// Registry of the slugs issued during one render. Create a fresh one per document.
#[derive(Debug, Default)]
pub struct Slugger {
    issued: HashSet<String>,
}

impl Slugger {
    /// Returns a GitHub-style slug for `text` that is unique within this registry,
    /// appending `-1`, `-2`, ... on collision.
    pub fn slug(&mut self, text: &str) -> String {
        let base = anchorize(text);
        let mut slug = base.clone();
        let mut suffix = 0;

        while self.issued.contains(&slug) {
            suffix += 1;
            slug = format!("{base}-{suffix}");
        }

        self.issued.insert(slug.clone());
        slug
    }
}

/// A heading as seen after ID assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: HeadingLevel,
    /// Plain text content, without markup.
    pub text: String,
    pub id: String,
    /// Index of the heading's closing event in the rewritten event list.
    pub end: usize,
}

/// Gives every heading without an explicit `{#id}` attribute an ID of `prefix` followed by
/// its slug. Headings are visited in document order; explicit IDs are kept verbatim and
/// don't take part in collision checks.
///
/// Headings that receive a generated ID are emitted as raw HTML tags, since the parser's
/// heading tags can only carry IDs borrowed from the source text.
pub fn assign_ids<'a>(
    events: Vec<Event<'a>>,
    slugger: &mut Slugger,
    prefix: &str,
) -> (Vec<Event<'a>>, Vec<Heading>) {
    let mut output = Vec::with_capacity(events.len());
    let mut headings = Vec::new();
    let mut events = events.into_iter();

    while let Some(event) = events.next() {
        let (level, explicit, classes) = match event {
            Event::Start(Tag::Heading(level, explicit, classes)) => (level, explicit, classes),
            event => {
                output.push(event);
                continue;
            }
        };

        let mut inner = Vec::new();
        let mut text = String::new();
        let mut images = 0usize;

        for event in events.by_ref() {
            match &event {
                Event::End(Tag::Heading(..)) => break,
                Event::Start(Tag::Image(..)) => images += 1,
                Event::End(Tag::Image(..)) => images = images.saturating_sub(1),
                // Image alt text is not part of the heading's text.
                Event::Text(t) | Event::Code(t) if images == 0 => text.push_str(t),
                _ => {}
            }
            inner.push(event);
        }

        let id = match explicit {
            Some(id) => {
                output.push(Event::Start(Tag::Heading(level, Some(id), classes.clone())));
                output.extend(inner);
                output.push(Event::End(Tag::Heading(level, Some(id), classes)));
                id.to_owned()
            }
            None => {
                let id = format!("{prefix}{}", slugger.slug(&text));
                output.push(Event::Html(open_tag(level, &id, &classes).into()));
                output.extend(inner);
                output.push(Event::Html(format!("</{}>\n", tag_name(level)).into()));
                id
            }
        };

        headings.push(Heading {
            level,
            text,
            id,
            end: output.len() - 1,
        });
    }

    (output, headings)
}

pub fn depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn tag_name(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn open_tag(level: HeadingLevel, id: &str, classes: &[&str]) -> String {
    let mut tag = format!("<{} id=\"{}\"", tag_name(level), escape_html(id));
    if !classes.is_empty() {
        tag.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
    }
    tag.push('>');
    tag
}
