use pulldown_cmark::{html, Event, Options, Parser};

use super::RenderOptions;

/// Initializes a [`Parser`] instance with the given Markdown input and the GFM-style extensions.
pub fn init<'a>(input: &'a str, options: &RenderOptions) -> Parser<'a, 'a> {
    let mut extensions = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    if options.smart_punctuation {
        extensions |= Options::ENABLE_SMART_PUNCTUATION;
    }

    Parser::new_ext(input, extensions)
}

/// Consumes a sequence of events, buffering the HTML output into a final [`String`].
pub fn write<'a>(events: impl IntoIterator<Item = Event<'a>>, size_hint: usize) -> String {
    // There are no possible worlds in which the HTML output is smaller
    // than the Markdown input, so a little preallocation can't hurt.
    let mut html_output = String::with_capacity(size_hint);
    html::push_html(&mut html_output, events.into_iter());
    html_output
}
