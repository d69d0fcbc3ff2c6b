//! Hierarchical section numbering and cross-reference resolution.
//!
//! `## Intro` becomes `## 1. Intro`, `### Setup` below it becomes `### 1.1. Setup`, and so on.
//! Level-one headings are document titles and are never numbered. Once every heading is
//! numbered, links such as `[Setup](#setup)` whose text names a heading get the section label
//! prepended to both their text and their fragment: `[1.1. Setup](#1.1. setup)`. The fragment
//! is not a valid link destination yet; anchor normalization turns it into `#11-setup`.

use std::borrow::Cow;
use std::collections::HashMap;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::fence::Fence;
use crate::prelude::*;

// Seven or more `#` is a paragraph to the Markdown parser, so it isn't numbered either.
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})([^#].*)$").unwrap());
// Trailing `{#id .class}` block, which the parser strips from the heading text.
static ATTRIBUTES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\{([^{}]*)\}\s*$").unwrap());
static CROSS_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\(#([^)\n]+)\)").unwrap());

/// Number of heading levels that receive section numbers (`##` through `######`).
const NUMBERED_LEVELS: usize = 5;

pub fn number_sections(source: &str) -> String {
    let mut counter = Counter::default();
    let mut sections = Sections::default();
    let mut fence = Fence::default();

    let lines: Vec<(Cow<str>, bool)> = source
        .split('\n')
        .map(|line| {
            if fence.advance(line) {
                return (Cow::Borrowed(line), true);
            }

            let Some(caps) = HEADING_REGEX.captures(line) else {
                return (Cow::Borrowed(line), false);
            };

            let marker = caps.get(1).map_or("", |m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str()).trim();

            // `#` is the document title.
            let Some(depth) = marker.len().checked_sub(2) else {
                return (Cow::Borrowed(line), false);
            };

            let label = counter.advance(depth);
            let numbered = format!("{marker} {label}. {text}");

            let (name, id) = match ATTRIBUTES_REGEX.captures(text) {
                Some(caps) => {
                    let id = caps[1]
                        .split_whitespace()
                        .find_map(|attr| attr.strip_prefix('#'))
                        .map(str::to_owned);
                    (&text[..caps.get(0).map_or(text.len(), |m| m.start())], id)
                }
                None => (text, None),
            };
            sections.insert(name, Section { label, id });

            (Cow::Owned(numbered), false)
        })
        .collect();

    lines
        .iter()
        .map(|(line, fenced)| match *fenced {
            true => Cow::Borrowed(&**line),
            false => sections.cross_reference(line),
        })
        .join("\n")
}

/// Per-depth section counters.
#[derive(Debug, Default)]
struct Counter([usize; NUMBERED_LEVELS]);

impl Counter {
    /// Registers a heading at `depth` (0 for `##`) and returns its dot-joined label.
    fn advance(&mut self, depth: usize) -> String {
        self.0[depth + 1..].fill(0);
        self.0[depth] += 1;

        self.0
            .iter()
            .filter(|&&n| n != 0)
            .join(".")
    }
}

#[derive(Debug)]
struct Section {
    label: String,
    /// Explicit `{#id}` of the heading, if it has one.
    id: Option<String>,
}

/// Heading text (attribute block excluded) to section. Later headings with identical text win.
#[derive(Debug, Default)]
struct Sections(HashMap<String, Section>);

impl Sections {
    fn insert(&mut self, text: &str, section: Section) {
        if let Some(previous) = self.0.insert(text.to_owned(), section) {
            debug!(
                "Heading \"{text}\" appears more than once; cross-references now skip section {}.",
                previous.label
            );
        }
    }

    fn cross_reference<'a>(&self, line: &'a str) -> Cow<'a, str> {
        CROSS_REFERENCE_REGEX.replace_all(line, |caps: &Captures| {
            let text = &caps[1];
            let target = &caps[2];

            match self.0.get(text) {
                // Headings with an explicit ID keep it, so the fragment must too.
                Some(Section { label, id: Some(id) }) => format!("[{label}. {text}](#{id})"),
                Some(Section { label, id: None }) => format!("[{label}. {text}](#{label}. {target})"),
                None => {
                    warn!("Cross-reference to unknown section \"{text}\" (#{target}).");
                    caps[0].to_owned()
                }
            }
        })
    }
}
