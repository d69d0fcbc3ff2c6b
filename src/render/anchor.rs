use std::borrow::Cow;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::fence::Fence;

static FRAGMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]\(#([^)\n]+)\)").unwrap());

/// Turns heading text (or a link fragment) into an anchor ID.
///
/// Lowercases, replaces every space with `-` and drops everything else that isn't alphanumeric,
/// `-` or `_`. That covers `.` (so section labels collapse: `1.1. Setup` becomes `11-setup`) and
/// the full-width middle dot `・`.
///
/// Both the fragment rewriting in [`normalize_anchors`] and heading ID generation go through
/// this function, so a cross-reference always points at the ID its heading receives.
pub fn anchorize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Rewrites the fragment of every `](#...)` link target with [`anchorize`].
/// Lines inside fenced code blocks are left alone.
pub fn normalize_anchors(source: &str) -> String {
    let mut fence = Fence::default();

    source
        .split('\n')
        .map(|line| match fence.advance(line) {
            true => Cow::Borrowed(line),
            false => FRAGMENT_REGEX.replace_all(line, |caps: &Captures| {
                format!("](#{})", anchorize(&caps[1]))
            }),
        })
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchorize_rules() {
        assert_eq!(anchorize("1.1. Setup"), "11-setup");
        assert_eq!(anchorize("Hello, World!"), "hello-world");
        assert_eq!(anchorize("snake_case-and-kebab"), "snake_case-and-kebab");
        assert_eq!(anchorize("A  B"), "a--b");
        assert_eq!(anchorize("2.3. 設計・実装"), "23-設計実装");
        assert_eq!(anchorize("ÉTÉ"), "été");
        assert_eq!(anchorize(""), "");
    }

    #[test]
    fn numbered_fragments() {
        assert_eq!(
            normalize_anchors("[1.1. Setup](#1.1. setup)"),
            "[1.1. Setup](#11-setup)"
        );
        assert_eq!(
            normalize_anchors("[a](#One.Two) and [b](#3. Three・Four)"),
            "[a](#onetwo) and [b](#3-threefour)"
        );
    }

    #[test]
    fn fenced_code_untouched() {
        let input = "[a](#One Two)\n```md\n[b](#One Two)\n```\n[c](#One Two)";
        assert_eq!(
            normalize_anchors(input),
            "[a](#one-two)\n```md\n[b](#One Two)\n```\n[c](#one-two)"
        );
    }

    #[test]
    fn other_links_untouched() {
        for input in [
            "[site](https://example.com/#Top)",
            "![cat](img/cat.png)",
            "plain (#text) here",
        ] {
            assert_eq!(normalize_anchors(input), input);
        }
    }
}
