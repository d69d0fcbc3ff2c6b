//! Fenced code block tracking for the line-based text transforms.

/// Tracks fenced code blocks; headings and links inside them are plain text.
#[derive(Debug, Default)]
pub struct Fence(Option<(char, usize)>);

impl Fence {
    /// Feeds the next line, returning `true` if it is part of a fenced block (delimiters included).
    pub fn advance(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let (marker, run) = match trimmed.chars().next() {
            Some(c @ ('`' | '~')) => (c, trimmed.chars().take_while(|&x| x == c).count()),
            _ => ('\0', 0),
        };

        match self.0 {
            None if run >= 3 => {
                self.0 = Some((marker, run));
                true
            }
            None => false,
            Some((open, len)) => {
                let closes = marker == open
                    && run >= len
                    && trimmed.trim_start_matches(open).trim().is_empty();
                if closes {
                    self.0 = None;
                }
                true
            }
        }
    }
}
