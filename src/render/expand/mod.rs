//! Expansion of the custom `{{...}}` markup into raw HTML.
//!
//! Both expansions leave anything that doesn't match their syntax untouched, and neither
//! produces output they would match again, so running them twice is a no-op.

mod color;
mod inline_list;

pub use color::colorize;
pub use inline_list::inline_lists;
