//! The constrained markdown dialect agent replies are written in: headings,
//! flat or one-level-nested lists, links, bold and italic. Anything else is
//! rendered as plain text.

pub mod block;
pub mod inline;

pub use block::{classify_line, render_blocks, Block};
pub use inline::{format_inline, plain_text, Span};
