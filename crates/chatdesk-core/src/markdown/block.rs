//! Line-level block classification for agent replies.

use regex::Regex;
use std::sync::OnceLock;

use super::inline::{format_inline, Span};

/// A typed fragment of line-level structure.
///
/// Blocks never span more than one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level 1, 2 or 3.
    Heading { level: u8, spans: Vec<Span> },
    /// Indent 0 or 1. Ordered items drop their numeral.
    ListItem { indent: u8, ordered: bool, spans: Vec<Span> },
    BlankLine,
    Paragraph(Vec<Span>),
}

fn ordered_marker() -> &'static Regex {
    static ORDERED: OnceLock<Regex> = OnceLock::new();
    ORDERED.get_or_init(|| Regex::new(r"^[0-9]+\.\s").expect("ordered list pattern is valid"))
}

/// Split a reply body into lines and classify each one.
///
/// Always yields one block per `\n`-separated line, so empty content is a
/// single [`Block::BlankLine`].
pub fn render_blocks(content: &str) -> Vec<Block> {
    content
        .split('\n')
        .map(|line| classify_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Classify a single line. Checks run in a fixed order; the first match wins.
pub fn classify_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix("### ") {
        return heading(3, rest);
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return heading(2, rest);
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return heading(1, rest);
    }

    if let Some(rest) = strip_bullet(line) {
        return list_item(0, false, rest);
    }

    if let Some(marker) = ordered_marker().find(line) {
        return list_item(0, true, &line[marker.end()..]);
    }

    // Nested bullets: any leading whitespace, one level deep at most
    let trimmed = line.trim_start();
    if trimmed.len() < line.len() {
        if let Some(rest) = strip_bullet(trimmed) {
            return list_item(1, false, rest);
        }
    }

    if line.trim().is_empty() {
        return Block::BlankLine;
    }

    Block::Paragraph(format_inline(line))
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn heading(level: u8, rest: &str) -> Block {
    Block::Heading {
        level,
        spans: format_inline(rest),
    }
}

fn list_item(indent: u8, ordered: bool, rest: &str) -> Block {
    Block::ListItem {
        indent,
        ordered,
        spans: format_inline(rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::plain_text;
    use proptest::prelude::*;

    fn plain(text: &str) -> Vec<Span> {
        vec![Span::Plain(text.to_string())]
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            render_blocks("# One\n## Two\n### Three"),
            vec![
                Block::Heading { level: 1, spans: plain("One") },
                Block::Heading { level: 2, spans: plain("Two") },
                Block::Heading { level: 3, spans: plain("Three") },
            ]
        );
    }

    #[test]
    fn test_four_hashes_is_a_paragraph() {
        assert_eq!(
            classify_line("#### Deep"),
            Block::Paragraph(plain("#### Deep"))
        );
    }

    #[test]
    fn test_hash_without_space_is_a_paragraph() {
        assert_eq!(classify_line("#tag"), Block::Paragraph(plain("#tag")));
    }

    #[test]
    fn test_bullets() {
        assert_eq!(
            render_blocks("- one\n* two"),
            vec![
                Block::ListItem { indent: 0, ordered: false, spans: plain("one") },
                Block::ListItem { indent: 0, ordered: false, spans: plain("two") },
            ]
        );
    }

    #[test]
    fn test_ordered_item_drops_numeral() {
        assert_eq!(
            classify_line("12. **Enterprise** - Custom pricing"),
            Block::ListItem {
                indent: 0,
                ordered: true,
                spans: vec![
                    Span::Strong(plain("Enterprise")),
                    Span::Plain(" - Custom pricing".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_number_without_space_is_a_paragraph() {
        assert_eq!(classify_line("3.14 is pi"), Block::Paragraph(plain("3.14 is pi")));
    }

    #[test]
    fn test_indented_bullet_is_nested() {
        assert_eq!(
            classify_line("   - Up to 10,000 sessions/month"),
            Block::ListItem { indent: 1, ordered: false, spans: plain("Up to 10,000 sessions/month") }
        );
        assert_eq!(
            classify_line("\t* Email support"),
            Block::ListItem { indent: 1, ordered: false, spans: plain("Email support") }
        );
    }

    #[test]
    fn test_blank_and_whitespace_lines() {
        assert_eq!(
            render_blocks("a\n\n   \nb"),
            vec![
                Block::Paragraph(plain("a")),
                Block::BlankLine,
                Block::BlankLine,
                Block::Paragraph(plain("b")),
            ]
        );
    }

    #[test]
    fn test_trailing_newline_yields_blank_line() {
        assert_eq!(
            render_blocks("a\n"),
            vec![Block::Paragraph(plain("a")), Block::BlankLine]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            render_blocks("### Plans\r\n- Starter"),
            vec![
                Block::Heading { level: 3, spans: plain("Plans") },
                Block::ListItem { indent: 0, ordered: false, spans: plain("Starter") },
            ]
        );
    }

    #[test]
    fn test_empty_content_is_one_blank_line() {
        assert_eq!(render_blocks(""), vec![Block::BlankLine]);
        assert_eq!(render_blocks("\r"), vec![Block::BlankLine]);
    }

    #[test]
    fn test_pricing_reply() {
        let content = "### Burnlab Pricing Plans\n\n1. **Starter** - $29/month\n   - Basic analytics & heatmaps\n\n[Start your free trial](https://burnlab.com/signup)";
        let blocks = render_blocks(content);

        assert_eq!(blocks.len(), 6);
        assert!(matches!(blocks[0], Block::Heading { level: 3, .. }));
        assert_eq!(blocks[1], Block::BlankLine);
        match &blocks[2] {
            Block::ListItem { indent: 0, ordered: true, spans } => {
                assert_eq!(plain_text(spans), "Starter - $29/month");
            }
            other => panic!("expected ordered item, got {:?}", other),
        }
        assert!(matches!(blocks[3], Block::ListItem { indent: 1, ordered: false, .. }));
        match &blocks[5] {
            Block::Paragraph(spans) => assert!(matches!(spans[0], Span::Link { .. })),
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_rendering_is_pure(content in "[#*\\-0-9. a-z\\[\\]()\n]{0,120}") {
            prop_assert_eq!(render_blocks(&content), render_blocks(&content));
        }

        #[test]
        fn prop_one_block_per_line(content in "[#*\\-0-9. a-z\n]{1,120}") {
            prop_assert_eq!(render_blocks(&content).len(), content.split('\n').count());
        }
    }
}
