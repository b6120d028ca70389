//! Inline span formatting for the constrained markdown dialect.
//!
//! Three passes run in strict precedence: links, then `**strong**`, then
//! `*emphasis*`. Each pass only sees the leaf text the previous pass left
//! behind, so a link label may carry bold or italic text but never another
//! link. Nothing here fails: syntax that does not pair up stays literal.

/// A typed fragment of inline-formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Strong(Vec<Span>),
    Emphasis(Vec<Span>),
    Link { url: String, children: Vec<Span> },
}

impl Span {
    /// Visible text with all markup removed.
    pub fn text(&self) -> String {
        match self {
            Span::Plain(text) => text.clone(),
            Span::Strong(children) | Span::Emphasis(children) => plain_text(children),
            Span::Link { children, .. } => plain_text(children),
        }
    }
}

/// Concatenated visible text of a span sequence.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Parse one line of markdown into an ordered sequence of spans.
pub fn format_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(link) = find_link(rest) {
        push_strong_pass(&mut spans, &rest[..link.start]);
        spans.push(Span::Link {
            url: link.url.to_string(),
            children: strong_pass(link.label),
        });
        rest = &rest[link.end..];
    }

    push_strong_pass(&mut spans, rest);
    spans
}

struct LinkMatch<'a> {
    start: usize,
    end: usize,
    label: &'a str,
    url: &'a str,
}

/// Leftmost `[label](url)` in `text`. Labels stop at the first `]`, urls at
/// the first `)`.
fn find_link(text: &str) -> Option<LinkMatch<'_>> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('[') {
        let open = from + offset;
        if let Some(link) = match_link_at(text, open) {
            return Some(link);
        }
        from = open + 1;
    }
    None
}

fn match_link_at(text: &str, open: usize) -> Option<LinkMatch<'_>> {
    let label_start = open + 1;
    let close = label_start + text[label_start..].find(']')?;
    if !text[close + 1..].starts_with('(') {
        return None;
    }

    let url_start = close + 2;
    let url_end = url_start + text[url_start..].find(')')?;

    Some(LinkMatch {
        start: open,
        end: url_end + 1,
        label: &text[label_start..close],
        url: &text[url_start..url_end],
    })
}

fn strong_pass(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    push_strong_pass(&mut spans, text);
    spans
}

fn push_strong_pass(spans: &mut Vec<Span>, text: &str) {
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let inner_start = open + 2;
        let Some(len) = rest[inner_start..].find("**") else {
            break;
        };

        push_emphasis_pass(spans, &rest[..open]);
        spans.push(Span::Strong(emphasis_pass(
            &rest[inner_start..inner_start + len],
        )));
        rest = &rest[inner_start + len + 2..];
    }

    push_emphasis_pass(spans, rest);
}

fn emphasis_pass(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    push_emphasis_pass(&mut spans, text);
    spans
}

fn push_emphasis_pass(spans: &mut Vec<Span>, text: &str) {
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('*') {
        let inner_start = open + 1;
        let Some(len) = rest[inner_start..].find('*') else {
            break;
        };
        let close = inner_start + len;

        plain.push_str(&rest[..open]);
        if len == 0 {
            // "**" with nothing between is not emphasis
            plain.push_str("**");
        } else {
            flush_plain(spans, &mut plain);
            spans.push(Span::Emphasis(vec![Span::Plain(
                rest[inner_start..close].to_string(),
            )]));
        }
        rest = &rest[close + 1..];
    }

    plain.push_str(rest);
    flush_plain(spans, &mut plain);
}

/// Push accumulated plain text, merging with a trailing plain span.
fn flush_plain(spans: &mut Vec<Span>, plain: &mut String) {
    if plain.is_empty() {
        return;
    }
    let text = std::mem::take(plain);
    match spans.last_mut() {
        Some(Span::Plain(prev)) => prev.push_str(&text),
        _ => spans.push(Span::Plain(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plain(text: &str) -> Span {
        Span::Plain(text.to_string())
    }

    #[test]
    fn test_plain_text_is_single_span() {
        assert_eq!(format_inline("hello world"), vec![plain("hello world")]);
    }

    #[test]
    fn test_empty_text_has_no_spans() {
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn test_link_between_text() {
        let spans = format_inline("See [docs](https://example.com/docs) now");
        assert_eq!(
            spans,
            vec![
                plain("See "),
                Span::Link {
                    url: "https://example.com/docs".to_string(),
                    children: vec![plain("docs")],
                },
                plain(" now"),
            ]
        );
    }

    #[test]
    fn test_link_label_can_be_bold() {
        let spans = format_inline("[**Book** a demo](https://example.com/demo)");
        assert_eq!(
            spans,
            vec![Span::Link {
                url: "https://example.com/demo".to_string(),
                children: vec![Span::Strong(vec![plain("Book")]), plain(" a demo")],
            }]
        );
    }

    #[test]
    fn test_empty_link_still_links() {
        assert_eq!(
            format_inline("[]()"),
            vec![Span::Link {
                url: String::new(),
                children: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_bracket_without_url_is_literal() {
        assert_eq!(format_inline("[not a link] here"), vec![plain("[not a link] here")]);
    }

    #[test]
    fn test_leftmost_bracket_that_forms_a_link_wins() {
        let spans = format_inline("[a] [b](u)");
        assert_eq!(
            spans,
            vec![
                plain("[a] "),
                Span::Link {
                    url: "u".to_string(),
                    children: vec![plain("b")],
                },
            ]
        );
    }

    #[test]
    fn test_strong_wraps_emphasis() {
        let spans = format_inline("**very *much* so**");
        assert_eq!(
            spans,
            vec![Span::Strong(vec![
                plain("very "),
                Span::Emphasis(vec![plain("much")]),
                plain(" so"),
            ])]
        );
    }

    #[test]
    fn test_strong_and_emphasis_side_by_side() {
        let spans = format_inline("**Starter** - *billed monthly*");
        assert_eq!(
            spans,
            vec![
                Span::Strong(vec![plain("Starter")]),
                plain(" - "),
                Span::Emphasis(vec![plain("billed monthly")]),
            ]
        );
    }

    #[test]
    fn test_unpaired_star_is_literal() {
        assert_eq!(format_inline("cost *a lot"), vec![plain("cost *a lot")]);
    }

    #[test]
    fn test_unpaired_double_star_is_literal() {
        assert_eq!(format_inline("cost **a lot"), vec![plain("cost **a lot")]);
    }

    #[test]
    fn test_odd_delimiter_count_leaves_last_literal() {
        let spans = format_inline("*a* and *b");
        assert_eq!(
            spans,
            vec![Span::Emphasis(vec![plain("a")]), plain(" and *b")]
        );
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let spans = format_inline("**Real-time** [docs](https://x.io) *now*");
        assert_eq!(plain_text(&spans), "Real-time docs now");
    }

    proptest! {
        #[test]
        fn prop_markup_free_text_is_one_plain_span(text in "[a-zA-Z0-9 .,!?:;'()-]{1,80}") {
            prop_assert_eq!(format_inline(&text), vec![Span::Plain(text.clone())]);
        }

        #[test]
        fn prop_every_link_is_extracted(
            parts in proptest::collection::vec(
                ("[a-z ]{0,8}", "[a-zA-Z ]{0,12}", "[a-z:/.]{0,20}"),
                0..6,
            )
        ) {
            let mut text = String::new();
            for (before, label, url) in &parts {
                text.push_str(before);
                text.push_str(&format!("[{}]({})", label, url));
            }

            let links: Vec<(String, String)> = format_inline(&text)
                .into_iter()
                .filter_map(|span| match span {
                    Span::Link { url, children } => Some((plain_text(&children), url)),
                    _ => None,
                })
                .collect();

            prop_assert_eq!(links.len(), parts.len());
            for ((label, url), (_, expected_label, expected_url)) in links.iter().zip(&parts) {
                prop_assert!(!label.contains('[') && !label.contains(']'));
                prop_assert_eq!(label, expected_label);
                prop_assert_eq!(url, expected_url);
            }
        }
    }
}
