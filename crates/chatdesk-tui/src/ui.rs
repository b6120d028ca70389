use chatdesk_core::markdown::{render_blocks, Block as MdBlock, Span as MdSpan};
use chatdesk_core::{source_label, AgentStatus, ChatRole, TranscriptView};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, MAX_INPUT_CHARS};

const INPUT_VISIBLE_LINES: u16 = 3;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let chips_height = chips_height(app, area.width);
    let input_height = input_line_count(&app.input).min(INPUT_VISIBLE_LINES) + 2;

    let [header_area, chat_area, chips_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(chips_height),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    if chips_height > 0 {
        render_chips(app, frame, chips_area);
    }
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", app.agent_name), Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", app.conversation.session_id()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let status_style = match view.status {
        AgentStatus::Online => Style::default().fg(Color::Green),
        AgentStatus::Processing => Style::default().fg(Color::Yellow),
    };

    let mut spans = vec![
        Span::styled(
            format!(" Powered by {} ", app.agent_name),
            Style::default().fg(Color::White).bg(Color::Blue),
        ),
        Span::styled(format!(" ● {} ", view.status.label()), status_style),
        Span::raw(" "),
    ];

    let mut hints = vec!["Tab: chips", "PgUp/PgDn: scroll", "Ctrl+S: sample", "Ctrl+C: quit"];
    if view.show_retry {
        hints.insert(0, "Ctrl+R: retry");
    }
    spans.push(Span::styled(hints.join("  "), Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);

    let lines = {
        let view = app.view();
        if view.welcome {
            welcome_lines(&app.agent_name)
        } else {
            transcript_lines(&view, &app.agent_name, app.animation_frame)
        }
    };

    let chat = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });

    app.total_lines = wrapped_height(&chat, inner_width);
    if app.follow_tail {
        app.scroll = app.max_scroll();
    } else {
        app.scroll = app.scroll.min(app.max_scroll());
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    let chat = chat.block(chat_block).scroll((app.scroll, 0));

    frame.render_widget(chat, area);
}

fn welcome_lines(agent_name: &str) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("Welcome to {}", agent_name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("How can I help you today? Type a question below,"),
        Line::from(Span::styled(
            "or press Tab to pick one of the suggestions.",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Styled lines for every displayed message plus the retry hint and the
/// typing indicator.
pub fn transcript_lines(
    view: &TranscriptView<'_>,
    agent_name: &str,
    animation_frame: u8,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in view.messages {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in msg.content.split('\n') {
                    lines.push(Line::from(line.to_string()));
                }
            }
            ChatRole::Assistant if msg.is_error => {
                lines.push(Line::from(Span::styled(
                    format!("⚠ {}", msg.content),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    format!("{}:", agent_name),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                lines.extend(block_lines(&render_blocks(&msg.content)));

                if !msg.sources.is_empty() {
                    let labels: Vec<String> = msg.sources.iter().map(|s| source_label(s)).collect();
                    lines.push(Line::from(vec![
                        Span::styled("Sources: ", Style::default().fg(Color::DarkGray)),
                        Span::styled(
                            labels.join(" · "),
                            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                        ),
                    ]));
                }
            }
        }
        lines.push(Line::default());
    }

    if view.show_retry {
        lines.push(Line::from(Span::styled(
            "Press Ctrl+R to retry",
            Style::default().fg(Color::Yellow),
        )));
    }

    if view.is_loading {
        lines.push(Line::from(Span::styled(
            format!("{}:", agent_name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Turn classified blocks into terminal lines. Ordered items are numbered
/// consecutively; a heading or paragraph starts a new list.
pub fn block_lines(blocks: &[MdBlock]) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(blocks.len());
    let mut ordinal = 0;

    for block in blocks {
        match block {
            MdBlock::Heading { level, spans } => {
                ordinal = 0;
                let style = match level {
                    1 => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    2 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    _ => Style::default().add_modifier(Modifier::BOLD),
                };
                lines.push(Line::from(styled_spans(spans, style)));
            }
            MdBlock::ListItem { indent, ordered, spans } => {
                let marker = if *ordered {
                    ordinal += 1;
                    format!("{}. ", ordinal)
                } else if *indent == 0 {
                    "• ".to_string()
                } else {
                    "◦ ".to_string()
                };
                let pad = "  ".repeat(1 + 2 * (*indent as usize));

                let mut line = vec![
                    Span::raw(pad),
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                ];
                line.extend(styled_spans(spans, Style::default()));
                lines.push(Line::from(line));
            }
            MdBlock::BlankLine => lines.push(Line::default()),
            MdBlock::Paragraph(spans) => {
                ordinal = 0;
                lines.push(Line::from(styled_spans(spans, Style::default())));
            }
        }
    }

    lines
}

fn styled_spans(spans: &[MdSpan], base: Style) -> Vec<Span<'static>> {
    let mut out = Vec::new();
    push_styled(&mut out, spans, base);
    out
}

fn push_styled(out: &mut Vec<Span<'static>>, spans: &[MdSpan], style: Style) {
    for span in spans {
        match span {
            MdSpan::Plain(text) => out.push(Span::styled(text.clone(), style)),
            MdSpan::Strong(children) => push_styled(out, children, style.add_modifier(Modifier::BOLD)),
            MdSpan::Emphasis(children) => {
                push_styled(out, children, style.add_modifier(Modifier::ITALIC))
            }
            MdSpan::Link { url, children } => {
                push_styled(
                    out,
                    children,
                    style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                );
                out.push(Span::styled(format!(" ({})", url), Style::default().fg(Color::DarkGray)));
            }
        }
    }
}

/// Rows a block-less `paragraph` occupies at `width` columns, counted with
/// the same word wrapping it is drawn with.
fn wrapped_height(paragraph: &Paragraph<'_>, width: u16) -> u16 {
    paragraph.line_count(width).min(u16::MAX as usize) as u16
}

fn chip_spans(chips: &[String], selected: Option<usize>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, chip) in chips.iter().enumerate() {
        let style = if selected == Some(i) {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!("[{}]", chip), style));
        spans.push(Span::raw(" "));
    }
    spans
}

fn chips_height(app: &App, width: u16) -> u16 {
    let view = app.view();
    if view.chips.is_empty() {
        return 0;
    }
    let chips = Paragraph::new(Line::from(chip_spans(view.chips, None))).wrap(Wrap { trim: false });
    wrapped_height(&chips, width.saturating_sub(2)).min(3) + 2
}

fn render_chips(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let focused = app.focus == Focus::Chips;
    let selected = focused.then_some(app.chip_index);

    let title = if focused {
        " Suggestions (←/→ choose, Enter send, Tab back) "
    } else {
        " Suggestions (Tab to choose) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(title);

    let chips = Paragraph::new(Line::from(chip_spans(view.chips, selected)))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(chips, area);
}

fn input_line_count(input: &str) -> u16 {
    (input.matches('\n').count() + 1).min(u16::MAX as usize) as u16
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let loading = app.conversation.is_loading();
    let focused = app.focus == Focus::Input && !loading;

    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let title = if loading {
        " Waiting for reply... "
    } else {
        " Message (Enter send, Shift+Enter newline) "
    };
    let counter = format!(" {}/{} ", app.input_char_count(), MAX_INPUT_CHARS);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_top(Line::from(counter).right_aligned());

    // Cursor position as (row, column) within the input text
    let before_cursor: String = app.input.chars().take(app.cursor).collect();
    let cursor_row = before_cursor.matches('\n').count() as u16;
    let cursor_col = before_cursor
        .rsplit('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or(0) as u16;

    // Scroll so the cursor stays inside the box
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let col_offset = if inner_width == 0 {
        0
    } else {
        (cursor_col + 1).saturating_sub(inner_width)
    };
    let row_offset = (cursor_row + 1).saturating_sub(inner_height);

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(input_block)
        .scroll((row_offset, col_offset));

    frame.render_widget(input, area);

    if focused && inner_width > 0 && inner_height > 0 {
        frame.set_cursor_position((
            area.x + 1 + cursor_col - col_offset,
            area.y + 1 + cursor_row - row_offset,
        ));
    }
}
