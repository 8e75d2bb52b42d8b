use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::SourceRef;
use crate::core::message::{Message, Role};
use crate::tui::component::Component;
use crate::tui::markdown::{self, RenderConfig};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Borders (1 left + 1 right) plus padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top + bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;

/// Characters of source text shown in a citation line.
pub const SNIPPET_CHARS: usize = 60;

const USER_COLOR: Color = Color::Green;
const ASSISTANT_COLOR: Color = Color::Blue;

/// First `SNIPPET_CHARS` characters of `text`, with `...` only when cut.
pub fn snippet(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// `N. Doc: {doc_id}, Page: {page}, Text: {snippet}` with `N` starting at 1.
pub fn format_source(number: usize, source: &SourceRef) -> String {
    format!(
        "{number}. Doc: {}, Page: {}, Text: {}",
        source.doc_id,
        source.page,
        snippet(&source.text)
    )
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "RagGPT",
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::User => USER_COLOR,
        Role::Assistant => ASSISTANT_COLOR,
    }
}

/// Body text for a message: markdown content, then the citation list for
/// assistant messages that have one.
pub fn message_text(message: &Message) -> Text<'static> {
    let config = RenderConfig::with_base(role_color(message.role));
    let mut text = markdown::render(message.content.trim(), &config);

    if message.role == Role::Assistant && !message.sources.is_empty() {
        let muted = Style::default().fg(Color::DarkGray);
        text.lines.push(Line::default());
        text.lines.push(Line::from(Span::styled(
            "Sources:",
            muted.add_modifier(Modifier::BOLD),
        )));
        for (i, source) in message.sources.iter().enumerate() {
            text.lines
                .push(Line::from(Span::styled(format_source(i + 1, source), muted)));
        }
    }
    text
}

/// A single chat message in a rounded box titled with the speaker.
///
/// Transient: created each frame by `MessageList` for the visible messages.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Rendered height at `width`, borders included.
    ///
    /// Uses the same `Paragraph` the widget renders, so the prediction and
    /// the drawn output cannot disagree.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let text = message_text(message);
        if text.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }
        let lines = body(text).line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn body(text: Text<'static>) -> Paragraph<'static> {
    Paragraph::new(text).wrap(Wrap { trim: false })
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = role_color(self.message.role);
        let border_style = Style::default().fg(color).add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(Span::styled(
                role_label(self.message.role),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        body(message_text(self.message)).render(inner, buf);
    }
}

impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn source(doc: &str, page: &str, text: &str) -> SourceRef {
        SourceRef {
            doc_id: doc.into(),
            page: page.into(),
            text: text.into(),
        }
    }

    fn rendered(message: &Message, width: u16) -> String {
        let height = MessageView::calculate_height(message, width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(MessageView::new(message), f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ==========================================================================
    // Citation formatting
    // ==========================================================================

    #[test]
    fn snippet_short_text_has_no_ellipsis() {
        assert_eq!(snippet("short passage"), "short passage");
    }

    #[test]
    fn snippet_cuts_to_sixty_chars() {
        let text = "x".repeat(61);
        let s = snippet(&text);
        assert_eq!(s, format!("{}...", "x".repeat(60)));
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 3);
    }

    #[test]
    fn snippet_exactly_sixty_is_untouched() {
        let text = "y".repeat(60);
        assert_eq!(snippet(&text), text);
    }

    #[test]
    fn format_source_line() {
        let line = format_source(2, &source("report.pdf", "14", "Revenue grew."));
        assert_eq!(line, "2. Doc: report.pdf, Page: 14, Text: Revenue grew.");
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    #[test]
    fn user_message_labelled_you() {
        let text = rendered(&Message::user("Hello"), 40);
        assert!(text.contains("You"));
        assert!(text.contains("Hello"));
    }

    #[test]
    fn assistant_without_sources_has_no_sources_section() {
        let text = rendered(&Message::assistant("Hi there", vec![]), 40);
        assert!(text.contains("RagGPT"));
        assert!(text.contains("Hi there"));
        assert!(!text.contains("Sources:"));
    }

    #[test]
    fn assistant_sources_are_enumerated() {
        let message = Message::assistant(
            "Answer",
            vec![source("a.pdf", "1", "alpha"), source("b.pdf", "2", "beta")],
        );
        let lines: Vec<String> = message_text(&message)
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        let start = lines.iter().position(|l| l == "Sources:").unwrap();
        assert_eq!(lines[start + 1], "1. Doc: a.pdf, Page: 1, Text: alpha");
        assert_eq!(lines[start + 2], "2. Doc: b.pdf, Page: 2, Text: beta");
    }

    #[test]
    fn user_message_never_shows_sources() {
        let mut message = Message::user("question");
        message.sources = vec![source("a.pdf", "1", "alpha")];
        let text = message_text(&message);
        assert!(!text.lines.iter().any(|l| l.spans.iter().any(|s| s.content == "Sources:")));
    }

    #[test]
    fn markdown_is_rendered_not_echoed() {
        let text = rendered(&Message::assistant("**bold** move", vec![]), 40);
        assert!(text.contains("bold move"));
        assert!(!text.contains("**"));
    }

    // ==========================================================================
    // calculate_height
    // ==========================================================================

    #[test]
    fn calculate_height_single_line() {
        assert_eq!(
            MessageView::calculate_height(&Message::user("Hello"), 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(MessageView::calculate_height(&Message::user("Hello"), 0), 1);
        assert_eq!(
            MessageView::calculate_height(&Message::user("Hello"), HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        // content width 4: "abcd" | "efgh" | "ij"
        assert_eq!(
            MessageView::calculate_height(&Message::user("abcdefghij"), 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_saturates_for_huge_messages() {
        let huge = Message::assistant("line\n\n".repeat(40_000), vec![]);
        assert_eq!(MessageView::calculate_height(&huge, 80), u16::MAX);
    }

    #[test]
    fn calculate_height_counts_sources() {
        let plain = Message::assistant("Answer", vec![]);
        let cited = Message::assistant("Answer", vec![source("a.pdf", "1", "alpha")]);
        // blank line + "Sources:" + one entry
        assert_eq!(
            MessageView::calculate_height(&cited, 80),
            MessageView::calculate_height(&plain, 80) + 3
        );
    }
}
