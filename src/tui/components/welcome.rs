//! # Welcome Screen Component
//!
//! Shown instead of the message list while the conversation is empty.
//! Tab cycles the suggestions into the input box.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const TITLE: &str = "How can I help you today?";
pub const SUBTITLE: &str = "Start a conversation or try one of these suggestions";
const HINT: &str = "Tab: use a suggestion";

pub const SUGGESTIONS: [&str; 4] = [
    "Explain quantum computing in simple terms",
    "Write a Python function to reverse a string",
    "Summarize the key points of machine learning",
    "Help me brainstorm ideas for a mobile app",
];

/// Column cap for the suggestion block on wide terminals.
const MAX_TEXT_WIDTH: usize = 60;

/// Index of the suggestion after `current`, wrapping around.
pub fn next_suggestion(current: Option<usize>) -> usize {
    match current {
        Some(i) => (i + 1) % SUGGESTIONS.len(),
        None => 0,
    }
}

pub struct WelcomeScreen {
    /// Suggestion last copied into the input box
    pub selected: Option<usize>,
}

impl WelcomeScreen {
    pub fn new(selected: Option<usize>) -> Self {
        Self { selected }
    }

    fn suggestion_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
            let style = if self.selected == Some(i) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let options = textwrap::Options::new(width)
                .initial_indent("› ")
                .subsequent_indent("  ");
            for row in textwrap::wrap(suggestion, options) {
                lines.push(Line::from(Span::styled(row.into_owned(), style)));
            }
        }
        lines
    }
}

impl Component for WelcomeScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = usize::from(area.width.saturating_sub(4)).clamp(1, MAX_TEXT_WIDTH);
        let suggestions = self.suggestion_lines(width);
        let suggestions_height = u16::try_from(suggestions.len()).unwrap_or(u16::MAX);

        let [header_area, _, list_area, _, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(suggestions_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                TITLE,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, header_area);

        // Left-aligned block, centered as a whole
        let block_width = u16::try_from(width).unwrap_or(u16::MAX).min(list_area.width);
        let [list_column] = Layout::horizontal([Constraint::Length(block_width)])
            .flex(Flex::Center)
            .areas(list_area);
        frame.render_widget(Paragraph::new(suggestions), list_column);

        frame.render_widget(
            Paragraph::new(HINT)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            hint_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(screen: &mut WelcomeScreen, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn next_suggestion_cycles() {
        assert_eq!(next_suggestion(None), 0);
        assert_eq!(next_suggestion(Some(0)), 1);
        assert_eq!(next_suggestion(Some(SUGGESTIONS.len() - 1)), 0);
    }

    #[test]
    fn renders_title_and_suggestions() {
        let text = render(&mut WelcomeScreen::new(None), 80, 20);
        assert!(text.contains(TITLE));
        assert!(text.contains(SUBTITLE));
        for suggestion in SUGGESTIONS {
            assert!(text.contains(suggestion), "missing {suggestion}");
        }
        assert!(text.contains(HINT));
    }

    #[test]
    fn narrow_width_wraps_suggestions() {
        let screen = WelcomeScreen::new(None);
        let lines = screen.suggestion_lines(20);
        assert!(lines.len() > SUGGESTIONS.len());
        assert!(lines.iter().all(|l| l.width() <= 20));
    }
}
