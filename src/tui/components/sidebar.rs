//! # Sidebar Component
//!
//! Left-hand panel listing stored conversations, newest first.
//! Toggled with Ctrl+O, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` while the panel is open
//! - `Sidebar` is created each frame with borrowed state

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::core::store::ConversationSummary;
use crate::tui::event::TuiEvent;

/// Preferred panel width; narrower terminals get the full width.
const PANEL_WIDTH: u16 = 38;

/// Persistent state for the sidebar.
pub struct SidebarState {
    pub conversations: Vec<ConversationSummary>,
    pub selected: usize,
    /// Conversation currently on screen, marked in the list
    pub current_id: Option<String>,
    pub list_state: ListState,
}

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    Select(String),
    NewChat,
    Dismiss,
}

impl SidebarState {
    pub fn new(conversations: Vec<ConversationSummary>, current_id: Option<String>) -> Self {
        // Open with the active conversation highlighted
        let selected = current_id
            .as_deref()
            .and_then(|id| conversations.iter().position(|c| c.id == id))
            .unwrap_or(0);
        let mut list_state = ListState::default();
        if !conversations.is_empty() {
            list_state.select(Some(selected));
        }
        Self {
            conversations,
            selected,
            current_id,
            list_state,
        }
    }

    /// Handle a key event, returning a SidebarEvent if the panel should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        match event {
            TuiEvent::Escape | TuiEvent::ToggleSidebar => Some(SidebarEvent::Dismiss),
            TuiEvent::NewChat | TuiEvent::InputChar('n') => Some(SidebarEvent::NewChat),
            TuiEvent::CursorUp => {
                if !self.conversations.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.conversations.is_empty() {
                    self.selected = (self.selected + 1).min(self.conversations.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self
                .conversations
                .get(self.selected)
                .map(|c| SidebarEvent::Select(c.id.clone())),
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    state: &'a mut SidebarState,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut SidebarState) -> Self {
        Self { state }
    }

    /// Area the panel occupies inside `area`.
    pub fn panel_area(area: Rect) -> Rect {
        Rect {
            width: area.width.min(PANEL_WIDTH),
            ..area
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let panel = Self::panel_area(area);
        frame.render_widget(Clear, panel);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Recent ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" n New  Enter Open  Esc Close ").centered())
            .padding(Padding::horizontal(1));

        if self.state.conversations.is_empty() {
            let empty = Paragraph::new("No conversations yet.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, panel);
            return;
        }

        let title_width = usize::from(panel.width.saturating_sub(4));
        let items: Vec<ListItem> = self
            .state
            .conversations
            .iter()
            .enumerate()
            .map(|(i, conversation)| {
                let is_current = self.state.current_id.as_deref() == Some(conversation.id.as_str());
                let title_style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if is_current {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let detail = format!(
                    "{} · {} msgs",
                    format_timestamp(conversation.updated_at),
                    conversation.message_count
                );
                ListItem::new(vec![
                    Line::from(Span::styled(
                        truncate_str(&conversation.title, title_width),
                        title_style,
                    )),
                    Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, panel, &mut self.state.list_state);
    }
}

/// Local "Jan 15 09:30" style date.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %d %H:%M").to_string()
}

/// Fit `s` into `max_chars` characters, ending in "..." when cut.
fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        ".".repeat(max_chars)
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn summary(id: &str, title: &str) -> ConversationSummary {
        ConversationSummary {
            id: id.into(),
            title: title.into(),
            message_count: 2,
            updated_at: Utc::now(),
        }
    }

    fn render(state: &mut SidebarState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| Sidebar::new(state).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn opens_on_current_conversation() {
        let state = SidebarState::new(
            vec![summary("a", "First"), summary("b", "Second")],
            Some("b".into()),
        );
        assert_eq!(state.selected, 1);
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn navigation_is_clamped() {
        let mut state = SidebarState::new(vec![summary("a", "A"), summary("b", "B")], None);
        assert_eq!(state.handle_event(&TuiEvent::CursorUp), None);
        assert_eq!(state.selected, 0);
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn enter_selects_highlighted_conversation() {
        let mut state = SidebarState::new(vec![summary("a", "A"), summary("b", "B")], None);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(SidebarEvent::Select("b".into()))
        );
    }

    #[test]
    fn enter_on_empty_list_does_nothing() {
        let mut state = SidebarState::new(vec![], None);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn new_chat_and_dismiss_keys() {
        let mut state = SidebarState::new(vec![], None);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('n')),
            Some(SidebarEvent::NewChat)
        );
        assert_eq!(state.handle_event(&TuiEvent::NewChat), Some(SidebarEvent::NewChat));
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(SidebarEvent::Dismiss));
        assert_eq!(
            state.handle_event(&TuiEvent::ToggleSidebar),
            Some(SidebarEvent::Dismiss)
        );
    }

    #[test]
    fn renders_titles_and_empty_state() {
        let mut state = SidebarState::new(vec![summary("a", "What is RAG?")], None);
        let text = render(&mut state, 60, 10);
        assert!(text.contains("Recent"));
        assert!(text.contains("What is RAG?"));
        assert!(text.contains("2 msgs"));

        let mut empty = SidebarState::new(vec![], None);
        assert!(render(&mut empty, 60, 10).contains("No conversations yet."));
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate_str("héllo", 5), "héllo");
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_str("abcdef", 2), "..");
    }
}
