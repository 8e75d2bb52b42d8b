//! # InputBox Component
//!
//! Where questions are composed.
//!
//! ## Responsibilities
//!
//! - Capture and edit the draft (chars, paste, backspace/delete, cursor and
//!   word motion, up/down across wrapped rows)
//! - Emit the trimmed draft on Enter, clearing it; never while `disabled`
//! - Show a placeholder when empty and a disabled style while a request runs
//! - Render the footer hint under the box
//!
//! The draft is internal state. `disabled` is a prop mirrored from
//! `App::is_loading` every frame.

mod draft;
mod layout;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub use draft::Draft;
use layout::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, locate,
    offset_at_column, rows,
};

pub const PLACEHOLDER: &str = "Message RagGPT...";
pub const FOOTER_HINT: &str = "RagGPT can make mistakes. Check important info.";
const FOOTER_HEIGHT: u16 = 1;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter on a non-blank draft while enabled; carries the trimmed text
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub draft: Draft,
    /// Prop: a request is in flight, so submission is blocked
    pub disabled: bool,
    /// First visible row when the draft outgrows the box
    scroll_offset: u16,
    /// Area width at last render (used for up/down movement)
    last_width: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            draft: Draft::new(),
            disabled: false,
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Replace the draft (welcome-screen suggestions).
    pub fn set_draft(&mut self, text: &str) {
        self.draft.set(text);
    }

    pub fn is_empty(&self) -> bool {
        self.draft.text().is_empty()
    }

    /// Box plus footer height for the current draft, at most
    /// `MAX_VISIBLE_LINES` rows of text.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let row_count = rows(self.draft.text(), inner_width(area_width)).len();
        let visible = u16::try_from(row_count)
            .unwrap_or(u16::MAX)
            .min(MAX_VISIBLE_LINES);
        visible + VERTICAL_OVERHEAD + FOOTER_HEIGHT
    }

    fn move_vertically(&mut self, delta: isize) -> bool {
        let text = self.draft.text();
        let all_rows = rows(text, inner_width(self.last_width));
        let (row, column) = locate(text, &all_rows, self.draft.cursor());
        let Some(target) = row.checked_add_signed(delta).and_then(|r| all_rows.get(r)) else {
            return false;
        };
        let pos = offset_at_column(text, *target, column);
        self.draft.set_cursor(pos);
        true
    }

    fn render_box(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        let text = self.draft.text();
        let all_rows = rows(text, width);
        let (cursor_row, cursor_col) = locate(text, &all_rows, self.draft.cursor());

        // Keep the cursor row inside the visible window
        let cursor_row = u16::try_from(cursor_row).unwrap_or(u16::MAX);
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_LINES;
        }
        let total_rows = all_rows.len();
        if total_rows <= usize::from(MAX_VISIBLE_LINES) {
            self.scroll_offset = 0;
        }

        let lines: Vec<Line> = if text.is_empty() {
            vec![Line::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))]
        } else {
            all_rows
                .iter()
                .skip(usize::from(self.scroll_offset))
                .take(usize::from(MAX_VISIBLE_LINES))
                .map(|r| Line::raw(&text[r.start..r.end]))
                .collect()
        };

        let (border_style, text_style, title) = if self.disabled {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
                " Waiting for answer... ",
            )
        } else {
            (
                Style::default().fg(Color::Green),
                Style::default().fg(Color::White),
                " Ask ",
            )
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));
        frame.render_widget(Paragraph::new(lines).block(block).style(text_style), area);

        if total_rows > usize::from(MAX_VISIBLE_LINES) {
            let max_scroll = total_rows - usize::from(MAX_VISIBLE_LINES);
            let mut state = ScrollbarState::default()
                .content_length(max_scroll)
                .position(usize::from(self.scroll_offset));
            let bar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(2),
            };
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                bar_area,
                &mut state,
            );
        }

        if !self.disabled {
            let col = u16::try_from(cursor_col).unwrap_or(u16::MAX);
            let x = (area.x + CONTENT_OFFSET_X).saturating_add(col);
            let y = area.y + CONTENT_OFFSET_Y + (cursor_row - self.scroll_offset);
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), y));
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [box_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)]).areas(area);
        self.render_box(frame, box_area);
        frame.render_widget(
            Paragraph::new(FOOTER_HINT)
                .centered()
                .style(Style::default().fg(Color::DarkGray)),
            footer_area,
        );
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.draft.insert_char(*c);
                true
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for newlines inside bracketed paste
                self.draft.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                true
            }
            TuiEvent::Backspace => self.draft.backspace(),
            TuiEvent::Delete => self.draft.delete(),
            TuiEvent::CursorLeft => self.draft.left(),
            TuiEvent::CursorRight => self.draft.right(),
            TuiEvent::WordLeft => self.draft.word_left(),
            TuiEvent::WordRight => self.draft.word_right(),
            TuiEvent::CursorHome => self.draft.home(),
            TuiEvent::CursorEnd => self.draft.end(),
            TuiEvent::CursorUp => self.move_vertically(-1),
            TuiEvent::CursorDown => self.move_vertically(1),
            TuiEvent::Submit => {
                if self.disabled {
                    return None;
                }
                let text = self.draft.take_trimmed()?;
                self.scroll_offset = 0;
                return Some(InputEvent::Submit(text));
            }
            _ => false,
        };
        changed.then_some(InputEvent::ContentChanged)
    }
}
