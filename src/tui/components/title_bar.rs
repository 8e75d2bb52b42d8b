//! # TitleBar Component
//!
//! Single-line status bar: app name, the last status message and the
//! endpoint health as reported by the startup probe.
//!
//! Purely presentational. All fields are props copied from `App` each frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.status_message.clone(), app.endpoint_healthy);
//! title_bar.render(frame, title_area);
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const APP_NAME: &str = "RagGPT";

pub struct TitleBar {
    pub status_message: String,
    /// `None` until the health probe reports back
    pub endpoint_healthy: Option<bool>,
}

impl TitleBar {
    pub fn new(status_message: String, endpoint_healthy: Option<bool>) -> Self {
        Self {
            status_message,
            endpoint_healthy,
        }
    }

    fn health_span(&self) -> Span<'static> {
        match self.endpoint_healthy {
            Some(true) => Span::styled("endpoint: ok", Style::default().fg(Color::Green)),
            Some(false) => Span::styled("endpoint: unreachable", Style::default().fg(Color::Red)),
            None => Span::styled("endpoint: checking…", Style::default().fg(Color::DarkGray)),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![Span::styled(
            APP_NAME,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if !self.status_message.is_empty() {
            spans.push(separator.clone());
            spans.push(Span::raw(self.status_message.clone()));
        }
        spans.push(separator);
        spans.push(self.health_span());

        frame.render_widget(Line::from(spans), area);
    }
}
