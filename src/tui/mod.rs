//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (request in flight): draws every ~80ms so the typing
//!   indicator moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize or when a
//!   background task reports back.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.
//!
//! ## Background work
//!
//! Network calls run on tokio tasks and report back over a std `mpsc`
//! channel as `Action`s. The loop drains that channel once per iteration,
//! so every state change still happens on this thread through `update()`.

pub mod component;
pub mod components;
pub mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::AnswerEndpoint;
use crate::core::action::{Action, Effect, update};
use crate::core::state::{App, RequestTicket};
use crate::tui::component::EventHandler;
use crate::tui::components::welcome::{SUGGESTIONS, next_suggestion};
use crate::tui::components::{InputBox, InputEvent, MessageListState, SidebarEvent, SidebarState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Conversations overlay (None = hidden)
    pub sidebar: Option<SidebarState>,
    // Welcome-screen suggestion last copied into the draft
    pub suggestion_index: Option<usize>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            sidebar: None,
            suggestion_index: None,
        }
    }

    /// Forget per-conversation view state after the conversation changes.
    fn reset_conversation_view(&mut self) {
        self.message_list = MessageListState::new();
        self.suggestion_index = None;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter.
        // Terminals that don't support it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// What the loop should do after a key event.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(mut app: App, endpoint_url: &str) -> std::io::Result<()> {
    info!(
        "Starting TUI against {} ({})",
        endpoint_url,
        app.endpoint.name()
    );
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_health_check(app.endpoint.clone(), tx.clone());

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.input_box.disabled = app.is_loading;
        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, &event, &tx) == Flow::Quit {
                break 'main;
            }
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if apply_effect(effect, &app.endpoint, &tx) == Flow::Quit {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Route one terminal event through the overlay, the scroll view and the
/// input box, in that order of precedence.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> Flow {
    match event {
        TuiEvent::Resize => return Flow::Continue,
        TuiEvent::ForceQuit => {
            return dispatch(app, tui, Action::Quit, tx);
        }
        TuiEvent::ToggleSidebar if tui.sidebar.is_none() => {
            tui.sidebar = Some(SidebarState::new(
                app.chat.conversations(),
                app.chat.current_conversation_id.clone(),
            ));
            return Flow::Continue;
        }
        _ => {}
    }

    // When the sidebar is open, route all keys to it
    if let Some(sidebar) = tui.sidebar.as_mut() {
        let Some(sidebar_event) = sidebar.handle_event(event) else {
            return Flow::Continue;
        };
        tui.sidebar = None;
        return match sidebar_event {
            SidebarEvent::Select(id) => {
                let switching = app.chat.current_conversation_id.as_deref() != Some(id.as_str());
                let flow = dispatch(app, tui, Action::SelectConversation(id), tx);
                if switching {
                    tui.reset_conversation_view();
                }
                flow
            }
            SidebarEvent::NewChat => {
                tui.reset_conversation_view();
                dispatch(app, tui, Action::NewChat, tx)
            }
            SidebarEvent::Dismiss => Flow::Continue,
        };
    }

    match event {
        TuiEvent::Escape => {
            if tui.input_box.is_empty() {
                return dispatch(app, tui, Action::Quit, tx);
            }
            Flow::Continue
        }
        TuiEvent::NewChat => {
            tui.reset_conversation_view();
            dispatch(app, tui, Action::NewChat, tx)
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
            Flow::Continue
        }
        TuiEvent::NextSuggestion => {
            if app.chat.messages.is_empty() && !app.is_loading {
                let index = next_suggestion(tui.suggestion_index);
                tui.suggestion_index = Some(index);
                tui.input_box.set_draft(SUGGESTIONS[index]);
            }
            Flow::Continue
        }
        _ => match tui.input_box.handle_event(event) {
            Some(InputEvent::Submit(text)) => {
                // New content always brings the view back to the bottom
                tui.message_list.handle_event(&TuiEvent::ScrollToBottom);
                dispatch(app, tui, Action::Submit(text), tx)
            }
            Some(InputEvent::ContentChanged) | None => Flow::Continue,
        },
    }
}

fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> Flow {
    let effect = update(app, action);
    tui.input_box.disabled = app.is_loading;
    apply_effect(effect, &app.endpoint, tx)
}

/// Carry out an effect returned by `update()`.
fn apply_effect(
    effect: Effect,
    endpoint: &Arc<dyn AnswerEndpoint>,
    tx: &mpsc::Sender<Action>,
) -> Flow {
    match effect {
        Effect::None => Flow::Continue,
        Effect::SpawnRequest(ticket) => {
            spawn_request(endpoint.clone(), ticket, tx.clone());
            Flow::Continue
        }
        Effect::CancelRequest(token) => {
            debug!("Cancelling in-flight request");
            token.cancel();
            Flow::Continue
        }
        Effect::Quit => Flow::Quit,
    }
}

fn spawn_request(endpoint: Arc<dyn AnswerEndpoint>, ticket: RequestTicket, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning request {} to {} (top_k={})",
        ticket.id,
        endpoint.name(),
        ticket.top_k
    );
    tokio::spawn(async move {
        let result = endpoint
            .ask(&ticket.question, ticket.top_k, ticket.cancel)
            .await;
        if let Err(e) = &result {
            debug!("Request {} finished with error: {e}", ticket.id);
        }
        if tx
            .send(Action::AnswerReady {
                request_id: ticket.id,
                result,
            })
            .is_err()
        {
            warn!(
                "Failed to deliver answer for request {}: receiver dropped",
                ticket.id
            );
        }
    });
}

fn spawn_health_check(endpoint: Arc<dyn AnswerEndpoint>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let healthy = match endpoint.health().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Endpoint health check failed: {e}");
                false
            }
        };
        info!("Endpoint health: {}", if healthy { "ok" } else { "unreachable" });
        if tx.send(Action::EndpointHealth(healthy)).is_err() {
            debug!("Health result dropped: receiver gone");
        }
    });
}
