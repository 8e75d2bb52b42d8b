use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, Sidebar, TitleBar, WelcomeScreen};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    tui.input_box.disabled = app.is_loading;
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    TitleBar::new(app.status_message.clone(), app.endpoint_healthy).render(frame, title_area);

    if app.chat.messages.is_empty() && !app.is_loading {
        WelcomeScreen::new(tui.suggestion_index).render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.chat.messages,
            app.is_loading,
            spinner_frame,
        )
        .render(frame, main_area);
    }

    tui.input_box.render(frame, input_area);

    // Drawn last so it overlays the conversation
    if let Some(sidebar) = tui.sidebar.as_mut() {
        Sidebar::new(sidebar).render(frame, main_area);
    }
}
