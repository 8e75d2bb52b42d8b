//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, status message and endpoint health
//! - `MessageView`: one chat message with its citations
//! - `WelcomeScreen`: empty-conversation greeting and suggestions
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: draft editor, disabled while a request is in flight
//! - `MessageList`: scrollable conversation with layout caching
//! - `Sidebar`: conversation index overlay
//!
//! Stateful components keep their state in `TuiState` and are wrapped by a
//! transient struct each frame that borrows it alongside the props.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs       (single message + citation formatting)
//! ├── message_list.rs
//! ├── sidebar.rs
//! ├── welcome.rs
//! └── input_box/       (draft editing + wrap layout)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
pub mod sidebar;
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub mod welcome;
pub use welcome::WelcomeScreen;
