//! # Core Application Logic
//!
//! The conversation model and its lifecycle. It knows nothing about any
//! specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │                         │
//!                    │  • App (state)          │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • ChatState (store)    │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │    API     │
//!         │  (ratatui) │                  │ (reqwest)  │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the `App` struct, all conversation state in one place
//! - [`action`]: the `Action` enum and `update()`
//! - [`message`]: `Message` and `Role`
//! - [`store`]: active state, conversation index, repository trait
//! - [`persistence`]: file-backed repository
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod message;
pub mod persistence;
pub mod state;
pub mod store;
