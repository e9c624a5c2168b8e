//! Application module
//!
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State
//!
//! Side effects the reducer asks for are queued on the state as `Effect`s and
//! carried out by the event loop.

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::{Action, Effect, View};
pub use reducer::reduce;
pub use state::{ActiveToast, AppState, ComposeState, Focus, QueueState, UiConfig};
