pub mod event_handlers;
pub mod event_loop;
pub mod rendering;
pub mod state;
pub mod surface;
pub mod theme;

pub use state::TuiApp;
