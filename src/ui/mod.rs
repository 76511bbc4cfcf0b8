//! UI components module.
//!
//! Contains ratatui widgets for displaying the application interface.

pub mod error;
pub mod list;
pub mod search;

pub use error::render_error;
pub use list::render_list;
pub use search::render_search;
