//! View-models bound to the Slint window.

pub mod result_display;
pub mod search_input;

pub use result_display::{Card, CardView, ResultDisplay};
pub use search_input::{SearchInput, SearchRequested, SubmitTrigger};
