pub mod control;
pub mod render;
pub mod results;
pub mod terminal;

pub use render::{render_html, render_text};
pub use results::ResultsPage;
