pub mod render;
pub mod terminal;

pub use render::{render_dashboard, render_form};
pub use terminal::TerminalSink;
