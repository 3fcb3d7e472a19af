mod report;
mod ui_text;
mod watch;

pub use report::{RenderOptions, render_snapshot};
pub(crate) use ui_text::UI_TEXT;
pub use ui_text::{is_quit, loading_line, watch_prompt};
pub use watch::run_watch;
