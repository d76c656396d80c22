//! Terminal output for carton commands
//!
//! Uses `cliclack` spinners and log lines in an interactive terminal and
//! falls back to plain, prefixed lines in CI or when piped.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{intro, key_value, outro_success, step_info, step_ok, step_skip, step_warn_hint};
pub use progress::TaskSpinner;
