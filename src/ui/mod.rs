//! CLI output and prompts
//!
//! Uses `cliclack` in an interactive terminal and plain `console`-styled lines
//! otherwise (pipes, CI).

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{intro, key_value, key_value_status, step_info, step_ok, step_warn_hint};
pub use prompts::confirm;
