//! CLI command handlers. Each command is in its own file.

mod new;
mod update;
mod verify;

pub use new::run_new;
pub use update::run_update;
pub use verify::run_verify;
