//! CLI command handlers, one file per command.

mod completions;
mod cookies;
mod man;
mod routes;
mod serve;

pub use completions::run_completions;
pub use cookies::run_cookies;
pub use man::run_man;
pub use routes::run_routes;
pub use serve::{run_serve, ServeArgs};
