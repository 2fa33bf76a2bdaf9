//! CLI command handlers, one file per command.

mod crawl;
mod generate;
mod run;
mod status;
mod sync;

pub use crawl::run_crawl;
pub use generate::{run_completions, run_man};
pub use run::run_pass;
pub use status::run_status;
pub use sync::run_sync;
