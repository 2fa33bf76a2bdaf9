pub mod config;
pub mod error;
pub mod logging;

pub mod crawl;
pub mod store;
pub mod sync;
pub mod transfer;
