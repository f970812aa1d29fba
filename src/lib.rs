pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod schema;
