pub mod aggregate;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod report;
pub mod stats;
