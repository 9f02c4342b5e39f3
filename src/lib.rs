pub mod analyzers;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod output;
pub mod parser;
pub mod stats;
