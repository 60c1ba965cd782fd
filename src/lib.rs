// Modules are public for main.rs and the integration tests.
pub mod app;
pub mod chunkifier;
pub mod cli;
pub mod config;
pub mod consts;
pub mod errors;
pub mod generator;
pub mod gpt_connector;
pub mod pdf_extractor;
pub mod types;
pub mod utils;
pub mod writer;
