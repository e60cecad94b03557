pub mod config;
pub mod file_browser;
pub mod file_store;
pub mod logging;
#[cfg(test)]
pub mod memory_store;
pub mod output;
