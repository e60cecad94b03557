pub mod cli;
pub mod dialog;
