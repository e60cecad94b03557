pub mod builders;
pub mod catalog;
pub mod services;
pub mod session;
