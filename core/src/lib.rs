pub mod collection;
pub mod config;
pub mod layout;
pub mod signature;
pub mod template;
