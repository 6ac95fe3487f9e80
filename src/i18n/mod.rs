pub mod loader;
pub mod page;
pub mod store;
