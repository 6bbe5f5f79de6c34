pub mod decode;
pub mod loader;
pub mod locator;
pub mod store;
