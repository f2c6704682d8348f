//! locator-core: Shared store-locator domain for the server and WASM client
//!
//! Everything here is runtime-free so the same code renders the server-side
//! page and drives the interactive map in the browser.

pub mod config;
pub mod errors;
pub mod location;
pub mod map;
pub mod popup;
pub mod region;
pub mod session;
pub mod store;
pub mod templates;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::*;
pub use errors::*;
pub use location::*;
pub use map::*;
pub use popup::*;
pub use region::*;
pub use session::*;
pub use store::*;
