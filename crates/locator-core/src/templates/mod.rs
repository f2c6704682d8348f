//! Markup shared by the server-rendered page and the browser client.

mod location_list;
mod popup;

pub use location_list::*;
pub use popup::*;
