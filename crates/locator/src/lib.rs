pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;
pub mod templates;

pub use api::routes::*;
pub use config::*;
pub use domain::{FeedRefresher, LocationFeed};
pub use infra::content::{ContentClient, Error as ContentError, LocationSource};
pub use startup::*;
