mod fragments;
mod home;
mod locations;
mod system;

pub use fragments::*;
pub use home::*;
pub use locations::*;
pub use system::*;
