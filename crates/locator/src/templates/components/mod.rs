mod region_buttons;

pub use region_buttons::*;
