pub mod constants;
pub mod schedule;
pub mod starfield;

pub use schedule::*;
pub use starfield::*;
