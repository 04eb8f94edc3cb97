pub mod api;
pub mod group;
pub mod parameter;

pub mod prelude;

pub use prelude::*;
