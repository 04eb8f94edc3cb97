pub mod api;
pub mod group;
pub mod parameter;

pub use api::*;
pub use group::*;
pub use parameter::*;
