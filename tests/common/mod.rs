#![allow(dead_code)]

mod app;
mod factory;

pub use app::{TempDatabase, TestApp};
pub use factory::Factory;
