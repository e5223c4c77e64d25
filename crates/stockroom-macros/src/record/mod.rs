//! Implementation of the `#[derive(Record)]` macro.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
