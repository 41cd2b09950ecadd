#![forbid(unsafe_code)]
//! tree2dir: turn ASCII tree diagrams into real directory structures, and back.
//!
//! The pipeline is `normalize` → [`tree::parse`] → [`validate::validate`] →
//! [`generate::materialize`]; [`tree::scan`] and [`render::render`] go the
//! other way.

pub mod cli;
pub mod generate;
pub mod normalize;
pub mod render;
pub mod report;
pub mod source;
pub mod tree;
pub mod validate;
