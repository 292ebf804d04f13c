//! Shape renderer.

mod common;
mod shape;

pub use common::ProgramKind;
pub use shape::Shape;
