//! Value building: raw host values, typed value trees and the recursive
//! type-directed builder.

mod build;
mod spec;

pub use spec::{NumberValue, RawValue, ValueSpec};
