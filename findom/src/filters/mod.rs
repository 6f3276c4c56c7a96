//! Filter trees and the shorthand-operator normalizer
//!
//! `where` values are parsed once into [`WhereNode`] trees; the normalizer then
//! rewrites shorthand operator objects into canonical operators.

pub mod normalizers;
pub mod tree;

pub use normalizers::*;
pub use tree::*;
