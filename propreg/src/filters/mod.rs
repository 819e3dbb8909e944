//! Keystroke-level input gates for form fields
//!
//! A gate decides whether a proposed value may be committed at all. It never
//! produces an error message; rejected input simply leaves the field unchanged.

pub mod normalizers;

pub use normalizers::*;
