#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # picker-entities
//!
//! Reusable, agnostic domain values for the location picker.
//!
//! The entities only contain generic functionality that does not depend on
//! a concrete map component or browser API.

pub mod geo;
pub mod options;
