//! # location-picker
//!
//! Puts a fixed marker on the center of an interactive map
//! and keeps a latitude and a longitude form field in sync with it.
//!
//! The marker adapter itself lives in [`picker_core`], the plain values
//! in [`picker_entities`]. This crate adds the form binding and the
//! configuration of a page.

pub mod binding;
pub mod config;

pub use picker_core;
pub use picker_entities;

pub use self::{
    binding::{FormBinding, FormFields, Seed},
    config::Config,
};
