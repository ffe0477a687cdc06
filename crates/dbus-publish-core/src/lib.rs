//! Core types for publishing objects on D-Bus.
//!
//! This is split up into a separate crate so it can be shared between the XML
//! model and the declaration layer.

#![allow(clippy::module_inception)]

#[macro_use]
mod macros;

pub mod signature;

pub mod proto;
