#![forbid(unsafe_code)]

//! Core primitives for bltn bulletin cards.
//!
//! This crate provides:
//! - [`Element`] handles forming the abstract element tree an item builds
//! - [`ContentContainer`] holding the card's laid-out elements
//! - [`Rgba`] packed colours

pub mod color;
pub mod container;
pub mod element;

pub use color::Rgba;
pub use container::ContentContainer;
pub use element::{Element, ElementFlags, ElementId, flatten_hideable};
