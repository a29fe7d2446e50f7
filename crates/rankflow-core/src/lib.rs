//! Rankflow Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Rankflow crates:
//!
//! - **Identifiers**: string-interned node identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: points, sizes and bounds ([`geometry`] module)
//! - **Graph**: nodes, edges and flow direction ([`graph`] module)

pub mod color;
pub mod geometry;
pub mod graph;
pub mod identifier;
