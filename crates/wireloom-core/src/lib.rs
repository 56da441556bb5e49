//! Wireloom Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Wireloom
//! wireframe language front end and its downstream consumers:
//!
//! - **AST**: The typed, ordered tree produced by the parser ([`ast`] module)
//! - **Registry**: Metadata for the built-in components and layouts that the
//!   semantic validator checks use sites against ([`registry`] module)

pub mod ast;
pub mod registry;
