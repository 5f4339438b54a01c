// src/graph/mod.rs
// =============================================================================
// The package graph and its on-disk form.
//
// Submodules:
// - assemble: PackageGraph, built from the crawler's dependency map
// - edgelist: save/load as a pipe-delimited text file
// =============================================================================

mod assemble;
pub mod edgelist;

pub use assemble::{PackageGraph, DEPENDS, PACKAGE};
