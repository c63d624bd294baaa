//! Small shared utilities for the `retag` crates.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
