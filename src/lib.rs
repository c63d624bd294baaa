//! Rewrite the field tags of struct shapes.
//!
//! - [`tag`]: parse, serialize and merge options into tag strings.
//! - [`shape`]: type descriptors, skip predicates and the tag transformer.
//! - [`utils`]: hash containers shared by the other crates.
//!
//! # Examples
//!
//! ```
//! use retag::tag::add_tag_option;
//!
//! let tag = add_tag_option(r#"json:"foo""#, "json", "omitempty").unwrap();
//! assert_eq!(tag.as_str(), r#"json:"foo,omitempty""#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use retag_shape as shape;
pub use retag_tag as tag;
pub use retag_utils as utils;
