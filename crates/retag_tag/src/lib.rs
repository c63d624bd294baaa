//! Parse, serialize and rewrite struct field tags.
//!
//! A tag is a space separated list of `key:"value"` entries, for example
//! `json:"name,omitempty" xml:"name"`. Each value is itself a comma separated
//! option list whose first element is the *name slot*.
//!
//! ## Menu
//!
//! - [`Tag`]: an owned tag string, with lenient [`lookup`](Tag::lookup).
//! - [`TagEntry`]: one decoded `key:"value"` pair.
//! - [`parse_tag`] / [`tag_of`]: decode a tag into entries and back.
//! - [`OptionList`]: read the name slot and options of an entry value.
//! - [`add_option`] / [`add_tag_option`]: insert an option unless it is already present.
//! - [`quote`](quote::quote) / [`unquote`](quote::unquote): the string literal escaping used by values.
//!
//! # Examples
//!
//! ```
//! use retag_tag::{add_tag_option, Tag};
//!
//! let tag = add_tag_option(r#"json:",format:fizzbuzz""#, "json", "format:booboo").unwrap();
//! assert_eq!(tag.as_str(), r#"json:",format:fizzbuzz""#);
//!
//! let tag = Tag::new(r#"json:"foo""#).add_option("bar", "baz").unwrap();
//! assert_eq!(tag.as_str(), r#"json:"foo" bar:"baz""#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod entry;
mod error;
mod merge;
mod option;
mod tag;

pub mod quote;

// -----------------------------------------------------------------------------
// Exports

pub use entry::{TagEntries, TagEntry, parse_tag, tag_of};
pub use error::{TagError, UnquoteError};
pub use merge::{add_option, add_tag_option};
pub use option::{OptionList, TagOption, TagOptions, Token};
pub use tag::Tag;
