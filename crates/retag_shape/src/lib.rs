//! Type shapes and the field tag transformer.
//!
//! A [`TypeShape`] describes a type the way a serializer sees it: structs with
//! named, tagged fields, pointers, interfaces and opaque values, each carrying
//! the [capabilities](Capability) it satisfies.
//!
//! [`mutate_tag`] walks a [`StructShape`] and builds a new one whose field tags
//! were rewritten by a [`TagMutator`]. A [`Skipper`] decides which nested
//! structs are left alone.
//!
//! # Examples
//!
//! ```
//! use retag_shape::{AddOption, FieldShape, OpaqueShape, Skipper, StructShape, mutate_tag};
//!
//! let point = StructShape::new("demo::Point", [
//!     FieldShape::new("X", OpaqueShape::new("int")).with_tag(r#"json:"x""#),
//!     FieldShape::new("Y", OpaqueShape::new("int")),
//! ]);
//!
//! let out = mutate_tag(&point, &Skipper::Never, &AddOption::new("json", ",omitempty")).unwrap();
//! assert_eq!(out.field_at(0).unwrap().tag().as_str(), r#"json:"x,omitempty""#);
//! assert_eq!(out.field_at(1).unwrap().tag().as_str(), r#"json:",omitempty""#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod capability;
mod error;
mod field;
mod mutator;
mod path;
mod shape;
mod skip;
mod transform;

#[cfg(feature = "std")]
mod cache;
#[cfg(feature = "std")]
mod shaped;

// -----------------------------------------------------------------------------
// Exports

pub use capability::{Capabilities, Capability};
pub use error::TransformError;
pub use field::FieldShape;
pub use mutator::{AddOption, ErrorMode, TagMutator};
pub use path::TypePath;
pub use shape::{InterfaceShape, OpaqueShape, PointerShape, StructShape};
pub use shape::{ShapeKind, ShapeKindError, TypeShape};
pub use skip::Skipper;
pub use transform::{CyclePolicy, Transform, mutate_tag};

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub use cache::ShapeCache;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub use shaped::{GenericShapeCell, ShapeCell, Shaped};

pub use retag_tag::{Tag, TagError};
