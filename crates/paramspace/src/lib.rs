//! Paramspace: hierarchical parameter trees, combinatorial parameter
//! spaces, and a round-trippable text format.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the Paramspace sub-crates. For most users, adding `paramspace`
//! as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use paramspace::prelude::*;
//!
//! let mut t = paramspace::text::parse_str(r#"{
//!     "tau_m": 15.0,
//!     "input": {
//!         "rate": range([5, 10, 20]),
//!         "weight": normal(mean=0.1, std=0.02),
//!     },
//!     "tau_syn": (ref("tau_m") / 3),
//! }"#).unwrap();
//! t.resolve_references().unwrap();
//! assert_eq!(t.get("tau_syn").unwrap(), &Value::Real(5.0));
//!
//! // The range leaf spans a combinatorial space with one axis.
//! let space = ParameterSpace::new(t);
//! assert_eq!(space.total_combinations(), 3);
//! for point in space.iter_points() {
//!     assert!(point.get("input.rate").unwrap().as_f64().is_some());
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`model`] | `paramspace-core` | Trees, values, references, ranges, distributions, spaces, tables |
//! | [`text`] | `paramspace-text` | The parameter-text dialect: parse, render, load, save |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Trees, values, and space enumeration (`paramspace-core`).
///
/// The data model lives here: [`model::ParameterTree`] with its dotted
/// paths, the [`model::Value`] leaf taxonomy, and the
/// [`model::ParameterSpace`] wrapper that enumerates range axes and
/// realizes distribution draws.
pub use paramspace_core as model;

/// Text ingestion and persistence (`paramspace-text`).
///
/// [`text::parse_str`] and [`text::to_text`] convert between trees and
/// the parameter-text dialect; [`text::load_path`] and
/// [`text::save_path`] do the same against files.
pub use paramspace_text as text;

/// Common imports for typical Paramspace usage.
///
/// ```rust
/// use paramspace::prelude::*;
/// ```
pub mod prelude {
    pub use paramspace_core::{
        Distribution, Parameter, ParameterRange, ParameterSpace, ParameterTable, ParameterTree,
        Reference, TreeError, Value,
    };
    pub use paramspace_text::{load_path, parse_str, save_path, to_text, TextError};
}
