//! Hierarchical parameter trees for simulation and model configuration.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the parameter data model and the two core algorithms: reference
//! resolution (a dependency-tolerant fixed point over a mutable tree)
//! and parameter-space expansion (cartesian-product enumeration over
//! range axes and per-draw realization of distribution axes).
//!
//! # Quick start
//!
//! ```rust
//! use paramspace_core::{ParameterRange, ParameterSpace, ParameterTree, Reference, Value};
//!
//! let mut model = ParameterTree::new();
//! model.add("sim.dt", Value::Real(0.1)).unwrap();
//! model.add("cell.tau_m", Value::Real(15.0)).unwrap();
//! model
//!     .add("cell.tau_ref", Value::Ref(Reference::to("cell.tau_m").div(Value::Int(3))))
//!     .unwrap();
//! model
//!     .add(
//!         "cell.cm",
//!         Value::Range(ParameterRange::new(vec![Value::Real(0.5), Value::Real(1.0)])),
//!     )
//!     .unwrap();
//!
//! // Eliminate references, then enumerate the combinatorial space.
//! model.resolve_references().unwrap();
//! let space = ParameterSpace::new(model);
//! assert_eq!(space.total_combinations(), 2);
//! for point in space.iter_points() {
//!     assert_eq!(point.get("cell.tau_ref").unwrap(), &Value::Real(5.0));
//!     assert!(!point.is_space());
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod dist;
mod error;
mod parameter;
mod range;
mod reference;
mod space;
mod table;
mod tree;
mod value;

pub use dist::{Distribution, GammaDist, NormalDist, UniformDist};
pub use error::TreeError;
pub use parameter::Parameter;
pub use range::ParameterRange;
pub use reference::{Op, Operation, Reference, Resolution};
pub use space::{AxisIndex, AxisSweep, ParameterSpace, Points, Realizations};
pub use table::ParameterTable;
pub use tree::{Flat, ParameterTree, DEFAULT_SEPARATOR, RESERVED_NAMES};
pub use value::Value;
