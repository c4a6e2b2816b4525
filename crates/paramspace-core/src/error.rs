//! Error types for tree access, reference resolution, and space expansion.

use std::fmt;

/// Errors arising from parameter tree operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeError {
    /// A strict dotted-path lookup or set hit a missing component.
    KeyNotFound {
        /// The full path that was requested.
        path: String,
    },
    /// A reserved name was used as a parameter key.
    InvalidName {
        /// The offending key.
        name: String,
    },
    /// A `ParameterRange` was constructed from a value with no
    /// iteration protocol.
    NotIterable {
        /// Kind of the offending value.
        found: &'static str,
    },
    /// A value of a kind the tree does not recognize was supplied,
    /// or a constrained container (e.g. a table) was handed a shape
    /// it cannot represent.
    UnsupportedValueType {
        /// Description of what was found.
        found: String,
    },
    /// A reference with a non-empty operation chain resolved to a
    /// sub-tree. Operations only apply to leaf values.
    InvalidReferenceTarget {
        /// The reference's target path.
        path: String,
    },
    /// A deferred arithmetic operation was applied to operand kinds
    /// it does not support.
    UnsupportedOperation {
        /// Operator symbol (`+`, `-`, `*`, `/`, `**`).
        op: &'static str,
        /// Kind of the left operand.
        lhs: &'static str,
        /// Kind of the right operand.
        rhs: &'static str,
    },
    /// An axis-index lookup found a value that is not in the
    /// corresponding candidate sequence of the space.
    PointNotInSpace {
        /// Dotted path of the axis that failed to match.
        path: String,
    },
    /// Reference resolution made no progress while unresolved
    /// references remained, i.e. the references form a cycle.
    ReferenceCycle {
        /// Dotted paths of the references that could not be resolved.
        unresolved: Vec<String>,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound { path } => write!(f, "no parameter at path '{path}'"),
            Self::InvalidName { name } => {
                write!(f, "'{name}' is not allowed as a parameter name")
            }
            Self::NotIterable { found } => {
                write!(f, "a range value must be iterable, got {found}")
            }
            Self::UnsupportedValueType { found } => {
                write!(f, "unsupported value type: {found}")
            }
            Self::InvalidReferenceTarget { path } => {
                write!(
                    f,
                    "operations cannot be applied to reference target '{path}': it is a sub-tree"
                )
            }
            Self::UnsupportedOperation { op, lhs, rhs } => {
                write!(f, "cannot apply '{op}' to operands of kind {lhs} and {rhs}")
            }
            Self::PointNotInSpace { path } => {
                write!(f, "value at '{path}' is not within the parameter space")
            }
            Self::ReferenceCycle { unresolved } => {
                write!(
                    f,
                    "reference resolution stalled with unresolved references: {}",
                    unresolved.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for TreeError {}
