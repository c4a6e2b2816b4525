//! The closed union of leaf kinds a parameter tree can hold, and the
//! scalar arithmetic used when deferred reference operations are applied.

use crate::dist::Distribution;
use crate::error::TreeError;
use crate::parameter::Parameter;
use crate::range::ParameterRange;
use crate::reference::{Op, Reference};
use crate::tree::ParameterTree;

/// A value stored at one key of a [`ParameterTree`].
///
/// This is the complete set of leaf kinds the core recognizes. Ingestion
/// collaborators must hand the tree values of these kinds only; there is
/// no escape hatch for arbitrary payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The absent value.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A double-precision real.
    Real(f64),
    /// A text string.
    Text(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A nested sub-tree.
    Tree(ParameterTree),
    /// A combinatorial axis: an ordered list of candidate values.
    Range(ParameterRange),
    /// A stochastic axis: a parameterized random generator.
    Dist(Distribution),
    /// A lazy placeholder for the value at another path.
    Ref(Reference),
    /// A named, unit-tagged scalar.
    Param(Parameter),
}

impl Value {
    /// Short name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Tree(_) => "tree",
            Self::Range(_) => "range",
            Self::Dist(_) => "distribution",
            Self::Ref(_) => "reference",
            Self::Param(_) => "parameter",
        }
    }

    /// Returns the nested tree if this value is a sub-tree.
    pub fn as_tree(&self) -> Option<&ParameterTree> {
        match self {
            Self::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::as_tree`].
    pub fn as_tree_mut(&mut self) -> Option<&mut ParameterTree> {
        match self {
            Self::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// Numeric view of this value, if it has one.
    ///
    /// Integers widen to `f64`; unit-tagged parameters expose their
    /// scalar. Everything else is non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Param(p) => Some(p.value),
            _ => None,
        }
    }

    /// Apply a binary arithmetic operator with `self` on the left.
    ///
    /// Integer pairs stay integral except for division, which is always
    /// real. Any integer/real mix widens to real. `+` concatenates two
    /// text values. Every other combination fails with
    /// [`TreeError::UnsupportedOperation`].
    pub fn apply_op(&self, op: Op, rhs: &Value) -> Result<Value, TreeError> {
        if let (Value::Text(a), Value::Text(b)) = (self, rhs) {
            if op == Op::Add {
                return Ok(Value::Text(format!("{a}{b}")));
            }
        }
        if let (Value::Int(a), Value::Int(b)) = (self, rhs) {
            if let Some(v) = int_op(op, *a, *b) {
                return Ok(v);
            }
        }
        match (self.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Real(real_op(op, a, b))),
            _ => Err(TreeError::UnsupportedOperation {
                op: op.symbol(),
                lhs: self.kind(),
                rhs: rhs.kind(),
            }),
        }
    }
}

/// Integer-preserving arithmetic. Returns `None` where the result must
/// widen to real: division, overflow, or a negative exponent.
fn int_op(op: Op, a: i64, b: i64) -> Option<Value> {
    let v = match op {
        Op::Add => a.checked_add(b)?,
        Op::Sub => a.checked_sub(b)?,
        Op::Mul => a.checked_mul(b)?,
        Op::Div => return None,
        Op::Pow => {
            let exp = u32::try_from(b).ok()?;
            a.checked_pow(exp)?
        }
    };
    Some(Value::Int(v))
}

fn real_op(op: Op, a: f64, b: f64) -> f64 {
    match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Pow => a.powf(b),
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<ParameterTree> for Value {
    fn from(v: ParameterTree) -> Self {
        Self::Tree(v)
    }
}

impl From<ParameterRange> for Value {
    fn from(v: ParameterRange) -> Self {
        Self::Range(v)
    }
}

impl From<Distribution> for Value {
    fn from(v: Distribution) -> Self {
        Self::Dist(v)
    }
}

impl From<Reference> for Value {
    fn from(v: Reference) -> Self {
        Self::Ref(v)
    }
}

impl From<Parameter> for Value {
    fn from(v: Parameter) -> Self {
        Self::Param(v)
    }
}
