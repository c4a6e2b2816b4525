//! Lazy placeholder for "the value at another path", with deferred
//! arithmetic.

use crate::error::TreeError;
use crate::tree::ParameterTree;
use crate::value::Value;

/// A binary arithmetic operator deferrable on a [`Reference`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division (always real for integer operands).
    Div,
    /// Exponentiation.
    Pow,
}

impl Op {
    /// The operator's source symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        }
    }
}

/// One deferred operation: an operator, its operand, and whether the
/// operand binds on the left (`reversed`, e.g. `10 / ref`).
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    /// The operator to apply.
    pub op: Op,
    /// Whether the operand is the left-hand side.
    pub reversed: bool,
    /// The operand; may itself be a [`Value::Ref`], resolved against
    /// the same tree when the chain is applied.
    pub operand: Value,
}

/// Outcome of evaluating a reference against a tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// The reference collapsed to a concrete value.
    Resolved(Value),
    /// The target (or an operand) is itself an unresolved reference;
    /// try again on a later resolution pass.
    Deferred,
}

/// A placeholder for the value stored at another dotted path of the
/// same tree, optionally composed with a chain of deferred arithmetic.
///
/// Built fluently:
///
/// ```
/// use paramspace_core::{Reference, Value};
///
/// // p1 + p2 + 1, evaluated when references are replaced
/// let r = Reference::to("p1")
///     .add(Value::Ref(Reference::to("p2")))
///     .add(Value::Int(1));
/// assert_eq!(r.operations().len(), 2);
/// ```
///
/// `Clone` is the copy contract: the operand list is owned exclusively,
/// so cloning deep-copies nested reference operands along with the rest
/// of the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    path: String,
    operations: Vec<Operation>,
}

impl Reference {
    /// Create a reference to the value at `path`.
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operations: Vec::new(),
        }
    }

    /// The dotted target path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The deferred operation chain, in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Append a deferred operation, builder style.
    pub fn with_operation(mut self, op: Op, reversed: bool, operand: impl Into<Value>) -> Self {
        self.operations.push(Operation {
            op,
            reversed,
            operand: operand.into(),
        });
        self
    }

    /// Defer `self + operand`.
    pub fn add(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Add, false, operand)
    }

    /// Defer `self - operand`.
    pub fn sub(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Sub, false, operand)
    }

    /// Defer `operand - self`.
    pub fn rsub(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Sub, true, operand)
    }

    /// Defer `self * operand`.
    pub fn mul(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Mul, false, operand)
    }

    /// Defer `self / operand`.
    pub fn div(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Div, false, operand)
    }

    /// Defer `operand / self`.
    pub fn rdiv(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Div, true, operand)
    }

    /// Defer `self ** operand`.
    pub fn pow(self, operand: impl Into<Value>) -> Self {
        self.with_operation(Op::Pow, false, operand)
    }

    /// Evaluate this reference against `root` as the lookup source.
    ///
    /// Returns [`Resolution::Deferred`] when the target path (or a
    /// reference operand) still holds an unresolved reference; the
    /// fixed-point loop in
    /// [`ParameterTree::resolve_references`](crate::ParameterTree::resolve_references)
    /// retries those on later passes.
    ///
    /// # Errors
    ///
    /// - [`TreeError::KeyNotFound`] if the target path is absent.
    /// - [`TreeError::InvalidReferenceTarget`] if the target is a
    ///   sub-tree and the operation chain is non-empty.
    /// - [`TreeError::UnsupportedOperation`] if an operator cannot be
    ///   applied to its operand kinds.
    pub fn evaluate(&self, root: &ParameterTree) -> Result<Resolution, TreeError> {
        let target = root.get(&self.path)?;
        match target {
            Value::Tree(t) => {
                if self.operations.is_empty() {
                    Ok(Resolution::Resolved(Value::Tree(t.deep_copy())))
                } else {
                    Err(TreeError::InvalidReferenceTarget {
                        path: self.path.clone(),
                    })
                }
            }
            Value::Ref(_) => Ok(Resolution::Deferred),
            other => {
                let mut acc = other.clone();
                for operation in &self.operations {
                    let operand = match &operation.operand {
                        Value::Ref(r) => match r.evaluate(root)? {
                            Resolution::Resolved(v) => v,
                            Resolution::Deferred => return Ok(Resolution::Deferred),
                        },
                        v => v.clone(),
                    };
                    acc = if operation.reversed {
                        operand.apply_op(operation.op, &acc)?
                    } else {
                        acc.apply_op(operation.op, &operand)?
                    };
                }
                Ok(Resolution::Resolved(acc))
            }
        }
    }
}
