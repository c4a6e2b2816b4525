//! Combinatorial axis placeholder: an ordered list of candidate values.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::TreeError;
use crate::value::Value;

/// An ordered, finite sequence of candidate values for one parameter.
///
/// Placed as a leaf inside a [`ParameterTree`](crate::ParameterTree), a
/// range marks one axis of a combinatorial space. The candidate order is
/// fixed at construction (optionally shuffled once, with a caller-supplied
/// seed) and every iteration replays that same order.
///
/// Two consumption styles are supported: [`iter`](Self::iter) restarts
/// from the first candidate every call, while [`next`](Self::next)
/// advances a single shared forward-only cursor.
#[derive(Clone, Debug)]
pub struct ParameterRange {
    /// Axis name, used for display and export.
    pub name: String,
    /// Optional unit annotation shared by all candidates.
    pub units: Option<String>,
    values: Vec<Value>,
    cursor: usize,
}

impl ParameterRange {
    /// Create a range over the given candidate sequence.
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            name: String::new(),
            units: None,
            values,
            cursor: 0,
        }
    }

    /// Create a range from an arbitrary value.
    ///
    /// The value must be a [`Value::List`]; scalars and strings have no
    /// iteration protocol and fail with [`TreeError::NotIterable`].
    pub fn from_value(value: Value) -> Result<Self, TreeError> {
        match value {
            Value::List(values) => Ok(Self::new(values)),
            other => Err(TreeError::NotIterable {
                found: other.kind(),
            }),
        }
    }

    /// Create a range whose candidate order is randomized once.
    ///
    /// The shuffle happens here and never again: iteration and cursor
    /// consumption both replay the shuffled order. The seed makes the
    /// order reproducible.
    pub fn shuffled(mut values: Vec<Value>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        values.shuffle(&mut rng);
        Self::new(values)
    }

    /// Set the unit annotation, builder style.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Set the axis name, builder style.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The fixed candidate sequence.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Restartable iteration over the candidate sequence.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the candidate sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Advance the shared cursor and return the next candidate, or
    /// `None` once the sequence is exhausted.
    ///
    /// The cursor is forward-only and independent of [`iter`](Self::iter).
    pub fn next(&mut self) -> Option<&Value> {
        let v = self.values.get(self.cursor)?;
        self.cursor += 1;
        Some(v)
    }
}

impl<'a> IntoIterator for &'a ParameterRange {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Equality compares name, units, and the full candidate sequence.
/// The cursor position is consumption state, not identity.
impl PartialEq for ParameterRange {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.units == other.units && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(vals: &[i64]) -> Vec<Value> {
        vals.iter().map(|&v| Value::Int(v)).collect()
    }

    #[test]
    fn from_value_requires_a_list() {
        let err = ParameterRange::from_value(Value::Int(3)).unwrap_err();
        assert_eq!(err, TreeError::NotIterable { found: "integer" });
        assert_eq!(
            ParameterRange::from_value(Value::Text("abc".into())).unwrap_err(),
            TreeError::NotIterable { found: "text" }
        );

        let r = ParameterRange::from_value(Value::List(ints(&[1, 2]))).unwrap();
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn iteration_restarts_cursor_does_not() {
        let mut r = ParameterRange::new(ints(&[1, 2, 3]));
        assert_eq!(r.iter().count(), 3);
        assert_eq!(r.iter().count(), 3);

        assert_eq!(r.next(), Some(&Value::Int(1)));
        assert_eq!(r.next(), Some(&Value::Int(2)));
        assert_eq!(r.next(), Some(&Value::Int(3)));
        assert_eq!(r.next(), None);
        assert_eq!(r.next(), None);
    }

    #[test]
    fn equality_ignores_cursor_position() {
        let mut a = ParameterRange::new(ints(&[1, 2]));
        let b = ParameterRange::new(ints(&[1, 2]));
        a.next();
        assert_eq!(a, b);

        let c = ParameterRange::new(ints(&[2, 1]));
        assert_ne!(a, c);
    }

    #[test]
    fn shuffle_is_deterministic_per_seed_and_happens_once() {
        let vals = ints(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let a = ParameterRange::shuffled(vals.clone(), 42);
        let b = ParameterRange::shuffled(vals.clone(), 42);
        assert_eq!(a.values(), b.values());

        // The order is fixed after construction: repeated iteration
        // sees the same permutation.
        let first: Vec<_> = a.iter().cloned().collect();
        let second: Vec<_> = a.iter().cloned().collect();
        assert_eq!(first, second);

        // Same multiset of candidates.
        let mut sorted: Vec<i64> = a
            .iter()
            .map(|v| match v {
                Value::Int(i) => *i,
                _ => unreachable!(),
            })
            .collect();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
