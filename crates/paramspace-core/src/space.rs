//! Combinatorial and stochastic expansion of trees containing range
//! and distribution axes.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::TreeError;
use crate::tree::ParameterTree;
use crate::value::Value;

/// Coordinate tuple of one point inside a parameter space, parallel to
/// the sorted range-key list.
pub type AxisIndex = SmallVec<[usize; 4]>;

/// A parameter tree viewed as a space of concrete configurations.
///
/// Every [`Value::Range`] leaf is one axis of a discrete combinatorial
/// space; every [`Value::Dist`] leaf (or list containing one) is one
/// axis of a stochastic space. The wrapper adds enumeration and
/// realization on top of the plain tree API, which stays available
/// through `Deref`.
///
/// # Axis ordering
///
/// Axes are always taken in lexicographically sorted key order, and
/// full cartesian iteration varies the **leftmost axis slowest** (the
/// last sorted key is the fastest-moving digit, odometer style).
/// [`axis_index`](Self::axis_index) uses the same convention, so the
/// i-th yielded point decomposes to the i-th coordinate tuple in
/// row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpace {
    tree: ParameterTree,
}

impl ParameterSpace {
    /// Wrap a tree as a space.
    ///
    /// Space-ness is a derived property of the contents; wrapping a
    /// tree without any axis is allowed and simply yields a single
    /// point on iteration.
    pub fn new(tree: ParameterTree) -> Self {
        Self { tree }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &ParameterTree {
        &self.tree
    }

    /// Unwrap into the underlying tree.
    pub fn into_tree(self) -> ParameterTree {
        self.tree
    }

    /// Recursive copy, re-derived as a space.
    pub fn deep_copy(&self) -> Self {
        Self::new(self.tree.deep_copy())
    }

    /// Dotted paths of every range leaf, sorted lexicographically for
    /// deterministic axis order.
    pub fn range_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tree
            .flat()
            .filter_map(|(path, v)| matches!(v, Value::Range(_)).then_some(path))
            .collect();
        keys.sort();
        keys
    }

    /// Dotted paths of every leaf that is a distribution, or a list
    /// containing at least one distribution, sorted lexicographically.
    pub fn dist_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tree
            .flat()
            .filter_map(|(path, v)| {
                let hit = match v {
                    Value::Dist(_) => true,
                    Value::List(items) => items.iter().any(|i| matches!(i, Value::Dist(_))),
                    _ => false,
                };
                hit.then_some(path)
            })
            .collect();
        keys.sort();
        keys
    }

    /// Sorted range axes with their candidate sequences.
    fn axes(&self) -> Vec<(String, Vec<Value>)> {
        let mut axes: Vec<(String, Vec<Value>)> = self
            .tree
            .flat()
            .filter_map(|(path, v)| match v {
                Value::Range(r) => Some((path, r.values().to_vec())),
                _ => None,
            })
            .collect();
        axes.sort_by(|a, b| a.0.cmp(&b.0));
        axes
    }

    /// Candidate counts for the sorted range-key list: the shape of
    /// the combinatorial space.
    pub fn axis_dimensions(&self) -> Vec<usize> {
        self.axes().iter().map(|(_, c)| c.len()).collect()
    }

    /// Candidate sequences keyed by sorted range key.
    pub fn range_values(&self) -> IndexMap<String, Vec<Value>> {
        self.axes().into_iter().collect()
    }

    /// Product of all axis dimensions: the number of points full
    /// cartesian iteration produces. A space with no range axis counts
    /// as a single point.
    pub fn total_combinations(&self) -> usize {
        self.axis_dimensions().iter().product()
    }

    /// Sweep a single range axis: yields one tree copy per candidate,
    /// in candidate order, with the range at `path` replaced by that
    /// candidate. Other axes are left in place.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the path is absent,
    /// [`TreeError::UnsupportedValueType`] if the leaf is not a range.
    pub fn iter_axis(&self, path: &str) -> Result<AxisSweep, TreeError> {
        let candidates = match self.tree.get(path)? {
            Value::Range(r) => r.values().to_vec(),
            other => {
                return Err(TreeError::UnsupportedValueType {
                    found: format!("expected a range at '{path}', got {}", other.kind()),
                })
            }
        };
        Ok(AxisSweep {
            base: self.tree.deep_copy(),
            path: path.to_owned(),
            candidates,
            next: 0,
        })
    }

    /// Full cartesian product across every range axis, yielding an
    /// independent deep copy per point (the *copy* policy: safe to
    /// retain, proportionally more memory).
    ///
    /// Each yielded tree has every range replaced by a concrete
    /// candidate, so it is a plain tree unless distributions remain.
    /// See the type-level docs for the ordering convention.
    pub fn iter_points(&self) -> Points {
        let axes = self.axes();
        let total = axes.iter().map(|(_, c)| c.len()).product();
        Points {
            base: self.tree.deep_copy(),
            axes,
            total,
            next: 0,
        }
    }

    /// Full cartesian product under the *reuse* policy: a single
    /// scratch tree is mutated in place and lent to `visit` for every
    /// point. Cheapest, but state from one visit is invalidated by the
    /// next; callers that retain points must use
    /// [`iter_points`](Self::iter_points) instead. The visiting order
    /// is identical to `iter_points`.
    pub fn visit_points<F>(&self, mut visit: F)
    where
        F: FnMut(&ParameterTree),
    {
        let axes = self.axes();
        let total: usize = axes.iter().map(|(_, c)| c.len()).product();
        let mut scratch = self.tree.deep_copy();
        for point in 0..total {
            write_point(&mut scratch, &axes, point);
            visit(&scratch);
        }
    }

    /// Coordinate tuple of a concrete tree believed to be one point of
    /// this space.
    ///
    /// For each sorted range key, the coordinate is the position of the
    /// point's value within this space's original candidate sequence.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the point lacks an axis path,
    /// [`TreeError::PointNotInSpace`] if a value is absent from the
    /// corresponding candidate sequence.
    pub fn axis_index(&self, point: &ParameterTree) -> Result<AxisIndex, TreeError> {
        let mut index = AxisIndex::new();
        for (path, candidates) in self.axes() {
            let value = point.get(&path)?;
            let pos = candidates
                .iter()
                .position(|c| c == value)
                .ok_or(TreeError::PointNotInSpace { path })?;
            index.push(pos);
        }
        Ok(index)
    }

    /// Realize every distribution axis `n` times, yielding `n` concrete
    /// trees under the *copy* policy.
    ///
    /// All samples are drawn upfront (advancing the RNG owned by each
    /// distribution in this space), so the i-th yielded tree carries the
    /// i-th draw of every axis: draws stay correlated per yield across
    /// axes. Inside list axes, non-distribution elements are replicated
    /// unchanged.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] only if the tree is mutated between
    /// key collection and drawing, which single-threaded callers cannot
    /// observe.
    pub fn realize(&mut self, n: usize) -> Result<Realizations, TreeError> {
        let draws = self.draw_axes(n)?;
        Ok(Realizations {
            base: self.tree.deep_copy(),
            draws,
            count: n,
            next: 0,
        })
    }

    /// Realization under the *reuse* policy: one scratch tree, lent to
    /// `visit` for each of the `n` draws. Same upfront-draw contract as
    /// [`realize`](Self::realize).
    pub fn visit_realizations<F>(&mut self, n: usize, mut visit: F) -> Result<(), TreeError>
    where
        F: FnMut(&ParameterTree),
    {
        let draws = self.draw_axes(n)?;
        let mut scratch = self.tree.deep_copy();
        for i in 0..n {
            for (path, column) in &draws {
                put(&mut scratch, path, column[i].clone());
            }
            visit(&scratch);
        }
        Ok(())
    }

    /// Draw `n` samples for every distribution axis. Returns, per
    /// sorted dist key, the column of `n` substitute values.
    fn draw_axes(&mut self, n: usize) -> Result<Vec<(String, Vec<Value>)>, TreeError> {
        let mut draws = Vec::new();
        for key in self.dist_keys() {
            let column = match self.tree.get_mut(&key)? {
                Value::Dist(d) => d.next(n).into_iter().map(Value::Real).collect(),
                Value::List(items) => {
                    let columns: Vec<Vec<Value>> = items
                        .iter_mut()
                        .map(|item| match item {
                            Value::Dist(d) => d.next(n).into_iter().map(Value::Real).collect(),
                            other => vec![other.clone(); n],
                        })
                        .collect();
                    (0..n)
                        .map(|i| Value::List(columns.iter().map(|col| col[i].clone()).collect()))
                        .collect()
                }
                // dist_keys() only reports the two shapes above.
                _ => continue,
            };
            draws.push((key, column));
        }
        Ok(draws)
    }
}

impl From<ParameterTree> for ParameterSpace {
    fn from(tree: ParameterTree) -> Self {
        Self::new(tree)
    }
}

impl std::ops::Deref for ParameterSpace {
    type Target = ParameterTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl std::ops::DerefMut for ParameterSpace {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tree
    }
}

/// Replace the value at `path`. The paths used here were collected from
/// the same tree's own leaf walk, so the slot always exists.
fn put(tree: &mut ParameterTree, path: &str, value: Value) {
    if let Ok(slot) = tree.get_mut(path) {
        *slot = value;
    }
}

/// Write the `point`-th coordinate combination into `scratch`,
/// decomposing row-major with the leftmost axis slowest.
fn write_point(scratch: &mut ParameterTree, axes: &[(String, Vec<Value>)], point: usize) {
    let mut remainder = point;
    for (path, candidates) in axes.iter().rev() {
        let coord = remainder % candidates.len();
        remainder /= candidates.len();
        put(scratch, path, candidates[coord].clone());
    }
}

/// Iterator over one swept axis, returned by
/// [`ParameterSpace::iter_axis`].
#[derive(Debug)]
pub struct AxisSweep {
    base: ParameterTree,
    path: String,
    candidates: Vec<Value>,
    next: usize,
}

impl Iterator for AxisSweep {
    type Item = ParameterTree;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.candidates.get(self.next)?.clone();
        self.next += 1;
        let mut tree = self.base.deep_copy();
        put(&mut tree, &self.path, candidate);
        Some(tree)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.candidates.len() - self.next;
        (left, Some(left))
    }
}

/// Iterator over the full cartesian product, returned by
/// [`ParameterSpace::iter_points`].
pub struct Points {
    base: ParameterTree,
    axes: Vec<(String, Vec<Value>)>,
    total: usize,
    next: usize,
}

impl Iterator for Points {
    type Item = ParameterTree;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let mut tree = self.base.deep_copy();
        write_point(&mut tree, &self.axes, self.next);
        self.next += 1;
        Some(tree)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

/// Iterator over distribution realizations, returned by
/// [`ParameterSpace::realize`]. All randomness was drawn before the
/// iterator was created.
pub struct Realizations {
    base: ParameterTree,
    draws: Vec<(String, Vec<Value>)>,
    count: usize,
    next: usize,
}

impl Iterator for Realizations {
    type Item = ParameterTree;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let mut tree = self.base.deep_copy();
        for (path, column) in &self.draws {
            put(&mut tree, path, column[self.next].clone());
        }
        self.next += 1;
        Some(tree)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}
