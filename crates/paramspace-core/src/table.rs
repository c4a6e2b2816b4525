//! Two-level table view over a parameter tree.

use crate::error::TreeError;
use crate::tree::ParameterTree;
use crate::value::Value;

/// A parameter tree constrained to a table shape: exactly two levels,
/// where every first-level sub-tree (row) carries the same second-level
/// keys (columns).
///
/// The full tree API stays available through `Deref`; the wrapper adds
/// row/column access and transposition. A table can also be built from
/// a whitespace-separated multi-line string:
///
/// ```
/// use paramspace_core::ParameterTable;
///
/// let t = ParameterTable::from_table_string(
///     "#     col1  col2
///      row1  1     2
///      row2  4     5",
/// )
/// .unwrap();
/// assert_eq!(t.column_labels(), vec!["col1", "col2"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterTable {
    tree: ParameterTree,
}

impl ParameterTable {
    /// Validate and wrap a tree as a table.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnsupportedValueType`] if a first-level value is
    /// not a sub-tree, a second-level value is a sub-tree, or the rows
    /// do not share identical column keys.
    pub fn from_tree(tree: ParameterTree) -> Result<Self, TreeError> {
        let mut columns: Option<Vec<String>> = None;
        for (row_label, value) in tree.iter() {
            let row = match value {
                Value::Tree(t) => t,
                other => {
                    return Err(TreeError::UnsupportedValueType {
                        found: format!("table row '{row_label}' is a {}, not a tree", other.kind()),
                    })
                }
            };
            for (col_label, cell) in row.iter() {
                if matches!(cell, Value::Tree(_)) {
                    return Err(TreeError::UnsupportedValueType {
                        found: format!(
                            "table cell '{row_label}.{col_label}' is a nested tree"
                        ),
                    });
                }
            }
            let mut labels: Vec<String> = row.keys().map(str::to_owned).collect();
            labels.sort();
            match &columns {
                None => columns = Some(labels),
                Some(expected) if *expected == labels => {}
                Some(_) => {
                    return Err(TreeError::UnsupportedValueType {
                        found: format!("table row '{row_label}' has mismatched column keys"),
                    })
                }
            }
        }
        Ok(Self { tree })
    }

    /// Build a table from a multi-line string.
    ///
    /// The first line holds column headers (its first token, typically
    /// `#`, is ignored); each following line is a row label followed by
    /// one real number per column.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnsupportedValueType`] for a cell that does not
    /// parse as a real number or a row with the wrong cell count, plus
    /// anything [`from_tree`](Self::from_tree) rejects.
    pub fn from_table_string(table: &str) -> Result<Self, TreeError> {
        let mut lines = table.trim().lines();
        let header: Vec<&str> = lines.next().unwrap_or("").split_whitespace().collect();
        let columns = header.get(1..).unwrap_or(&[]);

        let mut tree = ParameterTree::new();
        for line in lines {
            let mut cells = line.split_whitespace();
            let Some(row_label) = cells.next() else {
                continue;
            };
            let mut row = ParameterTree::new();
            for column in columns {
                let cell = cells.next().ok_or_else(|| TreeError::UnsupportedValueType {
                    found: format!("table row '{row_label}' is missing a '{column}' cell"),
                })?;
                let value: f64 = cell.parse().map_err(|_| TreeError::UnsupportedValueType {
                    found: format!("table cell '{row_label}.{column}' is not a number: '{cell}'"),
                })?;
                row.set(column, Value::Real(value))?;
            }
            tree.set(row_label, Value::Tree(row))?;
        }
        Self::from_tree(tree)
    }

    /// The underlying tree.
    pub fn tree(&self) -> &ParameterTree {
        &self.tree
    }

    /// Row labels, in insertion order.
    pub fn row_labels(&self) -> Vec<&str> {
        self.tree.keys().collect()
    }

    /// The requested row.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] for an unknown row label.
    pub fn row(&self, row_label: &str) -> Result<&ParameterTree, TreeError> {
        match self.tree.get(row_label)? {
            Value::Tree(t) => Ok(t),
            // from_tree guarantees rows are trees.
            _ => Err(TreeError::KeyNotFound {
                path: row_label.to_owned(),
            }),
        }
    }

    /// `(row label, row)` pairs, in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &ParameterTree)> {
        self.tree.iter().filter_map(|(label, v)| match v {
            Value::Tree(t) => Some((label, t)),
            _ => None,
        })
    }

    /// Column labels, taken from the first row.
    pub fn column_labels(&self) -> Vec<&str> {
        self.rows()
            .next()
            .map(|(_, row)| row.keys().collect())
            .unwrap_or_default()
    }

    /// The requested column, as a tree keyed by row label.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] for an unknown column label.
    pub fn column(&self, column_label: &str) -> Result<ParameterTree, TreeError> {
        let mut column = ParameterTree::new();
        for (row_label, row) in self.rows() {
            column.set(row_label, row.get(column_label)?.clone())?;
        }
        Ok(column)
    }

    /// `(column label, column)` pairs, in first-row key order.
    ///
    /// # Errors
    ///
    /// Propagates [`column`](Self::column) failures, which the table
    /// invariant rules out for labels reported by
    /// [`column_labels`](Self::column_labels).
    pub fn columns(&self) -> Result<Vec<(String, ParameterTree)>, TreeError> {
        self.column_labels()
            .into_iter()
            .map(str::to_owned)
            .map(|label| {
                let column = self.column(&label)?;
                Ok((label, column))
            })
            .collect()
    }

    /// A copy with rows and columns swapped.
    ///
    /// # Errors
    ///
    /// Propagates [`columns`](Self::columns) failures.
    pub fn transpose(&self) -> Result<ParameterTable, TreeError> {
        let mut tree = ParameterTree::new();
        for (column_label, column) in self.columns()? {
            tree.set(&column_label, Value::Tree(column))?;
        }
        Self::from_tree(tree)
    }

    /// Render the table as a string accepted by
    /// [`from_table_string`](Self::from_table_string).
    pub fn table_string(&self) -> String {
        let columns = self.column_labels();
        let mut lines = vec![format!("#\t{}", columns.join("\t"))];
        for (row_label, row) in self.rows() {
            let cells: Vec<String> = columns
                .iter()
                .map(|col| match row.get(col) {
                    Ok(Value::Real(x)) => format!("{x}"),
                    Ok(Value::Int(x)) => format!("{x}"),
                    _ => String::new(),
                })
                .collect();
            lines.push(format!("{row_label}\t{}", cells.join("\t")));
        }
        lines.join("\n")
    }
}

impl std::ops::Deref for ParameterTable {
    type Target = ParameterTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}
