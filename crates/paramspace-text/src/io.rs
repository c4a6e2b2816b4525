//! Filesystem round-trip: load a tree from a parameter-text file and
//! save it back.

use std::fs;
use std::path::Path;

use paramspace_core::ParameterTree;

use crate::error::TextError;
use crate::parser::parse_str;
use crate::writer::to_text;

/// Load a parameter tree from a text file.
///
/// The loaded tree records the file path as its origin, so a later
/// [`save_path`] knows where it came from.
///
/// # Errors
///
/// [`TextError::Io`] when the file cannot be read, or any parse error
/// from [`parse_str`].
pub fn load_path(path: impl AsRef<Path>) -> Result<ParameterTree, TextError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| TextError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut tree = parse_str(&source)?;
    tree.set_origin(path.display().to_string());
    Ok(tree)
}

/// Save a parameter tree as a text file.
///
/// # Errors
///
/// [`TextError::Io`] when the file cannot be written.
pub fn save_path(tree: &ParameterTree, path: impl AsRef<Path>) -> Result<(), TextError> {
    let path = path.as_ref();
    fs::write(path, to_text(tree)).map_err(|e| TextError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
