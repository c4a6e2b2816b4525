//! Text ingestion and persistence for parameter trees.
//!
//! Defines a JSON-like dialect for writing parameter trees by hand:
//! braced `key: value` pairs, list and string literals, `#` comments,
//! plus constructor calls for the richer leaf types (`ref(...)`,
//! `range(...)`, `param(...)`, `normal(...)`, `uniform(...)`,
//! `gamma(...)`) and infix arithmetic that constant-folds between plain
//! values and defers around references.
//!
//! ```
//! use paramspace_text::{parse_str, to_text};
//!
//! let mut t = parse_str(r#"{
//!     "tau_m": 15.0,           # ms
//!     "weights": {
//!         "exc": 0.1,
//!         "inh": (ref("weights.exc") * -4),
//!     },
//! }"#).unwrap();
//!
//! t.resolve_references().unwrap();
//! assert_eq!(t.get("weights.inh").unwrap().as_f64(), Some(-0.4));
//!
//! // Serialization parses back into an equal tree.
//! let round_tripped = parse_str(&to_text(&t)).unwrap();
//! assert_eq!(round_tripped, t);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod io;
mod lexer;
mod parser;
mod writer;

pub use error::TextError;
pub use io::{load_path, save_path};
pub use lexer::{line_col, tokenize, Spanned, Token};
pub use parser::parse_str;
pub use writer::to_text;
