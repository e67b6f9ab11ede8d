//! Tree path algebra for schema and state trees.
//!
//! This module provides the tagged tree node ([`Value`], [`Map`]), the path type
//! used to address nodes ([`PathBuf`]), and the pure functions that read and
//! mutate nested trees by path.
//!
//! # Usage
//!
//! ```
//! use bigraph_schema::{Value, path};
//! use bigraph_schema::tree::{establish_path, get_path, set_path};
//!
//! let mut tree = Value::default();
//! set_path(&mut tree, path!("cell", "volume"), 1.5).unwrap();
//! assert_eq!(get_path(&tree, path!("cell", "volume")), Some(&Value::Float(1.5)));
//!
//! // `..` navigates to the parent relative to the traversal root
//! let cell = establish_path(&mut tree, path!("cell", "volume", "..")).unwrap();
//! assert!(cell.is_map());
//! ```

pub mod errors;
pub mod ops;
pub mod path;
pub mod value;

pub use errors::TreeError;
pub use ops::{
    establish_path, establish_path_from, get_path, get_path_mut, remove_omitted, remove_path,
    set_path, transform_path,
};
pub use path::PathBuf;
pub use value::{Map, Value};
