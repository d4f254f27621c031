//! A binary space partition engine: cuts a rectangle into rectangular
//! sections under interactive edits, each edit atomically committed or
//! rolled back.
//!
//! The public surface is [`EditorState`] and its Edit API methods, plus
//! [`hit_test`] and [`export`] for the two read-side operations a caller
//! needs. [`bsp`] is exposed for tests and for callers who want the tree
//! directly rather than through the editor.

pub mod bsp;
pub mod cut;
mod error;
pub mod export;
pub mod editor;
pub mod hit_test;
pub mod section;

pub use bsp::PreferenceMode;
pub use cut::Cut;
pub use editor::{DragMode, Endpoint, EditorState, Tool};
pub use section::Section;
