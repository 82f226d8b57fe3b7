//! Loading and saving the encrypted index file.

pub mod persistence;

pub use persistence::{load_index, parse_index, save_index, serialize_index};
