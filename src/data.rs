//! Tabular data: the in-memory [`view::DataView`] and loaders that fill it
//! from delimited text files.

pub mod loader;
pub mod view;
