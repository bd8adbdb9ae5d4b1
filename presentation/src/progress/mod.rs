//! Progress reporting while the council deliberates

pub mod reporter;
