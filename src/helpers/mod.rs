//! Helper functions shared by the formatter and the views

mod date;

pub use date::*;
