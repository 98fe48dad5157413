//! Core math modules.

pub mod moments;
pub mod regression;
pub mod sequence;
