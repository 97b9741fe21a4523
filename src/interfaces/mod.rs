//! Outer surfaces: JSON scenario input and report output for the command line.

pub mod json;
