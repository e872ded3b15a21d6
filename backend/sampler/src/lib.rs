//! Weighted discrete random selection.
//!
//! `WeightedSampler` answers repeated weighted draws in O(1) after O(n)
//! preprocessing; `WeightedTable` pairs it with the items being chosen.

pub mod alias;
pub mod table;

pub use alias::{SamplerError, WeightedSampler};
pub use table::WeightedTable;
