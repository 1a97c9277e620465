//! Regulation domain module: regulators and their exemption lists.

pub mod regulator;

pub use regulator::{ExemptionListKind, Regulator};
