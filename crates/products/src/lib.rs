//! Products domain module.
//!
//! A product is registered once and never updated; listings refer to products
//! by id only.

pub mod product;

pub use product::Product;
