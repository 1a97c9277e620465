//! Parties domain module (suppliers, importers and retailers).
//!
//! The three custody roles share a base record and are stored as distinct
//! shapes, each under its own namespace. The role is read back from the `type`
//! discriminant of the stored document.

pub mod participant;

pub use participant::{Importer, Participant, ParticipantRole, Retailer, Supplier, UserBase};
