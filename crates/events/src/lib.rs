//! Domain events emitted by custody and inspection decisions.

pub mod event;

pub use event::Event;
