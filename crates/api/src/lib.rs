//! HTTP API: server, routing, and request/response mapping for ledger invocations.

pub mod app;
