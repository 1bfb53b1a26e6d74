//! Core domain types
//!
//! Read-only snapshots of the rows the Factory dashboard consumes. All of
//! these are owned and mutated upstream; this crate never writes them back.

pub mod fiscal;
pub mod filter;
pub mod guardrail;
pub mod module;
pub mod transaction;
