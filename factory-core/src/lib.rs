//! Factory Core
//!
//! Core types and pure computations for the Factory pipeline dashboard.
//!
//! This crate contains:
//! - Domain types: pipeline transactions, lines, modules, relationships
//! - Guardrail aggregation: per-category and overall severity verdicts
//! - Dependency graph: construction, layout, hit-testing, rendering, inspection
//! - KPIs derived from a snapshot of pipeline runs
//! - DTOs: write requests sent back to the universal tables
//!
//! Nothing in here performs I/O; the dashboard crate feeds it snapshots.

pub mod domain;
pub mod dto;
pub mod graph;
pub mod guardrail;
pub mod kpis;
pub mod lenient;
