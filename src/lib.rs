//! # Description
//!
//! Workbench Kit is the client-side acquisition core of a local model
//! workbench: it lets an application browse a catalog of downloadable
//! model variants, probe whether each variant is obtainable and fits the
//! local resource budget, trigger downloads, and watch progress arrive on
//! a live side channel.
//!
//! # Features
//!
//! - 📦 One [`Orchestrator`] owning all session state behind a single gate.
//! - 🔎 Exploration with capacity-fit verdicts, memoized per (model, variant).
//! - 🧲 Request coalescing: rapid repeated clicks share one in-flight call.
//! - 📡 Push-channel ingestion into a bounded, newest-first event log.
//! - 🔌 Bring your own transport through the [`HubClient`] trait, or use
//!   the built-in HTTP client.
//!
//! The crate performs no transfer, retry or persistence of its own; those
//! belong to the hub services behind [`HubClient`].

pub mod clients;
pub mod errors;
pub mod event_log;
pub mod inspections;
pub mod orchestrator;
pub mod protocol;
pub mod selection;
pub mod utils;

pub use clients::*;
pub use errors::{Error, Result};
pub use orchestrator::Orchestrator;
pub use protocol::*;
