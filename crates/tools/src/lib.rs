//! Capability contract, registry, and built-in capabilities.
//!
//! A capability is an invocable unit the dispatch pipeline can route a
//! classified intent to. Built-ins cover shell execution, file access,
//! and web fetch/search; plugin-origin capabilities ("skills") are
//! adapted to the same contract by `courier-skills`.

pub mod capability;
pub mod registry;
pub mod respond;
pub mod system;
pub mod web;

pub use {
    capability::{Capability, CapabilityResult, ExecutionContext, Params, require_params},
    registry::CapabilityRegistry,
};
