// crates/feedlens-config/src/lib.rs
// ============================================================================
// Module: Feedlens Config Library
// Description: Canonical config model and validation for the analytics client.
// Purpose: Single source of truth for feedlens.toml semantics.
// Dependencies: feedlens-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `feedlens-config` defines the configuration model shared by the client and
//! the CLI: API location, credentials, limits, route overrides, and fetch
//! event logging. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
