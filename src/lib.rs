//! Declarative reconciliation core for NuoDB DBaaS resources.
//!
//! An external orchestrator supplies desired state, current state, and plan
//! transitions; this crate translates them into REST operations against the
//! control plane and drives resources toward readiness.

pub mod client;
pub mod config;
pub mod driver;
pub mod list;
pub mod model;
pub mod plan;
pub mod resources;
pub mod schema;
