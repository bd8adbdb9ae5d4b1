//! Council agents: roles and identities
//!
//! An agent here is only an identity. How it reaches a judgment lives behind
//! the `Agent` contract in the application layer.

pub mod role;
pub mod roster;

pub use role::AgentRole;
pub use roster::{AgentProfile, Roster};
