//! Calldash — tool runtime for a voice conversational agent.
//!
//! Tool descriptors come from a remote configuration store and are turned
//! into invocable tools at session start. The same runtime renders the
//! agent's system prompt and carries the provider settings the voice
//! pipeline needs.

pub mod agent;
pub mod config;
pub mod session;
pub mod store;
pub mod tools;
pub mod types;
