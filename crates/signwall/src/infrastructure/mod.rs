//! Infrastructure layer of the signage wall.
//!
//! Contains the adapters behind the application traits: display backends,
//! Tokio schedulers, monitor topology, configuration storage, and the
//! settings console.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `signwall_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.

pub mod console;
pub mod renderer;
pub mod scheduler;
pub mod storage;
pub mod topology;
