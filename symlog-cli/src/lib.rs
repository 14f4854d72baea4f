//! symlog console internals.
//!
//! The functionality lives in a library crate so integration tests can
//! drive the session loop with scripted transports instead of real
//! hardware. The `symlog` binary is a thin wrapper over these modules.

pub mod console;
pub mod device;
pub mod discovery;
pub mod render;
pub mod transport;
