//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: clears the whole cache at the configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
