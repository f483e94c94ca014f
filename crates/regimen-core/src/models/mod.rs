//! Domain models for the regimen interpreter.

mod medication;
mod regimen;
mod schedule;
mod status;
mod timeline;

pub use medication::*;
pub use regimen::*;
pub use schedule::*;
pub use status::*;
pub use timeline::*;
