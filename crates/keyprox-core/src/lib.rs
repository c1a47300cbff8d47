// Re-export types from the protocol crate so they are accessible via keyprox_core::*
pub use keyprox_protocol::config;
pub use keyprox_protocol::correction;
pub use keyprox_protocol::geometry;

// Internal Modules
pub mod consts;
pub mod error;
pub mod keycodes;
pub mod layout;
pub mod proximity;

pub use self::error::{KpResult, ProximityError};
pub use self::proximity::{ProximityBuildParams, ProximityInfo};
