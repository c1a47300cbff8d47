pub mod config;
pub mod correction;
pub mod geometry;
