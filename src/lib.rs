//! Geometry Cometry: an Asteroids-style arena shooter.
//!
//! The library holds the whole simulation; the binary only reads keys,
//! paces frames and draws what [`compute::draw_commands`] hands it.

pub mod behavior;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod sound;
pub mod timers;
pub mod tuning;
