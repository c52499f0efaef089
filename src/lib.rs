//! collide-o-scope: broad-phase collision detection for 2D particle
//! simulations.
//!
//! The reusable core lives in [`core`]: a uniform grid spatial index
//! ([`core::spatial`]) and a Morton / Z-order codec ([`core::morton`]).
//! [`engine`] composes them into a per-frame broad phase and defines the
//! narrow-phase seam; [`sim`] is the frame-loop driver that feeds a TUI
//! through a channel; [`interface`] is the TUI itself.

pub mod core;
pub mod engine;
pub mod interface;
pub mod sim;
