//! Procedural noise primitives.
//!
//! Every function here is a pure function of its coordinate: no state, no caching, no entropy.
//! Identical inputs produce bit-identical outputs.

/// Fractal Brownian motion and domain warping.
pub mod fractal;
/// Sine-based lattice hashes.
pub mod hash;
/// Gradient noise on a tetrahedral lattice.
pub mod simplex;
/// Smoothly interpolated lattice noise.
pub mod value;
