//! Wandering fish for a penguin training scene.
//!
//! Each fish picks a random point in an annular band around its container,
//! turns to face it and swims there at a jittered speed, once per fixed tick.

pub mod engine;
