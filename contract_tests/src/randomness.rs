//! Randomness contract tests
//!
//! These pin the firmware size contract, the rejection-sampling
//! uniformity of ranged draws, and the halt paths for the two fatal
//! taxonomies.
