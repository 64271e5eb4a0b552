//! Lazy FPU switching contract tests
//!
//! Full context-switch scenarios over the per-core register cache. The
//! property that matters is isolation: one context's floating-point
//! state must never leak into another's.
