//! Memory layout contract tests
//!
//! These pin the memory-mode decode table and the slide rule, including
//! the exact boundary where the rule flips.
