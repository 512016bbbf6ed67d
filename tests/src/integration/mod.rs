//! Cross-crate integration tests.

mod end_to_end;
mod lifecycle;
mod mining;
mod tamper;
