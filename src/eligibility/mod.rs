//! Eligibility subsystem: who can claim, and how much.

pub mod engine;

pub use engine::{count_unclaimed, EligibilityEngine};
