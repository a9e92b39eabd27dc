//! Verification service module for one-time code account activation
//!
//! This module provides the complete code workflow:
//! - Code generation
//! - Record persistence through `VerificationRecordStore`
//! - Per-channel delivery through the dispatcher
//! - Evaluation with single-use consumption and account activation
//! - A pluggable attempt policy

mod config;
mod evaluator;
mod generator;
mod limiter;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use evaluator::{normalize_code, Evaluation, VerificationEvaluator};
pub use generator::{CodeGenerator, FixedCodeGenerator, RandomCodeGenerator};
pub use limiter::{AttemptLimiter, InMemoryAttemptLimiter, NoAttemptLimit};
pub use service::VerificationService;
pub use types::{ConfirmVerificationResult, StartVerificationResult};
