//! Tests for verification service

#[cfg(test)]
mod service_tests;
#[cfg(test)]
mod limiter_tests;
