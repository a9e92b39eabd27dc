//! Tests for account repositories

mod memory_tests;
