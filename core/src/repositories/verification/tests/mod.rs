//! Tests for verification record stores
