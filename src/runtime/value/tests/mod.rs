//! Tests for core value types
