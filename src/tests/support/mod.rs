// Shared test support code for integration tests.
// This module provides common utilities that all test files can use.

pub mod common;
pub mod producer;

pub use common::*;
pub use producer::FakeProducer;
