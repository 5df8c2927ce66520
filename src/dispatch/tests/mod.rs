//! Unit tests for request dispatch.

mod dispatcher_tests;
