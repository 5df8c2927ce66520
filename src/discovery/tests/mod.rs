//! Unit tests for the discovery module.

mod routing_tests;
