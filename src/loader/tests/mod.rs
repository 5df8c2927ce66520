//! Unit tests for the dependency loader.
