//! Unit tests for the storage engine.
