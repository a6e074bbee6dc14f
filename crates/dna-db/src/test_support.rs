//! Shared test utilities for dna-db unit tests.
