//! Property-based tests for filtering and the CSV codec.
