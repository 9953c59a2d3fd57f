

/// Read port latency pipeline tests.
pub mod load;
