//! Common types and constants used throughout the harness.
//!
//! This module provides the building blocks shared by the memory model, the trace
//! emitters, and the session driver. It includes:
//! 1. **Constants:** Word sizes, log markers, and `vtype` field layout.
//! 2. **Port Transactions:** Read/write requests, read responses, and byte masks.
//! 3. **Error Handling:** The harness error type and `Result` alias.

/// Common constants used throughout the harness.
pub mod constants;

/// Memory port request/response types.
pub mod data;

/// Error type and result alias.
pub mod error;

pub use data::{ByteMask, DataRequest, ReadRequest, ReadResponse, WriteRequest};
pub use error::{HarnessError, Result};
