//! Types shared by the batch executor contract and its off-chain client.
//!
//! Everything here is `no_std` so it can be linked into the Stylus WASM build.

#![no_std]

extern crate alloc;

pub mod call;
pub mod host;
pub mod interfaces;

pub use call::{total_value, BatchRequest, Call, CallOutcome, MalformedRequest};
pub use host::ExecutionHost;
