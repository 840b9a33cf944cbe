//! Stylus batch executor.
//!
//! Executes an ordered list of `(target, payload, value)` sub-calls as one atomic unit: the first
//! failing sub-call reverts the whole batch, value not spent by the sub-calls is refunded to the
//! caller, and funds the executor held before the batch can never be spent by it.

#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

#[macro_use]
extern crate alloc;

pub mod batch_executor;
pub mod errors;
pub mod executor;
pub mod host;

pub use batch_executor::BatchExecutor;
