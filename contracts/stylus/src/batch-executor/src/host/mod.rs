//! `ExecutionHost` implementations.

#[cfg(test)]
pub mod mock;
pub mod onchain;
