use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// Chain access needed by the batch execution core, implemented differently on-chain vs off-chain.
///
/// Revert data is returned as raw bytes so it can be forwarded untouched.
pub trait ExecutionHost {
    /// Native balance held by the executor itself.
    fn self_balance(&self) -> U256;

    /// Call `target` with `data`, attaching `value`.
    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>>;

    /// Plain value transfer with empty calldata.
    fn transfer(&mut self, to: Address, value: U256) -> Result<(), Vec<u8>>;

    fn emit_operation_executed(&mut self, target: Address, success: bool, data: &[u8]);
}
