use alloc::vec::Vec;

use batch_executor_types::{interfaces::IBatchExecutor, ExecutionHost};
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    stylus_core::{self, calls::context::Call, Host},
};

/// Host backed by the contract's VM: value calls, balance lookups and event logs.
///
/// Every call and transfer goes through the VM, which persists and invalidates the storage cache
/// before control leaves the contract.
pub struct OnchainHost<'a> {
    vm: &'a dyn Host,
}

impl<'a> OnchainHost<'a> {
    pub fn new(vm: &'a dyn Host) -> Self {
        Self { vm }
    }
}

impl ExecutionHost for OnchainHost<'_> {
    fn self_balance(&self) -> U256 {
        self.vm.balance(self.vm.contract_address())
    }

    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        // Forwards all remaining gas; the sub-call's own revert data is returned on failure.
        self.vm
            .call(&Call::new().value(value), target, data)
            .map_err(Vec::from)
    }

    fn transfer(&mut self, to: Address, value: U256) -> Result<(), Vec<u8>> {
        self.vm.transfer_eth(to, value)
    }

    fn emit_operation_executed(&mut self, target: Address, success: bool, data: &[u8]) {
        stylus_core::log(
            self.vm,
            IBatchExecutor::OperationExecuted {
                target,
                success,
                data: data.to_vec().into(),
            },
        );
    }
}
