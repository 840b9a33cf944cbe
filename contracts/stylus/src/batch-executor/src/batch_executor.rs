//! Stylus entry points of the batch executor.
//!
//! The contract is a thin shell around [`crate::executor`]: it reads the call context, hands the
//! request to the execution core through an [`OnchainHost`], and ABI-encodes the result. Returning
//! `Err` from any `#[public]` method reverts the transaction, which is what makes a batch
//! all-or-nothing.

use alloc::vec::Vec;

use batch_executor_types::BatchRequest;
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, U256},
    prelude::*,
    ArbResult,
};

use crate::{
    errors::{AlreadyInitialized, DirectPaymentRejected, ExecutorError, Unauthorized},
    executor::{execute_batch, withdraw},
    host::onchain::OnchainHost,
};

sol_storage! {
    #[entrypoint]
    pub struct BatchExecutor {
        /// Only account allowed to `withdraw`; zero until `initialize`.
        address owner;
    }
}

#[public]
impl BatchExecutor {
    /// Claim ownership of a freshly deployed executor.
    pub fn initialize(&mut self) -> Result<(), ExecutorError> {
        let owner = self.owner.get();
        if owner != Address::ZERO {
            return Err(ExecutorError::AlreadyInitialized(AlreadyInitialized { owner }));
        }
        let caller = self.vm().msg_sender();
        self.owner.set(caller);
        Ok(())
    }

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    /// Execute `(targets[i], payloads[i], amounts[i])` in order as one atomic unit.
    ///
    /// Unspent attached value is refunded to the caller; per-call success flags and return data
    /// are returned in input order.
    #[payable]
    pub fn execute_batch(
        &mut self,
        targets: Vec<Address>,
        payloads: Vec<Bytes>,
        amounts: Vec<U256>,
    ) -> Result<(Vec<bool>, Vec<Bytes>), ExecutorError> {
        let caller = self.vm().msg_sender();
        let attached = self.vm().msg_value();

        let request = BatchRequest::new(
            targets,
            payloads.into_iter().map(|payload| payload.0).collect(),
            amounts,
        );

        let mut host = OnchainHost::new(self.vm());
        let report = execute_batch(&mut host, caller, attached, request)?;

        Ok(report
            .outcomes
            .into_iter()
            .map(|outcome| (outcome.succeeded, Bytes::from(outcome.return_data)))
            .unzip())
    }

    /// Send the executor's entire balance to the owner.
    pub fn withdraw(&mut self) -> Result<(), ExecutorError> {
        let caller = self.vm().msg_sender();
        if caller != self.owner.get() {
            return Err(ExecutorError::Unauthorized(Unauthorized { caller }));
        }

        let mut host = OnchainHost::new(self.vm());
        withdraw(&mut host, caller)?;
        Ok(())
    }

    /// Bare value transfers are never accepted.
    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        Err(self.direct_payment_rejected().into())
    }

    /// Calldata matching no selector is rejected, with or without value.
    #[fallback]
    #[payable]
    pub fn fallback(&mut self, _calldata: &[u8]) -> ArbResult {
        Err(self.direct_payment_rejected().into())
    }
}

impl BatchExecutor {
    fn direct_payment_rejected(&self) -> ExecutorError {
        ExecutorError::DirectPaymentRejected(DirectPaymentRejected {
            sender: self.vm().msg_sender(),
            value: self.vm().msg_value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{SolError, SolEvent};
    use batch_executor_types::interfaces::IBatchExecutor::OperationExecuted;
    use stylus_sdk::{stylus_core::AccountAccess, testing::*};

    use crate::errors::{NothingToWithdraw, SubcallFailed};

    const EXECUTOR: Address = Address::new([0xee; 20]);
    const CALLER: Address = Address::new([0xca; 20]);

    fn selector_of(revert: &[u8]) -> [u8; 4] {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&revert[..4]);
        selector
    }

    fn deployed() -> (TestVM, BatchExecutor) {
        let vm = TestVM::default();
        vm.set_contract_address(EXECUTOR);
        vm.set_sender(CALLER);
        let executor = BatchExecutor::from(&vm);
        (vm, executor)
    }

    fn committed<T>(result: Result<T, ExecutorError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                let revert: Vec<u8> = err.into();
                panic!("reverted with 0x{}", stylus_sdk::hex::encode(revert))
            }
        }
    }

    fn operation_logs(vm: &TestVM) -> Vec<OperationExecuted> {
        vm.get_emitted_logs()
            .into_iter()
            .map(|(topics, data)| OperationExecuted::decode_raw_log(topics, &data, true).unwrap())
            .collect()
    }

    #[test]
    fn test_execute_batch_returns_outcomes_and_logs_in_order() {
        let (vm, mut executor) = deployed();
        let first = Address::repeat_byte(0x01);
        let second = Address::repeat_byte(0x02);
        vm.mock_call(first, vec![0xaa], Ok(vec![0x11, 0x22]));
        vm.mock_call(second, vec![0xbb], Ok(vec![0x33]));

        let (successes, results) = committed(executor.execute_batch(
            vec![first, second],
            vec![Bytes::from(vec![0xaa]), Bytes::from(vec![0xbb])],
            vec![U256::ZERO, U256::ZERO],
        ));

        assert_eq!(successes, vec![true, true]);
        assert_eq!(results[0].0, vec![0x11, 0x22]);
        assert_eq!(results[1].0, vec![0x33]);

        let logs = operation_logs(&vm);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].target, first);
        assert!(logs[0].success);
        assert_eq!(logs[0].data.to_vec(), vec![0x11, 0x22]);
        assert_eq!(logs[1].target, second);
        assert_eq!(logs[1].data.to_vec(), vec![0x33]);
    }

    #[test]
    fn test_execute_batch_refunds_unspent_value() {
        let (vm, mut executor) = deployed();
        let target = Address::repeat_byte(0x01);
        // 300 held before the call plus 500 attached to it.
        vm.set_balance(EXECUTOR, U256::from(800u64));
        vm.set_value(U256::from(500u64));

        committed(executor.execute_batch(
            vec![target],
            vec![Bytes::from(Vec::<u8>::new())],
            vec![U256::ZERO],
        ));

        assert_eq!(vm.balance(CALLER), U256::from(500u64));
        assert_eq!(vm.balance(EXECUTOR), U256::from(300u64));
    }

    #[test]
    fn test_execute_batch_surfaces_subcall_revert() {
        let (vm, mut executor) = deployed();
        let fine = Address::repeat_byte(0x01);
        let failing = Address::repeat_byte(0x02);
        vm.mock_call(fine, vec![], Ok(vec![]));
        vm.mock_call(failing, vec![0x01], Err(b"nope".to_vec()));

        let Err(err) = executor.execute_batch(
            vec![fine, failing],
            vec![Bytes::from(Vec::<u8>::new()), Bytes::from(vec![0x01])],
            vec![U256::ZERO, U256::ZERO],
        ) else {
            panic!("batch with a reverting sub-call committed");
        };

        let revert: Vec<u8> = err.into();
        let expected = SubcallFailed {
            index: U256::from(1u64),
            reason: b"nope".to_vec().into(),
        };
        assert_eq!(revert, expected.abi_encode());
        assert!(vm.get_emitted_logs().is_empty());
    }

    #[test]
    fn test_execute_batch_rejects_mismatched_lengths() {
        let (_vm, mut executor) = deployed();

        let Err(err) = executor.execute_batch(
            vec![Address::repeat_byte(0x01)],
            vec![],
            vec![U256::ZERO],
        ) else {
            panic!("malformed batch committed");
        };

        let revert: Vec<u8> = err.into();
        assert_eq!(selector_of(&revert), crate::errors::MalformedRequest::SELECTOR);
    }

    #[test]
    fn test_owner_withdraw_drains_balance() {
        let (vm, mut executor) = deployed();
        assert!(executor.initialize().is_ok());

        let err: Vec<u8> = executor.withdraw().unwrap_err().into();
        assert_eq!(selector_of(&err), NothingToWithdraw::SELECTOR);

        vm.set_balance(EXECUTOR, U256::from(777u64));
        committed(executor.withdraw());

        assert_eq!(vm.balance(EXECUTOR), U256::ZERO);
        assert_eq!(vm.balance(CALLER), U256::from(777u64));
    }

    #[test]
    fn test_initialize_claims_ownership_once() {
        let vm = TestVM::default();
        let mut executor = BatchExecutor::from(&vm);
        let deployer = Address::repeat_byte(0x11);
        vm.set_sender(deployer);

        assert_eq!(executor.owner(), Address::ZERO);
        assert!(executor.initialize().is_ok());
        assert_eq!(executor.owner(), deployer);

        vm.set_sender(Address::repeat_byte(0x22));
        let err: Vec<u8> = executor.initialize().unwrap_err().into();
        assert_eq!(selector_of(&err), AlreadyInitialized::SELECTOR);
        assert_eq!(executor.owner(), deployer);
    }

    #[test]
    fn test_withdraw_requires_owner() {
        let vm = TestVM::default();
        let mut executor = BatchExecutor::from(&vm);
        vm.set_sender(Address::repeat_byte(0x11));
        assert!(executor.initialize().is_ok());

        vm.set_sender(Address::repeat_byte(0x33));
        let err: Vec<u8> = executor.withdraw().unwrap_err().into();
        assert_eq!(selector_of(&err), Unauthorized::SELECTOR);
    }

    #[test]
    fn test_bare_value_is_rejected() {
        let vm = TestVM::default();
        let mut executor = BatchExecutor::from(&vm);
        vm.set_value(U256::from(1_000u64));

        let err = executor.receive().unwrap_err();
        assert_eq!(selector_of(&err), DirectPaymentRejected::SELECTOR);

        let err = executor.fallback(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert_eq!(selector_of(&err), DirectPaymentRejected::SELECTOR);
    }
}
