//! In-memory chain for off-chain testing of the execution core.
//!
//! Models the EVM behaviour the executor relies on: value moves with calls, a failing call frame
//! undoes its own effects, and a failing top-level transaction undoes everything, logs included.
//! Like a contract built without the SDK's `reentrant` feature, the executor reverts with empty
//! data whenever a frame re-enters it.

use std::collections::BTreeMap;

use alloy_sol_types::{sol, SolCall, SolValue};
use batch_executor_types::{
    interfaces::{IBatchExecutor, IERC20},
    BatchRequest, ExecutionHost,
};
use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    errors::BatchError,
    executor::{execute_batch, withdraw, BatchReport},
};

sol! {
    interface IStorageSetter {
        function setValue(uint256 value) external payable;
        function value() external view returns (uint256 current);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockContract {
    /// Stores a value; `setValue` requires exactly `fee` attached.
    Setter { value: U256, fee: U256 },
    Token {
        balances: BTreeMap<Address, U256>,
        /// (owner, spender) -> remaining allowance.
        allowances: BTreeMap<(Address, Address), U256>,
    },
    /// Reverts every call, value transfers included.
    Reverter { reason: Vec<u8> },
    /// Calls back into the executor with `executeBatch`.
    Reentrant,
}

/// (target, success, data) of every `OperationExecuted` log.
pub type OperationLog = (Address, bool, Vec<u8>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockChain {
    pub executor: Address,
    pub balances: BTreeMap<Address, U256>,
    pub contracts: BTreeMap<Address, MockContract>,
    pub logs: Vec<OperationLog>,
    /// An executor frame is on the call stack.
    executor_active: bool,
}

impl MockChain {
    pub fn new(executor: Address) -> Self {
        Self {
            executor,
            balances: BTreeMap::new(),
            contracts: BTreeMap::new(),
            logs: Vec::new(),
            executor_active: false,
        }
    }

    pub fn fund(&mut self, account: Address, amount: U256) {
        let balance = self.balance_of(account);
        self.balances.insert(account, balance + amount);
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn deploy(&mut self, address: Address, contract: MockContract) {
        self.contracts.insert(address, contract);
    }

    pub fn stored_value(&self, setter: Address) -> Option<U256> {
        match self.contracts.get(&setter) {
            Some(MockContract::Setter { value, .. }) => Some(*value),
            _ => None,
        }
    }

    pub fn token_balance(&self, token: Address, account: Address) -> U256 {
        match self.contracts.get(&token) {
            Some(MockContract::Token { balances, .. }) => {
                balances.get(&account).copied().unwrap_or_default()
            }
            _ => U256::ZERO,
        }
    }

    /// Top-level `executeBatch` transaction sent by `caller` with `value` attached.
    pub fn submit_batch(
        &mut self,
        caller: Address,
        value: U256,
        request: BatchRequest,
    ) -> Result<BatchReport, BatchError> {
        let snapshot = self.clone();
        let executor = self.executor;
        self.move_value(caller, executor, value)
            .expect("caller cannot cover the attached value");

        let result = self.enter(|chain| execute_batch(chain, caller, value, request));
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// Top-level `withdraw` transaction (authorisation is the entry point's job).
    pub fn submit_withdraw(&mut self, caller: Address) -> Result<U256, BatchError> {
        let snapshot = self.clone();
        let result = self.enter(|chain| withdraw(chain, caller));
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn enter<T>(&mut self, run: impl FnOnce(&mut Self) -> T) -> T {
        self.executor_active = true;
        let result = run(self);
        self.executor_active = false;
        result
    }

    fn move_value(&mut self, from: Address, to: Address, value: U256) -> Result<(), Vec<u8>> {
        if value.is_zero() {
            return Ok(());
        }
        let from_balance = self.balance_of(from);
        if from_balance < value {
            return Err(Vec::new());
        }
        self.balances.insert(from, from_balance - value);
        self.fund(to, value);
        Ok(())
    }

    /// One call frame from `sender`: moves value, runs the target, undoes both on failure.
    fn frame(
        &mut self,
        sender: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        let snapshot = self.clone();
        let result = self
            .move_value(sender, target, value)
            .and_then(|_| self.dispatch(sender, target, value, data));
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn dispatch(
        &mut self,
        sender: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        if target == self.executor && self.executor_active {
            // Entrypoint rejects the re-entrant frame before any method runs.
            return Err(Vec::new());
        }
        let Some(contract) = self.contracts.get(&target).cloned() else {
            // Externally owned account: accepts anything.
            return Ok(Vec::new());
        };

        match contract {
            MockContract::Setter { fee, .. } => {
                if let Ok(call) = IStorageSetter::setValueCall::abi_decode(data, true) {
                    if value != fee {
                        return Err(b"wrong fee".to_vec());
                    }
                    self.contracts.insert(
                        target,
                        MockContract::Setter {
                            value: call.value,
                            fee,
                        },
                    );
                    return Ok(Vec::new());
                }
                if IStorageSetter::valueCall::abi_decode(data, true).is_ok() {
                    let current = self.stored_value(target).unwrap_or_default();
                    return Ok(current.abi_encode());
                }
                Err(Vec::new())
            }
            MockContract::Token {
                mut balances,
                mut allowances,
            } => {
                if !value.is_zero() {
                    return Err(b"non-payable".to_vec());
                }
                if let Ok(call) = IERC20::transferFromCall::abi_decode(data, true) {
                    let allowed = allowances
                        .get(&(call.from, sender))
                        .copied()
                        .unwrap_or_default();
                    if allowed < call.amount {
                        return Err(b"insufficient allowance".to_vec());
                    }
                    allowances.insert((call.from, sender), allowed - call.amount);
                    debit_credit(&mut balances, call.from, call.to, call.amount)?;
                } else if let Ok(call) = IERC20::transferCall::abi_decode(data, true) {
                    debit_credit(&mut balances, sender, call.to, call.amount)?;
                } else if let Ok(call) = IERC20::approveCall::abi_decode(data, true) {
                    allowances.insert((sender, call.spender), call.amount);
                } else {
                    return Err(Vec::new());
                }
                self.contracts.insert(
                    target,
                    MockContract::Token {
                        balances,
                        allowances,
                    },
                );
                Ok(true.abi_encode())
            }
            MockContract::Reverter { reason } => Err(reason),
            MockContract::Reentrant => {
                let executor = self.executor;
                let inner = IBatchExecutor::executeBatchCall {
                    targets: vec![],
                    payloads: vec![],
                    amounts: vec![],
                }
                .abi_encode();
                self.frame(target, executor, U256::ZERO, &inner)
            }
        }
    }
}

fn debit_credit(
    balances: &mut BTreeMap<Address, U256>,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), Vec<u8>> {
    let from_balance = balances.get(&from).copied().unwrap_or_default();
    if from_balance < amount {
        return Err(b"insufficient balance".to_vec());
    }
    balances.insert(from, from_balance - amount);
    let to_balance = balances.get(&to).copied().unwrap_or_default();
    balances.insert(to, to_balance + amount);
    Ok(())
}

impl ExecutionHost for MockChain {
    fn self_balance(&self) -> U256 {
        self.balance_of(self.executor)
    }

    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        let executor = self.executor;
        self.frame(executor, target, value, data)
    }

    fn transfer(&mut self, to: Address, value: U256) -> Result<(), Vec<u8>> {
        let executor = self.executor;
        self.frame(executor, to, value, &[]).map(|_| ())
    }

    fn emit_operation_executed(&mut self, target: Address, success: bool, data: &[u8]) {
        self.logs.push((target, success, data.to_vec()));
    }
}
