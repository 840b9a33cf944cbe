use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use batch_executor_types::{
    interfaces::{IBatchExecutor, IERC20},
    total_value, BatchRequest, Call,
};

use crate::error::ClientError;

/// Allowance the executor needs on `token` for one pending operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApprovalRequirement {
    pub token: Address,
    pub amount: U256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingCall {
    call: Call,
    approval: Option<ApprovalRequirement>,
}

/// Pending operations of one logical session, in insertion (= execution) order.
///
/// Entries are unique by `(target, value, payload)`. The required approvals are derived from the
/// entries still present, so removing an operation also drops what it required. Adding through a
/// typed helper a call that is already pending as a raw operation keeps one entry but attaches the
/// helper's allowance requirement to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSession {
    pending: Vec<PendingCall>,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw call. Returns `false` if the identical triple is already pending.
    pub fn add_operation(&mut self, target: Address, value: U256, payload: Vec<u8>) -> bool {
        self.push(Call::new(target, value, payload), None)
    }

    /// Remove a pending call. Returns `false` if it was not pending.
    pub fn remove_operation(&mut self, target: Address, value: U256, payload: &[u8]) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| {
            !(p.call.target == target && p.call.value == value && p.call.data == payload)
        });
        self.pending.len() != before
    }

    pub fn clear_operations(&mut self) {
        self.pending.clear();
    }

    pub fn list_operations(&self) -> Vec<Call> {
        self.pending.iter().map(|p| p.call.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Arbitrary contract call; needs no token allowance.
    pub fn add_contract_call(&mut self, target: Address, value: U256, calldata: Vec<u8>) -> bool {
        self.push(Call::new(target, value, calldata), None)
    }

    /// Send `amount` of the native asset to `to`.
    pub fn add_native_transfer(&mut self, to: Address, amount: U256) -> bool {
        self.push(Call::new(to, amount, Vec::new()), None)
    }

    /// Move `amount` of `token` from `from` to `to`; the executor spends `from`'s allowance.
    ///
    /// The session does not know the signer, so `amount` counts towards the required approval even
    /// when `from` is another account. The client only ever approves from the signer; a third
    /// party's allowance has to be in place already.
    pub fn add_token_transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> bool {
        let data = IERC20::transferFromCall { from, to, amount }.abi_encode();
        self.push(
            Call::new(token, U256::ZERO, data),
            Some(ApprovalRequirement { token, amount }),
        )
    }

    /// Have the executor approve `spender` for `amount` of `token`.
    ///
    /// Whatever the executor lets `spender` move is backed by the signer's allowance to the
    /// executor, so the amount also counts towards the required approval.
    pub fn add_token_approval(&mut self, token: Address, spender: Address, amount: U256) -> bool {
        let data = IERC20::approveCall { spender, amount }.abi_encode();
        self.push(
            Call::new(token, U256::ZERO, data),
            Some(ApprovalRequirement { token, amount }),
        )
    }

    /// Accumulated allowance the executor needs per token.
    pub fn required_approvals(&self) -> Result<BTreeMap<Address, U256>, ClientError> {
        let mut required: BTreeMap<Address, U256> = BTreeMap::new();
        for requirement in self.pending.iter().filter_map(|p| p.approval) {
            let entry = required.entry(requirement.token).or_default();
            *entry = entry
                .checked_add(requirement.amount)
                .ok_or(ClientError::ApprovalOverflow {
                    token: requirement.token,
                })?;
        }
        Ok(required)
    }

    /// Native value to attach to the batch call.
    pub fn total_value(&self) -> Result<U256, ClientError> {
        total_value(self.pending.iter().map(|p| &p.call)).ok_or(ClientError::ValueOverflow)
    }

    pub fn to_request(&self) -> BatchRequest {
        BatchRequest::from_calls(self.pending.iter().map(|p| &p.call))
    }

    /// ABI-encoded `executeBatch(targets, payloads, amounts)` for the pending calls.
    pub fn execute_batch_calldata(&self) -> Vec<u8> {
        let request = self.to_request();
        IBatchExecutor::executeBatchCall {
            targets: request.targets,
            payloads: request.payloads.into_iter().map(Bytes::from).collect(),
            amounts: request.amounts,
        }
        .abi_encode()
    }

    fn push(&mut self, call: Call, approval: Option<ApprovalRequirement>) -> bool {
        if let Some(existing) = self.pending.iter_mut().find(|p| p.call == call) {
            if existing.approval.is_none() {
                existing.approval = approval;
            }
            return false;
        }
        self.pending.push(PendingCall { call, approval });
        true
    }
}
