use alloc::vec::Vec;

use batch_executor_types::{BatchRequest, CallOutcome, ExecutionHost};
use stylus_sdk::alloy_primitives::{Address, U256};

use crate::errors::BatchError;

/// Result of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<CallOutcome>,
    /// Attached value the sub-calls did not spend, returned to the caller.
    pub refund: U256,
}

/// Execute a batch on behalf of `caller`, who attached `attached` wei to this call.
///
/// Any `Err` must make the host revert the whole transaction; the core itself never undoes
/// effects of earlier sub-calls.
///
/// The balance bookkeeping assumes a single executor frame. Re-entry is rejected before it gets
/// here: without the SDK's `reentrant` feature the generated entrypoint reverts any frame that
/// re-enters the contract.
pub fn execute_batch<H: ExecutionHost>(
    host: &mut H,
    caller: Address,
    attached: U256,
    request: BatchRequest,
) -> Result<BatchReport, BatchError> {
    let calls = request.into_calls()?;

    // Balance the executor held before this call's value arrived.
    let initial_balance = host.self_balance().saturating_sub(attached);

    let mut outcomes = Vec::with_capacity(calls.len());
    for (index, call) in calls.iter().enumerate() {
        match host.call(call.target, call.value, &call.data) {
            Ok(return_data) => outcomes.push(CallOutcome::success(return_data)),
            Err(reason) => return Err(BatchError::SubcallFailed { index, reason }),
        }
    }

    let final_balance = host.self_balance();
    if final_balance < initial_balance {
        return Err(BatchError::InsufficientFunds {
            expected: initial_balance,
            actual: final_balance,
        });
    }

    for (call, outcome) in calls.iter().zip(&outcomes) {
        host.emit_operation_executed(call.target, outcome.succeeded, &outcome.return_data);
    }

    let refund = final_balance - initial_balance;
    if !refund.is_zero() {
        host.transfer(caller, refund)
            .map_err(|_| BatchError::RefundTransferFailed {
                recipient: caller,
                amount: refund,
            })?;
    }

    Ok(BatchReport { outcomes, refund })
}

/// Send the executor's whole balance to `recipient`.
///
/// Authorisation is checked by the caller of this function.
pub fn withdraw<H: ExecutionHost>(host: &mut H, recipient: Address) -> Result<U256, BatchError> {
    let amount = host.self_balance();
    if amount.is_zero() {
        return Err(BatchError::NothingToWithdraw);
    }
    host.transfer(recipient, amount)
        .map_err(|_| BatchError::WithdrawTransferFailed { recipient, amount })?;
    Ok(amount)
}
