use std::str::FromStr;

use alloy_primitives::{Address, U256};

use crate::session::BatchSession;

/// One `--op` argument of the CLI.
///
/// - `native:<to>:<wei>`
/// - `token:<token>:<from>:<to>:<amount>`
/// - `approve:<token>:<spender>:<amount>`
/// - `call:<target>:<0xdata>[:<wei>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationArg {
    Native {
        to: Address,
        amount: U256,
    },
    TokenTransfer {
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    },
    TokenApproval {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Call {
        target: Address,
        data: Vec<u8>,
        value: U256,
    },
}

impl OperationArg {
    /// Add to `session`; `false` if an identical operation was already pending.
    pub fn apply(&self, session: &mut BatchSession) -> bool {
        match self {
            Self::Native { to, amount } => session.add_native_transfer(*to, *amount),
            Self::TokenTransfer {
                token,
                from,
                to,
                amount,
            } => session.add_token_transfer(*token, *from, *to, *amount),
            Self::TokenApproval {
                token,
                spender,
                amount,
            } => session.add_token_approval(*token, *spender, *amount),
            Self::Call {
                target,
                data,
                value,
            } => session.add_contract_call(*target, *value, data.clone()),
        }
    }
}

impl FromStr for OperationArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["native", to, amount] => Ok(Self::Native {
                to: address(to)?,
                amount: amount_of(amount)?,
            }),
            ["token", token, from, to, amount] => Ok(Self::TokenTransfer {
                token: address(token)?,
                from: address(from)?,
                to: address(to)?,
                amount: amount_of(amount)?,
            }),
            ["approve", token, spender, amount] => Ok(Self::TokenApproval {
                token: address(token)?,
                spender: address(spender)?,
                amount: amount_of(amount)?,
            }),
            ["call", target, data] => Ok(Self::Call {
                target: address(target)?,
                data: calldata(data)?,
                value: U256::ZERO,
            }),
            ["call", target, data, value] => Ok(Self::Call {
                target: address(target)?,
                data: calldata(data)?,
                value: amount_of(value)?,
            }),
            _ => Err(format!(
                "unrecognised operation `{s}` (expected native:, token:, approve: or call:)"
            )),
        }
    }
}

fn address(s: &str) -> Result<Address, String> {
    s.parse().map_err(|e| format!("invalid address `{s}`: {e}"))
}

fn amount_of(s: &str) -> Result<U256, String> {
    U256::from_str(s).map_err(|e| format!("invalid amount `{s}`: {e}"))
}

fn calldata(s: &str) -> Result<Vec<u8>, String> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|e| format!("invalid calldata `{s}`: {e}"))
}
