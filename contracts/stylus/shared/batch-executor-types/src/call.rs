use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// A single sub-call of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Call {
    pub target: Address,
    /// Native value attached to the call.
    pub value: U256,
    /// ABI-encoded calldata; opaque to the executor.
    pub data: Vec<u8>,
}

impl Call {
    pub fn new(target: Address, value: U256, data: Vec<u8>) -> Self {
        Self {
            target,
            value,
            data,
        }
    }
}

/// Result of one sub-call, in the same position as its input triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutcome {
    pub succeeded: bool,
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    pub fn success(return_data: Vec<u8>) -> Self {
        Self {
            succeeded: true,
            return_data,
        }
    }
}

/// The three parallel sequences had different lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalformedRequest {
    pub targets: usize,
    pub payloads: usize,
    pub amounts: usize,
}

/// Wire-level batch input: `executeBatch(address[], bytes[], uint256[])`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchRequest {
    pub targets: Vec<Address>,
    pub payloads: Vec<Vec<u8>>,
    pub amounts: Vec<U256>,
}

impl BatchRequest {
    pub fn new(targets: Vec<Address>, payloads: Vec<Vec<u8>>, amounts: Vec<U256>) -> Self {
        Self {
            targets,
            payloads,
            amounts,
        }
    }

    /// Split an ordered list of calls into the three parallel sequences.
    pub fn from_calls<'a, I>(calls: I) -> Self
    where
        I: IntoIterator<Item = &'a Call>,
    {
        let mut request = Self::default();
        for call in calls {
            request.targets.push(call.target);
            request.payloads.push(call.data.clone());
            request.amounts.push(call.value);
        }
        request
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Zip the sequences into calls, preserving order.
    pub fn into_calls(self) -> Result<Vec<Call>, MalformedRequest> {
        if self.targets.len() != self.payloads.len() || self.targets.len() != self.amounts.len() {
            return Err(MalformedRequest {
                targets: self.targets.len(),
                payloads: self.payloads.len(),
                amounts: self.amounts.len(),
            });
        }
        Ok(self
            .targets
            .into_iter()
            .zip(self.payloads)
            .zip(self.amounts)
            .map(|((target, data), value)| Call {
                target,
                value,
                data,
            })
            .collect())
    }
}

/// Sum of attached values; `None` on overflow.
pub fn total_value<'a, I>(calls: I) -> Option<U256>
where
    I: IntoIterator<Item = &'a Call>,
{
    calls
        .into_iter()
        .try_fold(U256::ZERO, |acc, call| acc.checked_add(call.value))
}
