//! # Batch Client
//!
//! Off-chain companion of the Stylus batch executor: collects operations into a
//! [`BatchSession`], makes sure the executor holds the token allowances the batch spends, and
//! submits everything as one `executeBatch` transaction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alloy_primitives::{Address, U256};
//! use batch_client::{BatchClient, BatchSession, SignerGateway};
//!
//! # async fn example(executor: Address, token: Address, me: Address) -> anyhow::Result<()> {
//! let gateway = SignerGateway::connect("http://localhost:8547", "0x...").await?;
//! let client = BatchClient::new(gateway, executor);
//!
//! let mut session = BatchSession::new();
//! session.add_native_transfer(Address::repeat_byte(0xa1), U256::from(10u64));
//! session.add_token_transfer(token, me, Address::repeat_byte(0xb0), U256::from(500u64));
//!
//! let receipt = client.execute(&mut session).await?;
//! assert!(session.is_empty());
//! println!("batch mined in {:?}", receipt.block_number);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! Every [`ClientError`] leaves the session exactly as it was. Approvals that were already mined
//! before a later step failed stay on-chain; the next attempt sees the raised allowance and skips
//! them.

pub mod client;
pub mod config;
pub mod deployments;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod operation_arg;
pub mod session;

pub use client::BatchClient;
pub use config::{ClientConfig, SignerArgs};
pub use error::{ClientError, GatewayError};
pub use gateway::{BatchReceipt, ChainGateway, EthersGateway, SignerGateway};
pub use operation_arg::OperationArg;
pub use session::{ApprovalRequirement, BatchSession};
