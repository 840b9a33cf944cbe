use std::{fs, path::PathBuf};

use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::Args;

use crate::{deployments::read_deployment_address, gateway::SignerGateway};

/// RPC endpoint and signing key, shared by the CLI and the deployer.
#[derive(Args, Debug, Clone)]
pub struct SignerArgs {
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to a file containing the private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    pub private_key_path: Option<PathBuf>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    pub private_key: Option<String>,
}

impl SignerArgs {
    pub fn signing_key(&self) -> Result<String> {
        if let Some(path) = &self.private_key_path {
            let key = fs::read_to_string(path)
                .with_context(|| format!("failed reading key file {}", path.display()))?;
            return Ok(key.trim().to_string());
        }
        self.private_key.clone().ok_or_else(|| {
            anyhow!("missing signing key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)")
        })
    }

    pub async fn connect(&self) -> Result<SignerGateway> {
        let key = self.signing_key()?;
        SignerGateway::connect(&self.rpc_url, &key)
            .await
            .with_context(|| format!("failed connecting to {}", self.rpc_url))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClientConfig {
    #[command(flatten)]
    pub signer: SignerArgs,

    /// Executor address; read from the deployments file when omitted.
    #[arg(long, env = "EXECUTOR_ADDRESS")]
    pub executor: Option<Address>,

    #[arg(long, default_value = "deployments.devnet.json")]
    pub deployments_path: PathBuf,

    /// Key under `deployments` holding the executor.
    #[arg(long, default_value = "batch-executor")]
    pub contract_key: String,
}

impl ClientConfig {
    pub fn executor_address(&self) -> Result<Address> {
        match self.executor {
            Some(address) => Ok(address),
            None => read_deployment_address(&self.deployments_path, &self.contract_key)
                .context("no --executor given and no deployment recorded"),
        }
    }
}
