use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use alloy_primitives::{Address, B256};
use anyhow::{anyhow, Context, Result};
use batch_client::{
    deployments::{mark_initialized, record_deployment, DeploymentRecord},
    logging, BatchClient, ChainGateway, SignerArgs,
};
use clap::Parser;
use regex::Regex;
use tracing::{debug, info};

/// Deploy the batch executor with `cargo stylus deploy`, claim ownership with the deployer key and
/// record the address in a deployments JSON.
///
/// Still the canonical `cargo stylus deploy` workflow, with machine-readable output for the CLI.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the Stylus contract crate (where `cargo stylus deploy` should be run).
    #[arg(long, default_value = "src/batch-executor")]
    contract_dir: PathBuf,

    #[command(flatten)]
    signer: SignerArgs,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this contract.
    #[arg(long, default_value = "batch-executor")]
    contract_key: String,

    /// Optional network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Leave `initialize()` to someone else.
    #[arg(long)]
    skip_initialize: bool,

    /// Extra args to pass through to `cargo stylus deploy` (after `--`), eg `-- --estimate-gas`.
    #[arg(last = true)]
    passthrough: Vec<String>,
}

struct DeployOutput {
    address: Address,
    tx_hashes: Vec<B256>,
    raw: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_tracing();
    let cli = Cli::parse();

    let deployed = run_cargo_stylus_deploy(&cli)?;
    record_deployment(
        &cli.deployments_path,
        &DeploymentRecord {
            network: cli.network.clone(),
            contract_key: cli.contract_key.clone(),
            address: deployed.address,
            rpc_url: cli.signer.rpc_url.clone(),
            tx_hashes: deployed.tx_hashes,
            raw_output: Some(deployed.raw),
        },
    )?;
    info!(contract = %cli.contract_key, address = %deployed.address, "deployed");

    if cli.skip_initialize {
        return Ok(());
    }

    let gateway = cli.signer.connect().await?;
    let client = BatchClient::new(gateway, deployed.address);
    claim_ownership(&client, &cli.deployments_path, &cli.contract_key).await
}

/// Send `initialize()` so the signer owns the executor, then note it in the deployments file.
async fn claim_ownership<G: ChainGateway>(
    client: &BatchClient<G>,
    deployments_path: &Path,
    contract_key: &str,
) -> Result<()> {
    let receipt = client
        .initialize()
        .await
        .context("deployed, but initialize() failed")?;
    mark_initialized(
        deployments_path,
        contract_key,
        client.gateway().account(),
        receipt.transaction_hash,
    )
}

fn run_cargo_stylus_deploy(cli: &Cli) -> Result<DeployOutput> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(&cli.contract_dir);
    cmd.arg("stylus").arg("deploy");
    cmd.arg("-e").arg(&cli.signer.rpc_url);

    if let Some(ref pk_path) = cli.signer.private_key_path {
        cmd.arg("--private-key-path").arg(pk_path);
    } else if let Some(ref pk) = cli.signer.private_key {
        cmd.arg("--private-key").arg(pk);
    } else {
        return Err(anyhow!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ));
    }

    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.args(&cli.passthrough);
    debug!(dir = %cli.contract_dir.display(), "running cargo stylus deploy");

    let output = cmd
        .output()
        .context("failed to run `cargo stylus deploy`")?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    if !output.status.success() {
        return Err(anyhow!(
            "`cargo stylus deploy` failed (exit {}):\n{}",
            output.status,
            combined
        ));
    }

    let (address, tx_hashes) = parse_deploy_output(&combined)?;
    Ok(DeployOutput {
        address,
        tx_hashes,
        raw: combined,
    })
}

/// Pull the program address and confirmed tx hashes out of `cargo stylus deploy` output:
///
/// ```text
/// Deploying program to address 0x...
/// Confirmed tx 0x...
/// ```
fn parse_deploy_output(output: &str) -> Result<(Address, Vec<B256>)> {
    let re_address = Regex::new(r"Deploying program to address (0x[a-fA-F0-9]{40})")?;
    let re_tx = Regex::new(r"Confirmed tx (0x[a-fA-F0-9]{64})")?;

    let address = re_address
        .captures(output)
        .and_then(|c| c.get(1))
        .ok_or_else(|| anyhow!("could not parse deployed address from `cargo stylus deploy` output"))?
        .as_str()
        .parse::<Address>()?;

    let tx_hashes = re_tx
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().parse())
        .collect::<Result<Vec<B256>, _>>()?;

    Ok((address, tx_hashes))
}
