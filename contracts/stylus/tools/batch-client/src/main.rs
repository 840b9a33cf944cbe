use anyhow::{Context, Result};
use batch_client::{logging, BatchClient, BatchSession, ClientConfig, OperationArg};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

/// Build a batch from `--op` arguments and estimate, execute or withdraw through the executor.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate gas for the batch without sending anything.
    Estimate {
        /// native:<to>:<wei> | token:<token>:<from>:<to>:<amount> |
        /// approve:<token>:<spender>:<amount> | call:<target>:<0xdata>[:<wei>]
        #[arg(long = "op", required = true)]
        ops: Vec<OperationArg>,
    },
    /// Approve missing allowances, then submit the batch.
    Execute {
        #[arg(long = "op", required = true)]
        ops: Vec<OperationArg>,
    },
    /// Drain the executor's balance to the signer (owner only).
    Withdraw,
}

fn session_from(ops: &[OperationArg]) -> BatchSession {
    let mut session = BatchSession::new();
    for op in ops {
        if !op.apply(&mut session) {
            warn!(?op, "duplicate operation ignored");
        }
    }
    session
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_tracing();
    let cli = Cli::parse();

    let executor = cli.config.executor_address()?;
    let gateway = cli.config.signer.connect().await?;
    let client = BatchClient::new(gateway, executor);

    match cli.command {
        Command::Estimate { ops } => {
            let session = session_from(&ops);
            let gas = client
                .estimate_gas(&session)
                .await
                .context("gas estimation failed")?;
            println!("{gas}");
        }
        Command::Execute { ops } => {
            let mut session = session_from(&ops);
            let receipt = client
                .execute(&mut session)
                .await
                .context("batch execution failed")?;
            info!(tx_hash = %receipt.transaction_hash, "done");
            println!("{}", receipt.transaction_hash);
        }
        Command::Withdraw => {
            let receipt = client.withdraw().await.context("withdraw failed")?;
            println!("{}", receipt.transaction_hash);
        }
    }
    Ok(())
}
