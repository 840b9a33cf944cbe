//! Deployments file shared by the deployer and the CLI.
//!
//! ```json
//! {
//!   "network": "devnet",
//!   "updated_at": "2026-01-01T00:00:00Z",
//!   "deployments": {
//!     "batch-executor": { "address": "0x…", "rpc_url": "…", "deployed_at": "…", "tx_hashes": ["0x…"] }
//!   }
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{Address, B256};
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Captured `cargo stylus deploy` output is cut to this many bytes.
const MAX_RAW_OUTPUT: usize = 16_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub network: String,
    pub contract_key: String,
    pub address: Address,
    pub rpc_url: String,
    pub tx_hashes: Vec<B256>,
    pub raw_output: Option<String>,
}

/// Insert or replace `deployments.<contract_key>`, keeping every other entry.
pub fn record_deployment(path: &Path, record: &DeploymentRecord) -> Result<()> {
    let now = timestamp();
    let mut root = load(path)?;
    root["network"] = json!(record.network);
    root["updated_at"] = json!(now);

    let mut entry = json!({
        "address": record.address.to_string(),
        "rpc_url": record.rpc_url,
        "deployed_at": now,
    });
    if !record.tx_hashes.is_empty() {
        let hashes: Vec<String> = record.tx_hashes.iter().map(|h| h.to_string()).collect();
        entry["tx_hashes"] = json!(hashes);
    }
    if let Some(raw) = record.raw_output.as_deref().map(str::trim) {
        if !raw.is_empty() {
            entry["cargo_stylus_output"] = json!(truncate(raw, MAX_RAW_OUTPUT));
        }
    }

    root["deployments"][&record.contract_key] = entry;
    write_json_atomic(path, &root)
}

/// Note on an existing entry which account claimed ownership, and in which transaction.
pub fn mark_initialized(
    path: &Path,
    contract_key: &str,
    owner: Address,
    tx_hash: B256,
) -> Result<()> {
    let mut root = load(path)?;
    let entry = root["deployments"]
        .get_mut(contract_key)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("no `{contract_key}` entry in {}", path.display()))?;
    entry.insert("initialized_by".into(), json!(owner.to_string()));
    entry.insert("initialize_tx".into(), json!(tx_hash.to_string()));
    root["updated_at"] = json!(timestamp());
    write_json_atomic(path, &root)
}

pub fn read_deployment_address(path: &Path, contract_key: &str) -> Result<Address> {
    let root: Value = serde_json::from_str(
        &fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?,
    )
    .with_context(|| format!("failed parsing JSON in {}", path.display()))?;

    let raw = root
        .pointer(&format!("/deployments/{contract_key}/address"))
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("no `{contract_key}` address in {}", path.display()))?;
    raw.parse()
        .with_context(|| format!("invalid address `{raw}` for `{contract_key}`"))
}

fn load(path: &Path) -> Result<Value> {
    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?
    } else {
        String::new()
    };

    let mut root = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", path.display()))?
    };
    if !root.is_object() {
        root = json!({});
    }
    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }
    Ok(root)
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("failed creating directory {}", parent.display()))?;

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
