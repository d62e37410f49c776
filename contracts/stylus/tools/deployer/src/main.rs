use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, info, warn};

/// Cap on the raw `cargo stylus` output kept in the deployments file.
const MAX_RAW_OUTPUT: usize = 16_000;

/// Deploy the Spend Router with `cargo stylus deploy`, then write/update a deployments JSON.
///
/// The router takes the Spend Permission Manager address as its only constructor argument.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the Stylus contract crate (where `cargo stylus deploy` should be run).
    #[arg(long, default_value = "src/spend-router")]
    contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Spend Permission Manager the router spends through (constructor argument).
    #[arg(long, env = "PERMISSION_MANAGER")]
    permission_manager: String,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this contract.
    #[arg(long, default_value = "spend-router")]
    contract_key: String,

    /// Optional network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Extra args to pass through to `cargo stylus deploy` (after `--`).
    ///
    /// Example:
    /// `-- --estimate-gas`
    #[arg(last = true)]
    passthrough: Vec<String>,
}

/// What a successful `cargo stylus deploy` run produced.
#[derive(Debug, Serialize)]
struct Deployment {
    address: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tx_hashes: Vec<String>,
    #[serde(skip)]
    raw_output: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    validate_address(&cli.permission_manager).context("invalid --permission-manager")?;

    let deployment = run_cargo_stylus_deploy(&cli)?;
    write_deployments_json(&cli, &deployment)?;

    info!(
        contract = %cli.contract_key,
        address = %deployment.address,
        deployments = %cli.deployments_path.display(),
        "deployment recorded"
    );
    println!("Deployed `{}` to {}", cli.contract_key, deployment.address);
    Ok(())
}

fn validate_address(address: &str) -> Result<()> {
    let re = Regex::new(r"^0x[a-fA-F0-9]{40}$")?;
    if !re.is_match(address) {
        bail!("expected a 0x-prefixed 20-byte hex address, got `{address}`");
    }
    if address[2..].chars().all(|c| c == '0') {
        bail!("the zero address cannot be a permission manager");
    }
    Ok(())
}

fn run_cargo_stylus_deploy(cli: &Cli) -> Result<Deployment> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(&cli.contract_dir);
    cmd.arg("stylus").arg("deploy");
    cmd.arg("-e").arg(&cli.rpc_url);
    cmd.arg("--constructor-args").arg(&cli.permission_manager);

    if let Some(ref pk_path) = cli.private_key_path {
        cmd.arg("--private-key-path").arg(pk_path);
    } else if let Some(ref pk) = cli.private_key {
        cmd.arg("--private-key").arg(pk);
    } else {
        return Err(anyhow!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ));
    }

    // Keep stdout/stderr for parsing and for debugging when runs fail.
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    if !cli.passthrough.is_empty() {
        cmd.args(&cli.passthrough);
    }

    info!(
        contract_dir = %cli.contract_dir.display(),
        network = %cli.network,
        permission_manager = %cli.permission_manager,
        "running cargo stylus deploy"
    );
    let output = cmd
        .output()
        .context("failed to run `cargo stylus deploy`")?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let combined = format!("{stdout}\n{stderr}");
    debug!(output = %combined, "cargo stylus deploy finished");

    if !output.status.success() {
        return Err(anyhow!(
            "`cargo stylus deploy` failed (exit {}):\n{}",
            output.status,
            combined
        ));
    }

    parse_deploy_output(&combined)
}

/// Pull the deployed address and confirmed tx hashes out of `cargo stylus deploy` output.
fn parse_deploy_output(output: &str) -> Result<Deployment> {
    // Older cargo-stylus: "Deploying program to address 0x..."
    // Newer cargo-stylus: "deployed code at address: 0x..."
    let re_address = Regex::new(
        r"(?:Deploying program to address|deployed code at address:?)\s+(0x[a-fA-F0-9]{40})",
    )?;
    let re_tx = Regex::new(r"(?:Confirmed tx|deployment tx hash:?)\s+(0x[a-fA-F0-9]{64})")?;

    let address = re_address
        .captures_iter(output)
        .next()
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
        .ok_or_else(|| {
            anyhow!("could not parse deployed address from `cargo stylus deploy` output")
        })?;

    let tx_hashes: Vec<String> = re_tx
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    if tx_hashes.is_empty() {
        warn!("no transaction hashes found in `cargo stylus deploy` output");
    }

    Ok(Deployment {
        address,
        tx_hashes,
        raw_output: output.to_string(),
    })
}

fn write_deployments_json(cli: &Cli, deployment: &Deployment) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if cli.deployments_path.exists() {
        fs::read_to_string(&cli.deployments_path)
            .with_context(|| format!("failed reading {}", cli.deployments_path.display()))?
    } else {
        String::new()
    };

    let mut root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", cli.deployments_path.display()))?
    };

    let entry = deployment_entry(deployment, &cli.permission_manager, &cli.rpc_url, &now)?;
    upsert_deployment(&mut root, &cli.network, &now, &cli.contract_key, entry);

    write_json_atomic(&cli.deployments_path, &root)?;
    Ok(())
}

fn deployment_entry(
    deployment: &Deployment,
    permission_manager: &str,
    rpc_url: &str,
    now: &str,
) -> Result<Value> {
    let mut entry = serde_json::to_value(deployment).context("failed serialising deployment")?;
    entry["permission_manager"] = json!(permission_manager);
    entry["rpc_url"] = json!(rpc_url);
    entry["deployed_at"] = json!(now);

    // Keep raw output for audits, truncated.
    let trimmed = deployment.raw_output.trim();
    if !trimmed.is_empty() {
        let mut end = trimmed.len().min(MAX_RAW_OUTPUT);
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        entry["cargo_stylus_output"] = json!(&trimmed[..end]);
    }
    Ok(entry)
}

fn upsert_deployment(root: &mut Value, network: &str, now: &str, contract_key: &str, entry: Value) {
    if !root.is_object() {
        *root = json!({});
    }

    root["network"] = json!(network);
    root["updated_at"] = json!(now);

    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }
    root["deployments"][contract_key] = entry;
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

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
