//! CLI integration tests.
//!
//! Parsing tests run the binary without a node. End-to-end tests start
//! the HTTP API in-process on an ephemeral port, backed by fake
//! collaborators, and point the binary at it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::process::Command;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use hoprd_api::{ApiConfig, ApiServer, NodeServices};
use hoprd_network::{PingReply, Pinger};
use hoprd_node::{LedgerAccess, NodeStateAccess, SmartContractInfo, SnapshotAggregator};
use hoprd_types::config::AppConfig;
use hoprd_types::{
    Balance, BalanceType, ChainAddress, Health, HoprdError, Multiaddr, PeerId, Result,
};

// ---------------------------------------------------------------------------
// Process helpers
// ---------------------------------------------------------------------------

/// Runs the CLI binary with args. Returns (exit_code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_hopr-admin"))
        .args(args)
        .env("NO_COLOR", "1")
        .output();

    match output {
        Ok(o) => {
            let code = o.status.code().unwrap_or(-1);
            let stdout = String::from_utf8_lossy(&o.stdout).to_string();
            let stderr = String::from_utf8_lossy(&o.stderr).to_string();
            (code, stdout, stderr)
        }
        Err(e) => {
            eprintln!("WARNING: could not run binary: {e}");
            (-1, String::new(), e.to_string())
        }
    }
}

/// Runs the CLI off the async runtime so the in-process server keeps serving.
async fn run_cli_async(args: Vec<String>) -> (i32, String, String) {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli(&args)
    })
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Fake node
// ---------------------------------------------------------------------------

struct Ledger {
    hopr_fails: bool,
}

#[async_trait]
impl LedgerAccess for Ledger {
    async fn native_balance(&self) -> Result<Balance> {
        Ok(Balance::new(10u64, BalanceType::Native))
    }

    async fn hopr_balance(&self) -> Result<Balance> {
        if self.hopr_fails {
            return Err(HoprdError::ChainError {
                reason: "getBalance failed".into(),
            });
        }
        Ok(Balance::new(25u64, BalanceType::Hopr))
    }
}

struct NodeState {
    id: PeerId,
}

#[async_trait]
impl NodeStateAccess for NodeState {
    async fn network_id(&self) -> Result<String> {
        Ok("anvil-localhost".into())
    }

    async fn smart_contract_info(&self) -> Result<SmartContractInfo> {
        Ok(SmartContractInfo {
            chain: "anvil".into(),
            hopr_token_address: ChainAddress::new([1; 20]),
            hopr_channels_address: ChainAddress::new([2; 20]),
            hopr_network_registry_address: ChainAddress::new([3; 20]),
            hopr_node_safe_registry_address: ChainAddress::new([4; 20]),
            notice_period_channel_closure: 120,
        })
    }

    async fn announced_addresses(&self) -> Result<Vec<Multiaddr>> {
        Ok(Vec::new())
    }

    async fn listening_addresses(&self) -> Result<Vec<Multiaddr>> {
        Ok(Vec::new())
    }

    async fn own_id(&self) -> Result<PeerId> {
        Ok(self.id)
    }

    async fn is_allowed_access_to_network(&self, _peer: &PeerId) -> Result<bool> {
        Ok(true)
    }

    async fn connectivity_health(&self) -> Result<Health> {
        Ok(Health::Green)
    }
}

struct FakePinger(HashMap<PeerId, PingReply>);

#[async_trait]
impl Pinger for FakePinger {
    async fn ping(&self, peer: &PeerId) -> Result<PingReply> {
        Ok(self.0.get(peer).copied().unwrap_or(PingReply::TimedOut))
    }
}

struct TestNode {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
}

impl TestNode {
    async fn start(
        aliases: Vec<(&str, PeerId)>,
        replies: HashMap<PeerId, PingReply>,
        hopr_fails: bool,
    ) -> Self {
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            diagnostics: AppConfig {
                ping_timeout_ms: 2_000,
                ..Default::default()
            },
            ..Default::default()
        };
        let services = NodeServices {
            aggregator: SnapshotAggregator::new(
                Arc::new(Ledger { hopr_fails }),
                Arc::new(NodeState {
                    id: PeerId::random(),
                }),
            ),
            aliases: aliases
                .into_iter()
                .map(|(alias, peer)| (alias.to_string(), peer))
                .collect(),
            pinger: Arc::new(FakePinger(replies)),
        };
        let (shutdown, rx) = watch::channel(false);
        let (addr, _handle) = ApiServer::start(config, services, rx).await.unwrap();
        Self { addr, shutdown }
    }

    fn args(&self, rest: &[&str]) -> Vec<String> {
        let mut args = vec![
            "--api-endpoint".to_string(),
            format!("http://{}", self.addr),
            "--timeout".to_string(),
            "3".to_string(),
        ];
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }
}

impl Drop for TestNode {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

// -----------------------------------------------------------------------
// Clap parsing tests
// -----------------------------------------------------------------------

#[test]
fn help_flag_exits_zero() {
    let (code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(code, 0, "--help should exit 0");
    assert!(stdout.contains("ping"), "help should list ping");
}

#[test]
fn version_flag_exits_zero() {
    let (code, stdout, _) = run_cli(&["--version"]);
    assert_eq!(code, 0, "--version should exit 0");
    assert!(stdout.contains("hopr-admin"), "version should print program name");
}

#[test]
fn unknown_command_fails() {
    let (code, _, stderr) = run_cli(&["nonexistent"]);
    assert_ne!(code, 0, "unknown command should fail");
    assert!(
        stderr.contains("error") || stderr.contains("unrecognized"),
        "stderr should indicate error: {stderr}"
    );
}

#[test]
fn ping_without_argument_prints_usage() {
    let (code, stdout, _) = run_cli(&["ping"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "usage: hopr-admin ping <PEER_ID_OR_ALIAS>");
}

#[test]
fn ping_unreachable_node_prints_one_line() {
    let peer = PeerId::random().to_base58();
    let (code, stdout, _) = run_cli(&[
        "--api-endpoint",
        "http://127.0.0.1:9",
        "--timeout",
        "2",
        "ping",
        &peer,
    ]);
    assert_eq!(code, 0, "ping never fails");
    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    assert!(stdout.starts_with("network error"), "{stdout}");
}

#[test]
fn ping_with_largest_timeout_does_not_overflow() {
    let peer = PeerId::random().to_base58();
    let max = u64::MAX.to_string();
    let (code, stdout, stderr) = run_cli(&[
        "--api-endpoint",
        "http://127.0.0.1:9",
        "--timeout",
        &max,
        "ping",
        &peer,
    ]);
    assert_eq!(code, 0, "{stderr}");
    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    assert!(!stderr.contains("panicked"), "{stderr}");
}

#[test]
fn balances_unreachable_node_fails_with_json_error() {
    let (code, _, stderr) = run_cli(&["--json", "--api-endpoint", "http://127.0.0.1:9", "balances"]);
    assert_eq!(code, 1);
    let parsed: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap_or_default();
    assert!(parsed.get("error").is_some(), "stderr should be JSON: {stderr}");
}

// -----------------------------------------------------------------------
// End-to-end tests
// -----------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ping_alias_prints_latency() {
    let bob = PeerId::random();
    let node = TestNode::start(
        vec![("bob", bob)],
        HashMap::from([(bob, PingReply::Pong { latency_ms: 42 })]),
        false,
    )
    .await;

    let (code, stdout, _) = run_cli_async(node.args(&["ping", "bob"])).await;
    assert_eq!(code, 0);
    assert_eq!(stdout, "Pong received in 42 ms\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ping_timeout_prints_timeout() {
    let bob = PeerId::random();
    let node = TestNode::start(vec![("bob", bob)], HashMap::new(), false).await;

    let (code, stdout, _) = run_cli_async(node.args(&["ping", "bob"])).await;
    assert_eq!(code, 0);
    assert_eq!(stdout, "Could not ping node. Timeout.\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ping_unknown_alias_prints_error() {
    let node = TestNode::start(vec![], HashMap::new(), false).await;

    let (code, stdout, _) = run_cli_async(node.args(&["ping", "carol"])).await;
    assert_eq!(code, 0);
    assert_eq!(stdout, "unknown alias \"carol\"\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn balances_json() {
    let node = TestNode::start(vec![], HashMap::new(), false).await;

    let (code, stdout, _) = run_cli_async(node.args(&["--json", "balances"])).await;
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed, serde_json::json!({ "native": "10", "hopr": "25" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn balances_partial_failure_exits_nonzero() {
    let node = TestNode::start(vec![], HashMap::new(), true).await;

    let (code, stdout, stderr) = run_cli_async(node.args(&["balances"])).await;
    assert_eq!(code, 1);
    assert!(stdout.is_empty(), "no partial balances: {stdout}");
    assert!(stderr.contains("UNPROCESSABLE"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn info_human_output() {
    let node = TestNode::start(vec![], HashMap::new(), false).await;

    let (code, stdout, _) = run_cli_async(node.args(&["info"])).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("Connectivity: GREEN"), "{stdout}");
    assert!(stdout.contains("Channel closure period (min): 2"), "{stdout}");
    assert!(stdout.contains("Eligible: true"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn aliases_json_table() {
    let bob = PeerId::random();
    let node = TestNode::start(vec![("bob", bob)], HashMap::new(), false).await;

    let (code, stdout, _) = run_cli_async(node.args(&["--json", "aliases"])).await;
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([{ "alias": "bob", "peer_id": bob.to_base58() }])
    );
}
