// src/signal/health.rs — System health collector
//
// Local metrics come from host commands (uptime, df, vm_stat, ps); the
// two peer services are probed concurrently over HTTP. A dead peer only
// degrades its own field. The record as a whole collapses to `{error}`
// only when local metric collection itself fails, e.g. a metrics tool
// is missing from the host entirely.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;

use crate::infra::config::PeersConfig;
use crate::infra::errors::DeckError;
use crate::reader::peer::{self, ProbeOutcome};

/// vm_stat reports in pages of this size.
const PAGE_SIZE_BYTES: u64 = 16_384;
const BYTES_PER_GB: f64 = 1_073_741_824.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Running,
    Unreachable,
    Error,
}

/// Health payload self-reported by the watcher peer. Leaf values the
/// watcher owns are passed through untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherHealth {
    pub status: Option<String>,
    pub uptime: Option<serde_json::Value>,
    pub monitors: Option<WatcherMonitors>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherMonitors {
    pub heartbeat: Option<serde_json::Value>,
    pub gateway: Option<WatcherGatewayMonitor>,
    pub resources: Option<WatcherResources>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherGatewayMonitor {
    pub failures: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherResources {
    pub memory: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskUsage {
    pub total: String,
    pub used: String,
    pub available: String,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub free_gb: f64,
    /// Host-reported free percentage, when the host can report one.
    pub percent_free: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub uptime: String,
    pub disk: DiskUsage,
    pub memory: MemoryUsage,
    /// 1/5/15-minute load averages.
    pub load: [f64; 3],
    pub processes: usize,
    pub gateway: GatewayStatus,
    pub watcher: Option<WatcherHealth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SystemHealth {
    Report(Box<HealthReport>),
    Error { error: String },
}

/// Everything derived from host commands, before peer fields are merged in.
#[derive(Debug, Clone)]
pub struct LocalMetrics {
    pub uptime: String,
    pub disk: DiskUsage,
    pub memory: MemoryUsage,
    pub load: [f64; 3],
    pub processes: usize,
}

/// Collect the full health record.
pub async fn collect_health(client: &reqwest::Client, peers: &PeersConfig) -> SystemHealth {
    let timeout = Duration::from_secs(peers.probe_timeout_secs);
    let watcher_url = format!("{}/health", peers.watcher_url.trim_end_matches('/'));

    let (outcome, watcher, local) = tokio::join!(
        peer::probe(client, &peers.gateway_url, timeout),
        peer::get_json::<WatcherHealth>(client, &watcher_url, None, timeout),
        local_metrics(),
    );

    assemble(local, gateway_status(outcome), watcher)
}

/// Merge local metrics with peer fields. Split out from `collect_health`
/// so the failure policy is testable without host commands or sockets.
pub fn assemble(
    local: Result<LocalMetrics, DeckError>,
    gateway: GatewayStatus,
    watcher: Option<WatcherHealth>,
) -> SystemHealth {
    match local {
        Ok(m) => SystemHealth::Report(Box::new(HealthReport {
            uptime: m.uptime,
            disk: m.disk,
            memory: m.memory,
            load: m.load,
            processes: m.processes,
            gateway,
            watcher,
        })),
        Err(e) => {
            tracing::warn!("local metric collection failed: {e}");
            SystemHealth::Error {
                error: e.to_string(),
            }
        }
    }
}

fn gateway_status(outcome: ProbeOutcome) -> GatewayStatus {
    match outcome {
        // A 404 from the gateway root still means something is listening
        ProbeOutcome::Status(code) if (200..300).contains(&code) || code == 404 => {
            GatewayStatus::Running
        }
        ProbeOutcome::Status(_) => GatewayStatus::Error,
        ProbeOutcome::Unreachable => GatewayStatus::Unreachable,
    }
}

async fn run(cmd: &str, args: &[&str]) -> Result<String, DeckError> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .await
        .map_err(|e| DeckError::metric(cmd, e))?;
    if !output.status.success() {
        return Err(DeckError::metric(cmd, format!("exited with {}", output.status)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

async fn local_metrics() -> Result<LocalMetrics, DeckError> {
    let uptime = run("uptime", &[]).await?;
    let load = parse_load(&uptime).unwrap_or([0.0; 3]);

    let df = run("df", &["-h", "/"]).await?;
    let disk = parse_df(&df).ok_or_else(|| DeckError::metric("df", "unexpected output"))?;

    let vm = run("vm_stat", &[]).await?;
    let free_pages = parse_vm_stat_pages(&vm, "Pages free").unwrap_or(0);
    let free_gb = (free_pages * PAGE_SIZE_BYTES) as f64 / BYTES_PER_GB;

    // Optional augment; absence of the tool is not a failure
    let percent_free = match run("memory_pressure", &[]).await {
        Ok(out) => parse_free_percent(&out),
        Err(_) => None,
    };

    let ps = run("ps", &["ax"]).await?;
    let processes = ps.lines().count().saturating_sub(1);

    Ok(LocalMetrics {
        uptime,
        disk,
        memory: MemoryUsage {
            free_gb: (free_gb * 100.0).round() / 100.0,
            percent_free,
        },
        load,
        processes,
    })
}

static LOAD: OnceLock<Regex> = OnceLock::new();
static FREE_PCT: OnceLock<Regex> = OnceLock::new();

fn load_re() -> &'static Regex {
    // macOS says "load averages:", Linux "load average:" with commas
    LOAD.get_or_init(|| {
        Regex::new(r"load averages?:\s+([\d.]+),?\s+([\d.]+),?\s+([\d.]+)").expect("load regex")
    })
}

fn free_pct_re() -> &'static Regex {
    FREE_PCT.get_or_init(|| {
        Regex::new(r"free percentage:\s*([\d.]+)%").expect("free percentage regex")
    })
}

fn parse_load(uptime: &str) -> Option<[f64; 3]> {
    let c = load_re().captures(uptime)?;
    Some([
        c[1].parse().ok()?,
        c[2].parse().ok()?,
        c[3].parse().ok()?,
    ])
}

/// Last line of `df -h /`: filesystem, total, used, available, percent.
fn parse_df(df: &str) -> Option<DiskUsage> {
    let line = df.lines().last()?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }
    Some(DiskUsage {
        total: parts[1].to_string(),
        used: parts[2].to_string(),
        available: parts[3].to_string(),
        percent: parts[4].to_string(),
    })
}

/// Extract a page count from a vm_stat line like "Pages free:  12345.".
fn parse_vm_stat_pages(vm: &str, label: &str) -> Option<u64> {
    vm.lines()
        .find(|l| l.trim_start().starts_with(label))?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

fn parse_free_percent(out: &str) -> Option<f64> {
    free_pct_re().captures(out)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_metrics() -> LocalMetrics {
        LocalMetrics {
            uptime: "10:00  up 3 days, 2 users, load averages: 1.50 1.20 1.00".into(),
            disk: DiskUsage {
                total: "460Gi".into(),
                used: "210Gi".into(),
                available: "250Gi".into(),
                percent: "46%".into(),
            },
            memory: MemoryUsage {
                free_gb: 4.5,
                percent_free: Some(31.0),
            },
            load: [1.5, 1.2, 1.0],
            processes: 412,
        }
    }

    #[test]
    fn test_unreachable_peers_do_not_poison_report() {
        let health = assemble(Ok(sample_metrics()), GatewayStatus::Unreachable, None);
        match health {
            SystemHealth::Report(report) => {
                assert_eq!(report.gateway, GatewayStatus::Unreachable);
                assert_eq!(report.watcher, None);
                assert_eq!(report.disk.percent, "46%");
                assert_eq!(report.load, [1.5, 1.2, 1.0]);
            }
            SystemHealth::Error { error } => panic!("expected report, got error: {error}"),
        }
    }

    #[test]
    fn test_local_failure_collapses_to_error_record() {
        let health = assemble(
            Err(DeckError::metric("vm_stat", "No such file or directory")),
            GatewayStatus::Running,
            None,
        );
        let json = serde_json::to_value(&health).unwrap();
        assert!(json.get("error").is_some());
        assert!(json.get("disk").is_none());
    }

    #[test]
    fn test_report_serialization_shape() {
        let health = assemble(Ok(sample_metrics()), GatewayStatus::Running, None);
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["gateway"], "running");
        assert_eq!(json["memory"]["freeGb"], 4.5);
        assert_eq!(json["memory"]["percentFree"], 31.0);
        assert_eq!(json["watcher"], serde_json::Value::Null);
        assert_eq!(json["processes"], 412);
    }

    #[test]
    fn test_gateway_status_mapping() {
        assert_eq!(gateway_status(ProbeOutcome::Status(200)), GatewayStatus::Running);
        assert_eq!(gateway_status(ProbeOutcome::Status(404)), GatewayStatus::Running);
        assert_eq!(gateway_status(ProbeOutcome::Status(500)), GatewayStatus::Error);
        assert_eq!(gateway_status(ProbeOutcome::Unreachable), GatewayStatus::Unreachable);
    }

    #[test]
    fn test_parse_load_macos_and_linux() {
        let mac = "10:02  up 12 days,  3:04, 2 users, load averages: 2.05 1.80 1.61";
        assert_eq!(parse_load(mac), Some([2.05, 1.80, 1.61]));

        let linux = " 10:02:11 up 12 days,  3:04,  2 users,  load average: 0.52, 0.58, 0.59";
        assert_eq!(parse_load(linux), Some([0.52, 0.58, 0.59]));

        assert_eq!(parse_load("garbage"), None);
    }

    #[test]
    fn test_parse_df() {
        let out = "\
Filesystem      Size   Used  Avail Capacity iused ifree %iused  Mounted on
/dev/disk3s1s1  460Gi  210Gi  250Gi    46%    356k  1.9G    0%   /";
        let disk = parse_df(out).unwrap();
        assert_eq!(disk.total, "460Gi");
        assert_eq!(disk.used, "210Gi");
        assert_eq!(disk.available, "250Gi");
        assert_eq!(disk.percent, "46%");
    }

    #[test]
    fn test_parse_vm_stat_pages() {
        let out = "\
Mach Virtual Memory Statistics: (page size of 16384 bytes)
Pages free:                              123456.
Pages active:                            654321.";
        assert_eq!(parse_vm_stat_pages(out, "Pages free"), Some(123_456));
        assert_eq!(parse_vm_stat_pages(out, "Pages wired"), None);
    }

    #[test]
    fn test_parse_free_percent() {
        let out = "The system has 1234 pages\nSystem-wide memory free percentage: 43%";
        assert_eq!(parse_free_percent(out), Some(43.0));
        assert_eq!(parse_free_percent("no match"), None);
    }

    #[test]
    fn test_watcher_payload_deserializes_partial() {
        let raw = r#"{"status":"ok","monitors":{"gateway":{"failures":2},"resources":{"memory":{"freeGb":3.2}}}}"#;
        let watcher: WatcherHealth = serde_json::from_str(raw).unwrap();
        assert_eq!(watcher.status.as_deref(), Some("ok"));
        let monitors = watcher.monitors.unwrap();
        assert_eq!(monitors.gateway.unwrap().failures, Some(2));
        assert!(monitors.heartbeat.is_none());
    }
}
