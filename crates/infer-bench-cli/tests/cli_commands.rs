use std::fs;
use std::process::Command;

const SESSION: &str = r#"{
  "runs": [
    {"model": "resnet18", "label": "Server", "optimization": "cpu",
     "measurements": [{"latency": 45.0, "predicted_label": 1, "actual_label": 1}]},
    {"model": "resnet18", "label": "Browser", "optimization": "webgpu",
     "measurements": [{"latency": 12.0, "predicted_label": 2, "actual_label": 2}]}
  ]
}"#;

fn infer_bench() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_infer-bench"));
    cmd.env_remove("INFER_BENCH_LOCAL_VENUE")
        .env_remove("INFER_BENCH_REMOTE_VENUE")
        .env_remove("INFER_BENCH_DEFAULT_NUM_CLASSES");
    cmd
}

#[test]
fn run_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");
    let report = dir.path().join("report.json");
    fs::write(&session, SESSION).unwrap();

    let status = infer_bench()
        .args(["run", "--format", "json", "--session"])
        .arg(&session)
        .arg("--output")
        .arg(&report)
        .status()
        .unwrap();
    assert!(status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["runs"].as_array().unwrap().len(), 2);
    assert_eq!(json["comparison"]["latency"]["mode"], "browser");
    assert_eq!(json["comparison"]["best_latency_server_venue"]["value"], 45.0);
}

#[test]
fn compare_fails_without_server_runs() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");
    let report = dir.path().join("report.json");
    fs::write(&session, SESSION).unwrap();

    let status = infer_bench()
        .args(["run", "--format", "json", "--session"])
        .arg(&session)
        .arg("--output")
        .arg(&report)
        .status()
        .unwrap();
    assert!(status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let browser_only: Vec<_> = json["runs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["metrics"].clone())
        .filter(|m| m["label"] == "Browser")
        .collect();
    let metrics = dir.path().join("metrics.json");
    fs::write(&metrics, serde_json::to_string(&browser_only).unwrap()).unwrap();

    let output = infer_bench()
        .args(["compare", "--metrics"])
        .arg(&metrics)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No run found for venue: Server"));

    let output = infer_bench()
        .args(["compare", "--by", "avg_latency", "--metrics"])
        .arg(&metrics)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("webgpu"));
}

#[test]
fn compare_by_metric_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");
    let report = dir.path().join("report.json");
    fs::write(&session, SESSION).unwrap();

    let status = infer_bench()
        .args(["run", "--format", "json", "--session"])
        .arg(&session)
        .arg("--output")
        .arg(&report)
        .status()
        .unwrap();
    assert!(status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let runs: Vec<_> = json["runs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["metrics"].clone())
        .collect();
    let metrics = dir.path().join("metrics.json");
    fs::write(&metrics, serde_json::to_string(&runs).unwrap()).unwrap();

    let best = dir.path().join("best.json");
    let output = infer_bench()
        .args(["compare", "--by", "throughput", "--metrics"])
        .arg(&metrics)
        .arg("--output")
        .arg(&best)
        .output()
        .unwrap();
    assert!(output.status.success());

    let best: serde_json::Value = serde_json::from_str(&fs::read_to_string(&best).unwrap()).unwrap();
    assert_eq!(best["optimization"], "webgpu");
}

#[test]
fn zero_latency_report_feeds_compare() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");
    let report = dir.path().join("report.json");
    fs::write(
        &session,
        r#"{"runs": [
            {"model": "resnet18", "label": "Server", "optimization": "cpu",
             "measurements": [{"latency": 0.0, "predicted_label": 1, "actual_label": 1}]},
            {"model": "resnet18", "label": "Browser", "optimization": "webgpu",
             "measurements": [{"latency": 3.0, "predicted_label": 2, "actual_label": 2}]}
        ]}"#,
    )
    .unwrap();

    let status = infer_bench()
        .args(["run", "--format", "json", "--session"])
        .arg(&session)
        .arg("--output")
        .arg(&report)
        .status()
        .unwrap();
    assert!(status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["comparison"]["throughput"]["value"], "inf");
    let runs: Vec<_> = json["runs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["metrics"].clone())
        .collect();
    let metrics = dir.path().join("metrics.json");
    fs::write(&metrics, serde_json::to_string(&runs).unwrap()).unwrap();

    let output = infer_bench()
        .args(["compare", "--format", "json", "--metrics"])
        .arg(&metrics)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let comparison: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(comparison["latency"]["mode"], "server");
    assert_eq!(comparison["throughput"]["optimization_variant"], "cpu");
}
