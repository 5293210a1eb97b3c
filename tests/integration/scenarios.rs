use std::fs;

use nodeproc::pipeline::{RunOutcome, EMPTY_FINGERPRINT};

use crate::support::{txt_files, Workspace};

#[test]
fn mixed_nodes_split_into_protocol_files() {
    let ws = Workspace::new();
    ws.write_node("a.txt", "vmess://abc\n# comment\n");
    ws.write_node("b.txt", "ss://def\njunkline\n");

    let summary = ws.orchestrator().run(false);
    assert_eq!(summary.outcome, RunOutcome::Processed);

    assert_eq!(ws.read_output("vmess.txt"), "vmess://abc");
    assert_eq!(ws.read_output("ss.txt"), "ss://def");
    assert_eq!(ws.read_output("other.txt"), "junkline");
    assert_eq!(
        txt_files(&ws.output()),
        vec!["hb.txt", "other.txt", "ss.txt", "vmess.txt"]
    );
    assert_eq!(
        ws.read_output("hb.txt"),
        "# === a.txt ===\nvmess://abc\n# comment\n\n# === b.txt ===\nss://def\njunkline\n"
    );

    let report = ws.read_output("REPORT.md");
    assert!(report.contains("- `vmess.txt`: 1 lines"));
    assert!(report.contains("- `hb.txt`: 6 lines"));
}

#[test]
fn unchanged_rerun_is_skipped_and_leaves_outputs_alone() {
    let ws = Workspace::new();
    ws.write_node("a.txt", "trojan://t\n");

    assert_eq!(ws.orchestrator().run(false).outcome, RunOutcome::Processed);

    // Tamper with an output; a skipped run must not rewrite it.
    fs::write(ws.output().join("trojan.txt"), "tampered").unwrap();
    let report_before = ws.read_output("REPORT.md");

    let second = ws.orchestrator().run(false);
    assert_eq!(second.outcome, RunOutcome::Skipped);
    assert_eq!(second.outcome.exit_code(false), 1);
    assert_eq!(ws.read_output("trojan.txt"), "tampered");
    assert_eq!(ws.read_output("REPORT.md"), report_before);
}

#[test]
fn forced_reruns_are_byte_identical() {
    let ws = Workspace::new();
    ws.write_node("a.txt", "VLESS://Upper\nhttp://h\n\n# c\n");
    ws.write_node("b.txt", "https://s\nsocks5://k\nnoise\n");
    ws.write_node("c.txt", "");

    let orchestrator = ws.orchestrator();
    assert_eq!(orchestrator.run(true).outcome, RunOutcome::Processed);
    let first: Vec<(String, String)> = txt_files(&ws.output())
        .into_iter()
        .map(|n| (n.clone(), ws.read_output(&n)))
        .collect();

    let second = orchestrator.run(true);
    assert_eq!(second.outcome, RunOutcome::Processed);
    assert_eq!(second.changed, Some(false));
    let again: Vec<(String, String)> = txt_files(&ws.output())
        .into_iter()
        .map(|n| (n.clone(), ws.read_output(&n)))
        .collect();

    assert_eq!(first, again);
    assert_eq!(ws.read_output("vless.txt"), "VLESS://Upper");
    assert!(!ws.read_output("hb.txt").contains("c.txt"));
}

#[test]
fn editing_a_node_file_triggers_processing() {
    let ws = Workspace::new();
    ws.write_node("a.txt", "ss://one\n");
    let orchestrator = ws.orchestrator();
    orchestrator.run(false);
    assert_eq!(orchestrator.run(false).outcome, RunOutcome::Skipped);

    ws.write_node("a.txt", "ss://one\nssr://two\n");
    assert_eq!(orchestrator.run(false).outcome, RunOutcome::Processed);
    assert_eq!(ws.read_output("ssr.txt"), "ssr://two");
}

#[test]
fn missing_nodes_dir_still_completes() {
    let ws = Workspace::new();
    fs::remove_dir(ws.nodes()).unwrap();

    let summary = ws.orchestrator().run(false);
    assert_eq!(summary.outcome, RunOutcome::Processed);
    assert_eq!(summary.fingerprint.as_deref(), Some(EMPTY_FINGERPRINT));
    assert_eq!(ws.read_output("hb.txt"), "");
    assert_eq!(txt_files(&ws.output()), vec!["hb.txt"]);
    assert!(summary.buckets.is_empty());
}

#[test]
fn unreadable_node_file_is_listed_in_report() {
    let ws = Workspace::new();
    ws.write_node("a.txt", "vless://ok\n");
    fs::write(ws.nodes().join("b.txt"), [0xc3, 0x28, 0x0a]).unwrap();

    let summary = ws.orchestrator().run(false);
    assert_eq!(summary.outcome, RunOutcome::Processed);
    assert_eq!(summary.diagnostics.len(), 1);

    let report = ws.read_output("REPORT.md");
    assert!(report.contains("## Diagnostics"));
    assert!(report.contains("b.txt"));
    assert_eq!(ws.read_output("vless.txt"), "vless://ok");
}

#[test]
fn after_success_policy_keeps_marker_until_processed() {
    use nodeproc::config::{MarkerPolicy, PipelineConfig};

    let ws = Workspace::new();
    ws.write_node("a.txt", "vless://a\n");
    let config = PipelineConfig {
        marker_policy: MarkerPolicy::AfterSuccess,
        skip_is_success: false,
    };
    let marker = ws.base().join(".last_hash");

    let orchestrator = ws.orchestrator_with(&config);
    assert_eq!(orchestrator.run(false).outcome, RunOutcome::Processed);
    let committed = fs::read_to_string(&marker).unwrap();

    ws.write_node("b.txt", "vmess://b\n");
    let forced_failure_dir = ws.output();
    fs::remove_dir_all(&forced_failure_dir).unwrap();
    fs::write(&forced_failure_dir, "blocker").unwrap();
    assert!(matches!(
        orchestrator.run(false).outcome,
        RunOutcome::Failed { .. }
    ));
    assert_eq!(fs::read_to_string(&marker).unwrap(), committed);
}
