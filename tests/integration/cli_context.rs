use std::fs;

use nodeproc::logging::LoggingOverrides;
use nodeproc::pipeline::RunOutcome;
use nodeproc::tooling::cli::CliContext;
use tempfile::TempDir;

fn file_logging(path: &str) -> LoggingOverrides {
    LoggingOverrides {
        level: Some("debug".to_string()),
        format: Some("text".to_string()),
        output: Some("file".to_string()),
        file: Some(path.into()),
    }
}

#[test]
fn context_prepares_directories_and_runs() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("hb");
    fs::create_dir_all(&base).unwrap();
    fs::write(
        base.join("config.yml"),
        "directories:\n  output: ./output\n  nodes: ../nodes\n",
    )
    .unwrap();

    let ctx = CliContext::new(base.clone(), &file_logging("run.log")).unwrap();
    assert!(temp.path().join("nodes").is_dir());
    assert!(base.join("output").is_dir());
    assert_eq!(ctx.base_dir(), base.as_path());

    fs::write(temp.path().join("nodes").join("a.txt"), "vmess://x\n").unwrap();
    let summary = ctx.execute(false);
    assert_eq!(summary.outcome, RunOutcome::Processed);
    assert_eq!(ctx.exit_code(&summary), 0);

    let log = fs::read_to_string(base.join("run.log")).unwrap();
    assert!(log.contains("Prepared directory"));
    assert!(log.contains("Node processing run complete"));
}

#[test]
fn skip_exit_code_follows_config() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("hb");
    fs::create_dir_all(&base).unwrap();

    let ctx = CliContext::new(base.clone(), &file_logging("run.log")).unwrap();
    ctx.execute(false);
    let skipped = ctx.execute(false);
    assert_eq!(skipped.outcome, RunOutcome::Skipped);
    assert_eq!(ctx.exit_code(&skipped), 1);

    fs::write(base.join("config.yml"), "pipeline:\n  skip_is_success: true\n").unwrap();
    let ctx = CliContext::new(base, &file_logging("run.log")).unwrap();
    let skipped = ctx.execute(false);
    assert_eq!(skipped.outcome, RunOutcome::Skipped);
    assert_eq!(ctx.exit_code(&skipped), 0);
}

#[test]
fn malformed_config_fails_initialization() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("hb");
    fs::create_dir_all(&base).unwrap();
    fs::write(base.join("config.yml"), "directories: [oops\n").unwrap();
    assert!(CliContext::new(base, &file_logging("run.log")).is_err());
}
