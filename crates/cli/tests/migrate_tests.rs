// Integration tests for `decant migrate` and `decant inspect` against the
// built binary.
// Run with: cargo test -p decant-cli --test migrate_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::Command;

fn decant() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_decant"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

// Three posts: one with two legacy links (one dead token), one clean,
// one with no body record at all.
const EXPORT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hibernate-generic datetime="2023-01-15 03:12:44">
  <object class="BlogPost" package="com.example.content">
    <id name="id">11</id>
    <property name="title"><![CDATA[Launch Day]]></property>
    <property name="creationDate">2021-04-10 09:00:00</property>
  </object>
  <object class="BlogPost" package="com.example.content">
    <id name="id">12</id>
    <property name="title"><![CDATA[Retro Notes]]></property>
    <property name="creationDate">2022-06-05 10:00:00</property>
  </object>
  <object class="BlogPost" package="com.example.content">
    <id name="id">13</id>
    <property name="title"><![CDATA[Quiet Post]]></property>
    <property name="creationDate">2020-03-03 08:00:00</property>
  </object>
  <object class="BodyContent" package="com.example.content">
    <id name="id">21</id>
    <property name="body"><![CDATA[<p>Old link https://wiki.example.com/x/dead and https://wiki.example.com/x/retro here.</p>]]></property>
    <property name="content" class="BlogPost" package="com.example.content">
      <id name="id">11</id>
    </property>
  </object>
  <object class="BodyContent" package="com.example.content">
    <id name="id">22</id>
    <property name="body"><![CDATA[<p>All fine.</p>]]></property>
    <property name="content" class="BlogPost" package="com.example.content">
      <id name="id">12</id>
    </property>
  </object>
</hibernate-generic>
"#;

const DATES: &str = "Launch Day:2021-04-12::launch\nRetro Notes:2022-06-05::retro\n";

const LINK_HOST: &str = "https://wiki.example.com";

/// Write both input files into `dir` and return their paths.
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let export = dir.join("export.xml");
    let dates = dir.join("dates.txt");
    std::fs::write(&export, EXPORT_XML).expect("write export fixture");
    std::fs::write(&dates, DATES).expect("write dates fixture");
    (export, dates)
}

fn migrate_args(export: &Path, dates: &Path, out: &Path) -> Vec<String> {
    vec![
        "migrate".into(),
        export.to_str().unwrap().into(),
        "--dates".into(),
        dates.to_str().unwrap().into(),
        "--out".into(),
        out.to_str().unwrap().into(),
    ]
}

// ---------------------------------------------------------------------------
// Happy path: archive on disk, warnings on stderr, summary line
// ---------------------------------------------------------------------------

#[test]
fn migrate_writes_the_archive() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, dates) = write_fixtures(tmp.path());
    let out = tmp.path().join("archive");

    let output = decant()
        .args(migrate_args(&export, &dates, &out))
        .output()
        .expect("decant migrate");

    assert!(output.status.success(), "exit code was {:?}", output.status);

    // All three posts land, named by published date
    assert!(out.join("2020-03-03.html").exists());
    assert!(out.join("2021-04-12.html").exists());
    assert!(out.join("2022-06-05.html").exists());

    // Authority date won over the creation date, and the body survived
    let launch = std::fs::read_to_string(out.join("2021-04-12.html")).unwrap();
    assert!(
        launch.starts_with("---\ntitle: \"Launch Day\"\ndate: 2021-04-12\ndraft: false\n---\n"),
        "unexpected front matter: {launch}"
    );
    assert!(launch.contains("<p>Old link"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("warning: "),
        "missing-body warning should reach stderr: {stderr}"
    );
    assert!(
        stderr.contains("Done: 3 posts written to"),
        "missing summary line: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// The sink is destructive: stale files never survive a run
// ---------------------------------------------------------------------------

#[test]
fn migrate_replaces_a_stale_archive() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, dates) = write_fixtures(tmp.path());
    let out = tmp.path().join("archive");

    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("stale.html"), "left over from a previous run").unwrap();

    let output = decant()
        .args(migrate_args(&export, &dates, &out))
        .output()
        .expect("decant migrate");

    assert!(output.status.success());
    assert!(!out.join("stale.html").exists(), "stale file survived");
    assert!(out.join("2021-04-12.html").exists());
}

// ---------------------------------------------------------------------------
// --json: machine-readable report on stdout
// ---------------------------------------------------------------------------

#[test]
fn json_report_is_machine_readable() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, dates) = write_fixtures(tmp.path());
    let out = tmp.path().join("archive");

    let mut args = migrate_args(&export, &dates, &out);
    args.extend(["--json".into(), "--quiet".into()]);
    let output = decant().args(args).output().expect("decant migrate --json");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON report");

    assert_eq!(report["meta"]["link_policy"], "continue");
    assert_eq!(report["summary"]["records"], 5);
    assert_eq!(report["summary"]["drafts"], 3);
    assert_eq!(report["summary"]["posts"], 3);
    assert_eq!(report["summary"]["superseded"], 0);

    let files: Vec<&str> = report["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert_eq!(
        files,
        ["2020-03-03.html", "2021-04-12.html", "2022-06-05.html"]
    );

    // One missing-body warning, tagged by kind
    let warnings = report["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["missing_body"]["title"], "Quiet Post");
}

// ---------------------------------------------------------------------------
// Link policies: --legacy-link-parity stops at the first dead token
// ---------------------------------------------------------------------------

#[test]
fn legacy_parity_changes_the_rewrite_counts() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, dates) = write_fixtures(tmp.path());

    let run = |parity: bool| -> serde_json::Value {
        let out = tmp.path().join(if parity { "parity" } else { "continue" });
        let mut args = migrate_args(&export, &dates, &out);
        args.extend([
            "--link-host".into(),
            LINK_HOST.into(),
            "--json".into(),
            "--quiet".into(),
        ]);
        if parity {
            args.push("--legacy-link-parity".into());
        }
        let output = decant().args(args).output().expect("decant migrate");
        assert!(output.status.success(), "exit code was {:?}", output.status);
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid JSON")
    };

    let continue_report = run(false);
    let parity_report = run(true);

    // The "Launch Day" body holds [dead, retro]. Continue resolves retro;
    // parity stops at dead and leaves retro alone.
    assert_eq!(continue_report["summary"]["links_rewritten"], 1);
    assert_eq!(continue_report["summary"]["links_unresolved"], 1);
    assert_eq!(parity_report["summary"]["links_rewritten"], 0);
    assert_eq!(parity_report["summary"]["links_unresolved"], 1);
    assert_eq!(parity_report["meta"]["link_policy"], "legacy_parity");

    let continue_body =
        std::fs::read_to_string(tmp.path().join("continue/2021-04-12.html")).unwrap();
    let parity_body = std::fs::read_to_string(tmp.path().join("parity/2021-04-12.html")).unwrap();
    assert!(continue_body.contains("../2022-06-05"));
    assert!(parity_body.contains("https://wiki.example.com/x/retro"));
}

// ---------------------------------------------------------------------------
// --report: same JSON document written to a file
// ---------------------------------------------------------------------------

#[test]
fn report_file_is_written() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, dates) = write_fixtures(tmp.path());
    let out = tmp.path().join("archive");
    let report_path = tmp.path().join("report.json");

    let mut args = migrate_args(&export, &dates, &out);
    args.extend([
        "--report".into(),
        report_path.to_str().unwrap().into(),
        "--quiet".into(),
    ]);
    let output = decant().args(args).output().expect("decant migrate --report");

    assert!(output.status.success());
    // Without --json nothing goes to stdout
    assert!(output.stdout.is_empty(), "stdout should stay empty");

    let text = std::fs::read_to_string(&report_path).expect("report file");
    assert!(text.ends_with('\n'));
    let report: serde_json::Value = serde_json::from_str(&text).expect("valid JSON report");
    assert_eq!(report["summary"]["posts"], 3);
}

// ---------------------------------------------------------------------------
// --quiet: progress silenced, warnings still audible
// ---------------------------------------------------------------------------

#[test]
fn quiet_keeps_warnings_but_drops_progress() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, dates) = write_fixtures(tmp.path());
    let out = tmp.path().join("archive");

    let mut args = migrate_args(&export, &dates, &out);
    args.push("--quiet".into());
    let output = decant().args(args).output().expect("decant migrate --quiet");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: "), "warnings must survive --quiet");
    assert!(!stderr.contains("Done:"), "summary line should be silenced");
    assert!(
        !stderr.contains("2021-04-12.html"),
        "per-file progress should be silenced"
    );
}

// ---------------------------------------------------------------------------
// inspect: census without writing anything
// ---------------------------------------------------------------------------

#[test]
fn inspect_prints_the_census() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, _dates) = write_fixtures(tmp.path());

    let output = decant()
        .args(["inspect", export.to_str().unwrap()])
        .output()
        .expect("decant inspect");

    assert!(output.status.success(), "exit code was {:?}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("records: 5"), "stdout: {stdout}");
    assert!(stdout.contains("  BlogPost: 3"));
    assert!(stdout.contains("  BodyContent: 2"));
    assert!(stdout.contains("drafts: 3"));
    assert!(stdout.contains("bodies: 2"));
    assert!(stdout.contains("unrecognized: 0"));
    assert!(stdout.contains("canonical posts: 3"));
}

// ---------------------------------------------------------------------------
// Failure modes and exit codes
// ---------------------------------------------------------------------------

#[test]
fn missing_export_is_fatal() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (_export, dates) = write_fixtures(tmp.path());
    let out = tmp.path().join("archive");

    let output = decant()
        .args(migrate_args(&tmp.path().join("nope.xml"), &dates, &out))
        .output()
        .expect("decant migrate");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: "), "stderr: {stderr}");
    assert!(stderr.contains("nope.xml"));
}

#[test]
fn malformed_dates_line_is_fatal() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let (export, _dates) = write_fixtures(tmp.path());
    let bad_dates = tmp.path().join("bad.txt");
    std::fs::write(&bad_dates, "no colons here\n").unwrap();
    let out = tmp.path().join("archive");

    let output = decant()
        .args(migrate_args(&export, &bad_dates, &out))
        .output()
        .expect("decant migrate");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("authority line 1"),
        "error should carry the line number: {stderr}"
    );
}

#[test]
fn missing_arguments_exit_with_usage_code() {
    let output = decant().args(["migrate"]).output().expect("decant migrate");
    assert_eq!(output.status.code(), Some(2));
}
