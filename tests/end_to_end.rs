use std::fs;
use std::path::Path;

use relabel::executor::{self, ExecuteOptions, AUDIT_LOG_FILE, CONFIG_ARTIFACT};
use relabel::tracker::{AuditLog, ReplacementTracker};

fn seed_tree(root: &Path) {
    fs::write(
        root.join("page.html"),
        "<input id=\"old-forge-id\">\n<label for=\"old-forge-id\">Name</label>\n<label for='old-forge-id'>Alt</label>\n",
    )
    .unwrap();
    fs::write(
        root.join("app.js"),
        "document.getElementById('old-forge-id');\nconst el = $('#old-forge-id');\nlet sel = \"#old-forge-id\";\nel.dataset.target = 'old-forge-id';\n",
    )
    .unwrap();
    fs::write(root.join("style.css"), "#old-forge-id{color:red}\n").unwrap();
}

fn options(root: &Path, dry_run: bool) -> ExecuteOptions {
    ExecuteOptions {
        root: root.to_path_buf(),
        dry_run,
        ignore: Vec::new(),
    }
}

#[test]
fn propagates_rename_across_markup_script_and_style() {
    let dir = tempfile::tempdir().unwrap();
    seed_tree(dir.path());

    let mut tracker = ReplacementTracker::new();
    tracker.track("old-forge-id", "actual-button-id", "x.html");
    let modified = executor::execute_id_replacements(&mut tracker, &options(dir.path(), false))
        .unwrap();

    // Each of the three files exactly once, even though the script file
    // matched several rules.
    assert_eq!(modified.len(), 3);
    assert!(modified.iter().any(|f| f.ends_with("page.html")));
    assert!(modified.iter().any(|f| f.ends_with("app.js")));
    assert!(modified.iter().any(|f| f.ends_with("style.css")));

    let html = fs::read_to_string(dir.path().join("page.html")).unwrap();
    assert!(html.contains("for=\"actual-button-id\""));
    assert!(html.contains("for='actual-button-id'"));
    // The element id attribute was already edited by the migration pass
    // and must be left alone.
    assert!(html.contains("id=\"old-forge-id\""));

    let js = fs::read_to_string(dir.path().join("app.js")).unwrap();
    assert!(js.contains("getElementById(\"actual-button-id\")"));
    assert!(js.contains("$(\"#actual-button-id\")"));
    assert!(js.contains("\"#actual-button-id\""));
    assert!(js.contains("= \"actual-button-id\""));
    assert!(!js.contains("old-forge-id"));

    let css = fs::read_to_string(dir.path().join("style.css")).unwrap();
    assert_eq!(css, "#actual-button-id{color:red}\n");
}

#[test]
fn audit_log_round_trips_with_exact_count() {
    let dir = tempfile::tempdir().unwrap();
    seed_tree(dir.path());

    let mut tracker = ReplacementTracker::new();
    tracker.track("old-forge-id", "actual-button-id", "x.html");
    executor::execute_id_replacements(&mut tracker, &options(dir.path(), false)).unwrap();

    let raw = fs::read_to_string(dir.path().join(AUDIT_LOG_FILE)).unwrap();
    let log: AuditLog = serde_json::from_str(&raw).unwrap();
    assert_eq!(log.summary.total_replacements, tracker.len());
    assert_eq!(log.replacements.len(), 1);
    assert_eq!(log.replacements[0].old_id, "old-forge-id");
    // One tracked entry plus one replaced entry per (rule, changed file):
    // two markup rules on page.html, four script rules on app.js, one
    // style rule on style.css.
    assert_eq!(log.detailed_log.len(), 1 + 7);
    assert!(!dir.path().join(CONFIG_ARTIFACT).exists());
}

#[test]
fn dry_run_reports_same_set_with_zero_writes() {
    let live = tempfile::tempdir().unwrap();
    let dry = tempfile::tempdir().unwrap();
    seed_tree(live.path());
    seed_tree(dry.path());

    let mut live_tracker = ReplacementTracker::new();
    live_tracker.track("old-forge-id", "actual-button-id", "x.html");
    let live_modified =
        executor::execute_id_replacements(&mut live_tracker, &options(live.path(), false))
            .unwrap();

    let mut dry_tracker = ReplacementTracker::new();
    dry_tracker.track("old-forge-id", "actual-button-id", "x.html");
    let dry_modified =
        executor::execute_id_replacements(&mut dry_tracker, &options(dry.path(), true)).unwrap();

    let strip = |files: &[String], root: &Path| -> Vec<String> {
        files
            .iter()
            .map(|f| f.trim_start_matches(&root.display().to_string()).to_string())
            .collect()
    };
    assert_eq!(
        strip(&live_modified, live.path()),
        strip(&dry_modified, dry.path())
    );

    // Dry run wrote nothing: sources untouched, no artifacts.
    let js = fs::read_to_string(dry.path().join("app.js")).unwrap();
    assert!(js.contains("old-forge-id"));
    assert!(!dry.path().join(CONFIG_ARTIFACT).exists());
    assert!(!dry.path().join(AUDIT_LOG_FILE).exists());
}

#[test]
fn ignore_globs_shield_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    seed_tree(dir.path());

    let mut tracker = ReplacementTracker::new();
    tracker.track("old-forge-id", "actual-button-id", "x.html");
    let opts = ExecuteOptions {
        root: dir.path().to_path_buf(),
        dry_run: false,
        ignore: vec!["**/app.js".to_string()],
    };
    let modified = executor::execute_id_replacements(&mut tracker, &opts).unwrap();

    assert_eq!(modified.len(), 2);
    let js = fs::read_to_string(dir.path().join("app.js")).unwrap();
    assert!(js.contains("getElementById('old-forge-id')"));
}

#[test]
fn second_run_over_converted_tree_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    seed_tree(dir.path());

    let mut tracker = ReplacementTracker::new();
    tracker.track("old-forge-id", "actual-button-id", "x.html");
    executor::execute_id_replacements(&mut tracker, &options(dir.path(), false)).unwrap();

    let mut second = ReplacementTracker::new();
    second.track("old-forge-id", "actual-button-id", "x.html");
    let modified =
        executor::execute_id_replacements(&mut second, &options(dir.path(), false)).unwrap();

    assert!(modified.is_empty());
}

#[test]
fn nested_dependency_directories_are_untouched() {
    let dir = tempfile::tempdir().unwrap();
    seed_tree(dir.path());
    let deps = dir.path().join("node_modules").join("widget");
    fs::create_dir_all(&deps).unwrap();
    fs::write(deps.join("lib.js"), "getElementById('old-forge-id');\n").unwrap();

    let mut tracker = ReplacementTracker::new();
    tracker.track("old-forge-id", "actual-button-id", "x.html");
    let modified =
        executor::execute_id_replacements(&mut tracker, &options(dir.path(), false)).unwrap();

    assert!(modified.iter().all(|f| !f.contains("node_modules")));
    let lib = fs::read_to_string(deps.join("lib.js")).unwrap();
    assert!(lib.contains("old-forge-id"));
}
