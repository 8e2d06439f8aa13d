use std::path::Path;
use std::process::Command;

use impactlens_collect::changes::parse_changed_files;
use impactlens_collect::document::{build_document, collect, CollectSettings};
use impactlens_collect::vcs::{GitCli, VersionControl};
use impactlens_core::{FileStatus, StructuredDiffDocument};

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Repository with `origin/main` and `origin/feature` tracking refs.
///
/// main: `src/foo.py` ("old"), `gone.txt`
/// feature: `src/foo.py` ("new"), `new.txt`
fn fixture_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    git(root, &["init", "-q"]);
    git(root, &["config", "user.email", "ci@example.com"]);
    git(root, &["config", "user.name", "CI"]);
    git(root, &["config", "commit.gpgsign", "false"]);

    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/foo.py"), "print('old')\n").unwrap();
    std::fs::write(root.join("gone.txt"), "bye\n").unwrap();
    git(root, &["add", "-A"]);
    git(root, &["commit", "-q", "-m", "base"]);
    git(root, &["update-ref", "refs/remotes/origin/main", "HEAD"]);

    std::fs::write(root.join("src/foo.py"), "print('new')\n").unwrap();
    std::fs::remove_file(root.join("gone.txt")).unwrap();
    std::fs::write(root.join("new.txt"), "hello\n").unwrap();
    git(root, &["add", "-A"]);
    git(root, &["commit", "-q", "-m", "change"]);
    git(root, &["update-ref", "refs/remotes/origin/feature", "HEAD"]);

    dir
}

fn settings() -> CollectSettings {
    CollectSettings::new(Some("feature".into()), Some("main".into()), 100_000).unwrap()
}

#[test]
fn diff_between_remote_branches() {
    let repo = fixture_repo();
    let git = GitCli::new(repo.path());

    let diff = git.file_diff("src/foo.py", "feature", "main").unwrap();

    assert!(diff.contains("-print('old')"));
    assert!(diff.contains("+print('new')"));
}

#[test]
fn diff_with_unknown_branch_fails() {
    let repo = fixture_repo();
    let git = GitCli::new(repo.path());

    assert!(git.file_diff("src/foo.py", "no-such-branch", "main").is_err());
}

#[test]
fn content_present_and_absent() {
    let repo = fixture_repo();
    let git = GitCli::new(repo.path());

    assert_eq!(
        git.file_content("src/foo.py", "main").unwrap().as_deref(),
        Some("print('old')\n")
    );
    assert_eq!(git.file_content("new.txt", "main").unwrap(), None);
    assert_eq!(git.file_content("gone.txt", "feature").unwrap(), None);
}

#[test]
fn document_from_real_repository() {
    let repo = fixture_repo();
    let git = GitCli::new(repo.path());
    let records = parse_changed_files("M\tsrc/foo.py\nA\tnew.txt\nD\tgone.txt\n");

    let doc = build_document(&records, &git, &settings());

    assert_eq!(doc.len(), 3);

    let modified = &doc.files[0];
    assert_eq!(modified.status, FileStatus::Modified);
    assert_eq!(modified.extension, "py");
    assert_eq!(modified.before_content.as_deref(), Some("print('old')\n"));
    assert_eq!(modified.after_content.as_deref(), Some("print('new')\n"));

    let added = &doc.files[1];
    assert!(added.before_content.is_none());
    assert_eq!(added.after_content.as_deref(), Some("hello\n"));
    assert!(added.diff.contains("+hello"));

    let deleted = &doc.files[2];
    assert_eq!(deleted.before_content.as_deref(), Some("bye\n"));
    assert!(deleted.after_content.is_none());
}

#[test]
fn collect_round_trips_through_disk() {
    let repo = fixture_repo();
    let work = tempfile::tempdir().unwrap();
    let changed = work.path().join("changed_files.txt");
    let output = work.path().join("structured_diff.json");
    std::fs::write(&changed, "M\tsrc/foo.py\n").unwrap();

    let doc = collect(&changed, &output, &GitCli::new(repo.path()), &settings()).unwrap();

    let parsed: StructuredDiffDocument =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(parsed, doc);
}
