//! Parsing of the changed-files list.

use std::path::Path;

use impactlens_core::{ChangeRecord, ImpactError};

/// Read and parse a changed-files list from `path`.
///
/// An unreadable file is logged and treated as an empty list; callers decide
/// whether "no changes" is fatal.
///
/// # Examples
///
/// ```no_run
/// use impactlens_collect::changes::read_changed_files;
/// use std::path::Path;
///
/// let records = read_changed_files(Path::new("changed_files.txt"));
/// println!("{} changed files", records.len());
/// ```
pub fn read_changed_files(path: &Path) -> Vec<ChangeRecord> {
    match try_read_changed_files(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(path = %path.display(), "error parsing changed files: {e}");
            Vec::new()
        }
    }
}

fn try_read_changed_files(path: &Path) -> Result<Vec<ChangeRecord>, ImpactError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_changed_files(&content))
}

/// Parse `<status>\t<path>[\t...]` lines into [`ChangeRecord`]s.
///
/// Lines are trimmed; blank lines and lines with fewer than two
/// tab-separated fields are skipped. Extra fields (such as the destination
/// of a rename) are ignored.
///
/// # Examples
///
/// ```
/// use impactlens_collect::changes::parse_changed_files;
///
/// let records = parse_changed_files("M\tsrc/lib.rs\n\nbogus\nR100\told.rs\tnew.rs\n");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].status, "R100");
/// assert_eq!(records[1].file, "old.rs");
/// ```
pub fn parse_changed_files(content: &str) -> Vec<ChangeRecord> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let status = fields.next()?;
            let file = fields.next()?;
            Some(ChangeRecord {
                status: status.to_string(),
                file: file.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_lines_in_order() {
        let records = parse_changed_files("M\tsrc/foo.py\nA\tnew.txt\nD\tgone.rs\n");
        let files: Vec<&str> = records.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, ["src/foo.py", "new.txt", "gone.rs"]);
        assert_eq!(records[0].status, "M");
    }

    #[test]
    fn skips_blank_and_short_lines() {
        let input = "\n   \nM src/space-separated.rs\nonly-one-field\nA\tkept.rs\n";
        let records = parse_changed_files(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file, "kept.rs");
    }

    #[test]
    fn output_never_exceeds_non_blank_lines() {
        let input = "M\ta\n\nx\nA\tb\tc\n\t\n";
        let non_blank = input.lines().filter(|l| !l.trim().is_empty()).count();
        assert!(parse_changed_files(input).len() <= non_blank);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let records = parse_changed_files("M\tsrc/a.rs\r\nA\tsrc/b.rs\r\n");
        assert_eq!(records[0].file, "src/a.rs");
        assert_eq!(records[1].file, "src/b.rs");
    }

    #[test]
    fn rename_keeps_first_path() {
        let records = parse_changed_files("R087\tsrc/old.rs\tsrc/new.rs");
        assert_eq!(records[0].file, "src/old.rs");
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_changed_files(&dir.path().join("nope.txt"));
        assert!(records.is_empty());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("changed_files.txt");
        std::fs::write(&path, "M\tREADME.md\n").unwrap();
        let records = read_changed_files(&path);
        assert_eq!(
            records,
            vec![ChangeRecord {
                status: "M".into(),
                file: "README.md".into()
            }]
        );
    }
}
