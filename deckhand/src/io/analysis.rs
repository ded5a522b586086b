//! Analysis artifact writer.
//!
//! Each analysis is persisted once as a timestamped markdown file and never
//! re-read by the assistant.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Write the analysis for `project` into `dir`, returning the file path.
///
/// The file is named `<project>_analysis_<YYYYmmdd_HHMMSS>.md`.
pub fn save_analysis(
    dir: &Path,
    project: &str,
    analysis: &str,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create analysis dir {}", dir.display()))?;

    let filename = format!("{project}_analysis_{}.md", now.format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    let mut buf = String::new();
    buf.push_str(&format!("# Copilot Analysis for {project}\n\n"));
    buf.push_str(&format!(
        "Generated on: {}\n\n",
        now.format("%Y-%m-%d %H:%M:%S")
    ));
    buf.push_str("## Analysis\n\n");
    buf.push_str(analysis);
    if !buf.ends_with('\n') {
        buf.push('\n');
    }

    fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "analysis saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_timestamped_markdown() {
        let temp = tempfile::tempdir().expect("tempdir");
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 34, 56).unwrap();

        let path = save_analysis(temp.path(), "my-site", "All good.", now).expect("save");

        assert!(path.ends_with("my-site_analysis_20240309_123456.md"));
        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.starts_with("# Copilot Analysis for my-site\n"));
        assert!(contents.contains("Generated on: 2024-03-09 12:34:56"));
        assert!(contents.contains("## Analysis\n\nAll good.\n"));
    }

    #[test]
    fn creates_missing_analysis_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("nested").join("analysis");
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();

        let path = save_analysis(&dir, "p", "text", now).expect("save");
        assert!(path.is_file());
    }
}
