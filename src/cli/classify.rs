//! Show how a status report would be classified, without side effects.

use std::path::Path;

use serde::Serialize;
use tokio::io::AsyncReadExt;

use crate::command::SystemRunner;
use crate::config::Settings;
use crate::error::Error;
use crate::git::Git;
use crate::status::StatusReport;
use crate::workflow::{self, ChangeSource, Outcome};

/// Classification summary printed by `docs-sync classify`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub tracked_file: String,
    pub modified: bool,
    pub new_files: Vec<String>,
    pub action: &'static str,
}

impl Classification {
    pub fn from_report(report: &StatusReport, settings: &Settings) -> Self {
        let action = match workflow::decide(report, &settings.tracked_file) {
            Outcome::NothingToDo => "nothing_to_do",
            Outcome::Skipped => "skip",
            Outcome::PullRequest { .. } => "pull_request",
            Outcome::DirectPush => "direct_push",
        };

        Self {
            tracked_file: settings.tracked_file.clone(),
            modified: report.is_modified(&settings.tracked_file),
            new_files: report
                .new_files()
                .iter()
                .map(|entry| entry.to_string())
                .collect(),
            action,
        }
    }

    /// Human-readable rendering.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}: {}\n",
            self.tracked_file,
            if self.modified { "modified" } else { "not modified" }
        );
        if self.new_files.is_empty() {
            out.push_str("New files: none\n");
        } else {
            out.push_str("New files:\n");
            for line in &self.new_files {
                out.push_str(&format!("  {}\n", line));
            }
        }
        out.push_str(&format!("Action: {}", self.action.replace('_', " ")));
        out
    }
}

/// Run the classify command.
///
/// `input` is a file with porcelain output, `-` for stdin, or `None` to query
/// git in `repo`.
pub async fn run(
    repo: &Path,
    settings_path: Option<&Path>,
    input: Option<&Path>,
    json: bool,
) -> Result<(), Error> {
    let settings = super::process::load_settings(repo, settings_path)?;

    let text = match input {
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let git = Git::new(SystemRunner::new(repo), settings.publish.remote.clone(), None);
            git.changes().await?
        }
    };

    let report = StatusReport::parse(&text)?;
    let classification = Classification::from_report(&report, &settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        println!("{}", classification.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Classification {
        let report = StatusReport::parse(text).unwrap();
        Classification::from_report(&report, &Settings::default())
    }

    #[test]
    fn test_classify_pull_request() {
        let c = classify("M  package.json\n?? docs/a.md");
        assert!(c.modified);
        assert_eq!(c.new_files, vec!["?? docs/a.md"]);
        assert_eq!(c.action, "pull_request");
    }

    #[test]
    fn test_classify_direct_push() {
        let c = classify("M  package.json\nM  docs/b.md");
        assert!(c.modified);
        assert!(c.new_files.is_empty());
        assert_eq!(c.action, "direct_push");
    }

    #[test]
    fn test_classify_skip_and_noop() {
        assert_eq!(classify("?? docs/a.md").action, "skip");
        assert_eq!(classify("").action, "nothing_to_do");
    }

    #[test]
    fn test_json_shape() {
        let c = classify("M  package.json\n?? docs/a.md");
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["tracked_file"], "package.json");
        assert_eq!(value["modified"], true);
        assert_eq!(value["new_files"][0], "?? docs/a.md");
        assert_eq!(value["action"], "pull_request");
    }

    #[test]
    fn test_render() {
        let rendered = classify("M  package.json\n?? docs/a.md").render();
        assert_eq!(
            rendered,
            "package.json: modified\nNew files:\n  ?? docs/a.md\nAction: pull request"
        );
    }

    #[tokio::test]
    async fn test_run_reads_input_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("status.txt");
        std::fs::write(&input, "M  package.json\n").unwrap();

        run(dir.path(), None, Some(&input), true).await.unwrap();
    }
}
