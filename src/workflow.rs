//! Change classification and publication.
//!
//! One linear decision per run:
//! - empty status report: nothing to do
//! - tracked file untouched: skip
//! - otherwise upload, then open a pull request if new files appeared or push
//!   straight to the main line if only existing files changed

use tracing::info;

use crate::config::Settings;
use crate::error::Error;
use crate::status::StatusReport;

/// Supplies the working-tree status report.
#[allow(async_fn_in_trait)]
pub trait ChangeSource {
    async fn changes(&self) -> Result<String, Error>;
}

/// Uploads translatable content.
#[allow(async_fn_in_trait)]
pub trait Uploader {
    async fn upload(&self) -> Result<(), Error>;
}

/// Publishes the working-tree changes.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn publish(&self, publication: &Publication) -> Result<(), Error>;
}

/// Author and message of the publication commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub email: String,
    pub name: String,
    pub message: String,
}

/// How changes reach the main line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    /// Commit to `branch` and open (or update) a pull request into `base`.
    PullRequest {
        branch: String,
        base: String,
        body: String,
        identity: CommitIdentity,
    },
    /// Commit and push directly to `target`.
    DirectPush {
        target: String,
        identity: CommitIdentity,
    },
}

impl Publication {
    pub fn pull_request(settings: &Settings) -> Self {
        Publication::PullRequest {
            branch: settings.publish.pr_branch.clone(),
            base: settings.publish.base_branch.clone(),
            body: settings.publish.pr_body.clone(),
            identity: CommitIdentity::from_settings(settings),
        }
    }

    pub fn direct_push(settings: &Settings) -> Self {
        Publication::DirectPush {
            target: settings.publish.base_branch.clone(),
            identity: CommitIdentity::from_settings(settings),
        }
    }
}

impl CommitIdentity {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            email: settings.publish.author_email.clone(),
            name: settings.publish.author_name.clone(),
            message: settings.publish.commit_message.clone(),
        }
    }
}

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NothingToDo,
    Skipped,
    PullRequest { new_files: usize },
    DirectPush,
}

/// Which path a report leads to, before any side effect.
pub fn decide(report: &StatusReport, tracked_file: &str) -> Outcome {
    if report.is_empty() {
        Outcome::NothingToDo
    } else if !report.is_modified(tracked_file) {
        Outcome::Skipped
    } else {
        match report.new_files().len() {
            0 => Outcome::DirectPush,
            new_files => Outcome::PullRequest { new_files },
        }
    }
}

/// Inspect the working tree and publish documentation changes.
pub async fn process_changes<C, U, P>(
    settings: &Settings,
    source: &C,
    uploader: &U,
    publisher: &P,
) -> Result<Outcome, Error>
where
    C: ChangeSource,
    U: Uploader,
    P: Publisher,
{
    let output = source.changes().await?;
    let report = StatusReport::parse(&output)?;

    let outcome = decide(&report, &settings.tracked_file);
    match outcome {
        Outcome::NothingToDo => {
            info!("Nothing updated, skipping");
            return Ok(outcome);
        }
        Outcome::Skipped => {
            info!("{} is not modified, skipping", settings.tracked_file);
            return Ok(outcome);
        }
        Outcome::PullRequest { .. } | Outcome::DirectPush => {}
    }

    info!("Uploading changes for translation");
    uploader.upload().await?;

    if let Outcome::PullRequest { .. } = outcome {
        let listing = report
            .new_files()
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        info!("New documents available:\n{}", listing);
        publisher.publish(&Publication::pull_request(settings)).await?;
    } else {
        info!("Only existing content has been modified. Pushing changes directly.");
        publisher.publish(&Publication::direct_push(settings)).await?;
    }

    Ok(outcome)
}
