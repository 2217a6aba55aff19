//! Git and GitHub collaborators.
//!
//! Status comes from `git status --porcelain`. Publishing commits with a fixed
//! identity, then either pushes to the main line or force-pushes a review
//! branch and makes sure a pull request is open for it (through `gh`).

use serde::Deserialize;
use tracing::info;

use crate::command::{CommandRunner, Invocation};
use crate::error::Error;
use crate::workflow::{ChangeSource, CommitIdentity, Publication, Publisher};

/// Open pull request, as listed by `gh pr list --json number`.
#[derive(Debug, Deserialize)]
struct PullRequestRef {
    number: u64,
}

/// Git repository reached through a [`CommandRunner`].
pub struct Git<R> {
    runner: R,
    remote: String,
    credential: Option<String>,
}

impl<R: CommandRunner> Git<R> {
    pub fn new(runner: R, remote: impl Into<String>, credential: Option<String>) -> Self {
        Self {
            runner,
            remote: remote.into(),
            credential,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn git(&self) -> Invocation {
        Invocation::new("git")
    }

    fn gh(&self) -> Invocation {
        let gh = Invocation::new("gh");
        match self.credential {
            Some(ref token) => gh.env("GH_TOKEN", token.clone()),
            None => gh,
        }
    }

    async fn commit_all(&self, identity: &CommitIdentity) -> Result<(), Error> {
        self.runner.run(&self.git().args(["add", "-A"])).await?;
        self.runner
            .run(&self.git().args([
                "-c".to_string(),
                format!("user.email={}", identity.email),
                "-c".to_string(),
                format!("user.name={}", identity.name),
                "commit".to_string(),
                "-m".to_string(),
                identity.message.clone(),
            ]))
            .await?;
        Ok(())
    }

    async fn push_direct(&self, target: &str, identity: &CommitIdentity) -> Result<(), Error> {
        self.commit_all(identity).await?;
        self.runner
            .run(&self.git().args([
                "push".to_string(),
                self.remote.clone(),
                format!("HEAD:{}", target),
            ]))
            .await?;
        info!(remote = %self.remote, branch = %target, "Pushed changes");
        Ok(())
    }

    async fn push_for_review(
        &self,
        branch: &str,
        base: &str,
        body: &str,
        identity: &CommitIdentity,
    ) -> Result<(), Error> {
        self.runner
            .run(&self.git().args(["checkout", "-B", branch]))
            .await?;
        self.commit_all(identity).await?;
        self.runner
            .run(&self.git().args(["push", "--force", self.remote.as_str(), branch]))
            .await?;
        info!(remote = %self.remote, branch = %branch, "Pushed review branch");

        if let Some(existing) = self.open_pull_request(branch, base).await? {
            info!(number = existing, "Updated existing pull request");
            return Ok(());
        }

        let url = self
            .runner
            .run(&self.gh().args([
                "pr",
                "create",
                "--head",
                branch,
                "--base",
                base,
                "--title",
                identity.message.as_str(),
                "--body",
                body,
            ]))
            .await?;
        info!(url = %url.trim(), "Created pull request");
        Ok(())
    }

    async fn open_pull_request(&self, branch: &str, base: &str) -> Result<Option<u64>, Error> {
        let output = self
            .runner
            .run(&self.gh().args([
                "pr", "list", "--head", branch, "--base", base, "--state", "open", "--json",
                "number",
            ]))
            .await?;

        if output.trim().is_empty() {
            return Ok(None);
        }
        let open: Vec<PullRequestRef> = serde_json::from_str(&output)?;
        Ok(open.first().map(|pr| pr.number))
    }
}

impl<R: CommandRunner> ChangeSource for Git<R> {
    async fn changes(&self) -> Result<String, Error> {
        self.runner
            .run(&self.git().args(["-c", "core.quotePath=false", "status", "--porcelain"]))
            .await
    }
}

impl<R: CommandRunner> Publisher for Git<R> {
    async fn publish(&self, publication: &Publication) -> Result<(), Error> {
        match publication {
            Publication::PullRequest {
                branch,
                base,
                body,
                identity,
            } => self.push_for_review(branch, base, body, identity).await,
            Publication::DirectPush { target, identity } => {
                self.push_direct(target, identity).await
            }
        }
    }
}
