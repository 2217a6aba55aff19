//! Process documentation changes (default command).

use std::path::Path;

use tracing::info;

use crate::command::SystemRunner;
use crate::config::{Config, Settings};
use crate::error::Error;
use crate::git::Git;
use crate::upload::CommandUploader;
use crate::workflow::{self, ChangeSource, Outcome, Publisher, Uploader};

/// Run the process command against the repository at `repo`.
pub async fn run(config: &Config, repo: &Path, settings_path: Option<&Path>) -> Result<(), Error> {
    let settings = load_settings(repo, settings_path)?;
    let runner = SystemRunner::new(repo);
    let git = Git::new(
        runner.clone(),
        settings.publish.remote.clone(),
        config.credential.clone(),
    );
    let uploader = CommandUploader::new(runner, &settings.upload)?;

    let outcome = run_with(config, &settings, &git, &uploader, &git).await?;
    info!(?outcome, "Done");
    Ok(())
}

/// Load settings from an explicit path or the repository default.
pub fn load_settings(repo: &Path, settings_path: Option<&Path>) -> Result<Settings, Error> {
    match settings_path {
        Some(path) => Settings::load(path),
        None => Settings::load_or_default(repo),
    }
}

/// Validate the execution context, then process changes with the given collaborators.
///
/// The credential check runs before any collaborator is invoked.
pub async fn run_with<C, U, P>(
    config: &Config,
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
    config.validate()?;
    workflow::process_changes(settings, source, uploader, publisher).await
}
