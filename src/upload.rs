//! Translation upload collaborator.

use tracing::debug;

use crate::command::{CommandRunner, Invocation};
use crate::config::UploadSettings;
use crate::error::Error;
use crate::workflow::Uploader;

/// Runs the configured upload command (`yarn crowdin:upload` by default).
pub struct CommandUploader<R> {
    runner: R,
    invocation: Invocation,
}

impl<R: CommandRunner> CommandUploader<R> {
    pub fn new(runner: R, settings: &UploadSettings) -> Result<Self, Error> {
        Ok(Self {
            runner,
            invocation: Invocation::from_argv(&settings.command)?,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> Uploader for CommandUploader<R> {
    async fn upload(&self) -> Result<(), Error> {
        let output = self.runner.run(&self.invocation).await?;
        for line in output.lines().filter(|l| !l.trim().is_empty()) {
            debug!("{}", line);
        }
        Ok(())
    }
}
