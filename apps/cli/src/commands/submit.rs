use anyhow::bail;
use cumulus_platform::{Credential, RunStatus};
use cumulus_submit::{JobSubmitter, StdoutRunSink, SubmitConfig, WaitPolicy};
use std::path::Path;

pub async fn execute(config_path: &Path, no_wait: bool, token: &str) -> anyhow::Result<()> {
    let config = SubmitConfig::load(config_path)?;
    let submitter = JobSubmitter::new(super::platform_for(&config));
    let credential = Credential::cli_session(token);

    let run = submitter.submit(&credential, &config).await?;
    println!("submitted run {} under experiment {}", run.id, run.experiment);

    if no_wait {
        return Ok(());
    }

    let status = submitter
        .wait_for_completion(&run, &WaitPolicy::from(&config.wait), &StdoutRunSink)
        .await?;
    match status {
        RunStatus::Completed => Ok(()),
        other => bail!("run {} finished with status {other}", run.id),
    }
}
