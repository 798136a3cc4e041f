use cumulus_platform::Credential;
use cumulus_submit::{JobSubmitter, SubmitConfig};
use std::path::Path;

pub async fn execute(config_path: &Path, token: &str) -> anyhow::Result<()> {
    let config = SubmitConfig::load(config_path)?;
    let submitter = JobSubmitter::new(super::platform_for(&config));
    let credential = Credential::cli_session(token);

    let workspace = submitter.resolve_workspace(&credential, &config).await?;
    println!("workspace {} resolved", workspace.key());
    Ok(())
}
