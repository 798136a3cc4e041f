pub mod check;
pub mod submit;

use cumulus_platform::{ComputeTargetSource, LocalPlatform};
use cumulus_submit::SubmitConfig;

/// The platform the CLI talks to.
///
/// The only backend shipped here is the in-memory one, seeded from the
/// configuration so the full submission sequence runs end to end in-process.
/// A remote backend plugs in at the `MlPlatform` trait.
pub(crate) fn platform_for(config: &SubmitConfig) -> LocalPlatform {
    let mut builder = LocalPlatform::builder().with_workspace(&config.workspace);
    if let ComputeTargetSource::ByName { name } = &config.compute {
        builder = builder.with_compute_target(&config.workspace, name.clone());
    }
    builder.build()
}
