//! Behavior of the in-memory platform boundary.

use cumulus_platform::{
    ComputeTargetSource, Credential, EnvironmentSpec, LocalPlatform, MlPlatform, PlatformError,
    RunStatus, ScriptRunConfig, WorkspaceCoordinates,
};

fn known_coords() -> WorkspaceCoordinates {
    WorkspaceCoordinates::new("sub-1", "rg-1", "ws-1")
}

fn seeded_platform() -> LocalPlatform {
    LocalPlatform::builder()
        .with_valid_token("cli-session-token")
        .with_workspace(&known_coords())
        .with_compute_target(&known_coords(), "zenml-compute")
        .build()
}

fn credential() -> Credential {
    Credential::cli_session("cli-session-token")
}

#[tokio::test]
async fn test_workspace_resolution_returns_exact_coordinates() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();
    assert_eq!(ws.coordinates, known_coords());
    assert_eq!(ws.name(), "ws-1");
}

#[tokio::test]
async fn test_unknown_workspace_coordinates_fail_with_not_found() {
    let platform = seeded_platform();
    let unknown = WorkspaceCoordinates::new("sub-1", "rg-1", "no-such-ws");
    let err = platform.get_workspace(&credential(), &unknown).await.unwrap_err();
    assert!(matches!(err, PlatformError::WorkspaceNotFound(_)), "got {err}");
}

#[tokio::test]
async fn test_invalid_credential_fails_with_authentication_error() {
    let platform = seeded_platform();
    let bad = Credential::cli_session("expired");
    let err = platform.get_workspace(&bad, &known_coords()).await.unwrap_err();
    assert!(matches!(err, PlatformError::Authentication(_)), "got {err}");
}

#[tokio::test]
async fn test_environment_registration_is_idempotent_by_content() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();
    let spec = EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1");

    let first = platform.register_environment(&ws, &spec).await.unwrap();
    let second = platform.register_environment(&ws, &spec).await.unwrap();
    assert_eq!(first, second, "identical content must not mint a new version");
    assert_eq!(first.version, 1);
}

#[tokio::test]
async fn test_changed_environment_content_bumps_the_version() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();

    let v1 = platform
        .register_environment(
            &ws,
            &EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1"),
        )
        .await
        .unwrap();
    let v2 = platform
        .register_environment(
            &ws,
            &EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.8.0"),
        )
        .await
        .unwrap();
    assert_eq!(v1.version, 1);
    assert_eq!(v2.version, 2);
    assert_ne!(v1.fingerprint, v2.fingerprint);
}

#[tokio::test]
async fn test_malformed_image_reference_is_rejected() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();
    let err = platform
        .register_environment(&ws, &EnvironmentSpec::from_docker_image("dockerenv", "not an image"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::EnvironmentRegistration(_)), "got {err}");
}

#[tokio::test]
async fn test_experiment_resolution_is_get_or_create() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();

    let first = platform.get_or_create_experiment(&ws, "zenml_experiment").await.unwrap();
    let second = platform.get_or_create_experiment(&ws, "zenml_experiment").await.unwrap();
    assert_eq!(first, second, "same name must resolve to the same logical experiment");
}

#[tokio::test]
async fn test_unknown_compute_target_is_never_created() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();
    let missing = ComputeTargetSource::ByName { name: "no-such-cluster".to_string() };

    let err = platform.get_compute_target(&ws, &missing).await.unwrap_err();
    assert!(matches!(err, PlatformError::ComputeTargetNotFound(_)), "got {err}");
    // Still absent on a second resolution attempt.
    let err = platform.get_compute_target(&ws, &missing).await.unwrap_err();
    assert!(matches!(err, PlatformError::ComputeTargetNotFound(_)), "got {err}");
}

#[tokio::test]
async fn test_submitting_with_unregistered_environment_fails_before_execution() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();
    let exp = platform.get_or_create_experiment(&ws, "zenml_experiment").await.unwrap();
    let ct = platform
        .get_compute_target(&ws, &ComputeTargetSource::ByName { name: "zenml-compute".into() })
        .await
        .unwrap();

    // Fingerprint of a spec that was never registered.
    let spec = EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1");
    let config = ScriptRunConfig {
        source_directory: "training_scripts".into(),
        script: "train.py".to_string(),
        environment: cumulus_platform::RegisteredEnvironment {
            name: spec.name.clone(),
            version: 1,
            fingerprint: spec.fingerprint().unwrap(),
        },
        compute_target: ct,
    };

    let err = platform.submit_run(&exp, &config).await.unwrap_err();
    assert!(matches!(err, PlatformError::Submission(_)), "got {err}");
}

#[tokio::test]
async fn test_submitted_run_starts_queued_and_reaches_one_terminal_state() {
    let platform = seeded_platform();
    let ws = platform.get_workspace(&credential(), &known_coords()).await.unwrap();
    let env = platform
        .register_environment(
            &ws,
            &EnvironmentSpec::from_docker_image("dockerenv", "tensorflow/tensorflow:2.7.1"),
        )
        .await
        .unwrap();
    let exp = platform.get_or_create_experiment(&ws, "zenml_experiment").await.unwrap();
    let ct = platform
        .get_compute_target(&ws, &ComputeTargetSource::ByName { name: "zenml-compute".into() })
        .await
        .unwrap();

    let run = platform
        .submit_run(
            &exp,
            &ScriptRunConfig {
                source_directory: "training_scripts".into(),
                script: "train.py".to_string(),
                environment: env,
                compute_target: ct,
            },
        )
        .await
        .unwrap();
    assert_eq!(run.status, RunStatus::Queued);

    let mut previous = run.status;
    let mut observed_terminal = None;
    for _ in 0..16 {
        let status = platform.run_status(&run.id).await.unwrap();
        assert!(
            previous.can_transition_to(status),
            "illegal transition {previous} -> {status}"
        );
        previous = status;
        if status.is_terminal() {
            observed_terminal = Some(status);
            break;
        }
    }
    let terminal = observed_terminal.expect("run never reached a terminal state");

    // No transition out of a terminal state, ever.
    for _ in 0..4 {
        assert_eq!(platform.run_status(&run.id).await.unwrap(), terminal);
    }
}
