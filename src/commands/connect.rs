// ABOUTME: Shared helpers for connecting to the build engine and the cluster.
// ABOUTME: Wires the real clients into a Pipeline for the one-shot and server commands.

use std::sync::Arc;

use kaas_build::cluster::KubeCluster;
use kaas_build::config::Settings;
use kaas_build::error::Result;
use kaas_build::output::Output;
use kaas_build::pipeline::{Pipeline, PipelineSettings};
use kaas_build::runtime::{BollardRuntime, RuntimeError, RuntimeInfo, resolve_runtime};
use kaas_build::source::GitCli;

/// Connect to the build engine named by settings, or the first one found locally.
///
/// The engine is pinged so a dead socket fails before any clone starts.
pub async fn connect_to_engine(settings: &Settings, output: &Output) -> Result<BollardRuntime> {
    output.progress("→ Detecting build engine...");
    let detected = resolve_runtime(&settings.runtime).map_err(RuntimeError::from)?;

    output.progress(&format!(
        "→ Found {} at {}",
        detected.runtime_type, detected.socket_path
    ));

    let engine =
        BollardRuntime::connect(&detected, settings.runtime.timeout).map_err(RuntimeError::from)?;
    engine.ping().await.map_err(RuntimeError::from)?;
    Ok(engine)
}

/// Connect to the cluster in the configured namespace.
pub async fn connect_to_cluster(
    settings: &Settings,
    namespace: &str,
    output: &Output,
) -> Result<KubeCluster> {
    output.progress(&format!("→ Connecting to cluster (namespace {namespace})..."));
    let cluster = KubeCluster::connect(namespace, settings.cluster.context.as_deref()).await?;
    Ok(cluster)
}

/// Build a pipeline backed by git, the local build engine, and the cluster.
pub async fn pipeline(settings: &Settings, namespace: &str, output: &Output) -> Result<Pipeline> {
    let engine = connect_to_engine(settings, output).await?;
    let cluster = connect_to_cluster(settings, namespace, output).await?;

    Ok(Pipeline::new(
        Arc::new(GitCli::default()),
        Arc::new(engine),
        Arc::new(cluster),
        PipelineSettings::from_settings(settings)?,
    ))
}
