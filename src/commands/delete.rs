// ABOUTME: Delete command implementation.
// ABOUTME: Removes a workload; needs only the cluster, not the build engine.

use kaas_build::config::Settings;
use kaas_build::error::Result;
use kaas_build::output::Output;
use kaas_build::pipeline::{self, RemoveRequest};

use super::connect;

pub async fn delete(
    settings: Settings,
    name: String,
    namespace: Option<String>,
    mut output: Output,
) -> Result<()> {
    let request = RemoveRequest::new(&name)?;
    let namespace = namespace.unwrap_or_else(|| settings.namespace.clone());

    output.start_timer();
    let cluster = connect::connect_to_cluster(&settings, &namespace, &output).await?;

    output.progress(&format!("→ Deleting {}...", request.name));
    let removed = pipeline::remove(&cluster, &request).await?;

    output.success(removed.as_str());
    Ok(())
}
