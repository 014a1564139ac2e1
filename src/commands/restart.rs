// ABOUTME: Restart command implementation.
// ABOUTME: Re-reads the deploy descriptor and patches an existing workload.

use kaas_build::config::Settings;
use kaas_build::error::Result;
use kaas_build::output::Output;
use kaas_build::pipeline::{RequestError, RestartRequest, config_arg};
use kaas_build::types::WorkloadName;

use super::connect;

pub struct RestartArgs {
    pub name: String,
    pub repo_url: String,
    pub branch: String,
    pub deploy_conf: Option<String>,
    pub namespace: Option<String>,
}

pub async fn restart(settings: Settings, args: RestartArgs, mut output: Output) -> Result<()> {
    let name = WorkloadName::new(&args.name).map_err(RequestError::from)?;
    let request = RestartRequest::new(name, args.repo_url, Some(args.branch))
        .with_deploy_config(config_arg("deploy-conf", args.deploy_conf.as_deref())?);
    let namespace = args.namespace.unwrap_or_else(|| settings.namespace.clone());

    output.start_timer();
    let pipeline = connect::pipeline(&settings, &namespace, &output).await?;

    output.progress(&format!("→ Restarting {}...", request.name));
    let image = pipeline.restart(&request).await?;

    output.success(image.as_str());
    Ok(())
}
