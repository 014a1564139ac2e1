// ABOUTME: Build command implementation.
// ABOUTME: Runs the CREATE pipeline once and reports the built image tag.

use kaas_build::config::Settings;
use kaas_build::error::Result;
use kaas_build::output::Output;
use kaas_build::pipeline::{CreateRequest, config_arg};

use super::connect;

pub struct BuildArgs {
    pub repo_url: String,
    pub branch: String,
    pub deploy_conf: Option<String>,
    pub service_conf: Option<String>,
    pub no_push: bool,
    pub namespace: Option<String>,
}

pub async fn build(mut settings: Settings, args: BuildArgs, mut output: Output) -> Result<()> {
    // Fail on bad arguments before connecting to anything.
    let request = CreateRequest::new(args.repo_url, Some(args.branch))
        .with_deploy_config(config_arg("deploy-conf", args.deploy_conf.as_deref())?)
        .with_service_config(config_arg("service-conf", args.service_conf.as_deref())?);

    if args.no_push {
        settings.push = false;
    }
    let namespace = args.namespace.unwrap_or_else(|| settings.namespace.clone());

    output.start_timer();
    let pipeline = connect::pipeline(&settings, &namespace, &output).await?;

    output.progress(&format!("→ Building {}...", request.repo_url));
    let image = pipeline.create(&request).await?;

    output.success(image.as_str());
    Ok(())
}
