// ABOUTME: Composition root for the create, restart, and remove pipelines.
// ABOUTME: Holds the injected clients and enforces stage order per run.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

use crate::arch::ArchError;
use crate::build::BuildOptions;
use crate::cluster::{DeploymentController, WorkloadOps};
use crate::config::{DEFAULT_DEPLOY_FILE, DEFAULT_SERVICE_FILE, Settings};
use crate::runtime::BuildEngine;
use crate::source::SourceControl;
use crate::types::{ImageTag, Platform, WorkloadName};

use super::error::{PipelineError, Stage};
use super::lock::WorkloadLocks;
use super::request::{CreateRequest, RemoveRequest, RestartRequest};
use super::result::{Action, PipelineResult};
use super::run::Run;
use super::state::Cloned;

/// The parts of `Settings` a run needs, with env references resolved.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub deploy_file: String,
    pub service_file: String,
    pub work_dir: Option<PathBuf>,
    /// Host platform override; detected from the build target when `None`.
    pub platform: Option<Platform>,
    pub build: BuildOptions,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            deploy_file: DEFAULT_DEPLOY_FILE.to_string(),
            service_file: DEFAULT_SERVICE_FILE.to_string(),
            work_dir: None,
            platform: None,
            build: BuildOptions::default(),
        }
    }
}

impl PipelineSettings {
    pub fn from_settings(settings: &Settings) -> crate::error::Result<Self> {
        Ok(Self {
            deploy_file: settings.deploy_file.clone(),
            service_file: settings.service_file.clone(),
            work_dir: settings.work_dir.clone(),
            platform: settings.platform.clone(),
            build: BuildOptions {
                push: settings.push,
                registry: settings.registry()?,
            },
        })
    }
}

/// Runs pipelines against one set of external systems.
///
/// Shared between concurrent requests; each call owns its own working tree.
pub struct Pipeline {
    scm: Arc<dyn SourceControl>,
    engine: Arc<dyn BuildEngine>,
    cluster: Arc<dyn WorkloadOps>,
    settings: PipelineSettings,
    locks: WorkloadLocks,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("settings", &self.settings)
            .field("locks", &self.locks.len())
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        scm: Arc<dyn SourceControl>,
        engine: Arc<dyn BuildEngine>,
        cluster: Arc<dyn WorkloadOps>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            scm,
            engine,
            cluster,
            settings,
            locks: WorkloadLocks::new(),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// CLONE → CONFIG → ARCH_CHECK → BUILD → (PUSH) → DEPLOY.
    pub async fn create(&self, request: &CreateRequest) -> Result<ImageTag, PipelineError> {
        let started_at = Utc::now();
        let result = self.run_create(request).await;
        PipelineResult::new(Action::Create, &result, started_at).log();
        result
    }

    /// CLONE → CONFIG → RESTART.
    pub async fn restart(&self, request: &RestartRequest) -> Result<ImageTag, PipelineError> {
        let started_at = Utc::now();
        let result = self.run_restart(request).await;
        PipelineResult::new(Action::Restart, &result, started_at).log();
        result
    }

    /// DELETE only. Echoes the removed name.
    pub async fn remove(&self, request: &RemoveRequest) -> Result<WorkloadName, PipelineError> {
        let _lock = self.locks.acquire(&request.name, Action::Remove).await;
        remove(&*self.cluster, request).await
    }

    async fn run_create(&self, request: &CreateRequest) -> Result<ImageTag, PipelineError> {
        let run = self.checkout(&request.repo_url, request.branch.as_deref()).await?;

        let run = run.configure(
            &request.deploy_config,
            &self.settings.deploy_file,
            Some((&request.service_config, &self.settings.service_file)),
        )
        .await?;
        let name = run
            .deploy_descriptor()
            .name()
            .map_err(|e| PipelineError::new(Stage::Config, e))?;
        let _lock = self.locks.acquire(&name, Action::Create).await;

        let host = self.host_platform()?;
        let run = run.check_arch(&host, &*self.engine).await?;
        let run = run.build(&*self.engine, &self.settings.build).await?;
        run.deploy(&*self.cluster, &name).await
    }

    async fn run_restart(&self, request: &RestartRequest) -> Result<ImageTag, PipelineError> {
        let _lock = self.locks.acquire(&request.name, Action::Restart).await;

        let run = self.checkout(&request.repo_url, request.branch.as_deref()).await?;
        let run = run
            .configure(&request.deploy_config, &self.settings.deploy_file, None)
            .await?;
        run.restart(&*self.cluster, &request.name).await
    }

    async fn checkout(&self, url: &str, branch: Option<&str>) -> Result<Run<Cloned>, PipelineError> {
        Run::<Cloned>::checkout(&*self.scm, url, branch, self.settings.work_dir.as_deref()).await
    }

    fn host_platform(&self) -> Result<Platform, PipelineError> {
        match &self.settings.platform {
            Some(platform) => Ok(platform.clone()),
            None => Platform::host()
                .map_err(|e| PipelineError::new(Stage::ArchCheck, ArchError::from(e))),
        }
    }
}

/// Run the DELETE pipeline without a build engine or source client.
///
/// Performs exactly one cluster call.
pub async fn remove<C>(cluster: &C, request: &RemoveRequest) -> Result<WorkloadName, PipelineError>
where
    C: WorkloadOps + ?Sized,
{
    let started_at = Utc::now();
    let result = DeploymentController::new(cluster)
        .remove(&request.name)
        .await
        .map(|()| request.name.clone())
        .map_err(|e| PipelineError::new(Stage::Delete, e));
    PipelineResult::new(Action::Remove, &result, started_at).log();
    result
}
