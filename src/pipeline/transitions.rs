// ABOUTME: State transition methods for pipeline runs.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::path::Path;

use crate::arch;
use crate::build::{BuildOptions, ImageBuilder};
use crate::cluster::{DeploymentController, WorkloadOps};
use crate::descriptor::{self, ConfigError, ConfigRef, DeployDescriptor, ServiceDescriptor};
use crate::runtime::{ImageOps, RegistryOps};
use crate::source::{self, SourceControl};
use crate::types::{ImageTag, Platform, WorkloadName};

use super::error::{PipelineError, Stage};
use super::run::Run;
use super::state::{Built, Cloned, Configured, Validated};

// =============================================================================
// CLONE
// =============================================================================

impl Run<Cloned> {
    /// Clone `url` into a fresh working tree and check out `branch`.
    ///
    /// `None` keeps whatever the repository's default branch is.
    pub async fn checkout<S>(
        scm: &S,
        url: &str,
        branch: Option<&str>,
        parent: Option<&Path>,
    ) -> Result<Self, PipelineError>
    where
        S: SourceControl + ?Sized,
    {
        let tree = source::checkout(scm, url, branch, parent)
            .await
            .map_err(|e| PipelineError::new(Stage::Clone, e))?;

        Ok(Run {
            tree,
            state: Cloned,
        })
    }

    // =========================================================================
    // Cloned -> Configured
    // =========================================================================

    /// Resolve the deploy descriptor and, for creates, the service descriptor.
    ///
    /// The deploy descriptor must name an image; the run stops here otherwise.
    pub async fn configure(
        self,
        deploy: &ConfigRef,
        deploy_default: &str,
        service: Option<(&ConfigRef, &str)>,
    ) -> Result<Run<Configured>, PipelineError> {
        let config_error = |e: ConfigError| PipelineError::new(Stage::Config, e);

        let document = descriptor::resolve(deploy, self.tree.path(), deploy_default)
            .await
            .map_err(config_error)?;
        let deploy = DeployDescriptor::new(document).map_err(config_error)?;

        let service = match service {
            Some((config, default)) => {
                descriptor::resolve_optional(config, self.tree.path(), default)
                    .await
                    .map_err(config_error)?
                    .map(ServiceDescriptor::new)
            }
            None => None,
        };

        tracing::info!("deploy config resolved, image {}", deploy.image());
        Ok(Run {
            tree: self.tree,
            state: Configured { deploy, service },
        })
    }
}

// =============================================================================
// Configured -> Validated | RESTART
// =============================================================================

impl Run<Configured> {
    /// Refuse to build when the base image has no variant for `host`.
    pub async fn check_arch<R>(
        self,
        host: &Platform,
        registry: &R,
    ) -> Result<Run<Validated>, PipelineError>
    where
        R: RegistryOps + ?Sized,
    {
        let base = arch::validate(self.tree.path(), host, registry)
            .await
            .map_err(|e| PipelineError::new(Stage::ArchCheck, e))?;

        let Configured { deploy, service } = self.state;
        Ok(Run {
            tree: self.tree,
            state: Validated {
                deploy,
                service,
                base,
            },
        })
    }

    /// Patch workload `name` with the resolved descriptor. Ends the run.
    pub async fn restart<C>(self, cluster: &C, name: &WorkloadName) -> Result<ImageTag, PipelineError>
    where
        C: WorkloadOps + ?Sized,
    {
        DeploymentController::new(cluster)
            .restart(name, &self.state.deploy)
            .await
            .map_err(|e| PipelineError::new(Stage::Restart, e))?;

        let image = self.state.deploy.image().clone();
        self.finish();
        Ok(image)
    }
}

// =============================================================================
// Validated -> Built
// =============================================================================

impl Run<Validated> {
    /// Build the descriptor's image, then push it when enabled.
    pub async fn build<E>(self, engine: &E, options: &BuildOptions) -> Result<Run<Built>, PipelineError>
    where
        E: ImageOps + ?Sized,
    {
        tracing::debug!(
            "base image {} declared by '{}'",
            self.state.base.image_reference,
            self.state.base.declared_from_line
        );

        let image = ImageBuilder::new(engine)
            .build(self.tree.path(), self.state.deploy.image(), options)
            .await
            .map_err(PipelineError::build)?;

        let Validated {
            deploy, service, ..
        } = self.state;
        Ok(Run {
            tree: self.tree,
            state: Built {
                deploy,
                service,
                image,
            },
        })
    }
}

// =============================================================================
// Built -> DEPLOY
// =============================================================================

impl Run<Built> {
    /// Create the workload (and service) in the cluster. Ends the run.
    pub async fn deploy<C>(self, cluster: &C, name: &WorkloadName) -> Result<ImageTag, PipelineError>
    where
        C: WorkloadOps + ?Sized,
    {
        DeploymentController::new(cluster)
            .deploy(name, &self.state.deploy, self.state.service.as_ref())
            .await
            .map_err(|e| PipelineError::new(Stage::Deploy, e))?;

        let image = self.state.image.tag.clone();
        self.finish();
        Ok(image)
    }
}
