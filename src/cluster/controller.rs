// ABOUTME: Create, restart, and remove workloads from resolved descriptors.
// ABOUTME: Translates cluster errors into a deploy-stage taxonomy tagged by operation.

use std::fmt;

use super::{ClusterError, WorkloadOps};
use crate::descriptor::{DeployDescriptor, ServiceDescriptor};
use crate::types::WorkloadName;

/// The cluster call that was being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    CreateService,
    Patch,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::CreateService => write!(f, "create-service"),
            Operation::Patch => write!(f, "patch"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("workload '{0}' already exists")]
    AlreadyExists(WorkloadName),

    #[error("workload '{0}' not found")]
    NotFound(WorkloadName),

    #[error("{operation} failed: {cause}")]
    Failed {
        operation: Operation,
        #[source]
        cause: ClusterError,
    },
}

impl DeployError {
    fn from_cluster(operation: Operation, name: &WorkloadName, err: ClusterError) -> Self {
        match (operation, err) {
            (Operation::Create, ClusterError::AlreadyExists { .. }) => {
                DeployError::AlreadyExists(name.clone())
            }
            (Operation::Patch | Operation::Delete, ClusterError::NotFound { .. }) => {
                DeployError::NotFound(name.clone())
            }
            (operation, cause) => DeployError::Failed { operation, cause },
        }
    }
}

pub struct DeploymentController<'a, C: ?Sized> {
    cluster: &'a C,
}

impl<'a, C> DeploymentController<'a, C>
where
    C: WorkloadOps + ?Sized,
{
    pub fn new(cluster: &'a C) -> Self {
        Self { cluster }
    }

    /// Create the workload, then its service when one is given.
    ///
    /// If the service cannot be created the new workload is deleted again so
    /// a failed run does not leave a half-exposed deployment behind.
    pub async fn deploy(
        &self,
        name: &WorkloadName,
        deploy: &DeployDescriptor,
        service: Option<&ServiceDescriptor>,
    ) -> Result<(), DeployError> {
        tracing::debug!("creating workload {}", name);
        self.cluster
            .create_workload(deploy.document())
            .await
            .map_err(|e| DeployError::from_cluster(Operation::Create, name, e))?;

        let Some(service) = service else {
            return Ok(());
        };

        tracing::debug!(
            "creating service {} for {}",
            service.name().unwrap_or("<unnamed>"),
            name
        );
        if let Err(cause) = self.cluster.create_service(service.document()).await {
            tracing::warn!(
                "service creation failed, deleting workload {}: {}",
                name,
                cause
            );
            if let Err(e) = self.cluster.delete_workload(name).await {
                tracing::warn!("failed to delete workload {} after service error: {}", name, e);
            }
            return Err(DeployError::Failed {
                operation: Operation::CreateService,
                cause,
            });
        }

        Ok(())
    }

    /// Patch an existing workload with a (possibly updated) descriptor.
    pub async fn restart(
        &self,
        name: &WorkloadName,
        deploy: &DeployDescriptor,
    ) -> Result<(), DeployError> {
        tracing::debug!("restarting {}", name);
        self.cluster
            .patch_workload(name, deploy.document())
            .await
            .map_err(|e| DeployError::from_cluster(Operation::Patch, name, e))
    }

    /// Delete a workload by name.
    pub async fn remove(&self, name: &WorkloadName) -> Result<(), DeployError> {
        tracing::debug!("deleting {}", name);
        self.cluster
            .delete_workload(name)
            .await
            .map_err(|e| DeployError::from_cluster(Operation::Delete, name, e))
    }
}
