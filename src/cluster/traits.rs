// ABOUTME: Workload operations trait for the cluster orchestrator.
// ABOUTME: All calls are scoped to the namespace the implementation was built with.

use async_trait::async_trait;

use super::ClusterError;
use crate::descriptor::Descriptor;
use crate::types::WorkloadName;

#[async_trait]
pub trait WorkloadOps: Send + Sync {
    /// Create a workload. Fails with `AlreadyExists` rather than replacing one.
    async fn create_workload(&self, body: &Descriptor) -> Result<(), ClusterError>;

    /// Patch an existing workload. Fails with `NotFound` if absent.
    async fn patch_workload(
        &self,
        name: &WorkloadName,
        body: &Descriptor,
    ) -> Result<(), ClusterError>;

    /// Delete a workload. Fails with `NotFound` if absent.
    async fn delete_workload(&self, name: &WorkloadName) -> Result<(), ClusterError>;

    /// Create the network-facing service for a workload.
    async fn create_service(&self, body: &Descriptor) -> Result<(), ClusterError>;
}
