// ABOUTME: Cluster orchestrator access: create, patch, and delete workloads.
// ABOUTME: WorkloadOps is the seam; KubeCluster talks to the Kubernetes API.

mod controller;
mod error;
mod kube;
mod traits;

pub use self::kube::KubeCluster;
pub use controller::{DeployError, DeploymentController, Operation};
pub use error::ClusterError;
pub use traits::WorkloadOps;
