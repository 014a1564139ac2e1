// ABOUTME: Kubernetes implementation of WorkloadOps using kube-rs.
// ABOUTME: Descriptors are submitted as dynamic objects, unchanged apart from type defaults.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Api, DeleteParams, DynamicObject, Patch, PatchParams, PostParams};
use kube::config::KubeConfigOptions;
use kube::discovery::ApiResource;
use kube::{Client, Config};

use super::{ClusterError, WorkloadOps};
use crate::descriptor::{Descriptor, NAME_POINTER};
use crate::types::WorkloadName;

const WORKLOAD: &str = "deployment";
const SERVICE: &str = "service";

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_api_error(e: kube::Error, kind: &'static str, name: &str) -> ClusterError {
    match e {
        kube::Error::Api(ref response) if response.code == 409 => ClusterError::AlreadyExists {
            kind,
            name: name.to_string(),
        },
        kube::Error::Api(ref response) if response.code == 404 => ClusterError::NotFound {
            kind,
            name: name.to_string(),
        },
        kube::Error::Api(response) => ClusterError::Api(response.message.clone()),
        other => ClusterError::Api(other.to_string()),
    }
}

fn to_object(
    body: &Descriptor,
    kind: &'static str,
    api_version: &str,
    type_name: &str,
) -> Result<DynamicObject, ClusterError> {
    serde_json::from_value(body.with_type_defaults(api_version, type_name)).map_err(|e| {
        ClusterError::InvalidBody {
            kind,
            message: e.to_string(),
        }
    })
}

// =============================================================================
// KubeCluster
// =============================================================================

/// Workload operations against one namespace of a Kubernetes cluster.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    namespace: String,
}

impl std::fmt::Debug for KubeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCluster")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl KubeCluster {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    /// Connect using kubeconfig (or in-cluster config when no kubeconfig exists).
    pub async fn connect(namespace: &str, context: Option<&str>) -> Result<Self, ClusterError> {
        let config = match context {
            Some(context) => {
                let options = KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..Default::default()
                };
                Config::from_kubeconfig(&options)
                    .await
                    .map_err(|e| ClusterError::Connection(e.to_string()))?
            }
            None => Config::infer()
                .await
                .map_err(|e| ClusterError::Connection(e.to_string()))?,
        };

        let client =
            Client::try_from(config).map_err(|e| ClusterError::Connection(e.to_string()))?;
        Ok(Self::new(client, namespace))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn deployments(&self) -> Api<DynamicObject> {
        let resource = ApiResource::erase::<Deployment>(&());
        Api::namespaced_with(self.client.clone(), &self.namespace, &resource)
    }

    fn services(&self) -> Api<DynamicObject> {
        let resource = ApiResource::erase::<Service>(&());
        Api::namespaced_with(self.client.clone(), &self.namespace, &resource)
    }
}

#[async_trait]
impl WorkloadOps for KubeCluster {
    async fn create_workload(&self, body: &Descriptor) -> Result<(), ClusterError> {
        let object = to_object(body, WORKLOAD, "apps/v1", "Deployment")?;
        let name = body.str_at(NAME_POINTER).unwrap_or_default();

        self.deployments()
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| map_api_error(e, WORKLOAD, name))?;

        Ok(())
    }

    async fn patch_workload(
        &self,
        name: &WorkloadName,
        body: &Descriptor,
    ) -> Result<(), ClusterError> {
        let patch = body.with_type_defaults("apps/v1", "Deployment");

        self.deployments()
            .patch(name.as_str(), &PatchParams::default(), &Patch::Strategic(&patch))
            .await
            .map_err(|e| map_api_error(e, WORKLOAD, name.as_str()))?;

        Ok(())
    }

    async fn delete_workload(&self, name: &WorkloadName) -> Result<(), ClusterError> {
        self.deployments()
            .delete(name.as_str(), &DeleteParams::default())
            .await
            .map_err(|e| map_api_error(e, WORKLOAD, name.as_str()))?;

        Ok(())
    }

    async fn create_service(&self, body: &Descriptor) -> Result<(), ClusterError> {
        let object = to_object(body, SERVICE, "v1", "Service")?;
        let name = body.str_at(NAME_POINTER).unwrap_or_default();

        self.services()
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| map_api_error(e, SERVICE, name))?;

        Ok(())
    }
}
