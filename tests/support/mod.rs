// ABOUTME: Test support utilities.
// ABOUTME: In-memory fakes for source control, the build engine, and the cluster.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use kaas_build::build::BuildOptions;
use kaas_build::cluster::{ClusterError, WorkloadOps};
use kaas_build::descriptor::{Descriptor, NAME_POINTER};
use kaas_build::pipeline::{Pipeline, PipelineSettings};
use kaas_build::runtime::{ImageError, ImageOps, RegistryError, RegistryOps};
use kaas_build::source::{SourceControl, SourceError};
use kaas_build::types::{ImageRef, ImageTag, Platform, WorkloadName};
use parking_lot::Mutex;
use serde_json::Value;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("kaas_build=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const DOCKERFILE: &str = "FROM alpine:3.19\nRUN echo hi\n";

pub const DEPLOY_YAML: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: svc
spec:
  template:
    spec:
      containers:
        - name: svc
          image: svc:1
"#;

pub const SERVICE_YAML: &str = r#"
apiVersion: v1
kind: Service
metadata:
  name: svc
spec:
  ports:
    - port: 80
"#;

pub fn amd64() -> Platform {
    Platform::new("linux", "amd64")
}

pub fn arm64() -> Platform {
    Platform::new("linux", "arm64")
}

// =============================================================================
// FakeSource
// =============================================================================

/// Writes a fixed file set on clone and knows a fixed set of branches.
#[derive(Default)]
pub struct FakeSource {
    files: BTreeMap<String, String>,
    branches: HashSet<String>,
    unreachable: bool,
    pub clones: Mutex<Vec<(String, PathBuf)>>,
    pub checkouts: Mutex<Vec<String>>,
}

impl FakeSource {
    /// A repository with a Dockerfile, a deploy descriptor, and a `main` branch.
    pub fn repo() -> Self {
        Self::default()
            .with_file("Dockerfile", DOCKERFILE)
            .with_file("kaas.deploy.yml", DEPLOY_YAML)
            .with_branch("main")
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branches.insert(branch.to_string());
        self
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn clone_dirs(&self) -> Vec<PathBuf> {
        self.clones.lock().iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn cloned_urls(&self) -> Vec<String> {
        self.clones.lock().iter().map(|(u, _)| u.clone()).collect()
    }
}

#[async_trait]
impl SourceControl for FakeSource {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), SourceError> {
        self.clones.lock().push((url.to_string(), dest.to_path_buf()));
        if self.unreachable {
            return Err(SourceError::Unreachable {
                url: url.to_string(),
                message: "repository not found".to_string(),
            });
        }
        for (path, contents) in &self.files {
            let target = dest.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(SourceError::Workdir)?;
            }
            std::fs::write(target, contents).map_err(SourceError::Workdir)?;
        }
        Ok(())
    }

    async fn checkout(&self, _repo: &Path, reference: &str) -> Result<(), SourceError> {
        self.checkouts.lock().push(reference.to_string());
        if self.branches.contains(reference) {
            Ok(())
        } else {
            Err(SourceError::RefNotFound {
                reference: reference.to_string(),
                message: format!("pathspec '{reference}' did not match"),
            })
        }
    }
}

// =============================================================================
// FakeEngine
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Platforms(String),
    Build(String),
    Tag(String, String),
    Push(String),
}

/// Build engine that records calls and serves a fixed platform list.
pub struct FakeEngine {
    platforms: Vec<Platform>,
    fail_build: bool,
    fail_push: bool,
    pub calls: Mutex<Vec<EngineCall>>,
}

impl FakeEngine {
    pub fn supporting(platforms: Vec<Platform>) -> Self {
        Self {
            platforms,
            fail_build: false,
            fail_push: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    pub fn builds(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::Build(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::supporting(vec![amd64(), arm64()])
    }
}

#[async_trait]
impl ImageOps for FakeEngine {
    async fn build_image(&self, context: &Path, tag: &ImageTag) -> Result<(), ImageError> {
        self.calls.lock().push(EngineCall::Build(tag.to_string()));
        if !context.join("Dockerfile").exists() {
            return Err(ImageError::Context("no Dockerfile in context".to_string()));
        }
        if self.fail_build {
            return Err(ImageError::BuildFailed(format!("{tag}: RUN exited with 1")));
        }
        Ok(())
    }

    async fn tag_image(&self, source: &ImageTag, target: &ImageTag) -> Result<(), ImageError> {
        self.calls
            .lock()
            .push(EngineCall::Tag(source.to_string(), target.to_string()));
        Ok(())
    }

    async fn push_image(&self, reference: &ImageTag) -> Result<(), ImageError> {
        self.calls.lock().push(EngineCall::Push(reference.to_string()));
        if self.fail_push {
            return Err(ImageError::PushFailed(format!("{reference}: connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryOps for FakeEngine {
    async fn image_platforms(&self, reference: &ImageRef) -> Result<Vec<Platform>, RegistryError> {
        self.calls
            .lock()
            .push(EngineCall::Platforms(reference.to_string()));
        Ok(self.platforms.clone())
    }
}

// =============================================================================
// FakeCluster
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ClusterCall {
    Create(Value),
    Patch(String, Value),
    Delete(String),
    CreateService(Value),
}

/// Cluster holding workloads in memory, keyed by `metadata.name`.
#[derive(Default)]
pub struct FakeCluster {
    pub workloads: Mutex<HashMap<String, Value>>,
    fail_service: bool,
    service_delay: Option<std::time::Duration>,
    pub calls: Mutex<Vec<ClusterCall>>,
}

impl FakeCluster {
    pub fn with_workload(self, name: &str) -> Self {
        self.workloads
            .lock()
            .insert(name.to_string(), serde_json::json!({"metadata": {"name": name}}));
        self
    }

    pub fn failing_service(mut self) -> Self {
        self.fail_service = true;
        self
    }

    /// Wait before answering `create_service`.
    pub fn slow_service(mut self, delay: std::time::Duration) -> Self {
        self.service_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ClusterCall> {
        self.calls.lock().clone()
    }

    pub fn has_workload(&self, name: &str) -> bool {
        self.workloads.lock().contains_key(name)
    }
}

fn body(document: &Descriptor) -> Value {
    document.as_value().clone()
}

#[async_trait]
impl WorkloadOps for FakeCluster {
    async fn create_workload(&self, document: &Descriptor) -> Result<(), ClusterError> {
        self.calls.lock().push(ClusterCall::Create(body(document)));
        let name = document.str_at(NAME_POINTER).unwrap_or_default().to_string();
        let mut workloads = self.workloads.lock();
        if workloads.contains_key(&name) {
            return Err(ClusterError::AlreadyExists {
                kind: "deployment",
                name,
            });
        }
        workloads.insert(name, body(document));
        Ok(())
    }

    async fn patch_workload(
        &self,
        name: &WorkloadName,
        document: &Descriptor,
    ) -> Result<(), ClusterError> {
        self.calls
            .lock()
            .push(ClusterCall::Patch(name.to_string(), body(document)));
        match self.workloads.lock().get_mut(name.as_str()) {
            Some(existing) => {
                *existing = body(document);
                Ok(())
            }
            None => Err(ClusterError::NotFound {
                kind: "deployment",
                name: name.to_string(),
            }),
        }
    }

    async fn delete_workload(&self, name: &WorkloadName) -> Result<(), ClusterError> {
        self.calls.lock().push(ClusterCall::Delete(name.to_string()));
        match self.workloads.lock().remove(name.as_str()) {
            Some(_) => Ok(()),
            None => Err(ClusterError::NotFound {
                kind: "deployment",
                name: name.to_string(),
            }),
        }
    }

    async fn create_service(&self, document: &Descriptor) -> Result<(), ClusterError> {
        self.calls
            .lock()
            .push(ClusterCall::CreateService(body(document)));
        if let Some(delay) = self.service_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_service {
            return Err(ClusterError::Api("service port 80 is already allocated".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Harness
// =============================================================================

/// Fakes plus a pipeline wired to them. Working trees go under `work_dir`.
pub struct Harness {
    pub source: Arc<FakeSource>,
    pub engine: Arc<FakeEngine>,
    pub cluster: Arc<FakeCluster>,
    pub pipeline: Pipeline,
    pub work_dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(source: FakeSource, engine: FakeEngine, cluster: FakeCluster) -> Self {
        init_tracing();
        let work_dir = tempfile::tempdir().unwrap();
        let source = Arc::new(source);
        let engine = Arc::new(engine);
        let cluster = Arc::new(cluster);

        let settings = PipelineSettings {
            work_dir: Some(work_dir.path().to_path_buf()),
            platform: Some(amd64()),
            build: BuildOptions {
                push: true,
                registry: Some("localhost:5000".to_string()),
            },
            ..PipelineSettings::default()
        };

        let pipeline = Pipeline::new(source.clone(), engine.clone(), cluster.clone(), settings);
        Self {
            source,
            engine,
            cluster,
            pipeline,
            work_dir,
        }
    }

    pub fn default_repo() -> Self {
        Self::new(FakeSource::repo(), FakeEngine::default(), FakeCluster::default())
    }

    /// Entries left in the working-tree parent directory.
    pub fn leftover_dirs(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.work_dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}
