// ABOUTME: A pipeline run parameterized by its current state.
// ABOUTME: Owns the working tree so every exit path removes it.

use crate::descriptor::DeployDescriptor;
use crate::source::WorkingTree;

use super::state::Configured;

/// A run in progress.
///
/// Transitions consume the run. When one fails the run is dropped with it,
/// which removes the working tree.
#[derive(Debug)]
pub struct Run<S> {
    pub(crate) tree: WorkingTree,
    pub(crate) state: S,
}

impl<S> Run<S> {
    /// Remove the working tree now. Failure is logged, not returned.
    pub(crate) fn finish(self) {
        let path = self.tree.path().to_path_buf();
        if let Err(e) = self.tree.close() {
            tracing::warn!("failed to remove working tree {}: {}", path.display(), e);
        }
    }
}

impl Run<Configured> {
    pub fn deploy_descriptor(&self) -> &DeployDescriptor {
        &self.state.deploy
    }
}
