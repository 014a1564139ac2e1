// ABOUTME: Repository checkout into an isolated, self-deleting working tree.
// ABOUTME: Git access goes through the SourceControl trait so runs can use fakes.

mod checkout;
mod git;
mod working_tree;

pub use checkout::{checkout, normalize_url};
pub use git::{GitCli, SourceControl, SourceError};
pub use working_tree::{WORKDIR_PREFIX, WorkingTree};
