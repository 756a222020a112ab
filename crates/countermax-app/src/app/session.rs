//! Read-modify-write access to the configuration tree

use countermax_domain::model::ConfigTree;
use countermax_domain::repository::ConfigTreeRepository;
use countermax_types::Result;

/// Each [`apply`](ConfigSession::apply) loads the stored tree, lets the
/// closure edit a working copy and saves it only if the closure succeeded.
///
/// Nothing is locked between load and save; a concurrent writer's changes
/// made in that window are overwritten.
pub struct ConfigSession<R> {
    repo: R,
}

impl<R: ConfigTreeRepository> ConfigSession<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn load(&self) -> Result<ConfigTree> {
        self.repo.load()
    }

    pub fn apply<T, F>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut ConfigTree) -> Result<T>,
    {
        let mut working = self.repo.load()?;
        let out = edit(&mut working)?;
        self.repo.save(&working)?;
        Ok(out)
    }
}
