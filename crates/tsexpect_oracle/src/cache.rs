//! Version environments and the process-wide environment cache.
//!
//! Installing a checker version is expensive, so each version is installed
//! and loaded at most once. Concurrent requests for the same version wait
//! for the first one to finish instead of installing again.

use crate::adapter::OracleAdapter;
use crate::engine::CheckerEngine;
use crate::error::{InstallationError, OracleResult};
use crate::program::Program;
use crate::version::TsVersion;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

/// Creates checker engines of one version.
pub trait CheckerFactory: Send + Sync {
    fn create(&self, program: &Program) -> OracleResult<Box<dyn CheckerEngine>>;
}

/// Installs and loads checker versions.
pub trait Installer: Send + Sync {
    fn is_installed(&self, version: &TsVersion) -> bool;

    fn install(&self, version: &TsVersion) -> Result<(), InstallationError>;

    fn load(&self, version: &TsVersion) -> Result<Arc<dyn CheckerFactory>, InstallationError>;
}

/// An installed and loaded checker version.
pub struct VersionEnvironment {
    version: TsVersion,
    /// Whether this environment performed the installation itself.
    installed_here: bool,
    factory: Arc<dyn CheckerFactory>,
}

impl VersionEnvironment {
    pub fn new(version: TsVersion, factory: Arc<dyn CheckerFactory>) -> Self {
        Self {
            version,
            installed_here: false,
            factory,
        }
    }

    pub fn version(&self) -> &TsVersion {
        &self.version
    }

    pub fn installed_here(&self) -> bool {
        self.installed_here
    }

    /// An oracle for `program` under this version.
    pub fn oracle(&self, program: &Program) -> OracleResult<OracleAdapter> {
        let engine = self.factory.create(program)?;
        Ok(OracleAdapter::new(self.version.clone(), engine))
    }
}

impl std::fmt::Debug for VersionEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionEnvironment")
            .field("version", &self.version)
            .field("installed_here", &self.installed_here)
            .finish_non_exhaustive()
    }
}

type Slot = Arc<Mutex<Option<Arc<VersionEnvironment>>>>;

/// Memoizes one [`VersionEnvironment`] per version.
pub struct EnvironmentCache {
    installer: Arc<dyn Installer>,
    slots: DashMap<TsVersion, Slot>,
}

impl EnvironmentCache {
    pub fn new(installer: impl Installer + 'static) -> Self {
        Self::with_installer(Arc::new(installer))
    }

    pub fn with_installer(installer: Arc<dyn Installer>) -> Self {
        Self {
            installer,
            slots: DashMap::new(),
        }
    }

    /// The environment for `version`, installing and loading it on first use.
    ///
    /// A failed construction is not memoized; the next call retries.
    pub fn get(&self, version: &TsVersion) -> Result<Arc<VersionEnvironment>, InstallationError> {
        // Clone the slot out so the map shard is unlocked while we wait.
        let slot = Arc::clone(self.slots.entry(version.clone()).or_default().value());
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(env) = guard.as_ref() {
            tracing::trace!(%version, "environment cache hit");
            return Ok(Arc::clone(env));
        }
        let env = Arc::new(self.construct(version)?);
        *guard = Some(Arc::clone(&env));
        Ok(env)
    }

    fn construct(&self, version: &TsVersion) -> Result<VersionEnvironment, InstallationError> {
        let mut installed_here = false;
        if !self.installer.is_installed(version) {
            tracing::info!(%version, "installing checker version");
            self.installer.install(version).map_err(|e| {
                tracing::warn!(%version, error = %e, "installation failed");
                e
            })?;
            installed_here = true;
        }
        let factory = self.installer.load(version)?;
        tracing::debug!(%version, installed_here, "loaded checker version");
        Ok(VersionEnvironment {
            version: version.clone(),
            installed_here,
            factory,
        })
    }

    /// Forget every memoized environment.
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of memoized environments. Constructions still in progress
    /// are not counted.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| match entry.value().try_lock() {
                Ok(guard) => guard.is_some(),
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
                Err(TryLockError::WouldBlock) => false,
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EnvironmentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCache")
            .field("slots", &self.slots.len())
            .finish_non_exhaustive()
    }
}
