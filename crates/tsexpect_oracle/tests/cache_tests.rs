//! Environment cache tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tsexpect_oracle::{
    CheckerEngine, CheckerFactory, EnvironmentCache, InstallationError, Installer, OracleResult,
    Program, RecordedFactory, RecordedSnapshot, TsVersion,
};

/// Counts installer calls; versions listed in `broken` fail to install.
#[derive(Default)]
struct CountingInstaller {
    installs: AtomicUsize,
    loads: AtomicUsize,
    preinstalled: Vec<TsVersion>,
    broken: Vec<TsVersion>,
    delay: Option<Duration>,
}

impl Installer for CountingInstaller {
    fn is_installed(&self, version: &TsVersion) -> bool {
        self.preinstalled.contains(version)
    }

    fn install(&self, version: &TsVersion) -> Result<(), InstallationError> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.broken.contains(version) {
            return Err(InstallationError::new(version, "registry unavailable"));
        }
        Ok(())
    }

    fn load(&self, _version: &TsVersion) -> Result<Arc<dyn CheckerFactory>, InstallationError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RecordedFactory::new(RecordedSnapshot::default())))
    }
}

/// Forwards to a shared installer so the test keeps access to the counters.
struct Shared(Arc<CountingInstaller>);

impl Installer for Shared {
    fn is_installed(&self, version: &TsVersion) -> bool {
        self.0.is_installed(version)
    }
    fn install(&self, version: &TsVersion) -> Result<(), InstallationError> {
        self.0.install(version)
    }
    fn load(&self, version: &TsVersion) -> Result<Arc<dyn CheckerFactory>, InstallationError> {
        self.0.load(version)
    }
}

fn v(s: &str) -> TsVersion {
    s.parse().unwrap()
}

#[test]
fn test_environment_is_constructed_once() {
    let installer = Arc::new(CountingInstaller::default());
    let cache = EnvironmentCache::new(Shared(installer.clone()));
    let first = cache.get(&v("4.0")).unwrap();
    let second = cache.get(&v("4.0")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.installed_here());
    assert_eq!(first.version(), &v("4.0"));
    assert_eq!(installer.installs.load(Ordering::SeqCst), 1);
    assert_eq!(installer.loads.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_preinstalled_version_is_only_loaded() {
    let installer = Arc::new(CountingInstaller {
        preinstalled: vec![v("5.0")],
        ..CountingInstaller::default()
    });
    let cache = EnvironmentCache::new(Shared(installer.clone()));
    let env = cache.get(&v("5.0")).unwrap();
    assert!(!env.installed_here());
    assert_eq!(installer.installs.load(Ordering::SeqCst), 0);
    assert_eq!(installer.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_requests_install_once() {
    let installer = Arc::new(CountingInstaller {
        delay: Some(Duration::from_millis(50)),
        ..CountingInstaller::default()
    });
    let cache = EnvironmentCache::new(Shared(installer.clone()));
    let version = v("4.5");

    let envs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get(&version).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(installer.installs.load(Ordering::SeqCst), 1);
    assert!(envs.iter().all(|env| Arc::ptr_eq(env, &envs[0])));
}

#[test]
fn test_distinct_versions_get_distinct_environments() {
    let installer = Arc::new(CountingInstaller::default());
    let cache = EnvironmentCache::new(Shared(installer.clone()));
    let a = cache.get(&v("4.0")).unwrap();
    let b = cache.get(&TsVersion::Next).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(installer.installs.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_failed_installation_is_not_memoized() {
    let installer = Arc::new(CountingInstaller {
        broken: vec![v("3.9")],
        ..CountingInstaller::default()
    });
    let cache = EnvironmentCache::new(Shared(installer.clone()));
    let err = cache.get(&v("3.9")).unwrap_err();
    assert_eq!(err.version, "3.9");
    assert_eq!(
        err.to_string(),
        "failed to install TypeScript@3.9: registry unavailable"
    );
    assert!(cache.is_empty());
    assert!(cache.get(&v("3.9")).is_err());
    assert_eq!(installer.installs.load(Ordering::SeqCst), 2);
    assert_eq!(installer.loads.load(Ordering::SeqCst), 0);
}

#[test]
fn test_clear_forces_reconstruction() {
    let installer = Arc::new(CountingInstaller::default());
    let cache = EnvironmentCache::new(Shared(installer.clone()));
    let before = cache.get(&v("4.0")).unwrap();
    cache.clear();
    assert_eq!(cache.len(), 0);
    let after = cache.get(&v("4.0")).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(installer.installs.load(Ordering::SeqCst), 2);
}

struct FailingFactory;

impl CheckerFactory for FailingFactory {
    fn create(&self, _program: &Program) -> OracleResult<Box<dyn CheckerEngine>> {
        Err(tsexpect_oracle::OracleError::Engine {
            message: "no checker".to_string(),
        })
    }
}

#[test]
fn test_oracle_creation_error_propagates() {
    let env = tsexpect_oracle::VersionEnvironment::new(v("4.0"), Arc::new(FailingFactory));
    let err = env.oracle(&Program::default()).unwrap_err();
    assert_eq!(err.to_string(), "checker engine failed: no checker");
}
