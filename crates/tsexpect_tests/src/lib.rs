//! End-to-end fixtures: recorded checker snapshots for small packages.
//!
//! Each directory under `fixtures/` holds a package's `.ts` files, a
//! `tsexpect.json` with its run options and `snapshots/<version>.json`
//! for every version it is checked with.

use std::path::{Path, PathBuf};
use tsexpect_bisect::TestPackage;
use tsexpect_oracle::{Program, SnapshotInstaller};
use tsexpect_options::{parse_run_options_file, ConfigError, RunOptions};

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// A fixture package, its run options and an installer for its snapshots.
pub struct Fixture {
    pub package: TestPackage,
    pub options: RunOptions,
    pub installer: SnapshotInstaller,
}

/// Load `fixtures/<name>`. Source files are keyed by file name.
pub fn load_fixture(name: &str) -> Result<Fixture, ConfigError> {
    let dir = fixtures_dir().join(name);
    let options = parse_run_options_file(dir.join("tsexpect.json"))?;
    let io_error = |path: &Path, source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file_names = std::fs::read_dir(&dir)
        .map_err(|e| io_error(&dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect::<Vec<_>>();
    file_names.sort();

    let mut program = Program::new(options.compiler_options.clone());
    program
        .load_files(&dir, &file_names)
        .map_err(|e| io_error(&dir, e))?;

    Ok(Fixture {
        package: TestPackage::new(name, program),
        options,
        installer: SnapshotInstaller::new(dir.join("snapshots")),
    })
}
