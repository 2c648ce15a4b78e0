//! Regex extraction of requirements material from the driver sources.
//!
//! This is text scanning, not parsing: IOCTL case blocks, validation and
//! hardware-access idioms, device-specific implementation files and
//! user-mode test tools are recognized with regular expressions and
//! substring probes, then rendered into draft GitHub Issue bodies. Files are
//! independent, so they are scanned in parallel.

use std::{
    collections::BTreeSet,
    io,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use walkdir::WalkDir;

/// IOCTL definition and handler extraction.
pub mod ioctl;
pub use ioctl::{IoctlDefines, IoctlHandler};

/// Device-specific implementation extraction.
pub mod device;
pub use device::DeviceImpl;

/// User-mode test tool extraction.
pub mod testtool;
pub use testtool::TestTool;

/// Markdown issue bodies and the full extraction report.
pub mod report;

/// Errors that can occur while scanning the codebase.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A source file could not be read.
    #[error("failed to read source file {path}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying io error.
        #[source]
        source: io::Error,
    },
}

/// Everything extracted from one pass over the codebase.
#[derive(Debug, Default)]
pub struct CodebaseScan {
    /// IOCTL control-code definitions from the public header.
    pub defines: IoctlDefines,
    /// IOCTL case blocks found in the dispatch sources.
    pub handlers: Vec<IoctlHandler>,
    /// Device-specific implementations found under `devices/`.
    pub devices: Vec<DeviceImpl>,
    /// User-mode test tools found in the tree.
    pub test_tools: Vec<TestTool>,
}

impl CodebaseScan {
    /// Runs all four extraction stages over the codebase at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if a discovered source file cannot be read.
    pub fn run(base: &Path) -> Result<Self, ScanError> {
        Ok(Self {
            defines: scan_ioctl_defines(base)?,
            handlers: scan_ioctl_handlers(base)?,
            devices: scan_devices(base)?,
            test_tools: scan_test_tools(base)?,
        })
    }
}

/// Extracts IOCTL control-code definitions from `include/avb_ioctl.h`.
///
/// A missing header yields an empty table rather than an error, since the
/// definitions only enrich the generated issue bodies.
///
/// # Errors
///
/// Returns [`ScanError`] if the header exists but cannot be read.
pub fn scan_ioctl_defines(base: &Path) -> Result<IoctlDefines, ScanError> {
    let header = base.join("include").join("avb_ioctl.h");
    if !header.exists() {
        return Ok(IoctlDefines::default());
    }
    let content = read_lossy(&header)?;
    Ok(IoctlDefines::extract(&content))
}

/// Extracts IOCTL case blocks from the dispatch sources (`device.c`,
/// `filter.c`).
///
/// # Errors
///
/// Returns [`ScanError`] if a dispatch source cannot be read.
pub fn scan_ioctl_handlers(base: &Path) -> Result<Vec<IoctlHandler>, ScanError> {
    let paths: Vec<PathBuf> = ["device.c", "filter.c"]
        .iter()
        .map(|name| base.join(name))
        .filter(|path| path.exists())
        .collect();

    let nested: Vec<Vec<IoctlHandler>> = paths
        .into_par_iter()
        .map(|path| {
            let content = read_lossy(&path)?;
            Ok(ioctl::IoctlHandler::extract(&content, &path))
        })
        .collect::<Result<_, ScanError>>()?;

    Ok(nested.into_iter().flatten().collect())
}

/// Extracts device-specific implementations from `devices/intel_*_impl.c`.
///
/// # Errors
///
/// Returns [`ScanError`] if an implementation file cannot be read.
pub fn scan_devices(base: &Path) -> Result<Vec<DeviceImpl>, ScanError> {
    let device_dir = base.join("devices");
    let paths = files_matching(&device_dir, |name| {
        name.starts_with("intel_") && name.ends_with("_impl.c")
    });

    let found: Vec<Option<DeviceImpl>> = paths
        .into_par_iter()
        .map(|path| {
            let content = read_lossy(&path)?;
            Ok(device::DeviceImpl::extract(&content, &path))
        })
        .collect::<Result<_, ScanError>>()?;

    Ok(found.into_iter().flatten().collect())
}

/// Extracts user-mode test tools (`avb_test_*.c`, `tools/avb_test/*.c`,
/// `*_test.c`).
///
/// # Errors
///
/// Returns [`ScanError`] if a test tool source cannot be read.
pub fn scan_test_tools(base: &Path) -> Result<Vec<TestTool>, ScanError> {
    let mut paths: BTreeSet<PathBuf> = files_matching(base, |name| {
        (name.starts_with("avb_test_") || name.ends_with("_test.c")) && name.ends_with(".c")
    })
    .into_iter()
    .collect();
    paths.extend(files_matching(
        &base.join("tools").join("avb_test"),
        |name| name.ends_with(".c"),
    ));

    paths
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|path| {
            let content = read_lossy(&path)?;
            Ok(testtool::TestTool::extract(&content, &path))
        })
        .collect()
}

/// Non-recursive listing of the files in `dir` whose name matches the
/// predicate. A missing directory yields an empty list.
fn files_matching(dir: &Path, predicate: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| predicate(name))
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Reads a source file, replacing invalid UTF-8 rather than failing.
/// Driver sources occasionally carry stray codepage bytes in comments.
fn read_lossy(path: &Path) -> Result<String, ScanError> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
