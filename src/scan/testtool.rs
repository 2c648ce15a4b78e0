//! User-mode test tool extraction.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

/// `DeviceIoControl(handle, IOCTL_AVB_*` call sites.
static DEVICE_IO_CONTROL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DeviceIoControl\([^,]+,\s*(IOCTL_AVB_\w+)").expect("valid regex"));

/// Function definitions with `test`/`Test` in the name.
static TEST_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:void|int|NTSTATUS)\s+(\w*[Tt]est\w*)\s*\(").expect("valid regex")
});

/// Coverage categories a test tool can exercise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestCoverage {
    /// Raw register read/write requests.
    pub register_access: bool,
    /// Clock/timestamp requests.
    pub clock: bool,
    /// TAS configuration requests.
    pub tas: bool,
}

impl TestCoverage {
    /// Category names paired with their detection state, in report order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, bool); 3] {
        [
            ("Register Access", self.register_access),
            ("Clock", self.clock),
            ("Tas", self.tas),
        ]
    }
}

/// A user-mode test tool source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTool {
    /// Tool name, taken from the file stem.
    pub name: String,
    /// The tool's source file.
    pub file: PathBuf,
    /// IOCTLs the tool sends via `DeviceIoControl`, deduplicated and sorted.
    pub tested_ioctls: Vec<String>,
    /// Function names containing `test`/`Test`, in source order.
    pub test_functions: Vec<String>,
    /// Coverage flags.
    pub coverage: TestCoverage,
}

impl TestTool {
    /// Extracts test data from a tool source.
    #[must_use]
    pub fn extract(content: &str, file: &Path) -> Self {
        let name = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string();

        let tested: BTreeSet<String> = DEVICE_IO_CONTROL_RE
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect();

        let test_functions = TEST_FN_RE
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect();

        let coverage = TestCoverage {
            register_access: content.contains("RegReq.offset")
                || content.contains("AVB_REGISTER_REQUEST"),
            clock: content.contains("IOCTL_AVB_GET_TIMESTAMP") || content.contains("SYSTIM"),
            tas: content.contains("IOCTL_AVB_SETUP_TAS"),
        };

        Self {
            name,
            file: file.to_path_buf(),
            tested_ioctls: tested.into_iter().collect(),
            test_functions,
            coverage,
        }
    }

    /// The test id derived for this tool (`TEST-AVB-TEST-I210-001`).
    #[must_use]
    pub fn test_id(&self) -> String {
        format!("TEST-{}-001", self.name.to_uppercase().replace('_', "-"))
    }
}
