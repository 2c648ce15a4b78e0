//! IOCTL definition and handler extraction.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

/// `#define IOCTL_AVB_* _NDIS_CONTROL_CODE(n, METHOD_BUFFERED)` lines.
static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#define\s+(IOCTL_AVB_\w+)\s+_NDIS_CONTROL_CODE\((\d+),\s*METHOD_BUFFERED\)")
        .expect("valid regex")
});

/// `case IOCTL_AVB_*: { ... }` blocks. The body capture stops at the first
/// closing brace, which is enough for the idiom probes; nested blocks inside
/// a handler are not needed.
static CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)case\s+(IOCTL_AVB_\w+):\s*\{([^}]+)\}").expect("valid regex"));

/// IOCTL control-code definitions, name → formatted code value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IoctlDefines(BTreeMap<String, String>);

impl IoctlDefines {
    /// Extracts the definitions from header text.
    #[must_use]
    pub fn extract(content: &str) -> Self {
        let map = DEFINE_RE
            .captures_iter(content)
            .filter_map(|caps| {
                let name = caps[1].to_string();
                let code: u32 = caps[2].parse().ok()?;
                Some((name, format!("0x{code:08X}")))
            })
            .collect();
        Self(map)
    }

    /// The formatted control-code value for an IOCTL name, or `(undefined)`
    /// when the header did not define it.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.0.get(name).map_or("(undefined)", String::as_str)
    }

    /// Number of definitions found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no definitions were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A validation idiom detected inside a handler body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// `NULL` compared with `==`.
    NullPointer,
    /// A `sizeof` buffer-size check.
    BufferSize,
    /// `STATUS_*` / `ERROR_*` code handling.
    ErrorCode,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::NullPointer => "NULL pointer validation",
            Self::BufferSize => "Buffer size validation",
            Self::ErrorCode => "Error code handling",
        })
    }
}

/// A hardware-access idiom detected inside a handler body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwOperation {
    /// MMIO register access (`MMIO`, `MmMapIoSpace`).
    Mmio,
    /// MDIO PHY access.
    Mdio,
    /// PTP clock operations (`SYSTIM`, `PTP`).
    PtpClock,
}

impl fmt::Display for HwOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Mmio => "MMIO register access",
            Self::Mdio => "MDIO PHY access",
            Self::PtpClock => "PTP clock operations",
        })
    }
}

/// One IOCTL case block found in a dispatch source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoctlHandler {
    /// The IOCTL name (`IOCTL_AVB_GET_TIMESTAMP`, …).
    pub code: String,
    /// The file the case block lives in.
    pub file: PathBuf,
    /// Validation idioms detected in the body.
    pub validations: Vec<Validation>,
    /// Hardware-access idioms detected in the body.
    pub hw_operations: Vec<HwOperation>,
}

impl IoctlHandler {
    /// Extracts every IOCTL case block from dispatch source text.
    #[must_use]
    pub fn extract(content: &str, file: &Path) -> Vec<Self> {
        CASE_RE
            .captures_iter(content)
            .map(|caps| {
                let body = &caps[2];

                let mut validations = Vec::new();
                if body.contains("NULL") && body.contains("==") {
                    validations.push(Validation::NullPointer);
                }
                if body.contains("sizeof") {
                    validations.push(Validation::BufferSize);
                }
                if body.contains("STATUS_") || body.contains("ERROR_") {
                    validations.push(Validation::ErrorCode);
                }

                let mut hw_operations = Vec::new();
                if body.contains("MMIO") || body.contains("MmMapIoSpace") {
                    hw_operations.push(HwOperation::Mmio);
                }
                if body.contains("MDIO") {
                    hw_operations.push(HwOperation::Mdio);
                }
                if body.contains("SYSTIM") || body.contains("PTP") {
                    hw_operations.push(HwOperation::PtpClock);
                }

                Self {
                    code: caps[1].to_string(),
                    file: file.to_path_buf(),
                    validations,
                    hw_operations,
                }
            })
            .collect()
    }

    /// The IOCTL name with the `IOCTL_AVB_` prefix dropped and underscores
    /// dashed, used to derive requirement ids (`GET-TIMESTAMP`).
    #[must_use]
    pub fn short_name(&self) -> String {
        self.code
            .trim_start_matches("IOCTL_AVB_")
            .replace('_', "-")
    }

    /// The requirement id derived for this handler
    /// (`REQ-F-IOCTL-GET-TIMESTAMP-001`).
    #[must_use]
    pub fn requirement_id(&self) -> String {
        format!("REQ-F-IOCTL-{}-001", self.short_name())
    }
}
