//! Device-specific implementation extraction.

use std::path::{Path, PathBuf};

/// Controller families with device-specific implementations in the tree.
pub const INTEL_CONTROLLERS: &[&str] = &[
    "i210", "i217", "i219", "i225", "i226", "i350", "82575", "82576", "82580",
];

/// Feature support detected in a device implementation file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFeatures {
    /// PTP clock support (`SYSTIM`, `ptp_init`).
    pub ptp: bool,
    /// Time-aware shaping (`TAS`, `TQAVCTRL`).
    pub tas: bool,
    /// Credit-based shaping (`CBS`, `QAV`).
    pub cbs: bool,
    /// Frame preemption.
    pub frame_preemption: bool,
    /// MDIO PHY access.
    pub mdio: bool,
}

impl DeviceFeatures {
    /// Feature names paired with their detection state, in report order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("PTP", self.ptp),
            ("TAS", self.tas),
            ("CBS", self.cbs),
            ("FRAME_PREEMPTION", self.frame_preemption),
            ("MDIO", self.mdio),
        ]
    }
}

/// A device-specific implementation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceImpl {
    /// Controller family, uppercased (`I210`).
    pub controller: String,
    /// The implementation file.
    pub file: PathBuf,
    /// Feature probes.
    pub features: DeviceFeatures,
    /// Whether an initialization entry point was found.
    pub has_init: bool,
    /// Whether a cleanup entry point was found.
    pub has_cleanup: bool,
}

impl DeviceImpl {
    /// Extracts device data from an implementation file.
    ///
    /// Returns `None` when the filename names no known controller family;
    /// shared helpers live in the same directory and are skipped this way.
    #[must_use]
    pub fn extract(content: &str, file: &Path) -> Option<Self> {
        let stem = file.file_stem()?.to_str()?.to_lowercase();
        let controller = INTEL_CONTROLLERS
            .iter()
            .find(|ctrl| stem.contains(*ctrl))?
            .to_uppercase();

        let features = DeviceFeatures {
            ptp: content.contains("SYSTIM") || content.contains("ptp_init"),
            tas: content.contains("TAS") || content.contains("TQAVCTRL"),
            cbs: content.contains("CBS") || content.contains("QAV"),
            frame_preemption: content.contains("FP") || content.to_lowercase().contains("preempt"),
            mdio: content.contains("MDIO") || content.contains("mdio_read"),
        };

        Some(Self {
            controller,
            file: file.to_path_buf(),
            features,
            has_init: content.contains("init(") || content.contains("init_ptp"),
            has_cleanup: content.contains("cleanup("),
        })
    }

    /// The requirement id derived for this controller
    /// (`REQ-F-DEV-I210-001`).
    #[must_use]
    pub fn requirement_id(&self) -> String {
        format!("REQ-F-DEV-{}-001", self.controller)
    }
}
