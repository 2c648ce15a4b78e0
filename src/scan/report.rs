//! Markdown issue bodies and the full extraction report.
//!
//! Everything extracted from the codebase is rendered as draft GitHub Issue
//! bodies, ready to review and create with `gh issue create`. The report is
//! explicit that these are reverse-engineered drafts needing stakeholder
//! validation, not authoritative requirements.

use std::fmt::{Display, Write as _};

use chrono::NaiveDate;

use super::{CodebaseScan, DeviceImpl, IoctlDefines, IoctlHandler, TestTool};

/// Default priority label for generated issues.
pub const PRIORITY_LABEL: &str = "priority:p1";

/// Renders a `- item` list, or a single placeholder bullet when empty.
fn bullet_list<T: Display>(items: &[T], empty: &str) -> String {
    if items.is_empty() {
        format!("- {empty}")
    } else {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders a `- `code`` list, or a placeholder bullet when empty.
fn code_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        format!("- {empty}")
    } else {
        items
            .iter()
            .map(|item| format!("- `{item}`"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The GitHub Issue body for a functional requirement reverse-engineered
/// from an IOCTL handler.
#[must_use]
pub fn functional_requirement_issue(handler: &IoctlHandler, defines: &IoctlDefines) -> String {
    let code = &handler.code;
    let value = defines.value(code);
    let req_id = handler.requirement_id();
    let file = handler.file.display();
    let validations = bullet_list(&handler.validations, "No validations detected");
    let hw_ops = bullet_list(&handler.hw_operations, "No hardware operations detected");

    format!(
        r"## Description
IOCTL handler for {code} operations

**Source**: Reverse-engineered from `{file}`
**IOCTL Code**: `{value}`

## Functional Requirements

### {req_id}: {code} Handler

**Input**: User-mode IOCTL request via `DeviceIoControl`

**Validation Rules**:
{validations}

**Hardware Operations**:
{hw_ops}

**Output**:
- Success: `STATUS_SUCCESS` / `ERROR_SUCCESS`
- Failure: Appropriate error code (`STATUS_INVALID_PARAMETER`, `ERROR_INVALID_FUNCTION`, etc.)

## Acceptance Criteria

```gherkin
Scenario: Successful {code} request
  Given driver is loaded and device is initialized
  And user-mode application has valid device handle
  When user sends {code} request with valid parameters
  Then request is processed successfully
  And appropriate hardware operations are performed
  And success status is returned

Scenario: Invalid input handling
  Given user sends {code} with invalid parameters
  Then request is rejected with clear error code
  And no hardware operations are performed
  And system remains stable

Scenario: Unsupported controller
  Given {code} is not supported on detected controller
  Then ERROR_INVALID_FUNCTION is returned
  And clear error message indicates feature not supported
```

## Implementation

**Current File**: `{file}`

**Traceability Comment** (add to code):
```c
/**
 * Implements: #N ({req_id}: {code})
 *
 * TODO: Create GitHub Issue for this requirement
 * Issue body generated by the extraction tool
 */
case {code}:
```

## Validation Required

⚠️ **This requirement was reverse-engineered from code and needs validation:**
- [ ] Verify input validation is complete (all edge cases covered)
- [ ] Confirm hardware operations are safe and correct
- [ ] Check error handling is comprehensive
- [ ] Validate behavior on all supported controllers (I210, I219, I225, I226)
- [ ] Review with stakeholders

## Traceability
- **Traces to**: StR-HWAC-001 (Intel NIC AVB/TSN Feature Access)
- **Depends on**: (TBD - device initialization requirements)
- **Verified by**: (TBD - create TEST issue for this IOCTL)

## Priority
{PRIORITY_LABEL}
"
    )
}

/// The GitHub Issue body for a device-specific capability requirement.
#[must_use]
pub fn device_capability_issue(device: &DeviceImpl) -> String {
    let controller = &device.controller;
    let req_id = device.requirement_id();
    let file = device.file.display();

    let mut features = String::new();
    for (name, supported) in device.features.entries() {
        let status = if supported {
            "✅ Supported"
        } else {
            "❌ Not Detected"
        };
        let _ = writeln!(features, "- **{name}**: {status}");
    }

    let init_status = if device.has_init {
        "✅ Implemented"
    } else {
        "❌ Missing"
    };
    let cleanup_status = if device.has_cleanup {
        "✅ Implemented"
    } else {
        "❌ Missing"
    };
    let init_cell = if device.has_init {
        "✅"
    } else {
        "⚠️ Needs Review"
    };
    let cleanup_cell = if device.has_cleanup {
        "✅"
    } else {
        "⚠️ Needs Review"
    };
    let ptp_cell = if device.features.ptp { "✅" } else { "N/A" };

    format!(
        r"## Description
Device-specific implementation for Intel {controller} Ethernet Controller

**Source**: Reverse-engineered from `{file}`

## Functional Requirements

### {req_id}: {controller} Hardware Support

The driver shall provide device-specific support for Intel {controller} controllers.

**Feature Support**:
{features}
**Lifecycle Operations**:
- **Initialization**: {init_status}
- **Cleanup**: {cleanup_status}

## Acceptance Criteria

```gherkin
Scenario: {controller} detection and initialization
  Given system has Intel {controller} adapter installed
  When driver loads
  Then adapter is detected as supported device
  And device-specific initialization completes successfully
  And feature capabilities are accurately reported

Scenario: Feature availability reporting
  Given {controller} is initialized
  When user queries device capabilities
  Then accurate feature support is reported
  And unsupported features return clear error codes
```

## Implementation

**Current File**: `{file}`

**Operations Table**:
| Operation | Function | Status |
|-----------|----------|--------|
| Initialize | `init(device_t *dev)` | {init_cell} |
| Cleanup | `cleanup(device_t *dev)` | {cleanup_cell} |
| PTP Init | `init_ptp(device_t *dev)` | {ptp_cell} |

## Validation Required

⚠️ **This requirement was reverse-engineered from code and needs validation:**
- [ ] Verify feature support on actual {controller} hardware
- [ ] Test initialization sequence (success and failure paths)
- [ ] Validate cleanup prevents resource leaks
- [ ] Test on multiple {controller} hardware variants
- [ ] Document any hardware-specific quirks discovered

## Traceability
- **Traces to**: StR-HWAC-002 (Reliable Hardware Detection)
- **Depends on**: REQ-F-DEV-001 (Generic Device Discovery)
- **Verified by**: (TBD - create TEST issue for {controller} hardware validation)

## Priority
{PRIORITY_LABEL}
"
    )
}

/// The GitHub Issue body for a TEST item drafted from a user-mode test tool.
#[must_use]
pub fn test_issue(tool: &TestTool) -> String {
    let name = &tool.name;
    let test_id = tool.test_id();
    let file = tool.file.display();

    let ioctls = code_list(&tool.tested_ioctls, "(No IOCTLs detected)");

    let shown: Vec<String> = tool
        .test_functions
        .iter()
        .take(10)
        .map(|f| format!("{f}()"))
        .collect();
    let mut functions = code_list(&shown, "(No test functions detected)");
    if tool.test_functions.len() > 10 {
        let _ = write!(functions, "\n... and {} more", tool.test_functions.len() - 10);
    }

    let mut test_types = String::new();
    for (label, present) in tool.coverage.entries() {
        let status = if present { "✅ Present" } else { "❌ Not Present" };
        let _ = writeln!(test_types, "- **{label}**: {status}");
    }

    let hardware_validation = if tool.coverage.register_access {
        "Register read/write operations"
    } else {
        "Basic functionality"
    };

    format!(
        r"## Description
User-mode test tool for validating driver functionality

**Source**: `{file}`

## Test Coverage

### IOCTLs Tested
{ioctls}

### Test Functions
{functions}

### Test Types
{test_types}
## Verifies Requirements
- **TBD**: Link to requirement issues being verified
- Suggested: REQ-F-IOCTL-* for IOCTL handlers tested

## Test Scenarios

Based on code analysis, this test tool appears to cover:

1. **Device Access**: Opening device handle to `\\.\IntelAvbFilter`
2. **IOCTL Communication**: Sending IOCTL requests and validating responses
3. **Hardware Validation**: {hardware_validation}

## Test Implementation

**Test File**: `{file}`

**Traceability**: Add to test file header:
```c
/**
 * {test_id}: {name} Test Suite
 *
 * Verifies: (add requirement issue numbers)
 * - REQ-F-IOCTL-* (IOCTL handlers)
 * - REQ-F-DEV-* (Device-specific functionality)
 */
```

## Test Execution

**Build**:
```powershell
# Use existing build scripts from project
.\tools\vs_compile.ps1 -BuildCmd 'cl /nologo /W4 /Zi {file} /Fe:{name}.exe'
```

**Run**:
```powershell
.\{name}.exe
```

**Expected Output**: (TBD - document expected success criteria)

## Coverage Gaps

⚠️ **Potential gaps to address:**
- [ ] Add negative test cases (invalid inputs, error paths)
- [ ] Test on all supported controllers (I210, I219, I225, I226)
- [ ] Add performance/stress testing scenarios
- [ ] Validate error code handling
- [ ] Add traceability comments linking to requirements

## Validation Required

- [ ] Run test on actual hardware
- [ ] Verify all assertions pass
- [ ] Document expected vs. actual results
- [ ] Link to requirement issues being verified

## Priority
{PRIORITY_LABEL}
"
    )
}

/// Renders the full extraction report as Markdown.
#[must_use]
pub fn render(scan: &CodebaseScan, date: NaiveDate) -> String {
    let handler_count = scan.handlers.len();
    let device_count = scan.devices.len();
    let test_count = scan.test_tools.len();
    let total = handler_count + device_count + test_count;
    let date = date.format("%Y-%m-%d");

    let mut report = format!(
        r"# Intel AVB Filter Driver - Reverse Engineering Report

**Date**: {date}
**Purpose**: Extract functional requirements from existing implementation
**Standards**: ISO/IEC/IEEE 29148:2018 (Requirements Engineering)

---

## Executive Summary

**Functional Requirements Found**: {handler_count} IOCTL handlers
**Device Implementations Found**: {device_count} Intel controllers
**Test Tools Found**: {test_count}

This report contains GitHub Issue bodies ready for creation. Each issue represents a functional requirement reverse-engineered from code.

⚠️ **Validation Required**: All requirements must be validated with stakeholders and tested on actual hardware before being considered authoritative.

---

## 📋 Section 1: IOCTL Handler Requirements

The following functional requirements were extracted from IOCTL handler code:

"
    );

    for (i, handler) in scan.handlers.iter().enumerate() {
        let n = i + 1;
        let body = functional_requirement_issue(handler, &scan.defines);
        let short = handler.short_name();
        let code = &handler.code;
        let file = handler.file.display();
        let _ = write!(
            report,
            r"### {n}. {code}

**Title**: `REQ-F-IOCTL-{short}-001: {code} Handler`
**Labels**: `type:requirement:functional`, `phase:02-requirements`, `{PRIORITY_LABEL}`
**Source File**: `{file}`

**Body**:
```markdown
{body}
```

**Create Issue Command**:
```bash
gh issue create \
  --label 'type:requirement:functional,phase:02-requirements,{PRIORITY_LABEL}' \
  --title 'REQ-F-IOCTL-{short}-001: {code} Handler' \
  --body-file issue-bodies/req-ioctl-{n}.md
```

---

"
        );
    }

    report.push_str("\n## 🖥️ Section 2: Device-Specific Requirements\n\n");

    for (i, device) in scan.devices.iter().enumerate() {
        let n = i + 1;
        let body = device_capability_issue(device);
        let controller = &device.controller;
        let lower = controller.to_lowercase();
        let file = device.file.display();
        let _ = write!(
            report,
            r"### {n}. Intel {controller} Support

**Title**: `REQ-F-DEV-{controller}-001: {controller} Hardware Support`
**Labels**: `type:requirement:functional`, `phase:02-requirements`, `{PRIORITY_LABEL}`, `controller:{lower}`
**Source File**: `{file}`

**Body**:
```markdown
{body}
```

**Create Issue Command**:
```bash
gh issue create \
  --label 'type:requirement:functional,phase:02-requirements,{PRIORITY_LABEL},controller:{lower}' \
  --title 'REQ-F-DEV-{controller}-001: {controller} Hardware Support' \
  --body-file issue-bodies/req-dev-{n}.md
```

---

"
        );
    }

    report.push_str("\n## 🧪 Section 3: Test Coverage\n\n");

    for (i, tool) in scan.test_tools.iter().enumerate() {
        let n = i + 1;
        let body = test_issue(tool);
        let name = &tool.name;
        let test_id = tool.test_id();
        let file = tool.file.display();
        let _ = write!(
            report,
            r"### {n}. {name} Test Suite

**Title**: `{test_id}: {name} Validation`
**Labels**: `type:test`, `phase:07-verification-validation`, `{PRIORITY_LABEL}`
**Source File**: `{file}`

**Body**:
```markdown
{body}
```

**Create Issue Command**:
```bash
gh issue create \
  --label 'type:test,phase:07-verification-validation,{PRIORITY_LABEL}' \
  --title '{test_id}: {name} Validation' \
  --body-file issue-bodies/test-{n}.md
```

---

"
        );
    }

    let _ = write!(
        report,
        r"
## 📊 Summary Statistics

| Category | Count | Status |
|----------|-------|--------|
| IOCTL Handlers | {handler_count} | Ready for GitHub Issue creation |
| Device Implementations | {device_count} | Ready for GitHub Issue creation |
| Test Tools | {test_count} | Ready for GitHub Issue creation |
| **Total Issues to Create** | **{total}** | - |

---

## 🚀 Next Steps

### 1. Review Generated Issues
- Validate each requirement with the project owner
- Verify requirements match stakeholder needs (see `01-stakeholder-requirements/STAKEHOLDER-REQUIREMENTS.md`)
- Add missing edge cases or scenarios

### 2. Create GitHub Issues
- Save each body above into `issue-bodies/` and run the matching `gh issue create` command

### 3. Add Traceability to Code
- Add `Implements: #N (REQ-F-*)` comments to IOCTL handlers
- Add `Verifies: #N` comments to test files
- Link issues bidirectionally (parent/child relationships)

### 4. Validate on Hardware
- Run tests on all supported controllers (I210, I219, I225, I226)
- Document actual vs. expected behavior
- Update requirement status (Working / Experimental / Broken)

---

## ⚠️ Important Reminders

1. **Not Authoritative**: These requirements are reverse-engineered from code and may not represent correct or intended behavior
2. **Validation Required**: All requirements must be validated with stakeholders before being treated as truth
3. **Hardware Testing**: Code analysis alone cannot prove features work on hardware
4. **Traceability**: Link all requirements to stakeholder requirements (StR-*) in Phase 01

---

## 📚 Related Documents

- **Project Charter**: `01-stakeholder-requirements/PROJECT-CHARTER.md`
- **Stakeholder Requirements**: `01-stakeholder-requirements/STAKEHOLDER-REQUIREMENTS.md`
- **System Requirements**: `02-requirements/` (next phase)
- **GitHub Issue Templates**: `.github/ISSUE_TEMPLATE/`

---

*Generated by the code-to-requirements extraction tool*
*Standards: ISO/IEC/IEEE 29148:2018*
"
    );

    report
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::scan::{device::DeviceImpl, ioctl::IoctlHandler, testtool::TestTool};

    fn handler() -> IoctlHandler {
        IoctlHandler::extract(
            "case IOCTL_AVB_GET_TIMESTAMP: {\n  if (p == NULL) status = STATUS_INVALID_PARAMETER; /* SYSTIM */\n  break;\n}",
            Path::new("device.c"),
        )
        .remove(0)
    }

    fn defines() -> IoctlDefines {
        IoctlDefines::extract(
            "#define IOCTL_AVB_GET_TIMESTAMP _NDIS_CONTROL_CODE(5, METHOD_BUFFERED)",
        )
    }

    #[test]
    fn functional_issue_carries_code_value_and_idioms() {
        let body = functional_requirement_issue(&handler(), &defines());
        assert!(body.contains("### REQ-F-IOCTL-GET-TIMESTAMP-001: IOCTL_AVB_GET_TIMESTAMP Handler"));
        assert!(body.contains("**IOCTL Code**: `0x00000005`"));
        assert!(body.contains("- NULL pointer validation"));
        assert!(body.contains("- PTP clock operations"));
        assert!(body.contains("## Priority\npriority:p1"));
    }

    #[test]
    fn functional_issue_reports_missing_idioms() {
        let handler = IoctlHandler::extract(
            "case IOCTL_AVB_NOOP: {\n  break;\n}",
            Path::new("filter.c"),
        )
        .remove(0);
        let body = functional_requirement_issue(&handler, &defines());
        assert!(body.contains("- No validations detected"));
        assert!(body.contains("- No hardware operations detected"));
        assert!(body.contains("**IOCTL Code**: `(undefined)`"));
    }

    #[test]
    fn device_issue_renders_feature_and_lifecycle_state() {
        let device = DeviceImpl::extract(
            "static int init_ptp(device_t *dev) { return 0; } /* SYSTIM */",
            Path::new("devices/intel_i210_impl.c"),
        )
        .unwrap();
        let body = device_capability_issue(&device);
        assert!(body.contains("### REQ-F-DEV-I210-001: I210 Hardware Support"));
        assert!(body.contains("- **PTP**: ✅ Supported"));
        assert!(body.contains("- **TAS**: ❌ Not Detected"));
        assert!(body.contains("- **Cleanup**: ❌ Missing"));
        assert!(body.contains("| PTP Init | `init_ptp(device_t *dev)` | ✅ |"));
    }

    #[test]
    fn test_issue_lists_ioctls_and_functions() {
        let tool = TestTool::extract(
            "void TestClock(void) { DeviceIoControl(h, IOCTL_AVB_GET_TIMESTAMP, 0, 0); }",
            Path::new("avb_test_i210.c"),
        );
        let body = test_issue(&tool);
        assert!(body.contains("- `IOCTL_AVB_GET_TIMESTAMP`"));
        assert!(body.contains("- `TestClock()`"));
        assert!(body.contains("- **Clock**: ✅ Present"));
        assert!(body.contains("- **Tas**: ❌ Not Present"));
    }

    #[test]
    fn report_assembles_all_sections() {
        let scan = CodebaseScan {
            defines: defines(),
            handlers: vec![handler()],
            devices: vec![
                DeviceImpl::extract("", Path::new("devices/intel_i225_impl.c")).unwrap(),
            ],
            test_tools: vec![TestTool::extract("", Path::new("avb_test_i225.c"))],
        };
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let report = render(&scan, date);

        assert!(report.contains("**Date**: 2025-11-03"));
        assert!(report.contains("**Functional Requirements Found**: 1 IOCTL handlers"));
        assert!(report.contains("## 📋 Section 1: IOCTL Handler Requirements"));
        assert!(report.contains("## 🖥️ Section 2: Device-Specific Requirements"));
        assert!(report.contains("## 🧪 Section 3: Test Coverage"));
        assert!(report.contains("| **Total Issues to Create** | **3** | - |"));
        assert!(report.contains("--body-file issue-bodies/req-ioctl-1.md"));
        assert!(report.contains("--body-file issue-bodies/req-dev-1.md"));
        assert!(report.contains("--body-file issue-bodies/test-1.md"));
    }
}
