use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tlk_core::Script;
use walkdir::WalkDir;

use crate::{TestCase, TlkToolError, TESTCASE_SCHEMA_V1};

pub const SCRIPT_FILE: &str = "script.json";

const CASE_FILE: &str = "testcase.json";
const CASE_SUFFIX: &str = ".testcase.json";

pub fn read_script(npc_dir: &Path) -> Result<Arc<Script>, TlkToolError> {
    let path = npc_dir.join(SCRIPT_FILE);
    let raw = fs::read_to_string(&path).map_err(|source| TlkToolError::ReadFile {
        path: path.clone(),
        source,
    })?;
    Script::from_json(&raw)
        .map(Arc::new)
        .map_err(|source| TlkToolError::Script { path, source })
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, TlkToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| TlkToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase =
        serde_json::from_str(&raw).map_err(|source| TlkToolError::ParseCase {
            path: case_path.to_path_buf(),
            source,
        })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(TlkToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

/// Every `testcase.json` or `*.testcase.json` under `root`, sorted. Each
/// case runs against the `script.json` next to it.
pub fn discover_cases(root: &Path) -> Result<Vec<PathBuf>, TlkToolError> {
    let mut cases = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy())
                .is_some_and(|name| name == CASE_FILE || name.ends_with(CASE_SUFFIX))
        })
        .collect::<Vec<_>>();

    if cases.is_empty() {
        return Err(TlkToolError::NoCases {
            path: root.to_path_buf(),
        });
    }
    cases.sort();
    Ok(cases)
}
