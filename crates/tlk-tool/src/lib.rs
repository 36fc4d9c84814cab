mod case;
mod recorder;
mod runner;
mod source;

pub use case::{ExpectedEvent, TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use recorder::EventRecorder;
pub use runner::{assert_case, assert_corpus, run_case, run_case_streaming, Adapter, RunReport};
pub use source::{discover_cases, read_script, read_test_case, SCRIPT_FILE};

use std::path::PathBuf;

use thiserror::Error;
use tlk_core::TalkError;

#[derive(Debug, Error)]
pub enum TlkToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("Failed to load script {path}: {source}")]
    Script { path: PathBuf, source: TalkError },
    #[error("No testcase files under {path}.")]
    NoCases { path: PathBuf },
    #[error("Engine error: {0}")]
    Engine(#[from] TalkError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("{adapter} adapter: action missing at event index {event_index}.")]
    MissingAction {
        adapter: Adapter,
        event_index: usize,
    },
    #[error("{adapter} adapter: unused actions, used {used} of {total}.")]
    UnusedActions {
        adapter: Adapter,
        used: usize,
        total: usize,
    },
    #[error("{adapter} adapter stopped without input request or end at event index {event_index}.")]
    Stalled {
        adapter: Adapter,
        event_index: usize,
    },
    #[error("Adapters disagree at event index {index}. step={step} streaming={streaming}")]
    AdapterMismatch {
        index: usize,
        step: String,
        streaming: String,
    },
    #[error("Capability calls differ. expected={expected:?} actual={actual:?}")]
    CallMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Expected event count {expected}, actual {actual}. observed={observed}")]
    EventCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Event mismatch at index {index}. expected={expected} actual={actual}")]
    EventMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Failed to serialize event for diff: {0}")]
    EventSerialize(serde_json::Error),
}
