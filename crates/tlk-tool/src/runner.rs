use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use tlk_api::{engine_options, spawn_conversation, Conversation, StreamOptions};
use tlk_core::{Script, TalkOutput};
use tlk_runtime::MemoryHost;

use crate::source::{discover_cases, read_script, read_test_case};
use crate::{EventRecorder, ExpectedEvent, TestCase, TlkToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    Step,
    Streaming,
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step => f.write_str("step"),
            Self::Streaming => f.write_str("streaming"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    pub calls: Vec<String>,
}

fn host_for(case: &TestCase) -> Arc<MemoryHost> {
    let mut host = MemoryHost::new(case.avatar_name.clone());
    if case.has_met {
        host = host.with_met(case.npc_id);
    }
    if let Some(karma) = case.karma {
        host = host.with_karma(karma);
    }
    if let Some(gold) = case.gold {
        host = host.with_gold(gold);
    }
    if let Some(capacity) = case.party_capacity {
        host = host.with_party_capacity(capacity);
    }
    Arc::new(host)
}

/// Drives the case through the call-and-return adapter.
pub fn run_case(npc_dir: &Path, case: &TestCase) -> Result<RunReport, TlkToolError> {
    let script = read_script(npc_dir)?;
    run_step(script, case)
}

fn run_step(script: Arc<Script>, case: &TestCase) -> Result<RunReport, TlkToolError> {
    let host = host_for(case);
    let mut conversation = Conversation::with_script(script, host.clone());
    let mut recorder = EventRecorder::default();
    let mut action_index = 0usize;

    let mut response = conversation.start(case.npc_id);
    loop {
        for fragment in &response.fragments {
            recorder.record(fragment);
        }
        if response.complete {
            break;
        }
        if !response.needs_input {
            return Err(TlkToolError::Stalled {
                adapter: Adapter::Step,
                event_index: recorder.len(),
            });
        }
        let action = case
            .actions
            .get(action_index)
            .ok_or(TlkToolError::MissingAction {
                adapter: Adapter::Step,
                event_index: recorder.len(),
            })?;
        action_index += 1;
        response = conversation.process_input(action.text());
    }

    finish(Adapter::Step, case, recorder, action_index, &host)
}

/// Drives the case through the streaming adapter on a private runtime.
pub fn run_case_streaming(npc_dir: &Path, case: &TestCase) -> Result<RunReport, TlkToolError> {
    let script = read_script(npc_dir)?;
    run_streaming(script, case)
}

fn run_streaming(script: Arc<Script>, case: &TestCase) -> Result<RunReport, TlkToolError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TlkToolError::Runtime)?;
    runtime.block_on(stream_case(script, case))
}

async fn stream_case(script: Arc<Script>, case: &TestCase) -> Result<RunReport, TlkToolError> {
    let host = host_for(case);
    let mut talk = spawn_conversation(
        engine_options(script, host.clone()),
        case.npc_id,
        StreamOptions::default(),
    );
    let mut recorder = EventRecorder::default();
    let mut action_index = 0usize;

    loop {
        let fragments = talk.recv_until_boundary().await;
        for fragment in &fragments {
            recorder.record(fragment);
        }
        match fragments.last() {
            Some(TalkOutput::End) => break,
            Some(TalkOutput::Input { .. }) => {}
            _ => {
                return Err(TlkToolError::Stalled {
                    adapter: Adapter::Streaming,
                    event_index: recorder.len(),
                })
            }
        }
        let action = case
            .actions
            .get(action_index)
            .ok_or(TlkToolError::MissingAction {
                adapter: Adapter::Streaming,
                event_index: recorder.len(),
            })?;
        action_index += 1;
        talk.send_input(action.text()).await?;
    }
    talk.join().await;

    finish(Adapter::Streaming, case, recorder, action_index, &host)
}

fn finish(
    adapter: Adapter,
    case: &TestCase,
    recorder: EventRecorder,
    consumed_actions: usize,
    host: &MemoryHost,
) -> Result<RunReport, TlkToolError> {
    if consumed_actions != case.actions.len() {
        return Err(TlkToolError::UnusedActions {
            adapter,
            used: consumed_actions,
            total: case.actions.len(),
        });
    }
    Ok(RunReport {
        observed_events: recorder.finish(),
        consumed_actions,
        calls: host.call_names(),
    })
}

/// Runs the case through both adapters, requires them to agree with each
/// other, then checks the agreed result against the case's expectations.
pub fn assert_case(npc_dir: &Path, case_path: &Path) -> Result<(), TlkToolError> {
    let case = read_test_case(case_path)?;
    let script = read_script(npc_dir)?;
    debug!("running {}", case_path.display());

    let step = run_step(script.clone(), &case)?;
    let streaming = run_streaming(script, &case)?;
    compare_adapters(&step, &streaming)?;
    compare_events(&case.expected_events, &step.observed_events)?;

    if let Some(expected_calls) = &case.expected_calls {
        if *expected_calls != step.calls {
            return Err(TlkToolError::CallMismatch {
                expected: expected_calls.clone(),
                actual: step.calls,
            });
        }
    }
    Ok(())
}

/// Asserts every case found under `root`; returns how many ran.
pub fn assert_corpus(root: &Path) -> Result<usize, TlkToolError> {
    let cases = discover_cases(root)?;
    for case_path in &cases {
        let npc_dir = case_path.parent().unwrap_or(root);
        assert_case(npc_dir, case_path)?;
    }
    Ok(cases.len())
}

fn compare_adapters(step: &RunReport, streaming: &RunReport) -> Result<(), TlkToolError> {
    let longest = step.observed_events.len().max(streaming.observed_events.len());
    for index in 0..longest {
        let left = step.observed_events.get(index);
        let right = streaming.observed_events.get(index);
        if left != right {
            return Err(TlkToolError::AdapterMismatch {
                index,
                step: describe(left)?,
                streaming: describe(right)?,
            });
        }
    }
    if step.calls != streaming.calls {
        return Err(TlkToolError::CallMismatch {
            expected: step.calls.clone(),
            actual: streaming.calls.clone(),
        });
    }
    Ok(())
}

fn describe(event: Option<&ExpectedEvent>) -> Result<String, TlkToolError> {
    match event {
        Some(event) => serde_json::to_string(event).map_err(TlkToolError::EventSerialize),
        None => Ok("<none>".to_string()),
    }
}

fn compare_events(
    expected: &[ExpectedEvent],
    observed: &[ExpectedEvent],
) -> Result<(), TlkToolError> {
    if observed.len() != expected.len() {
        let observed_json =
            serde_json::to_string_pretty(observed).map_err(TlkToolError::EventSerialize)?;
        return Err(TlkToolError::EventCountMismatch {
            expected: expected.len(),
            actual: observed.len(),
            observed: observed_json,
        });
    }

    for (index, (expected, actual)) in expected.iter().zip(observed.iter()).enumerate() {
        if expected != actual {
            return Err(TlkToolError::EventMismatch {
                index,
                expected: describe(Some(expected))?,
                actual: describe(Some(actual))?,
            });
        }
    }
    Ok(())
}
