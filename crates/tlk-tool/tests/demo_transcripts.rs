use tlk_test_example::{demos_root, npc_dir, testcase_path};
use tlk_tool::{assert_case, assert_corpus, discover_cases};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn every_demo_transcript_passes_through_both_adapters() {
    init_logging();
    let cases = discover_cases(&demos_root()).expect("demo corpus should exist");
    assert!(cases.len() >= 3, "expected several demo transcripts");

    for case_path in &cases {
        let npc = case_path.parent().expect("case should live in an npc dir");
        if let Err(error) = assert_case(npc, case_path) {
            panic!("transcript {} failed: {}", case_path.display(), error);
        }
    }
}

#[test]
fn corpus_runner_counts_cases() {
    init_logging();
    let ran = assert_corpus(&demos_root()).expect("corpus should pass");
    assert_eq!(ran, discover_cases(&demos_root()).expect("cases").len());
}

#[test]
fn treanna_first_meeting_transcript_passes() {
    init_logging();
    assert_case(&npc_dir("treanna"), &testcase_path("treanna")).expect("treanna should pass");
}
