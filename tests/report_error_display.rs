use std::path::PathBuf;

use benchplot::ReportError;
use insta::assert_snapshot;

#[test]
fn display_missing_input() {
    let err = ReportError::MissingInput {
        file: "node_ipc.json".to_string(),
        searched: PathBuf::from("/tmp/results"),
    };

    assert_snapshot!(err.to_string(), @"missing node_ipc.json");
}

#[test]
fn display_malformed_input() {
    let err = ReportError::MalformedInput {
        path: Some(PathBuf::from("/tmp/results/bun_latency.json")),
        reason: "EOF while parsing an object at line 1 column 12".to_string(),
    };

    assert_snapshot!(
        err.to_string(),
        @"malformed input /tmp/results/bun_latency.json: EOF while parsing an object at line 1 column 12"
    );
}

#[test]
fn display_malformed_input_without_path() {
    let err = ReportError::MalformedInput {
        path: None,
        reason: "no JSON object or array found".to_string(),
    };

    assert_snapshot!(err.to_string(), @"malformed input: no JSON object or array found");
}

#[test]
fn display_empty_result() {
    let err = ReportError::EmptyResult {
        what: "deno_multi.json".to_string(),
    };

    assert_snapshot!(err.to_string(), @"no usable data for deno_multi.json");
}
