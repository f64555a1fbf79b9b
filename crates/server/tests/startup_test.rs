//! # Startup Tests
//!
//! The application state is built before the port is bound. These tests
//! check that a broken prompt source or the shipped prompt set behave as
//! expected at that point.

mod common;

use common::{test_config, write_prompt_dir};
use tempfile::tempdir;
use vertagger::PromptSource;
use vertagger_server::state::build_app_state;

#[tokio::test]
async fn test_missing_prompt_directory_aborts_startup() {
    let dir = tempdir().unwrap();
    let config = test_config(
        "http://127.0.0.1:9/v1/chat/completions".to_string(),
        PromptSource::Directory {
            path: dir.path().join("does-not-exist"),
            fragments: vec![],
        },
    );

    let result = build_app_state(config).await;

    let err = result.expect_err("startup must fail without prompts");
    assert!(err.to_string().contains("does-not-exist"));
}

#[tokio::test]
async fn test_empty_prompt_directory_aborts_startup() {
    let dir = tempdir().unwrap();
    let config = test_config(
        "http://127.0.0.1:9/v1/chat/completions".to_string(),
        PromptSource::Directory {
            path: dir.path().to_path_buf(),
            fragments: vec![],
        },
    );

    assert!(build_app_state(config).await.is_err());
}

#[tokio::test]
async fn test_state_holds_assembled_prompt() {
    let dir = tempdir().unwrap();
    let prompts = write_prompt_dir(dir.path());
    let config = test_config("http://127.0.0.1:9/v1/chat/completions".to_string(), prompts);

    let state = build_app_state(config).await.unwrap();

    assert_eq!(state.service.system_prompt().fragment_count(), 2);
    assert_eq!(state.service.model(), "gpt-4o-mini");
}

#[tokio::test]
async fn test_shipped_prompt_set_assembles() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts");
    let source = PromptSource::Directory {
        path,
        fragments: vec![],
    };

    let prompt = vertagger::assemble_system_prompt(&source).unwrap();

    assert_eq!(prompt.fragment_count(), 7);
    assert!(prompt.as_str().contains("Informieren"));
    assert!(prompt.as_str().contains("Keine weitere"));
}
