//! The editor's event loop end to end, fed from an in-memory input.

use crashsafe::app::DYING_VAR;
use crashsafe::config::AppConfig;
use crashsafe::lifecycle;

fn config(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.swap.directory = dir.join("swap");
    config
}

#[tokio::test]
async fn test_quit_command_ends_loop() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("doc.txt");
    let config = config(dir.path());

    let (signals, queue) = lifecycle::build(&config, &[file.clone()]).unwrap();
    let input: &[u8] = b"first line\n:w\n:q\n";
    let editor = lifecycle::run(signals, queue, input).await.unwrap();

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "first line\n");
    assert!(!editor.current().is_modified());
    assert_eq!(editor.var(DYING_VAR), Some(0));
}

#[tokio::test]
async fn test_input_end_keeps_unsaved_work_in_swap() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("draft.txt");
    let config = config(dir.path());

    let (signals, queue) = lifecycle::build(&config, &[file.clone()]).unwrap();
    let input: &[u8] = b"not saved\n";
    let editor = lifecycle::run(signals, queue, input).await.unwrap();

    assert!(!file.exists());
    let record = editor.swap().read(editor.current().name()).unwrap();
    assert_eq!(record.lines, vec!["not saved".to_string()]);
}

#[tokio::test]
async fn test_unopenable_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    // A directory cannot be read as a buffer.
    let result = lifecycle::build(&config, &[dir.path().to_path_buf()]);
    assert!(matches!(result, Err(lifecycle::StartupError::Open { .. })));
}
