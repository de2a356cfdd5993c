use dicebot::errors::BotError;
use dicebot::reporting;

// One test only: the reporter is process-wide and this file is its own binary.
#[test]
fn test_reporter_installs_once() {
    // Capturing before init is a no-op.
    reporting::capture(&BotError::Transport("early".to_string()));
    assert!(reporting::reporter().is_none());

    assert!(reporting::init("dicebot-prod"));
    assert!(!reporting::init("someone-else"));
    assert_eq!(
        reporting::reporter().map(|r| r.project()),
        Some("dicebot-prod")
    );

    reporting::capture(&BotError::Transport("connection refused".to_string()));
}
