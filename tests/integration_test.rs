//! Integration tests for convo-memory.

#![allow(clippy::expect_used)]

use convo_memory::core::{ConversationMemory, Message, Role, SUMMARY_PREFIX};
use convo_memory::error::{Error, SummarizeError};
use convo_memory::summarize::{FallbackSummarizer, SUMMARY_INSTRUCTION, Summarizer};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Test double that counts calls and replays scripted answers.
#[derive(Debug, Default)]
struct ScriptedSummarizer {
    calls: AtomicUsize,
    answers: Mutex<Vec<Result<String, SummarizeError>>>,
}

impl ScriptedSummarizer {
    fn with_answers(answers: Vec<Result<String, SummarizeError>>) -> Self {
        let mut answers = answers;
        answers.reverse();
        Self {
            calls: AtomicUsize::new(0),
            answers: Mutex::new(answers),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Summarizer for ScriptedSummarizer {
    fn summarize(&self, instruction: &str, _text: &str) -> Result<String, SummarizeError> {
        assert_eq!(instruction, SUMMARY_INSTRUCTION);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .expect("answers lock")
            .pop()
            .unwrap_or(Err(SummarizeError::Request("script exhausted".to_string())))
    }
}

#[test]
fn test_accumulate_compress_cycle() {
    let stub = ScriptedSummarizer::with_answers(vec![
        Ok("User wants a walnut door.".to_string()),
        Ok("  User confirmed 2.4m height.  ".to_string()),
    ]);
    let mut memory = ConversationMemory::with_capacity(&stub, 4).expect("memory");

    memory.add_message(Role::User, "I need a door");
    memory.add_message(Role::Assistant, "Which finish?");
    memory.add_message(Role::User, "walnut");
    memory
        .summarize_old_messages()
        .expect("first summarize failed");

    assert_eq!(
        memory.get_context(),
        vec![Message::system(format!(
            "{SUMMARY_PREFIX}User wants a walnut door."
        ))]
    );

    memory.add_message(Role::Assistant, "Which height?");
    memory.add_message(Role::User, "2.4m");
    memory
        .summarize_old_messages()
        .expect("second summarize failed");

    // Replaced, not appended; whitespace trimmed.
    assert_eq!(memory.summary(), "User confirmed 2.4m height.");
    assert_eq!(stub.calls(), 2);
    assert!(memory.is_empty());
}

#[test]
fn test_empty_summarize_makes_no_call() {
    let stub = ScriptedSummarizer::default();
    let mut memory = ConversationMemory::new(&stub);

    memory.summarize_old_messages().expect("noop summarize");
    memory.reset();
    memory.summarize_old_messages().expect("noop summarize");

    assert_eq!(stub.calls(), 0);
    assert!(memory.get_context().is_empty());
}

#[test]
fn test_failure_is_observable_and_atomic() {
    let stub = ScriptedSummarizer::with_answers(vec![
        Ok("first".to_string()),
        Err(SummarizeError::Timeout { seconds: 30 }),
    ]);
    let mut memory = ConversationMemory::new(&stub);

    memory.add_message(Role::User, "a");
    memory.summarize_old_messages().expect("first summarize");
    memory.add_message(Role::User, "b");
    let before = memory.get_context();

    let err = memory
        .summarize_old_messages()
        .expect_err("second summarize should fail");
    assert!(matches!(
        err,
        Error::Summarize(SummarizeError::Timeout { seconds: 30 })
    ));
    assert_eq!(memory.get_context(), before);
    assert_eq!(memory.summary(), "first");
}

#[test]
fn test_reset_after_mixed_operations() {
    let stub = ScriptedSummarizer::with_answers(vec![Ok("s".to_string())]);
    let mut memory = ConversationMemory::with_capacity(&stub, 2).expect("memory");
    for i in 0..5 {
        memory.add_message(Role::User, format!("{i}"));
    }
    memory.summarize_old_messages().expect("summarize");
    memory.add_message(Role::System, "be brief");

    memory.reset();
    assert!(memory.get_context().is_empty());
    assert_eq!(memory.summary(), "");
}

#[test]
fn test_fallback_summarizer_end_to_end() {
    let mut memory = ConversationMemory::new(FallbackSummarizer::default());
    memory
        .add_raw_message("user", "hello")
        .expect("valid role");
    memory
        .add_raw_message("user", "I want a concealed door")
        .expect("valid role");
    memory
        .add_raw_message("ASSISTANT", "Which height?")
        .expect("valid role");
    assert!(memory.add_raw_message("customer", "2.4m").is_err());

    memory.summarize_old_messages().expect("summarize");
    assert_eq!(
        memory.summary(),
        "user: I want a concealed door; assistant: Which height?"
    );
}

#[test]
fn test_boxed_summarizer() {
    let summarizer: Box<dyn Summarizer> = Box::new(FallbackSummarizer::default());
    let mut memory = ConversationMemory::new(summarizer);
    memory.add_message(Role::User, "quote for three doors");
    memory.summarize_old_messages().expect("summarize");
    assert_eq!(memory.summary(), "user: quote for three doors");
}

mod property_tests {
    use convo_memory::core::{ConversationMemory, Message, Role};
    use convo_memory::summarize::FallbackSummarizer;
    use proptest::prelude::*;

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
    }

    fn message_strategy() -> impl Strategy<Value = Message> {
        (role_strategy(), "[a-z ]{0,20}").prop_map(|(role, content)| Message::new(role, content))
    }

    proptest! {
        #[test]
        fn buffer_never_exceeds_capacity(
            capacity in 1usize..16,
            messages in prop::collection::vec(message_strategy(), 0..64),
        ) {
            let mut memory =
                ConversationMemory::with_capacity(FallbackSummarizer::default(), capacity).unwrap();
            for message in messages {
                memory.push(message);
                prop_assert!(memory.len() <= capacity);
            }
        }

        #[test]
        fn eviction_keeps_last_messages_in_order(
            capacity in 1usize..16,
            messages in prop::collection::vec(message_strategy(), 0..64),
        ) {
            let mut memory =
                ConversationMemory::with_capacity(FallbackSummarizer::default(), capacity).unwrap();
            for message in &messages {
                memory.add_message(message.role, message.content.clone());
            }

            let skip = messages.len().saturating_sub(capacity);
            prop_assert_eq!(memory.get_context(), messages[skip..].to_vec());
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use convo_memory::cli::commands::execute;
    use convo_memory::cli::output::OutputFormat;
    use convo_memory::cli::parser::{Cli, Commands};
    use convo_memory::error::Error;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    const TRANSCRIPT: &str = "\
# showroom chat
user: hi
assistant: Hello! How can I help?
user: I need a concealed door, 2.4m high
assistant: We have oak and walnut finishes.
user: walnut please
user: thanks
";

    fn transcript_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(text.as_bytes()).expect("write transcript");
        file
    }

    /// Helper to create an offline CLI struct with no secrets file.
    fn make_cli(
        dir: &TempDir,
        max_raw_messages: usize,
        format: OutputFormat,
        command: Commands,
    ) -> Cli {
        Cli {
            api_key: None,
            secrets: Some(dir.path().join("secrets.toml")),
            model: "gpt-4".to_string(),
            max_raw_messages,
            timeout_secs: 5,
            offline: true,
            verbose: false,
            format,
            command,
        }
    }

    #[test]
    fn test_cmd_context_evicts() {
        let dir = TempDir::new().expect("temp dir");
        let file = transcript_file(TRANSCRIPT);
        let cli = make_cli(
            &dir,
            2,
            OutputFormat::Text,
            Commands::Context {
                transcript: file.path().to_path_buf(),
            },
        );

        let output = execute(&cli).expect("context command");
        assert!(output.contains("Summary: (none)"));
        assert!(output.contains("  [user] walnut please"));
        assert!(output.contains("  [user] thanks"));
        assert!(!output.contains("concealed door"));
        assert!(output.contains("Loaded: 6  Evicted: 4  Summaries: 0"));
    }

    #[test]
    fn test_cmd_summarize_json() {
        let dir = TempDir::new().expect("temp dir");
        let file = transcript_file(TRANSCRIPT);
        let cli = make_cli(
            &dir,
            10,
            OutputFormat::Json,
            Commands::Summarize {
                transcript: file.path().to_path_buf(),
                auto: false,
            },
        );

        let output = execute(&cli).expect("summarize command");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        let summary = value["summary"].as_str().expect("summary string");
        assert!(summary.contains("concealed door"));
        assert!(!summary.contains("thanks"));
        assert_eq!(value["context"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["context"][0]["role"], "system");
        assert_eq!(value["summaries"], 1);
        assert_eq!(value["evicted"], 0);
    }

    #[test]
    fn test_cmd_summarize_auto() {
        let dir = TempDir::new().expect("temp dir");
        let file = transcript_file(TRANSCRIPT);
        let cli = make_cli(
            &dir,
            2,
            OutputFormat::Json,
            Commands::Summarize {
                transcript: file.path().to_path_buf(),
                auto: true,
            },
        );

        let output = execute(&cli).expect("summarize command");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        // Rounds before messages 3 and 5, then the final pair.
        assert_eq!(value["summaries"], 3);
        assert_eq!(value["evicted"], 0);
        assert_eq!(value["summary"], "user: walnut please");
    }

    #[test]
    fn test_cmd_invalid_role() {
        let dir = TempDir::new().expect("temp dir");
        let file = transcript_file("user: hi\nbot: beep\n");
        let cli = make_cli(
            &dir,
            10,
            OutputFormat::Text,
            Commands::Context {
                transcript: file.path().to_path_buf(),
            },
        );

        let err = execute(&cli).expect_err("bad role should fail");
        assert!(matches!(err, Error::Transcript { line: 2, .. }));
    }

    #[test]
    fn test_cmd_missing_transcript() {
        let dir = TempDir::new().expect("temp dir");
        let cli = make_cli(
            &dir,
            10,
            OutputFormat::Text,
            Commands::Context {
                transcript: PathBuf::from("/nonexistent/chat.txt"),
            },
        );
        assert!(matches!(execute(&cli), Err(Error::Io(_))));
    }

    #[test]
    fn test_cmd_zero_capacity() {
        let dir = TempDir::new().expect("temp dir");
        let file = transcript_file(TRANSCRIPT);
        let cli = make_cli(
            &dir,
            0,
            OutputFormat::Text,
            Commands::Context {
                transcript: file.path().to_path_buf(),
            },
        );
        assert!(matches!(execute(&cli), Err(Error::Config { .. })));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_cmd_summarize_online_requires_key() {
        let dir = TempDir::new().expect("temp dir");
        let file = transcript_file(TRANSCRIPT);
        let mut cli = make_cli(
            &dir,
            10,
            OutputFormat::Text,
            Commands::Summarize {
                transcript: file.path().to_path_buf(),
                auto: false,
            },
        );
        cli.offline = false;

        let err = execute(&cli).expect_err("missing key should fail");
        assert!(err.to_string().contains("missing OpenAI API key"));
    }
}

/// End-to-end tests of the compiled binary.
mod binary_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn bin(dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("convo-memory").expect("binary built");
        cmd.current_dir(dir.path())
            .env_remove("OPENAI_API_KEY")
            .env_remove("CONVO_MAX_RAW_MESSAGES")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_help_lists_commands() {
        let dir = TempDir::new().expect("temp dir");
        bin(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("context").and(predicate::str::contains("summarize")));
    }

    #[test]
    fn test_context_from_stdin() {
        let dir = TempDir::new().expect("temp dir");
        bin(&dir)
            .args(["context", "-"])
            .write_stdin("user: hi\nassistant: hello\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("[user] hi").and(predicate::str::contains("[assistant] hello")));
    }

    #[test]
    fn test_offline_summarize_from_stdin() {
        let dir = TempDir::new().expect("temp dir");
        bin(&dir)
            .args(["summarize", "-", "--offline"])
            .write_stdin("user: hello\nuser: I need a wardrobe\n")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "[system] Conversation so far: user: I need a wardrobe",
            ));
    }

    #[test]
    fn test_invalid_role_text_error() {
        let dir = TempDir::new().expect("temp dir");
        bin(&dir)
            .args(["context", "-"])
            .write_stdin("robot: beep\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid role"));
    }

    #[test]
    fn test_json_error_on_stdout() {
        let dir = TempDir::new().expect("temp dir");
        bin(&dir)
            .args(["--format", "json", "context", "missing.txt"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("\"error\"").and(predicate::str::contains("missing.txt")));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let dir = TempDir::new().expect("temp dir");
        bin(&dir)
            .args(["--format", "yaml", "context", "-"])
            .write_stdin("user: hi\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid value 'yaml'"));
    }
}
