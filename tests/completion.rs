//! Completion and help flows driven through a full session.

use std::io::Write;

use promptline::{
    complete_filenames, CompletionRequest, ScriptedTerminal, Session, Status, TokenView,
};

fn session(width: usize) -> Session<ScriptedTerminal> {
    Session::new(ScriptedTerminal::new(width), 16)
}

fn command_completer(commands: &'static [&'static str]) -> Box<dyn promptline::Completer> {
    Box::new(move |request: &mut CompletionRequest| -> std::io::Result<()> {
        if request.current_token_index() == 0 {
            let typed = request.current_token().to_string();
            for command in commands {
                if command.starts_with(&typed) {
                    request.add_candidate(*command);
                }
            }
        } else {
            complete_filenames(request)?;
        }
        Ok(())
    })
}

#[test]
fn tab_completes_a_single_command_in_place() {
    let mut session = session(80);
    session.set_completer(command_completer(&["status", "quit"]));
    session.terminal_mut().push_bytes(b"st\t\r");
    let (status, line) = session.edit_line(0, "> ");
    assert_eq!(status, Status::Success);
    assert_eq!(line.as_deref(), Some("status"));
}

#[test]
fn tab_with_multiple_matches_lists_and_extends_the_prefix() {
    let mut session = session(80);
    session.set_completer(command_completer(&["def1", "def3abc", "def3abc2", "abc"]));
    session.terminal_mut().push_bytes(b"de\t\r");
    let (_, line) = session.edit_line(0, "> ");
    // Shared prefix of def1/def3abc/def3abc2 beyond "de" is "def".
    assert_eq!(line.as_deref(), Some("def"));
    let output = session.terminal().output_str();
    assert!(output.contains("def1"));
    assert!(output.contains("def3abc2"));
    // The line is repainted after the listing.
    assert!(output.ends_with("> def\n"));
}

#[test]
fn completion_replaces_the_word_tail_under_the_cursor() {
    let mut session = session(80);
    session.set_completer(command_completer(&["status"]));
    // Cursor back inside "stXYZ": completion removes the tail and splices.
    session
        .terminal_mut()
        .push_bytes(b"stXYZ\x1b[D\x1b[D\x1b[D\t\r");
    let (_, line) = session.edit_line(0, "> ");
    assert_eq!(line.as_deref(), Some("status"));
}

#[test]
fn second_argument_uses_filename_completion() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    std::fs::write(dir.path().join("notes.txt"), b"x").expect("write failed");

    let mut session = session(200);
    session.set_completer(command_completer(&["open"]));
    let input = format!("open {}/no\t\r", dir.path().display());
    session.terminal_mut().push_bytes(input.as_bytes());
    let (_, line) = session.edit_line(0, "> ");
    let expected = format!("open {}/notes.txt ", dir.path().display());
    assert_eq!(line.as_deref(), Some(expected.as_str()));
}

#[test]
fn default_session_falls_back_to_filename_completion() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    std::fs::write(dir.path().join("unique_name.txt"), b"x").expect("write failed");

    let mut session = session(200);
    let input = format!("{}/unique\t\r", dir.path().display());
    session.terminal_mut().push_bytes(input.as_bytes());
    let (_, line) = session.edit_line(0, "> ");
    let expected = format!("{}/unique_name.txt ", dir.path().display());
    assert_eq!(line.as_deref(), Some(expected.as_str()));
}

#[test]
fn help_key_reports_the_token_context_and_repaints() {
    let mut session = session(80);
    session.set_help(
        Box::new(|view: &TokenView<'_>, out: &mut dyn Write| -> std::io::Result<()> {
            writeln!(out, "token {} of {}", view.current_token_index(), view.token_count())
        }),
        b'?',
    );
    session.terminal_mut().push_bytes(b"connect host\x1b[D?\r");
    let (_, line) = session.edit_line(0, "> ");
    // The help key itself is never inserted.
    assert_eq!(line.as_deref(), Some("connect host"));
    let output = session.terminal().output_str();
    assert!(output.contains("token 1 of 2"));
    assert!(output.ends_with("> connect host\x1b[1D\n"));
}

#[test]
fn silent_help_leaves_the_screen_alone() {
    let mut session = session(80);
    session.set_help(
        Box::new(|_view: &TokenView<'_>, _out: &mut dyn Write| -> std::io::Result<()> { Ok(()) }),
        b'?',
    );
    session.terminal_mut().push_bytes(b"x?\r");
    let (_, line) = session.edit_line(0, "> ");
    assert_eq!(line.as_deref(), Some("x"));
    assert_eq!(session.terminal().output_str(), "> x\n");
}

#[test]
fn completer_note_output_is_shown_before_the_prompt_repaint() {
    let mut session = session(80);
    session.set_completer(Box::new(
        |request: &mut CompletionRequest| -> std::io::Result<()> {
            let current_token = request.current_token().to_string();
            writeln!(request.writer(), "no matches for '{}'", current_token)
        },
    ));
    session.terminal_mut().push_bytes(b"zzz\t\r");
    let (_, line) = session.edit_line(0, "> ");
    assert_eq!(line.as_deref(), Some("zzz"));
    let output = session.terminal().output_str();
    let note_at = output.find("no matches for 'zzz'").expect("note missing");
    let repaint_at = output.rfind("> zzz").expect("repaint missing");
    assert!(note_at < repaint_at);
}
