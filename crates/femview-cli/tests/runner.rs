//! Batch and interactive drivers over a terminal frontend.

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use femview_cli::config::{Config, load_config};
use femview_cli::runner::{PROMPT, build_session, repl, run_scripts};
use femview_cli::terminal::TerminalFrontend;
use femview_interp::{DispatchStats, Session};

#[derive(Clone, Default)]
struct Buffer(Rc<RefCell<Vec<u8>>>);

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Harness {
    session: Session,
    out: Buffer,
    err: Buffer,
}

fn harness(config: &Config, batch: bool) -> Harness {
    let out = Buffer::default();
    let err = Buffer::default();
    let frontend = TerminalFrontend::new(out.clone(), err.clone());
    let session = build_session(config, config.session_config(batch), Box::new(frontend)).unwrap();
    Harness { session, out, err }
}

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn scripts_run_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = script(dir.path(), "a.fv", "# setup\necho first\nstate 2\n");
    let second = script(dir.path(), "b.fv", "echo second; bogus\n");
    let mut h = harness(&Config::default(), true);

    let stats = run_scripts(&mut h.session, &[first, second]).unwrap();

    assert_eq!(stats, DispatchStats { valid: 3, invalid: 1 });
    assert_eq!(h.out.contents(), "first\nsecond\n");
    assert_eq!(h.err.contents(), "warning: Command \"bogus\" unrecognized.\n");
    assert_eq!(h.session.state().state_index, 1);
}

#[test]
fn unreadable_script_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.fv");
    let mut h = harness(&Config::default(), true);

    let error = run_scripts(&mut h.session, &[missing]).unwrap_err();
    assert!(format!("{error:#}").starts_with("failed to run script"));
}

#[test]
fn quit_skips_remaining_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let first = script(dir.path(), "a.fv", "echo one\nquit\necho two\n");
    let second = script(dir.path(), "b.fv", "echo three\n");
    let mut h = harness(&Config::default(), true);

    run_scripts(&mut h.session, &[first, second]).unwrap();
    assert_eq!(h.out.contents(), "one\n");
    assert!(!h.session.is_running());
}

#[test]
fn batch_sessions_refuse_loop() {
    let dir = tempfile::tempdir().unwrap();
    let body = script(dir.path(), "body.fv", "echo body\n");
    let outer = script(dir.path(), "outer.fv", &format!("loop {}\n", body.display()));
    let mut h = harness(&Config::default(), true);

    let stats = run_scripts(&mut h.session, &[outer]).unwrap();
    assert_eq!(stats.invalid, 1);
    assert_eq!(h.err.contents(), "warning: loop is disabled in batch mode.\n");
    assert_eq!(h.out.contents(), "");
}

#[test]
fn echo_setting_prints_each_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = script(dir.path(), "a.fv", "echo hi; rx 10\n");
    let mut config = Config::default();
    config.session.echo = true;
    let mut h = harness(&config, true);

    run_scripts(&mut h.session, &[path]).unwrap();
    assert_eq!(h.out.contents(), "echo hi\nhi\nrx 10\n");
}

#[test]
fn repl_prompts_until_quit() {
    let mut h = harness(&Config::default(), false);
    let input = Cursor::new("echo a\n\nquit\necho never\n");
    let mut prompts = Vec::new();

    let stats = repl(&mut h.session, input, &mut prompts).unwrap();

    assert_eq!(stats, DispatchStats { valid: 2, invalid: 0 });
    assert_eq!(String::from_utf8(prompts).unwrap(), PROMPT.repeat(3));
    assert_eq!(h.out.contents(), "a\n");
}

#[test]
fn repl_ends_at_end_of_input() {
    let mut h = harness(&Config::default(), false);
    let mut prompts = Vec::new();

    repl(&mut h.session, Cursor::new("rx 5\n"), &mut prompts).unwrap();

    assert_eq!(String::from_utf8(prompts).unwrap(), format!("{PROMPT}{PROMPT}\n"));
    assert!(h.session.is_running());
    assert_eq!(h.session.history().entries().collect::<Vec<_>>(), ["rx 5"]);
}

#[test]
fn mesh_comes_from_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = script(
        dir.path(),
        "femview.toml",
        "[session]\nhistory_capacity = 4\n\n[mesh]\ndims = [2, 2, 2]\nstates = 5\n",
    );
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.session.history_capacity, 4);
    assert_eq!(config.session.loop_limit, 1000);

    let mut h = harness(&config, true);
    h.session.parse_command("info");
    let info = h.out.contents();
    assert!(info.contains("States:  5\n"), "{info}");
    assert!(info.contains("Nodes:  27\n"), "{info}");
    assert!(info.contains("Bricks:  8\n"), "{info}");
    assert_eq!(h.session.history().capacity(), 4);
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let error = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(error.to_string().starts_with("failed to read"));
}

#[test]
fn bad_mesh_is_rejected_at_startup() {
    let config: Config = toml::from_str("[mesh]\ndims = [0, 2, 2]\n").unwrap();
    let frontend = TerminalFrontend::new(Buffer::default(), Buffer::default());
    let error = build_session(&config, config.session_config(true), Box::new(frontend)).unwrap_err();
    assert_eq!(error.to_string(), "invalid [mesh] configuration");
}
