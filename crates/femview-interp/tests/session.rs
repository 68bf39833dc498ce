//! End-to-end command sessions against the block mesh.

use std::fs;

use femview_interp::{FrontendEvent, Recorder, ReplayStatus, Session, SessionConfig, Severity};
use femview_model::{BlockMesh, BlockSpec, DisplayFlag, RenderMode};
use nalgebra::Vector3;

fn session_with(config: SessionConfig) -> (Session, Recorder) {
    let mesh = BlockMesh::new(BlockSpec::default()).unwrap();
    let recorder = Recorder::new();
    let session = Session::new(Box::new(mesh), Box::new(recorder.clone()), config);
    (session, recorder)
}

fn session() -> (Session, Recorder) {
    session_with(SessionConfig::default())
}

fn warning(message: &str) -> (Severity, String) {
    (Severity::Warning, message.to_string())
}

fn history(session: &Session) -> Vec<String> {
    session.history().entries().map(str::to_string).collect()
}

#[test]
fn unknown_command_is_reported_and_not_logged() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("bogus 1"));
    assert_eq!(recorder.popups(), vec![warning("Command \"bogus\" unrecognized.")]);
    assert!(session.history().is_empty());
    assert_eq!(session.last_command(), Some("bogus 1"));
    assert_eq!(session.stats().invalid, 1);
}

#[test]
fn short_command_reports_usage_without_mutation() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("rx"));
    assert_eq!(
        recorder.popups(),
        vec![(Severity::Usage, "Usage: rx <degrees>".to_string())]
    );
    assert_eq!(session.state().view, femview_model::ViewTransform::default());
}

#[test]
fn bad_number_is_invalid() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("tx 1.5q"));
    assert_eq!(recorder.popups(), vec![warning("Unable to convert 1.5q")]);
}

#[test]
fn semicolons_split_commands() {
    let (mut session, _recorder) = session();
    assert!(session.parse_command("tx 1; ty 2;; [12] tz 3"));
    assert_eq!(session.state().view.translation, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(history(&session), vec!["tx 1", "ty 2", "tz 3"]);
}

#[test]
fn mesh_commands_refresh_only_in_mesh_mode() {
    let (mut session, recorder) = session();
    session.parse_command("rx 90");
    assert_eq!(recorder.take(), vec![FrontendEvent::Refresh(RenderMode::Mesh)]);

    session.parse_command("show sz");
    assert_eq!(
        recorder.take(),
        vec![
            FrontendEvent::Refresh(RenderMode::Mesh),
            FrontendEvent::LoadResult(Some("sz".to_string())),
            FrontendEvent::Refresh(RenderMode::Mesh),
        ]
    );

    session.parse_command("plot");
    assert_eq!(session.state().render_mode, RenderMode::Plot);
    assert_eq!(session.state().plot_results, vec!["sz".to_string()]);
    recorder.take();

    session.parse_command("ry 10");
    assert!(recorder.take().is_empty());

    session.parse_command("clrplot");
    assert_eq!(recorder.take(), vec![FrontendEvent::Refresh(RenderMode::Plot)]);
}

#[test]
fn unknown_result_is_rejected() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("show vonmises"));
    assert_eq!(recorder.popups(), vec![warning("Result \"vonmises\" not found.")]);
    assert_eq!(session.state().result, None);
}

#[test]
fn refresh_gate_blocks_redraws_but_not_mode_switches() {
    let (mut session, recorder) = session();
    session.parse_command("off refresh");
    session.parse_command("plot sx");
    assert_eq!(session.state().render_mode, RenderMode::Plot);
    assert!(recorder.refreshes().is_empty());

    session.parse_command("on refresh");
    assert!(recorder.refreshes().is_empty());
    session.parse_command("clrplot");
    assert_eq!(recorder.refreshes(), vec![RenderMode::Plot]);
}

#[test]
fn view_centering_precedes_mesh_refresh() {
    let (mut session, recorder) = session();
    session.parse_command("vcent 0 0 1");
    assert_eq!(
        recorder.take(),
        vec![
            FrontendEvent::CenterView(femview_model::ViewCenter::Point(Vector3::new(0.0, 0.0, 1.0))),
            FrontendEvent::Refresh(RenderMode::Mesh),
        ]
    );
    assert!(!session.parse_command("vcent n 500"));
    assert_eq!(recorder.popups(), vec![warning("Invalid node specified for view center.")]);
}

#[test]
fn rview_resets_and_turns_centering_off() {
    let (mut session, _recorder) = session();
    session.parse_command("rx 30; tx 2; scale 3; vcent hi");
    session.parse_command("rview");
    assert_eq!(session.state().view, femview_model::ViewTransform::default());
    assert_eq!(session.state().vcent, femview_model::ViewCenter::Off);
    assert_eq!(history(&session).last().map(String::as_str), Some("rview"));
}

#[test]
fn on_all_dispatches_each_group_member() {
    let (mut session, recorder) = session();
    session.parse_command("off all");
    for flag in DisplayFlag::ALL_GROUP {
        assert!(!session.state().flag(flag));
    }
    recorder.take();

    session.parse_command("on all");
    for flag in DisplayFlag::ALL_GROUP {
        assert!(session.state().flag(flag));
    }
    assert_eq!(recorder.refreshes().len(), DisplayFlag::ALL_GROUP.len() + 1);
    assert_eq!(history(&session), vec!["off all", "on all"]);
}

#[test]
fn rough_recomputes_normals() {
    let (mut session, recorder) = session();
    session.parse_command("on rough");
    assert_eq!(
        recorder.take(),
        vec![FrontendEvent::RecomputeNormals, FrontendEvent::Refresh(RenderMode::Mesh)]
    );
    assert!(session.parse_command("on bogus"));
    assert_eq!(recorder.text(), "On/Off command unrecognized: bogus\n");
}

#[test]
fn switch_options() {
    let (mut session, recorder) = session();
    session.parse_command("sw noterp ortho flat wobble");
    let switches = session.state().switches;
    assert_eq!(switches.interp, femview_model::InterpMode::NoInterp);
    assert_eq!(switches.projection, femview_model::Projection::Orthographic);
    assert_eq!(switches.shading, femview_model::Shading::Flat);
    assert_eq!(recorder.text(), "Switch command unrecognized: wobble\n");
    assert!(recorder.events().contains(&FrontendEvent::RecomputeNormals));
    assert!(recorder.events().contains(&FrontendEvent::LoadResult(None)));
}

#[test]
fn repeat_reruns_last_command() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("r"));
    assert_eq!(recorder.popups(), vec![warning("No previous command.")]);

    session.parse_command("tx 1.5");
    session.parse_command("r");
    session.parse_command("r");
    assert_eq!(session.state().view.translation.x, 4.5);
    assert_eq!(history(&session), vec!["tx 1.5"; 3]);
    assert_eq!(session.last_command(), Some("tx 1.5"));
}

#[test]
fn aliases_expand_before_dispatch() {
    let (mut session, recorder) = session();
    session.parse_command("alias nudge tx 0.5");
    session.parse_command("nudge; nudge");
    assert_eq!(session.state().view.translation.x, 1.0);

    session.parse_command("alias");
    assert_eq!(recorder.text(), "nudge = tx 0.5\n");
    assert!(!session.parse_command("alias missing"));
}

#[test]
fn self_replaying_file_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("again.his");
    fs::write(&script, format!("tx 1\nrdhis {}\n", script.display())).unwrap();

    let (mut session, recorder) = session();
    session.parse_command(&format!("rdhis {}", script.display()));
    assert_eq!(session.state().view.translation.x, femview_interp::MAX_REPLAY_DEPTH as f64);
    assert_eq!(
        recorder.popups(),
        vec![(
            Severity::Error,
            format!("History replay nested more than {} files deep.", femview_interp::MAX_REPLAY_DEPTH)
        )]
    );
}

#[test]
fn select_toggles_membership() {
    let (mut session, _recorder) = session();
    session.parse_command("select brick 1-3");
    assert_eq!(session.state().selection.len(), 3);
    session.parse_command("select h 2:3");
    let selection = &session.state().selection;
    assert!(selection.contains("brick", 0));
    assert!(!selection.contains("brick", 1));
    assert!(!selection.contains("brick", 2));
}

#[test]
fn range_and_list_select_the_same_objects() {
    let (mut by_range, _) = session();
    let (mut by_list, _) = session();
    by_range.parse_command("select node 7-12");
    by_list.parse_command("select node 7 8 9 10 11 12");
    assert_eq!(by_range.state().selection, by_list.state().selection);
}

#[test]
fn invalid_labels_are_skipped() {
    let (mut session, recorder) = session();
    assert!(session.parse_command("select brick 64 65 x"));
    assert_eq!(session.state().selection.len(), 1);
    assert_eq!(
        recorder.popups(),
        vec![
            warning("brick 65 is not a valid label"),
            warning("Invalid identifier \"x\""),
        ]
    );
    assert!(!session.parse_command("select beam 1"));
}

#[test]
fn clrsel_reports_unselected_objects() {
    let (mut session, recorder) = session();
    session.parse_command("select brick 1; select node 1");
    session.parse_command("clrsel brick 1 2");
    assert_eq!(
        recorder.popups(),
        vec![(Severity::Info, "brick 2 not selected; request ignored.".to_string())]
    );
    assert_eq!(session.state().selection.len(), 1);
    session.parse_command("clrsel");
    assert!(session.state().selection.is_empty());
}

#[test]
fn tellsel_lists_selection() {
    let (mut session, recorder) = session();
    session.parse_command("tellsel");
    assert_eq!(recorder.text(), "No objects selected.\n");
    recorder.take();

    session.parse_command("select brick 12; tellsel");
    let text = recorder.text();
    assert!(text.contains("Class"));
    assert!(text.contains("brick"));
    assert!(text.contains("12"));
}

#[test]
fn select_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("picks.txt");
    fs::write(&path, "brick 1 2\n# skipped\nnode 5\nbeam 1\n").unwrap();

    let (mut session, recorder) = session();
    assert!(session.parse_command(&format!("select {}", path.display())));
    assert_eq!(session.state().selection.len(), 3);
    assert_eq!(recorder.popups().len(), 1);
}

#[test]
fn visibility_defaults_to_materials() {
    let (mut session, recorder) = session();
    session.parse_command("invis 2");
    assert_eq!(session.state().hide_material, vec![false, true]);
    assert_eq!(
        recorder.take(),
        vec![
            FrontendEvent::RecomputeNormals,
            FrontendEvent::Refresh(RenderMode::Mesh),
            FrontendEvent::LoadResult(None),
            FrontendEvent::Refresh(RenderMode::Mesh),
        ]
    );

    session.parse_command("invis brick 1-4; invis result node all");
    assert_eq!(session.state().hidden_objects.count("brick"), 4);
    assert_eq!(session.state().hidden_results.count("node"), 125);
    session.parse_command("vis brick 2");
    assert_eq!(session.state().hidden_objects.count("brick"), 3);
}

#[test]
fn enable_and_include() {
    let (mut session, _recorder) = session();
    session.parse_command("disable all");
    assert_eq!(session.state().disable_material, vec![true, true]);
    session.parse_command("exclude brick 1:10");
    assert_eq!(session.state().excluded_objects.count("brick"), 10);
    session.parse_command("include brick 5");
    assert_eq!(session.state().excluded_objects.count("brick"), 9);
    assert!(!session.parse_command("include bogus 1"));
}

#[test]
fn mtl_continues_across_commands() {
    let (mut session, recorder) = session();
    session.parse_command("mtl 1 continue");
    assert!(recorder.take().is_empty());
    assert_eq!(session.state().hide_material, vec![false, false]);

    session.parse_command("mtl invis");
    assert_eq!(session.state().hide_material, vec![true, false]);

    session.parse_command("surf invis 6");
    assert_eq!(session.state().hide_surface, vec![false, false, false, false, false, true]);
}

#[test]
fn hilite_and_clear() {
    let (mut session, _recorder) = session();
    session.parse_command("hilite node 3");
    let hilite = session.state().hilite.clone().unwrap();
    assert_eq!((hilite.class.as_str(), hilite.ident, hilite.label), ("node", 2, 3));
    assert!(!session.parse_command("hilite node 999"));
    session.parse_command("clrhil");
    assert!(session.state().hilite.is_none());
}

#[test]
fn state_navigation() {
    let (mut session, recorder) = session();
    session.parse_command("l");
    assert_eq!(session.state().state_index, 2);
    session.parse_command("n");
    assert_eq!(session.state().state_index, 2);
    session.parse_command("f; p");
    assert_eq!(session.state().state_index, 0);
    session.parse_command("state 2");
    assert_eq!(session.state().state_index, 1);
    assert!(!session.parse_command("state 4"));
    assert_eq!(recorder.popups(), vec![warning("State 4 out of range 1..3.")]);

    session.parse_command("time 2.5");
    assert_eq!(session.state().state_index, 1);
    session.parse_command("time 0.1");
    assert_eq!(session.state().state_index, 0);
}

#[test]
fn title_echo_and_conversion() {
    let (mut session, recorder) = session();
    session.parse_command("title \"Load case\" 3");
    assert_eq!(session.state().title.as_deref(), Some("Load case 3"));
    session.parse_command("resttl; conv 2 -1");
    assert_eq!(session.state().title, None);
    assert_eq!(session.state().conversion.scale, 2.0);
    assert_eq!(session.state().conversion.offset, -1.0);
    recorder.take();
    session.parse_command("echo hello   world # trailing");
    assert_eq!(recorder.text(), "hello world\n");
}

#[test]
fn tellpos_prints_node_coordinates() {
    let (mut session, recorder) = session();
    session.parse_command("tellpos 1");
    session.parse_command("tellpos 125");
    assert_eq!(recorder.text(), "Node 1:  -1, -1, -1\nNode 125:  1, 1, 1\n");
}

#[test]
fn history_ring_wraps() {
    let config = SessionConfig {
        history_capacity: 3,
        ..SessionConfig::default()
    };
    let (mut session, _recorder) = session_with(config);
    session.parse_command("tx 1; tx 2; tx 3; tx 4; tx 5");
    assert_eq!(history(&session), vec!["tx 3", "tx 4", "tx 5"]);
}

#[test]
fn savhis_and_outhis_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("capture.his");
    let ring = dir.path().join("ring.his");

    let (mut session, recorder) = session();
    session.parse_command(&format!("savhis {}", capture.display()));
    session.parse_command("tx 1; ty 2");
    session.parse_command("endhis");
    session.parse_command("tz 3");
    session.parse_command(&format!("outhis {}", ring.display()));

    assert_eq!(fs::read_to_string(&capture).unwrap(), "tx 1\nty 2\n");
    assert_eq!(fs::read_to_string(&ring).unwrap(), "tx 1\nty 2\ntz 3\n");
    assert_eq!(recorder.text(), format!("Wrote 3 commands to {}\n", ring.display()));
}

#[test]
fn replay_pauses_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("steps.his");
    fs::write(&script, "tx 1\npause\ntx 2\n# note\n\ntx 4\n").unwrap();

    let (mut session, recorder) = session();
    session.parse_command(&format!("rdhis {}", script.display()));
    assert_eq!(session.state().view.translation.x, 1.0);
    let resume = session.replay_state().resume_point().cloned().unwrap();
    assert_eq!(resume.next_line, 3);
    assert_eq!(
        recorder.popups(),
        vec![(Severity::Info, "Command file paused; use resume to continue.".to_string())]
    );

    session.parse_command("resume");
    assert_eq!(session.state().view.translation.x, 7.0);
    assert!(!session.parse_command("resume"));

    session.parse_command(&format!("h {} 3", script.display()));
    assert_eq!(session.state().view.translation.x, 13.0);
}

#[test]
fn pause_in_nested_file_stops_every_level() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("inner.his");
    let outer = dir.path().join("outer.his");
    fs::write(&inner, "ty 1\npause\nty 10\n").unwrap();
    fs::write(&outer, format!("rdhis {}\ntz 5\n", inner.display())).unwrap();

    let (mut session, _recorder) = session();
    let status = session.replay_file(&outer, 1).unwrap();
    assert_eq!(status, ReplayStatus::Paused);
    assert_eq!(session.state().view.translation, Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(session.replay_state().resume_point().map(|r| r.path.clone()), Some(inner));
}

#[test]
fn loop_is_refused_in_batch_mode() {
    let config = SessionConfig {
        batch: true,
        ..SessionConfig::default()
    };
    let (mut session, recorder) = session_with(config);
    assert!(!session.parse_command("loop anything.his"));
    assert_eq!(recorder.popups(), vec![warning("loop is disabled in batch mode.")]);
}

#[test]
fn loop_repeats_up_to_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("spin.his");
    fs::write(&script, "tx 1\n").unwrap();
    let config = SessionConfig {
        loop_limit: 4,
        ..SessionConfig::default()
    };
    let (mut session, _recorder) = session_with(config);
    session.parse_command(&format!("loop {}", script.display()));
    assert_eq!(session.state().view.translation.x, 4.0);
}

#[test]
fn missing_command_file_is_a_resource_error() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("rdhis /nonexistent/steps.his"));
    assert_eq!(
        recorder.popups(),
        vec![(Severity::Error, "Unable to open file /nonexistent/steps.his".to_string())]
    );
}

#[test]
fn quit_stops_the_line() {
    let (mut session, _recorder) = session();
    session.parse_command("quit; tx 1");
    assert!(!session.is_running());
    assert_eq!(session.state().view.translation.x, 0.0);
}

#[test]
fn surface_then_traction() {
    let (mut session, recorder) = session();
    assert!(session.parse_command("surface rect 4 0.25 0.25 -0.625 0 0 1 1 1"));
    assert!(recorder.text().starts_with("Number of points:  16\nsurface area:  1.000000\n"));
    recorder.take();

    session.parse_command("sw noterp");
    recorder.take();
    assert!(session.parse_command("traction all"));
    let text = recorder.text();
    assert!(text.starts_with("Traction area:  1\nFo = 0x + 0y - 100z\nFo magnitude:  100\n"));
    assert_eq!(session.traction_materials().labels(), vec![1, 2]);
}

#[test]
fn nodal_interpolation_blends_across_materials() {
    let (mut session, recorder) = session();
    // Second brick layer: material 1 below, material 2 above its top face.
    assert!(session.parse_command("surface rect 4 0.25 0.25 -0.25 0 0 1 1 1"));
    recorder.take();

    assert!(session.parse_command("sw noterp; traction all"));
    assert!(recorder.text().contains("Fo = 0x + 0y - 100z\n"));
    recorder.take();

    assert!(session.parse_command("sw interp; traction all"));
    let text = recorder.text();
    assert!(text.contains("- 87.5z\n"), "{text}");
    assert!(text.contains("Fo magnitude:  87.5\n"), "{text}");
}

#[test]
fn failed_traction_keeps_previous_materials() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("traction 1 1"));
    assert!(session.traction_materials().labels().is_empty());

    assert!(session.parse_command("surface rect 4 0.25 0.25 -0.625 0 0 1 1 1; traction 1 1"));
    assert_eq!(session.traction_materials().labels(), vec![1]);
    recorder.take();

    // Material 2 lies above the surface, so no point survives.
    assert!(!session.parse_command("traction 2 2"));
    assert_eq!(
        recorder.popups(),
        vec![warning("traction:  No points lie within valid mesh elements.")]
    );
    assert_eq!(session.traction_materials().labels(), vec![1]);
}

#[test]
fn traction_argument_checks() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("traction all"));
    assert_eq!(
        recorder.take(),
        vec![FrontendEvent::Popup(
            Severity::Warning,
            "traction:  no surface defined; use the surface command first".to_string()
        )]
    );

    assert!(!session.parse_command("traction 2 1"));
    assert_eq!(recorder.popups()[0].0, Severity::Usage);
    recorder.take();

    assert!(!session.parse_command("traction 1 5"));
    assert_eq!(
        recorder.popups(),
        vec![
            warning("Material 5 out of range 1..2; skipped."),
            warning("No materials selected for traction."),
        ]
    );
}

#[test]
fn surface_argument_checks() {
    let (mut session, recorder) = session();
    assert!(!session.parse_command("surface rect 4 0 0 x 0 0 1 1 1"));
    assert_eq!(recorder.take(), vec![FrontendEvent::Popup(Severity::Warning, "Unable to convert x".to_string())]);
    assert!(!session.parse_command("surface rect -1 0 0 0 0 0 1 1 1"));
    assert_eq!(recorder.take()[0], FrontendEvent::Popup(Severity::Usage, SURFACE_USAGE.to_string()));
    assert!(!session.parse_command("surface spot 4 0 0 0 0 0 0 1"));
    assert!(!session.parse_command("surface ring 4 0 0 0 0 0 1 2 1"));
    assert!(session.surface().is_none());
}

const SURFACE_USAGE: &str = "Usage: surface rect n px py pz vx vy vz a b\n\
     surface ring n px py pz vx vy vz delta_a delta_b\n\
     surface spot n px py pz vx vy vz delta\n\
     surface tube n px py pz vx vy vz delta_a h [delta_b]\n\
     surface poly <file>";

#[test]
fn automatic_density_reports_progress() {
    let (mut session, recorder) = session();
    assert!(session.parse_command("surface spot 0 0 0 0 0 0 1 0.4"));
    assert!(
        recorder
            .text()
            .starts_with("Beginning automatic computation of surface 'n' convergence . . .\n")
    );
    assert!(session.surface().is_some_and(|s| s.params.n >= 50));
}

#[test]
fn poly_surface_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.poly");
    fs::write(&path, "2\n0.1 0 -0.6 0 0 1 0.5\n-0.1 0 -0.6 0 0 1 0.5\n").unwrap();

    let (mut session, recorder) = session();
    assert!(session.parse_command(&format!("surface poly {}", path.display())));
    assert!(recorder.text().starts_with("Number of points:  2\n"));
    assert!(session.parse_command("sw noterp; traction 1 1"));
    assert!(recorder.text().contains("Fo = 0x + 0y - 100z\n"));
}

#[test]
fn info_summarizes_the_session() {
    let (mut session, recorder) = session();
    session.parse_command("state 2; show sz; select brick 1");
    recorder.take();
    session.parse_command("info");
    insta::assert_snapshot!(recorder.text().trim_end(), @r"
    *************** FEMVIEW INFO ***************
    States:  3
    Current state:  2
    Start time:  1
    End time:  3
    Current time:  2
    Nodes:  125
    Bricks:  64
    Surface facets:  96
    Materials:  2
    Surfaces:  6
    Result:  sz
    Render mode:  mesh
    Selected objects:  1
    Traction surface:  none
    ");
}

#[test]
fn help_lists_every_command() {
    let (mut session, recorder) = session();
    session.parse_command("help");
    let text = recorder.text();
    assert_eq!(text.lines().count(), femview_interp::COMMANDS.len());
    assert!(text.lines().any(|line| line.starts_with("traction")));
}
