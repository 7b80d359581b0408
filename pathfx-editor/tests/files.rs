//! File round trips through the editing session.

use std::fs;

use glam::Vec3;
use pathfx::persistence;
use pathfx::{EmitterConfig, FollowMode, PathTable};
use pathfx_editor::{EditorError, EditorSession, GraphKind, JsonFile};

fn session_with_path() -> EditorSession {
    let mut session = EditorSession::new();
    session.add_preset_emitter("fire").unwrap();
    session.add_emitter();
    session.add_catmull_rom_node(Vec3::ZERO);
    session.add_catmull_rom_node(Vec3::new(10.0, 5.0, 0.0));
    session.add_catmull_rom_node(Vec3::new(20.0, 0.0, 3.0));
    session.rebuild_path();
    session.apply_path().unwrap();
    session
}

#[test]
fn test_system_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("effect.pfxs");

    let session = session_with_path();
    session.save_system(&file).unwrap();

    let mut reopened = EditorSession::new();
    reopened.open_system(&file).unwrap();

    assert_eq!(reopened.system().len(), 2);
    assert_eq!(reopened.selected(), Some(0));
    assert_eq!(
        reopened.system().emitter(0).unwrap().config(),
        session.system().emitter(0).unwrap().config()
    );
    let length = reopened.system().emitter(1).unwrap().path().total_length();
    assert!((length - session.builder().table().total_length()).abs() < 1e-4);
}

#[test]
fn test_bad_file_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.pfxs");

    let session = session_with_path();
    session.save_system(&file).unwrap();
    let bytes = fs::read(&file).unwrap();
    fs::write(&file, &bytes[..bytes.len() / 2]).unwrap();

    let mut target = EditorSession::new();
    target.add_emitter();
    let before = target.config().unwrap().clone();

    assert!(matches!(target.open_system(&file), Err(EditorError::Core(_))));
    assert_eq!(target.system().len(), 1);
    assert_eq!(target.config().unwrap(), &before);

    assert!(target.open_system(dir.path().join("missing.pfxs")).is_err());
    assert_eq!(target.system().len(), 1);
}

#[test]
fn test_emitter_save_and_open_adds_emitter() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("fire.pfxe");

    let mut session = session_with_path();
    session.select(0).unwrap();
    session.save_emitter(&file).unwrap();

    let index = session.open_emitter(&file).unwrap();
    assert_eq!(index, 2);
    assert_eq!(session.selected(), Some(2));
    assert_eq!(
        session.system().emitter(2).unwrap().config(),
        session.system().emitter(0).unwrap().config()
    );
}

#[test]
fn test_path_and_graph_files() {
    let dir = tempfile::tempdir().unwrap();
    let path_file = dir.path().join("arc.pfxp");
    let graph_file = dir.path().join("fade.pfxg");

    let session = session_with_path();
    session.save_path(&path_file).unwrap();
    persistence::save_graph(&graph_file, &PathTable::curve(&[(0.0, 1.0), (1.0, 0.0)]).unwrap())
        .unwrap();

    let mut target = EditorSession::new();
    assert!(matches!(
        target.open_path(&path_file),
        Err(EditorError::NoEmitterSelected)
    ));

    target.add_emitter();
    target.open_path(&path_file).unwrap();
    target.load_graph(GraphKind::Colour, &graph_file).unwrap();

    let emitter = target.current().unwrap();
    assert_eq!(
        emitter.path().sample_count(),
        session.builder().table().sample_count()
    );
    assert_eq!(emitter.colour_graph().sample_normalized(0.25), 0.75);
    assert_eq!(emitter.size_graph().sample_normalized(0.25), 0.25);
}

#[test]
fn test_config_import_export() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.json");

    let mut config = EmitterConfig::default();
    config.path.mode = FollowMode::Corridor;
    config.particle_count = 12;
    config.save(&file).unwrap();

    let mut session = EditorSession::new();
    session.add_emitter();
    session.import_config(&file).unwrap();
    assert_eq!(session.config().unwrap(), &config);
    assert_eq!(session.current().unwrap().particles().len(), 12);

    let exported = dir.path().join("exported.json");
    session.export_config(&exported).unwrap();
    assert_eq!(EmitterConfig::load(&exported).unwrap(), config);
}

#[test]
fn test_node_set_reopens_editable_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nodes.json");

    let session = session_with_path();
    session.save_nodes(&file).unwrap();

    let mut target = EditorSession::new();
    target.open_nodes(&file).unwrap();
    assert_eq!(target.nodes(), session.nodes());
    assert_eq!(
        target.builder().table().sample_count(),
        session.builder().table().sample_count()
    );
}

#[test]
fn test_oversized_config_import_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("huge.json");
    fs::write(&file, r#"{ "particle_count": 100000000000000000 }"#).unwrap();

    let mut session = EditorSession::new();
    session.add_emitter();
    let before = session.config().unwrap().clone();

    assert!(matches!(
        session.import_config(&file),
        Err(EditorError::PoolTooLarge { .. })
    ));
    assert_eq!(session.config().unwrap(), &before);
    assert_eq!(session.current().unwrap().particles().len(), before.particle_count);
}
