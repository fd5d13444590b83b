use camkit_core::{Point3, Toolpath, ToolpathSet, Units};
use camkit_playback::{Cursor, Direction, PlaybackConfig, PlaybackEngine, PlaybackState};
use proptest::prelude::*;

fn set_of(tools: &[u32]) -> ToolpathSet {
    tools
        .iter()
        .map(|t| Toolpath::with_points(*t, Units::MM, vec![Point3::new(*t as f64, 0.0, 0.0)]))
        .collect()
}

#[test]
fn test_undo_after_load_restores_previous_set() {
    let a = set_of(&[1, 2]);
    let b = set_of(&[7]);

    let mut engine = PlaybackEngine::new();
    engine.load(b.clone());
    engine.load(a.clone());

    engine.undo();
    assert_eq!(engine.active_set(), &b);
    engine.redo();
    assert_eq!(engine.active_set(), &a);
}

#[test]
fn test_undo_redo_on_empty_history_is_noop() {
    let mut engine = PlaybackEngine::new();
    engine.undo();
    engine.redo();
    assert!(engine.active_set().is_empty());
    assert!(!engine.can_undo());
    assert!(!engine.can_redo());
}

#[test]
fn test_mutation_while_playing_stops_and_resets_cursor() {
    let mut engine = PlaybackEngine::new();
    engine.load(set_of(&[1, 2, 3]));
    engine.step_forward();
    engine.play(Direction::Forward);
    assert!(engine.state().is_playing());

    engine.append(Toolpath::with_points(4, Units::MM, vec![Point3::default()]));
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.cursor(), Cursor::default());
    assert_eq!(engine.active_set().len(), 4);
}

#[test]
fn test_replace_and_clear_are_undoable() {
    let mut engine = PlaybackEngine::new();
    engine.load(set_of(&[1, 2]));

    let replaced = engine.replace(1, set_of(&[9])[0].clone()).unwrap();
    assert_eq!(replaced.tool_number, 2);
    assert_eq!(engine.active_set()[1].tool_number, 9);

    engine.clear();
    assert!(engine.active_set().is_empty());

    engine.undo();
    assert_eq!(engine.active_set()[1].tool_number, 9);
    engine.undo();
    assert_eq!(engine.active_set()[1].tool_number, 2);
}

#[test]
fn test_replace_out_of_range_leaves_history_alone() {
    let mut engine = PlaybackEngine::new();
    engine.load(set_of(&[1]));
    let undo_before = engine.history().undo_count();
    assert!(engine.replace(5, set_of(&[2])[0].clone()).is_none());
    assert_eq!(engine.history().undo_count(), undo_before);
}

#[test]
fn test_new_edit_after_undo_clears_redo() {
    let mut engine = PlaybackEngine::new();
    engine.load(set_of(&[1]));
    engine.load(set_of(&[2]));
    engine.undo();
    assert!(engine.can_redo());
    engine.load(set_of(&[3]));
    assert!(!engine.can_redo());
}

proptest! {
    #[test]
    fn prop_history_never_exceeds_capacity(
        capacity in 0usize..8,
        actions in proptest::collection::vec(0u8..3, 0..60),
    ) {
        let mut engine = PlaybackEngine::with_config(PlaybackConfig {
            history_capacity: capacity,
            ..PlaybackConfig::default()
        });
        for (i, action) in actions.iter().enumerate() {
            match action {
                0 => engine.load(set_of(&[i as u32])),
                1 => engine.undo(),
                _ => engine.redo(),
            }
            let history = engine.history();
            prop_assert!(history.undo_count() + history.redo_count() <= capacity);
        }
    }

    #[test]
    fn prop_undo_then_redo_restores_set(first in 1u32..100, second in 1u32..100) {
        let mut engine = PlaybackEngine::new();
        engine.load(set_of(&[first]));
        engine.load(set_of(&[second]));
        engine.undo();
        prop_assert_eq!(engine.active_set(), &set_of(&[first]));
        engine.redo();
        prop_assert_eq!(engine.active_set(), &set_of(&[second]));
    }
}
