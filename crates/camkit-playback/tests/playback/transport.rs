use camkit_core::{Point3, Toolpath, ToolpathSet, Units};
use camkit_playback::{Cursor, Direction, PlaybackEngine, PlaybackState, TickOutcome};

fn path(tool: u32, n: usize) -> Toolpath {
    Toolpath::with_points(
        tool,
        Units::MM,
        (0..n)
            .map(|i| Point3::new(i as f64, tool as f64, -1.0))
            .collect(),
    )
}

fn engine_with(paths: Vec<Toolpath>) -> PlaybackEngine {
    let mut engine = PlaybackEngine::new();
    engine.load(ToolpathSet::from(paths));
    engine
}

/// Collect (tool, point) pairs until playback finishes
fn run(engine: &mut PlaybackEngine, direction: Direction) -> Vec<(u32, usize)> {
    let token = engine.play(direction);
    let mut frames = Vec::new();
    loop {
        match engine.tick(token) {
            TickOutcome::Frame(f) => frames.push((f.tool_number, f.point)),
            TickOutcome::Finished(last) => {
                frames.extend(last.map(|f| (f.tool_number, f.point)));
                break;
            }
            TickOutcome::Cancelled => panic!("tick cancelled"),
        }
    }
    frames
}

#[test]
fn test_forward_playback_visits_every_point_once() {
    let mut engine = engine_with(vec![path(1, 3), path(2, 2)]);
    let frames = run(&mut engine, Direction::Forward);
    assert_eq!(frames, vec![(1, 0), (1, 1), (1, 2), (2, 0), (2, 1)]);
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.cursor(), Cursor::new(1, 1.0));
}

#[test]
fn test_reverse_playback_enters_from_last_point() {
    let mut engine = engine_with(vec![path(1, 2), path(2, 3)]);
    let frames = run(&mut engine, Direction::Reverse);
    assert_eq!(frames, vec![(2, 2), (2, 1), (2, 0), (1, 1), (1, 0)]);
    assert_eq!(engine.cursor(), Cursor::new(0, 0.0));
}

#[test]
fn test_play_at_end_restarts() {
    let mut engine = engine_with(vec![path(1, 2)]);
    let first = run(&mut engine, Direction::Forward);
    let second = run(&mut engine, Direction::Forward);
    assert_eq!(first, second);
}

#[test]
fn test_speed_skips_points() {
    let mut engine = engine_with(vec![path(1, 5)]);
    engine.set_speed(2.0);
    let frames = run(&mut engine, Direction::Forward);
    assert_eq!(frames, vec![(1, 0), (1, 2), (1, 4)]);
}

#[test]
fn test_stop_cancels_tick_and_keeps_cursor() {
    let mut engine = engine_with(vec![path(1, 4)]);
    let token = engine.play(Direction::Forward);
    engine.tick(token);
    engine.tick(token);
    engine.stop();

    assert_eq!(engine.tick(token), TickOutcome::Cancelled);
    assert_eq!(engine.state(), PlaybackState::Idle);
    assert_eq!(engine.cursor().point_index(), 2);
}

#[test]
fn test_pause_and_resume() {
    let mut engine = engine_with(vec![path(1, 4)]);
    let token = engine.play(Direction::Forward);
    engine.tick(token);
    engine.pause();
    assert_eq!(engine.state(), PlaybackState::Paused);
    assert_eq!(engine.tick(token), TickOutcome::Cancelled);

    let resumed = engine.resume().unwrap();
    assert_eq!(engine.state(), PlaybackState::PlayingForward);
    match engine.tick(resumed) {
        TickOutcome::Frame(f) => assert_eq!(f.point, 1),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_resume_requires_pause() {
    let mut engine = engine_with(vec![path(1, 2)]);
    assert!(engine.resume().is_none());
}

#[test]
fn test_steps_are_clamped() {
    let paths = (1..=8).map(|t| path(t, 2)).collect();
    let mut engine = engine_with(paths);

    engine.step_backward();
    assert_eq!(engine.cursor(), Cursor::new(0, 0.0));

    engine.fast_forward();
    assert_eq!(engine.cursor().path, 5);
    engine.fast_forward();
    assert_eq!(engine.cursor().path, 7);
    engine.step_forward();
    assert_eq!(engine.cursor().path, 7);

    engine.step_backward();
    assert_eq!(engine.cursor().path, 6);
    engine.fast_rewind();
    assert_eq!(engine.cursor().path, 1);
    engine.fast_rewind();
    assert_eq!(engine.cursor(), Cursor::new(0, 0.0));
}

#[test]
fn test_current_frame_tracks_cursor() {
    let mut engine = engine_with(vec![path(3, 2), path(4, 2)]);
    engine.step_forward();
    let frame = engine.current_frame().unwrap();
    assert_eq!(frame.path, 1);
    assert_eq!(frame.tool_number, 4);
    assert!(frame.position.approx_eq(&Point3::new(0.0, 4.0, -1.0), 1e-12));
}
