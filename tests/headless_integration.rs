use std::sync::mpsc;
use std::time::Duration;

use notedrill::runtime::{DrillEvent, FixedTicker, ManualClock, RngSource, Runner, TestInputSource};
use notedrill::{Configuration, Difficulty, GameEngine, NoteInput, SessionCommand};

fn note_on(note: i32) -> DrillEvent {
    DrillEvent::Command(SessionCommand::Input(NoteInput {
        note: note as u8,
        velocity: 64,
    }))
}

// Headless integration using the runtime + GameEngine without a terminal.
// Verifies that a full sequence completes through Runner/TestInputSource.
#[test]
fn headless_sequence_flow_completes() {
    let config = Configuration {
        sequence_length: 3,
        ..Configuration::new(Difficulty::Intermediate)
    };
    let mut engine = GameEngine::new(ManualClock::new(0), RngSource::seeded(21));
    let mut snapshot = engine.start(&config);

    let (tx, rx) = mpsc::channel();
    for note in &snapshot.sequence {
        tx.send(note_on(note.note_number)).unwrap();
    }

    let runner = Runner::new(
        TestInputSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    let mut handled = 0;
    for _ in 0..100u32 {
        match runner.step() {
            DrillEvent::Command(command) => {
                engine.clock().advance(250);
                snapshot = engine.apply(&snapshot, command, &config);
                handled += 1;
                if handled == 3 {
                    break;
                }
            }
            DrillEvent::Tick => {}
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert_eq!(handled, 3);
    assert_eq!(snapshot.correct, 3);
    assert_eq!(snapshot.streak, 3);
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.avg_response_ms, 250);
    assert_eq!(snapshot.notes_per_minute(), 240);
}

#[test]
fn headless_pause_blocks_input_until_resume() {
    let config = Configuration::new(Difficulty::Beginner);
    let mut engine = GameEngine::new(ManualClock::new(0), RngSource::seeded(8));
    let mut snapshot = engine.start(&config);
    let expected = snapshot.expected_note().unwrap().note_number;

    let (tx, rx) = mpsc::channel();
    tx.send(DrillEvent::Command(SessionCommand::Pause)).unwrap();
    tx.send(note_on(expected)).unwrap();
    tx.send(DrillEvent::Command(SessionCommand::Resume)).unwrap();
    tx.send(note_on(expected)).unwrap();
    drop(tx);

    let runner = Runner::new(
        TestInputSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    let mut attempts_seen = Vec::new();
    loop {
        match runner.step() {
            DrillEvent::Command(command) => {
                snapshot = engine.apply(&snapshot, command, &config);
                attempts_seen.push(snapshot.attempts);
            }
            DrillEvent::Closed => break,
            _ => {}
        }
    }

    assert_eq!(attempts_seen, vec![0, 0, 0, 1]);
    assert_eq!(snapshot.correct, 1);
    assert!(!snapshot.is_paused);
}

#[test]
fn headless_flash_error_cleared_by_caller() {
    let config = Configuration::new(Difficulty::Beginner);
    let mut engine = GameEngine::new(ManualClock::new(0), RngSource::seeded(8));
    let snapshot = engine.start(&config);
    let wrong = snapshot.expected_note().unwrap().note_number + 1;

    let missed = engine.apply(
        &snapshot,
        SessionCommand::Input(NoteInput {
            note: wrong as u8,
            velocity: 1,
        }),
        &config,
    );
    assert!(missed.flash_error);

    let cleared = engine.apply(&missed, SessionCommand::ClearFlashError, &config);
    assert!(!cleared.flash_error);
    assert_eq!(cleared.lives, missed.lives);
}
