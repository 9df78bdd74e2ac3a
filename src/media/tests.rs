use super::fake::FakeMedia;
use super::*;
use crate::config::AudioSettings;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn broadcast_drops_listeners_whose_receiver_is_gone() {
    let mut media = FakeMedia::new();
    let (tx_live, rx_live) = mpsc::channel();
    let (tx_dead, rx_dead) = mpsc::channel();
    media.subscribe(tx_live);
    media.subscribe(tx_dead);
    drop(rx_dead);

    media.emit(MediaEvent::TimeUpdate(1.5));
    assert_eq!(media.listener_count(), 1);
    assert_eq!(rx_live.try_recv().unwrap().event, MediaEvent::TimeUpdate(1.5));
}

#[test]
fn events_are_stamped_with_the_source_that_produced_them() {
    let mut media = FakeMedia::new();
    let (tx, rx) = mpsc::channel();
    media.subscribe(tx);

    let first = media.load(Path::new("/music/a.mp3"));
    media.emit(MediaEvent::TimeUpdate(3.0));
    let second = media.load(Path::new("/music/b.mp3"));
    media.emit(MediaEvent::Ended);

    assert_ne!(first, second);
    let got: Vec<SourceEvent> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            SourceEvent {
                source: first,
                event: MediaEvent::TimeUpdate(3.0),
            },
            SourceEvent {
                source: second,
                event: MediaEvent::Ended,
            },
        ]
    );
}

#[test]
fn media_error_messages_name_the_source() {
    let err = MediaError::Open {
        path: PathBuf::from("/music/a.mp3"),
        kind: io::ErrorKind::NotFound,
    };
    let msg = err.to_string();
    assert!(msg.contains("/music/a.mp3"), "{msg}");

    let err = MediaError::Decode {
        path: PathBuf::from("b.ogg"),
        reason: "unrecognized format".into(),
    };
    assert_eq!(err.to_string(), "failed to decode b.ogg: unrecognized format");
}

#[test]
fn rodio_media_reports_missing_source_as_play_failure() {
    let mut media = RodioMedia::new(&AudioSettings::default());
    let (tx, rx) = mpsc::channel();
    media.subscribe(tx);

    let source = media.load(Path::new("/definitely/not/here.mp3"));
    assert_eq!(media.current_time(), 0.0);
    assert!(media.play().is_ok());

    // Either the file cannot be opened or there is no output device; both
    // surface as an asynchronous play failure rather than a panic.
    let stamped = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(stamped.source, source);
    assert!(matches!(stamped.event, MediaEvent::PlayFailed(_)), "{stamped:?}");
    assert_eq!(media.duration(), None);

    media.quit_softly(Duration::ZERO);
    assert!(matches!(media.play(), Err(MediaError::Disconnected)));
}
