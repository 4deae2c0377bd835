use geometry_cometry::error::GameError;
use geometry_cometry::sound::*;

#[test]
fn known_names_resolve() {
    for cue in SoundCue::ALL {
        assert_eq!(SoundCue::from_name(cue.name()).ok(), Some(cue));
    }
}

#[test]
fn unknown_name_is_an_error() {
    let err = SoundCue::from_name("boom").unwrap_err();
    assert!(matches!(err, GameError::UnknownSound(ref name) if name == "boom"));
    assert_eq!(err.to_string(), "invalid sound 'boom'");
}

#[test]
fn recorder_keeps_order() {
    let mut sink = Recorder::default();
    sink.play(SoundCue::Laser);
    sink.play(SoundCue::Explode);
    assert_eq!(sink.played, vec![SoundCue::Laser, SoundCue::Explode]);
}

#[test]
fn bell_rings_for_explosions_only() {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut bell = TerminalBell::new(&mut buf);
        bell.play(SoundCue::Laser);
        bell.play(SoundCue::Music);
        bell.play(SoundCue::Explode);
    }
    assert_eq!(buf, b"\x07");
}

#[test]
fn silent_sink_accepts_everything() {
    let mut sink = Silent;
    for cue in SoundCue::ALL {
        sink.play(cue);
    }
}
