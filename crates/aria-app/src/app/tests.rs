use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

use aria_ai::AssistantReply;
use aria_audio::AudioState;
use aria_common::{Emotion, Event};
use aria_config::schema::OutputKind;
use aria_config::AriaConfig;

use super::types::ConversationEvent;
use super::AvatarApp;
use crate::input::Command;

fn test_config() -> AriaConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
    let mut config = AriaConfig::default();
    config.audio.output = OutputKind::Clock;
    for character in &mut config.characters.roster {
        character.rig = root.join(&character.rig);
    }
    config
}

fn loaded_app(config: AriaConfig, character: &str) -> AvatarApp {
    let mut app = AvatarApp::new(config);
    assert!(app.switch_character(character));
    app
}

/// 16-bit mono PCM WAV of a 220 Hz tone.
fn wav_tone(seconds: f32) -> Vec<u8> {
    let rate = 8000u32;
    let samples: Vec<i16> = (0..(seconds * rate as f32) as usize)
        .map(|i| {
            let t = i as f32 / rate as f32;
            ((t * 220.0 * std::f32::consts::TAU).sin() * 0.6 * i16::MAX as f32) as i16
        })
        .collect();
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&rate.to_le_bytes());
    out.extend_from_slice(&(rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn spoken_reply(text: &str, emotion: Emotion, seconds: f32) -> ConversationEvent {
    let mut reply = AssistantReply::new(text, emotion);
    reply.audio = Some(wav_tone(seconds));
    ConversationEvent::Reply(reply)
}

#[test]
fn tick_without_a_character_skips() {
    let mut app = AvatarApp::new(test_config());
    assert!(app.tick().skipped);
}

#[test]
fn switching_characters_publishes_and_keeps_one_model() {
    let mut app = loaded_app(test_config(), "test");
    let mut rx = app.bus().subscribe();

    assert!(app.switch_character("jinyoung"));
    assert_eq!(
        app.stage.active().map(|a| a.id.as_str()),
        Some("jinyoung")
    );
    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::CharacterSwitched(id) if id.as_str() == "jinyoung")));

    assert!(app.switch_character("jinyoung"));
    assert!(!app.switch_character("nobody"));
    assert_eq!(
        app.stage.active().map(|a| a.id.as_str()),
        Some("jinyoung")
    );
    assert!(!app.tick().skipped);
}

#[test]
fn text_only_reply_sets_emotion_without_audio() {
    let mut app = loaded_app(test_config(), "test");
    let mut rx = app.bus().subscribe();
    app.awaiting_reply = true;

    app.handle_conversation_event(
        ConversationEvent::Reply(AssistantReply::new("Great news!", Emotion::Happy)),
        app.now(),
    );

    assert!(!app.awaiting_reply);
    assert_eq!(app.orchestrator.emotion(), Emotion::Happy);
    assert_eq!(app.audio.state(), AudioState::Idle);
    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::EmotionChanged(Emotion::Happy))));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::AssistantReply { text } if text == "Great news!")));
}

#[test]
fn spoken_reply_plays_then_stops() {
    let mut app = loaded_app(test_config(), "test");
    let mut rx = app.bus().subscribe();

    app.handle_conversation_event(spoken_reply("Hi!", Emotion::Happy, 0.1), app.now());
    assert_eq!(app.audio.state(), AudioState::Playing);
    assert!(!app.accepts_input());
    assert!(drain(&mut rx).iter().any(|e| matches!(e, Event::AudioStarted)));

    std::thread::sleep(Duration::from_millis(150));
    app.tick();
    assert_eq!(app.audio.state(), AudioState::Ended);
    assert!(app.accepts_input());
    assert!(drain(&mut rx).iter().any(|e| matches!(e, Event::AudioStopped)));
    assert!(app.is_settled());
}

#[test]
fn blocked_autoplay_waits_for_click() {
    let mut config = test_config();
    config.audio.simulate_autoplay_block = true;
    let mut app = loaded_app(config, "test");

    app.handle_conversation_event(spoken_reply("Listen.", Emotion::Neutral, 0.5), app.now());
    assert!(matches!(
        app.audio.state(),
        AudioState::AwaitingGesture { .. }
    ));
    assert!(!app.is_settled());

    app.handle_command(Command::Click);
    assert_eq!(app.audio.state(), AudioState::Playing);
}

#[test]
fn failed_request_shows_fallback() {
    let mut app = loaded_app(test_config(), "test");
    let mut rx = app.bus().subscribe();
    app.awaiting_reply = true;

    app.handle_conversation_event(
        ConversationEvent::Failed {
            fallback: AssistantReply::fallback("Sorry, something went wrong. Please try again!"),
            error: "Network error: refused".into(),
        },
        app.now(),
    );

    assert!(!app.awaiting_reply);
    assert_eq!(app.orchestrator.emotion(), Emotion::Neutral);
    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ServiceFailed(msg) if msg.contains("refused"))));
}

#[test]
fn messages_need_a_running_conversation_and_an_idle_avatar() {
    let mut app = loaded_app(test_config(), "test");
    assert!(!app.send_message("hello"));

    app.awaiting_reply = true;
    assert!(!app.accepts_input());
}

#[test]
fn local_commands_drive_the_orchestrator() {
    let mut app = loaded_app(test_config(), "test");
    let mut rx = app.bus().subscribe();

    app.handle_command(Command::Emotion(Emotion::Sad));
    assert_eq!(app.orchestrator.emotion(), Emotion::Sad);
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, Event::EmotionChanged(Emotion::Sad))));

    app.handle_command(Command::Resize {
        width: 800.0,
        height: 600.0,
    });
    assert_eq!(app.viewport.width, 800.0);
    app.handle_command(Command::Resize {
        width: 0.0,
        height: 600.0,
    });
    assert_eq!(app.viewport.width, 800.0);

    app.handle_command(Command::Look { x: 10.0, y: 10.0 });
    let report = app.tick();
    assert!(report.gaze.is_some());

    app.running = true;
    app.handle_command(Command::Quit);
    assert!(!app.running);
}

#[test]
fn clip_command_only_moves_clip_characters() {
    let mut app = loaded_app(test_config(), "test");
    app.handle_command(Command::Clip);
    assert!(app
        .stage
        .active()
        .is_some_and(|a| a.mixer.current().is_none()));

    assert!(app.switch_character("jinyoung"));
    app.handle_command(Command::Clip);
    assert!(app
        .stage
        .active()
        .is_some_and(|a| a.mixer.current().is_some()));
}

#[test]
fn reloaded_config_is_applied() {
    let mut app = loaded_app(test_config(), "test");
    let mut rx = app.bus().subscribe();

    let mut config = test_config();
    config.audio.gain = 0.5;
    config.performance.frame_budget_ms = 33.0;
    app.apply_config(config);

    assert!((app.config.audio.gain - 0.5).abs() < 1e-9);
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, Event::ConfigReloaded)));
}

#[test]
fn shutdown_tears_everything_down() {
    let mut app = loaded_app(test_config(), "test");
    app.handle_conversation_event(spoken_reply("Bye!", Emotion::Happy, 1.0), app.now());
    assert_eq!(app.audio.state(), AudioState::Playing);

    app.shutdown();
    assert!(!app.audio.is_playing());
    assert!(!app.stage.is_loaded());
    assert!(app.tick().skipped);
}

#[test]
fn unreachable_service_yields_fallback_turn() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();

    let mut config = test_config();
    config.service.endpoint_url = "http://127.0.0.1:9/api/chat".into();
    config.service.timeout_secs = 2;
    let mut app = loaded_app(config, "test");
    let mut rx = app.bus().subscribe();

    app.start_conversation(runtime.handle());
    assert!(app.send_message("hello?"));
    assert!(!app.send_message("again"));

    let deadline = Instant::now() + Duration::from_secs(10);
    while app.awaiting_reply && Instant::now() < deadline {
        app.tick();
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(!app.awaiting_reply);
    assert!(drain(&mut rx)
        .iter()
        .any(|e| matches!(e, Event::ServiceFailed(_))));

    app.shutdown();
    runtime.shutdown_timeout(Duration::from_secs(1));
}
