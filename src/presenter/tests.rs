use super::*;
use crate::config::{DiagnosticsMode, ModifierSetting, ReelConfig};
use crate::counters::SessionCounters;
use crate::device::{DeviceClass, ModifierConvention};
use chrono::Utc;
use std::time::Duration;
use tokio::time::Instant;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn presenter_with(
    device: DeviceClass,
    mode: DiagnosticsMode,
) -> (OverlayPresenter, RecordingRenderer) {
    let mut config = ReelConfig::default();
    config.presenter.diagnostics_mode = mode;
    config.presenter.modifier = ModifierSetting::Control;
    let renderer = RecordingRenderer::new();
    let presenter = OverlayPresenter::new(Box::new(renderer.clone()), device, &config);
    (presenter, renderer)
}

fn presenter() -> (OverlayPresenter, RecordingRenderer) {
    presenter_with(DeviceClass::Pointer, DiagnosticsMode::AutoHide)
}

fn fields() -> DiagnosticsFields {
    DiagnosticsFields {
        device_class: DeviceClass::Pointer,
        index: Some(2),
        total: 50,
        muted: true,
        stored_count: Some(50),
        failed_count: 0,
        version: "0.1.0".to_string(),
        session_started: Utc::now(),
    }
}

#[test]
fn test_instruction_text_per_device() {
    assert_eq!(
        instruction_text(DeviceClass::Touch, ModifierConvention::Command),
        "One Tap / Sound On / Two Taps / Next One"
    );
    assert_eq!(
        instruction_text(DeviceClass::Pointer, ModifierConvention::Command),
        "One Click Sound On / Two Clicks Next One / Cmd + Click Full Screen"
    );
    assert_eq!(
        instruction_text(DeviceClass::Pointer, ModifierConvention::Control),
        "One Click Sound On / Two Clicks Next One / Ctrl + Click Full Screen"
    );
}

#[test]
fn test_initial_instructions_after_delay_then_auto_hide() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();
    let mut counters = SessionCounters::new();

    presenter.schedule_initial_instructions(t0);
    assert_eq!(presenter.next_deadline(), Some(t0 + ms(1000)));

    presenter.poll(t0 + ms(999), &mut counters);
    assert!(!presenter.is_visible(OverlayElement::Instructions));

    presenter.poll(t0 + ms(1000), &mut counters);
    assert!(presenter.is_visible(OverlayElement::Instructions));
    assert!(presenter.is_visible(OverlayElement::Buttons));
    assert!(counters.has_shown_initial_instructions);
    assert!(renderer.contains(&OverlayCommand::SetInstructions(
        "One Click Sound On / Two Clicks Next One / Ctrl + Click Full Screen".to_string()
    )));

    presenter.poll(t0 + ms(4999), &mut counters);
    assert!(presenter.is_visible(OverlayElement::Instructions));
    presenter.poll(t0 + ms(5000), &mut counters);
    assert!(!presenter.is_visible(OverlayElement::Instructions));
    assert!(!presenter.is_visible(OverlayElement::Buttons));
    assert_eq!(presenter.next_deadline(), None);
}

#[test]
fn test_initial_instructions_skipped_after_interaction() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();
    let mut counters = SessionCounters::new();

    presenter.schedule_initial_instructions(t0);
    counters.mark_initial_instructions_shown();
    presenter.poll(t0 + ms(1000), &mut counters);

    assert!(!presenter.is_visible(OverlayElement::Instructions));
    assert_eq!(
        renderer.count(&OverlayCommand::Show(OverlayElement::Instructions)),
        0
    );
}

#[test]
fn test_sound_notice_capped_but_label_always_updates() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();
    let mut counters = SessionCounters::new();

    for (step, muted) in [false, true, false].into_iter().enumerate() {
        let now = t0 + ms(step as u64 * 5000);
        counters.record_sound_toggle();
        presenter.show_sound_state(now, muted, &counters);
        presenter.poll(now + ms(3000), &mut counters);
    }

    assert_eq!(
        renderer.count(&OverlayCommand::Show(OverlayElement::SoundNotice)),
        2
    );
    assert_eq!(
        renderer.count(&OverlayCommand::SetSoundLabel { muted: false }),
        2
    );
    assert_eq!(
        renderer.count(&OverlayCommand::SetSoundLabel { muted: true }),
        1
    );
}

#[test]
fn test_sound_notice_suppressed_in_fullscreen() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();
    let mut counters = SessionCounters::new();

    presenter.set_fullscreen(true);
    counters.record_sound_toggle();
    presenter.show_sound_state(t0, false, &counters);

    assert!(!presenter.is_visible(OverlayElement::SoundNotice));
    assert!(!presenter.is_visible(OverlayElement::Buttons));
    assert!(renderer.contains(&OverlayCommand::SetSoundLabel { muted: false }));
    assert!(renderer.contains(&OverlayCommand::SetFullscreen(true)));
}

#[test]
fn test_reshowing_notice_rearms_single_timer() {
    let t0 = Instant::now();
    let (mut presenter, _renderer) = presenter();
    let mut counters = SessionCounters::new();

    counters.record_sound_toggle();
    presenter.show_sound_state(t0, false, &counters);
    counters.record_sound_toggle();
    presenter.show_sound_state(t0 + ms(2000), true, &counters);

    // The first timer would have hidden the notice here.
    presenter.poll(t0 + ms(3000), &mut counters);
    assert!(presenter.is_visible(OverlayElement::SoundNotice));

    presenter.poll(t0 + ms(5000), &mut counters);
    assert!(!presenter.is_visible(OverlayElement::SoundNotice));
}

#[test]
fn test_loading_notice_capped_and_hidden_on_finish() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();
    let mut counters = SessionCounters::new();

    counters.record_loading_toggle();
    presenter.show_loading(t0, &counters);
    assert!(presenter.is_visible(OverlayElement::LoadingNotice));
    presenter.finish_loading();
    assert!(!presenter.is_visible(OverlayElement::LoadingNotice));

    counters.record_loading_toggle();
    presenter.show_loading(t0 + ms(100), &counters);
    assert!(!presenter.is_visible(OverlayElement::LoadingNotice));
    assert_eq!(
        renderer.count(&OverlayCommand::Show(OverlayElement::LoadingNotice)),
        1
    );
}

#[test]
fn test_loading_notice_backup_hide() {
    let t0 = Instant::now();
    let (mut presenter, _renderer) = presenter();
    let mut counters = SessionCounters::new();

    counters.record_loading_toggle();
    presenter.show_loading(t0, &counters);
    presenter.poll(t0 + ms(3000), &mut counters);
    assert!(!presenter.is_visible(OverlayElement::LoadingNotice));
}

#[test]
fn test_advance_hides_sound_notice_and_mute_hides_loading() {
    let t0 = Instant::now();
    let (mut presenter, _renderer) = presenter();
    let mut counters = SessionCounters::new();

    counters.record_sound_toggle();
    presenter.show_sound_state(t0, false, &counters);
    counters.record_loading_toggle();
    presenter.show_loading(t0 + ms(100), &counters);
    assert!(!presenter.is_visible(OverlayElement::SoundNotice));
    assert!(presenter.is_visible(OverlayElement::LoadingNotice));

    counters.record_sound_toggle();
    presenter.show_sound_state(t0 + ms(200), true, &counters);
    assert!(!presenter.is_visible(OverlayElement::LoadingNotice));
    assert!(presenter.is_visible(OverlayElement::SoundNotice));
}

#[test]
fn test_info_panel_toggle_hides_buttons() {
    let t0 = Instant::now();
    let (mut presenter, _renderer) = presenter();
    let mut counters = SessionCounters::new();

    presenter.show_instructions(t0, &mut counters);
    assert!(presenter.is_visible(OverlayElement::Buttons));

    presenter.toggle_info_panel();
    assert!(presenter.is_visible(OverlayElement::InfoPanel));
    assert!(!presenter.is_visible(OverlayElement::Buttons));

    // Panel stays until toggled again.
    presenter.poll(t0 + ms(60_000), &mut counters);
    assert!(presenter.is_visible(OverlayElement::InfoPanel));

    presenter.toggle_info_panel();
    assert!(!presenter.is_visible(OverlayElement::InfoPanel));
}

#[test]
fn test_diagnostics_auto_hide_mode() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();
    let mut counters = SessionCounters::new();

    presenter.show_diagnostics(t0, fields());
    presenter.show_diagnostics(t0 + ms(3000), fields());
    assert_eq!(
        renderer.count(&OverlayCommand::Show(OverlayElement::Diagnostics)),
        1
    );

    presenter.poll(t0 + ms(4000), &mut counters);
    assert!(presenter.is_visible(OverlayElement::Diagnostics));
    presenter.poll(t0 + ms(7000), &mut counters);
    assert!(!presenter.is_visible(OverlayElement::Diagnostics));
}

#[test]
fn test_diagnostics_persistent_mode_toggles() {
    let t0 = Instant::now();
    let (mut presenter, _renderer) = presenter_with(DeviceClass::Touch, DiagnosticsMode::Persistent);
    let mut counters = SessionCounters::new();

    presenter.show_diagnostics(t0, fields());
    presenter.poll(t0 + ms(60_000), &mut counters);
    assert!(presenter.is_visible(OverlayElement::Diagnostics));

    presenter.show_diagnostics(t0 + ms(61_000), fields());
    assert!(!presenter.is_visible(OverlayElement::Diagnostics));
}

#[test]
fn test_live_fields_refresh_visible_diagnostics() {
    let t0 = Instant::now();
    let (mut presenter, renderer) = presenter();

    presenter.show_diagnostics(t0, fields());
    renderer.clear();
    let live = LiveFields {
        index: Some(7),
        total: 50,
        muted: false,
    };
    presenter.update_live_fields(live.clone());

    let commands = renderer.commands();
    assert!(commands.contains(&OverlayCommand::SetLiveFields(live)));
    assert!(commands.iter().any(|command| matches!(
        command,
        OverlayCommand::SetDiagnostics(fields) if fields.index == Some(7) && !fields.muted
    )));
}

#[test]
fn test_diagnostics_lines() {
    let lines = fields().lines();
    assert_eq!(lines[0], "Device: pointer");
    assert_eq!(lines[1], "Video: 3/50");
    assert_eq!(lines[2], "Sound: off");
    assert_eq!(lines[3], "Stored count: 50");
    assert_eq!(lines.len(), 7);
}
