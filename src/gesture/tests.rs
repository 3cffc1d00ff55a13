use super::*;
use crate::device::DeviceClass;
use std::time::Duration;
use tokio::time::Instant;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn classifier() -> GestureClassifier {
    GestureClassifier::new(GestureTiming::default())
}

#[test]
fn test_single_tap_toggles_mute_after_window() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    assert_eq!(classifier.on_primary_input_up(0, t0 + ms(50)), None);

    assert!(classifier.poll(t0 + ms(349)).is_empty());
    assert_eq!(classifier.poll(t0 + ms(350)), vec![GestureCommand::ToggleMute]);
    assert_eq!(classifier.state(), ClassifierState::Idle);
    assert!(classifier.poll(t0 + ms(2000)).is_empty());
}

#[test]
fn test_double_tap_advances_without_toggling_mute() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    assert_eq!(classifier.on_primary_input_up(0, t0 + ms(50)), None);
    classifier.on_primary_input_down(1, t0 + ms(150));
    assert_eq!(
        classifier.on_primary_input_up(0, t0 + ms(200)),
        Some(GestureCommand::Advance)
    );

    assert_eq!(classifier.state(), ClassifierState::Idle);
    assert!(classifier.poll(t0 + ms(2000)).is_empty());
}

#[test]
fn test_three_fingers_dropping_to_one_shows_diagnostics_only() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    classifier.on_primary_input_down(2, t0 + ms(10));
    classifier.on_primary_input_down(3, t0 + ms(20));
    classifier.on_primary_input_move(1);
    assert_eq!(classifier.on_primary_input_up(2, t0 + ms(60)), None);
    assert_eq!(classifier.on_primary_input_up(1, t0 + ms(80)), None);
    assert_eq!(
        classifier.on_primary_input_up(0, t0 + ms(100)),
        Some(GestureCommand::ShowDiagnostics)
    );

    assert!(classifier.poll(t0 + ms(2000)).is_empty());
    assert_eq!(classifier.state(), ClassifierState::Idle);
}

#[test]
fn test_multi_finger_hold_resolves_when_window_elapses() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    classifier.on_primary_input_down(3, t0 + ms(10));

    assert!(classifier.poll(t0 + ms(499)).is_empty());
    assert_eq!(
        classifier.poll(t0 + ms(500)),
        vec![GestureCommand::ShowDiagnostics]
    );

    // Releasing afterwards must not emit a second command.
    assert_eq!(classifier.on_primary_input_up(0, t0 + ms(800)), None);
    assert!(classifier.poll(t0 + ms(3000)).is_empty());
    assert_eq!(classifier.state(), ClassifierState::Idle);
}

#[test]
fn test_two_fingers_show_diagnostics() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(2, t0);
    assert_eq!(
        classifier.on_primary_input_up(0, t0 + ms(90)),
        Some(GestureCommand::ShowDiagnostics)
    );
}

#[test]
fn test_move_never_restarts_detection_window() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    classifier.on_primary_input_down(2, t0 + ms(100));
    classifier.on_primary_input_move(2);
    classifier.on_primary_input_move(3);

    assert_eq!(classifier.next_deadline(), Some(t0 + ms(500)));
    assert_eq!(
        classifier.touch_accumulator().map(|a| a.max_fingers),
        Some(3)
    );
}

#[test]
fn test_pending_tap_is_suppressed_by_multi_finger_follow_up() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    classifier.on_primary_input_up(0, t0 + ms(50));
    classifier.on_primary_input_down(2, t0 + ms(120));
    assert_eq!(
        classifier.on_primary_input_up(0, t0 + ms(160)),
        Some(GestureCommand::ShowDiagnostics)
    );

    assert!(classifier.poll(t0 + ms(1000)).is_empty());
}

#[test]
fn test_long_press_is_not_a_tap() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    assert_eq!(classifier.on_primary_input_up(0, t0 + ms(250)), None);

    assert_eq!(classifier.state(), ClassifierState::Idle);
    assert!(classifier.poll(t0 + ms(1000)).is_empty());
}

#[test]
fn test_contact_held_across_tap_window_starts_new_sequence() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_primary_input_down(1, t0);
    classifier.on_primary_input_up(0, t0 + ms(50));
    classifier.on_primary_input_down(1, t0 + ms(340));

    assert_eq!(classifier.poll(t0 + ms(350)), vec![GestureCommand::ToggleMute]);
    assert_eq!(classifier.on_primary_input_up(0, t0 + ms(380)), None);
    assert_eq!(classifier.poll(t0 + ms(680)), vec![GestureCommand::ToggleMute]);
}

#[test]
fn test_single_click_toggles_mute() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    assert_eq!(classifier.on_click(false, t0), None);
    assert!(classifier.poll(t0 + ms(299)).is_empty());
    assert_eq!(classifier.poll(t0 + ms(300)), vec![GestureCommand::ToggleMute]);
}

#[test]
fn test_double_click_waits_for_possible_third_click() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_click(false, t0);
    assert_eq!(classifier.on_click(false, t0 + ms(200)), None);

    // The window restarted on the second click.
    assert!(classifier.poll(t0 + ms(300)).is_empty());
    assert_eq!(classifier.poll(t0 + ms(500)), vec![GestureCommand::Advance]);
}

#[test]
fn test_triple_click_toggles_fullscreen_and_fourth_starts_over() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_click(false, t0);
    classifier.on_click(false, t0 + ms(100));
    assert_eq!(
        classifier.on_click(false, t0 + ms(200)),
        Some(GestureCommand::ToggleFullscreen)
    );
    assert_eq!(classifier.state(), ClassifierState::Idle);

    assert_eq!(classifier.on_click(false, t0 + ms(250)), None);
    assert_eq!(classifier.poll(t0 + ms(550)), vec![GestureCommand::ToggleMute]);
}

#[test]
fn test_modifier_click_bypasses_counting() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_click(false, t0);
    assert_eq!(
        classifier.on_click(true, t0 + ms(50)),
        Some(GestureCommand::ToggleFullscreen)
    );
    assert!(classifier.poll(t0 + ms(1000)).is_empty());
}

#[test]
fn test_keys_emit_directly() {
    let mut classifier = classifier();

    assert_eq!(
        classifier.on_key(KeyInput::Space),
        Some(GestureCommand::ToggleMute)
    );
    assert_eq!(
        classifier.on_key(KeyInput::Char('i')),
        Some(GestureCommand::ToggleDiagnostics)
    );
    assert_eq!(classifier.on_key(KeyInput::Char('x')), None);
    assert_eq!(classifier.state(), ClassifierState::Idle);
}

#[test]
fn test_pointer_and_touch_sequences_are_independent() {
    let t0 = Instant::now();
    let mut classifier = classifier();

    classifier.on_click(false, t0);
    classifier.on_primary_input_down(1, t0 + ms(10));
    classifier.on_primary_input_up(0, t0 + ms(40));

    let commands = classifier.poll(t0 + ms(400));
    assert_eq!(
        commands,
        vec![GestureCommand::ToggleMute, GestureCommand::ToggleMute]
    );
}

#[test]
fn test_router_excludes_control_regions() {
    let t0 = Instant::now();
    let mut router = InputRouter::new(classifier(), DeviceClass::Pointer);

    let routed = router.route(
        InputEvent::PointerClick {
            modifier: false,
            region: HitRegion::AdvanceButton,
        },
        t0,
    );
    assert_eq!(routed, Some(Routed::Control(ControlAction::Advance)));
    assert_eq!(router.classifier().state(), ClassifierState::Idle);

    let routed = router.route(
        InputEvent::PointerClick {
            modifier: true,
            region: HitRegion::ExternalLinkButton,
        },
        t0,
    );
    assert_eq!(routed, Some(Routed::Control(ControlAction::OpenExternalLink)));
    assert!(router.poll(t0 + ms(1000)).is_empty());
}

#[test]
fn test_router_touch_on_controls_uses_release_only() {
    let t0 = Instant::now();
    let mut router = InputRouter::new(classifier(), DeviceClass::Touch);

    let start = InputEvent::TouchStart {
        points: 1,
        region: HitRegion::InfoButton,
    };
    let end = InputEvent::TouchEnd {
        remaining: 0,
        region: HitRegion::InfoButton,
    };

    assert_eq!(router.route(start, t0), None);
    assert_eq!(
        router.route(end, t0 + ms(40)),
        Some(Routed::Control(ControlAction::ToggleInfoPanel))
    );
    assert_eq!(router.classifier().state(), ClassifierState::Idle);
}

#[test]
fn test_router_ignores_clicks_on_touch_devices() {
    let t0 = Instant::now();
    let mut router = InputRouter::new(classifier(), DeviceClass::Touch);

    assert_eq!(router.route(InputEvent::click(), t0), None);
    assert_eq!(router.route(InputEvent::touch_start(1), t0), None);
    assert_eq!(router.route(InputEvent::touch_end(0), t0 + ms(30)), None);
    assert_eq!(router.poll(t0 + ms(330)), vec![GestureCommand::ToggleMute]);
}

#[test]
fn test_router_quit_keys_request_shutdown() {
    let t0 = Instant::now();
    let mut router = InputRouter::new(classifier(), DeviceClass::Pointer);

    assert_eq!(
        router.route(InputEvent::Key(KeyInput::Escape), t0),
        Some(Routed::Shutdown)
    );
    assert_eq!(
        router.route(InputEvent::Key(KeyInput::Char('q')), t0),
        Some(Routed::Shutdown)
    );
    assert_eq!(
        router.route(InputEvent::Key(KeyInput::Space), t0),
        Some(Routed::Command(GestureCommand::ToggleMute))
    );
}

#[test]
fn test_router_control_touch_moves_do_not_reach_classifier() {
    let t0 = Instant::now();
    let mut router = InputRouter::new(classifier(), DeviceClass::Touch);

    assert_eq!(router.route(InputEvent::touch_start(1), t0), None);
    assert_eq!(router.route(InputEvent::touch_end(0), t0 + ms(50)), None);

    let on_button = HitRegion::AdvanceButton;
    assert_eq!(
        router.route(
            InputEvent::TouchStart {
                points: 1,
                region: on_button,
            },
            t0 + ms(100),
        ),
        None
    );
    assert_eq!(
        router.route(InputEvent::TouchMove { points: 1 }, t0 + ms(120)),
        None
    );
    assert_eq!(
        router.route(
            InputEvent::TouchEnd {
                remaining: 0,
                region: on_button,
            },
            t0 + ms(150),
        ),
        Some(Routed::Control(ControlAction::Advance))
    );

    assert_eq!(router.poll(t0 + ms(350)), vec![GestureCommand::ToggleMute]);
    assert_eq!(router.classifier().state(), ClassifierState::Idle);
    assert_eq!(router.next_deadline(), None);

    // Surface moves are counted again once the control press lifted
    assert_eq!(router.route(InputEvent::touch_start(1), t0 + ms(400)), None);
    assert_eq!(
        router.route(InputEvent::TouchMove { points: 3 }, t0 + ms(420)),
        None
    );
    assert_eq!(
        router.route(InputEvent::touch_end(0), t0 + ms(450)),
        Some(Routed::Command(GestureCommand::ShowDiagnostics))
    );
}
