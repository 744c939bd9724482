use std::time::Duration;

use otp_entry::app::{
    NotificationKind, OtpController, OtpError, Outcome, RecordingHost, SimulatedVerifier,
    SubmissionStatus,
};
use otp_entry::config::OtpConfig;
use otp_entry::domain::Selection;
use otp_entry::input::{InputEvent, InputRouter};
use otp_entry::ui::{HitTarget, NodeKind, ViewTree, WidgetLayout, test_ids};
use proptest::prelude::*;

type Controller = OtpController<RecordingHost, SimulatedVerifier>;

fn setup() -> (InputRouter, Controller) {
    let config = OtpConfig::default();
    let router = InputRouter::new(WidgetLayout::from_config(&config));
    let mut controller = OtpController::new(config, RecordingHost::new(), SimulatedVerifier::new());
    controller.mount();
    (router, controller)
}

fn send(router: &InputRouter, controller: &mut Controller, event: InputEvent) {
    router.dispatch(controller, event).unwrap();
}

fn type_text(router: &InputRouter, controller: &mut Controller, text: &str) {
    for ch in text.chars() {
        send(router, controller, InputEvent::Text(ch.to_string()));
    }
}

fn boxes(controller: &Controller) -> Vec<String> {
    ViewTree::from_controller(controller).box_texts()
}

#[test]
fn full_entry_cycle() {
    let (router, mut controller) = setup();

    type_text(&router, &mut controller, "123");
    assert_eq!(boxes(&controller), ["1", "2", "3", "", "", ""]);

    send(&router, &mut controller, InputEvent::SelectionChange { start: 2, end: 2 });
    send(&router, &mut controller, InputEvent::Backspace);
    assert_eq!(boxes(&controller), ["1", "2", "", "", "", ""]);

    send(&router, &mut controller, InputEvent::SelectionChange { start: 0, end: 0 });
    type_text(&router, &mut controller, "123456");
    assert_eq!(boxes(&controller), ["1", "2", "3", "4", "5", "6"]);

    // completion submits without touching the submit button
    let tree = ViewTree::from_controller(&controller);
    assert!(tree.contains(test_ids::LOADING));
    assert!(!tree.contains(test_ids::SUBMIT));
    assert!(!controller.host().keyboard_visible());

    controller.advance(Duration::from_millis(1_500));
    let tree = ViewTree::from_controller(&controller);
    assert!(!tree.contains(test_ids::LOADING));
    assert!(tree.contains(test_ids::RESULT));
    let notifications = controller.host().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);

    controller.advance(Duration::from_millis(800));
    assert_eq!(boxes(&controller), ["", "", "", "", "", ""]);
    assert_eq!(controller.selection(), Selection::caret(0));
    assert_eq!(controller.status(), SubmissionStatus::Idle);
    assert!(ViewTree::from_controller(&controller).contains(test_ids::SUBMIT));

    controller.advance(Duration::from_millis(100));
    assert!(controller.host().keyboard_visible());
}

#[test]
fn edits_during_submission_change_nothing() {
    let (router, mut controller) = setup();
    type_text(&router, &mut controller, "654321");
    let locked = controller.snapshot();

    type_text(&router, &mut controller, "9");
    send(&router, &mut controller, InputEvent::Backspace);
    send(&router, &mut controller, InputEvent::SelectionChange { start: 1, end: 2 });
    let (x, y) = router.layout().boxes[0].center();
    send(&router, &mut controller, InputEvent::Tap { x: x as i32, y: y as i32 });

    assert_eq!(controller.snapshot(), locked);
}

#[test]
fn overwrite_after_tapping_filled_box() {
    let (router, mut controller) = setup();
    type_text(&router, &mut controller, "1234");

    let (x, y) = router.layout().boxes[1].center();
    send(&router, &mut controller, InputEvent::Tap { x: x as i32, y: y as i32 });
    type_text(&router, &mut controller, "8");

    assert_eq!(boxes(&controller), ["1", "8", "3", "4", "", ""]);
    assert_eq!(controller.selection(), Selection::caret(2));
}

#[test]
fn rejected_code_resets_like_success() {
    let config = OtpConfig::from_toml_str(r#"rejected_codes = ["111111"]"#).unwrap();
    let verifier = SimulatedVerifier::rejecting(config.rejected_codes.clone());
    let router = InputRouter::new(WidgetLayout::from_config(&config));
    let mut controller = OtpController::new(config, RecordingHost::new(), verifier);

    type_text(&router, &mut controller, "111111");
    controller.run_until_idle();

    let notifications = controller.host().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Failure);
    assert_eq!(boxes(&controller), ["", "", "", "", "", ""]);
    assert_eq!(controller.status(), SubmissionStatus::Idle);
}

fn tap_submit(router: &InputRouter, controller: &mut Controller) -> Result<(), OtpError> {
    let (x, y) = router.layout().status.center();
    let (x, y) = (x as i32, y as i32);
    assert_eq!(router.layout().hit_test(x, y), Some(HitTarget::StatusSlot));
    router.dispatch(controller, InputEvent::Tap { x, y })
}

#[test]
fn submit_tap_sends_partial_code_and_resets() {
    let (router, mut controller) = setup();
    type_text(&router, &mut controller, "123");

    let tree = ViewTree::from_controller(&controller);
    let button = tree.find(test_ids::SUBMIT).unwrap();
    assert!(matches!(button.kind, NodeKind::Button { disabled: false, .. }));

    tap_submit(&router, &mut controller).unwrap();
    assert_eq!(controller.status(), SubmissionStatus::Submitting);
    assert!(ViewTree::from_controller(&controller).contains(test_ids::LOADING));

    // a second tap while submitting is refused and changes nothing
    let locked = controller.snapshot();
    assert!(matches!(
        tap_submit(&router, &mut controller),
        Err(OtpError::SubmitUnavailable { .. })
    ));
    assert_eq!(controller.snapshot(), locked);

    controller.advance(Duration::from_millis(1_500));
    assert!(matches!(controller.outcome(), Some(Outcome::Failure { .. })));
    let notifications = controller.host().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Failure);

    controller.run_until_idle();
    assert_eq!(boxes(&controller), ["", "", "", "", "", ""]);
    assert_eq!(controller.status(), SubmissionStatus::Idle);
    assert!(controller.host().keyboard_visible());
}

proptest! {
    // Writes at explicit positions never shift other boxes
    #[test]
    fn last_write_wins_per_box(writes in prop::collection::vec((0usize..6, 0u8..10), 0..5)) {
        let (router, mut controller) = setup();
        let mut expected = vec![String::new(); 6];

        for (index, digit) in writes {
            let digit = char::from(b'0' + digit);
            send(&router, &mut controller, InputEvent::SelectionChange {
                start: index as i64,
                end: index as i64,
            });
            type_text(&router, &mut controller, &digit.to_string());
            expected[index] = digit.to_string();
        }

        // fewer than six writes can never complete the code
        prop_assert_eq!(controller.status(), SubmissionStatus::Idle);
        prop_assert_eq!(boxes(&controller), expected);
    }

    #[test]
    fn backspace_touches_one_box(index in 0usize..6) {
        let (router, mut controller) = setup();
        type_text(&router, &mut controller, "12345");
        let before = boxes(&controller);

        send(&router, &mut controller, InputEvent::SelectionChange {
            start: index as i64,
            end: index as i64,
        });
        send(&router, &mut controller, InputEvent::Backspace);

        let after = boxes(&controller);
        for position in 0..6 {
            if position == index {
                prop_assert_eq!(after[position].as_str(), "");
            } else {
                prop_assert_eq!(&after[position], &before[position]);
            }
        }
    }
}
