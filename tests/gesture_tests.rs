//! Finger counting and gesture mapping tests

mod test_helpers;

use air_ink::{
    constants::NUM_HAND_LANDMARKS,
    gesture::{Gesture, GestureClassifier, GestureThresholds},
    landmarks::{Landmark, LandmarkFrame},
};
use proptest::prelude::*;
use test_helpers::hand_with_fingers;

#[test]
fn test_helper_hands_have_requested_count() {
    let classifier = GestureClassifier::default();
    for fingers in 0..=5 {
        let frame = LandmarkFrame::new(&hand_with_fingers(fingers, (320, 240))).unwrap();
        assert_eq!(classifier.count_extended(&frame), fingers, "hand with {fingers} fingers");
    }
}

#[test]
fn test_commands_for_counts() {
    let classifier = GestureClassifier::default();
    let expected = [
        Gesture::Draw,
        Gesture::Draw,
        Gesture::Pause,
        Gesture::Draw,
        Gesture::Draw,
        Gesture::Clear,
    ];

    for (fingers, gesture) in expected.into_iter().enumerate() {
        let frame = LandmarkFrame::new(&hand_with_fingers(fingers as u8, (100, 100))).unwrap();
        assert_eq!(classifier.classify(&frame), (fingers as u8, gesture));
    }
}

#[test]
fn test_wider_margins_reject_weak_extension() {
    let frame = LandmarkFrame::new(&hand_with_fingers(2, (320, 240))).unwrap();

    // Fingers in the helper clear their joints by 0.3 and 0.4
    let strict = GestureClassifier::new(GestureThresholds {
        finger_margin: 0.35,
        ..GestureThresholds::default()
    });
    assert_eq!(strict.count_extended(&frame), 1);

    let stricter = GestureClassifier::new(GestureThresholds {
        finger_margin: 0.5,
        ..GestureThresholds::default()
    });
    assert_eq!(stricter.count_extended(&frame), 0);
}

fn arbitrary_hand() -> impl Strategy<Value = Vec<Landmark>> {
    prop::collection::vec(
        (0.0f32..1.0, 0.0f32..1.0, -0.5f32..0.5).prop_map(|(x, y, z)| Landmark::new(x, y, z)),
        NUM_HAND_LANDMARKS,
    )
}

proptest! {
    #[test]
    fn prop_count_is_bounded(points in arbitrary_hand()) {
        let frame = LandmarkFrame::new(&points).unwrap();
        let count = GestureClassifier::default().count_extended(&frame);
        prop_assert!(count <= 5);
    }

    #[test]
    fn prop_classification_is_pure(points in arbitrary_hand()) {
        let frame = LandmarkFrame::new(&points).unwrap();
        let classifier = GestureClassifier::default();
        let first = classifier.classify(&frame);
        prop_assert_eq!(first, classifier.classify(&frame));
        prop_assert_eq!(first.1, Gesture::from_count(first.0));
    }

    #[test]
    fn prop_depth_is_ignored(points in arbitrary_hand(), depth in -1.0f32..1.0) {
        let flattened: Vec<Landmark> = points.iter().map(|p| Landmark::new(p.x, p.y, depth)).collect();
        let classifier = GestureClassifier::default();
        prop_assert_eq!(
            classifier.count_extended(&LandmarkFrame::new(&points).unwrap()),
            classifier.count_extended(&LandmarkFrame::new(&flattened).unwrap())
        );
    }
}
