use forager_core::{ActionId, ActivationVector, SensorDimension};
use forager_utility::{standing_eligible, ActionRule, RuleSet};

const GATING: [SensorDimension; 5] = [
    SensorDimension::FoodAhead,
    SensorDimension::LeafletJewelAhead,
    SensorDimension::NonLeafletJewelAhead,
    SensorDimension::CloseObjectAhead,
    SensorDimension::HasCompletedLeaflet,
];

fn all_vectors() -> Vec<ActivationVector> {
    (0u32..32)
        .map(|bits| {
            ActivationVector::from_fn(|dim| {
                let i = GATING.iter().position(|d| *d == dim).unwrap();
                bits & (1 << i) != 0
            })
        })
        .collect()
}

#[test]
fn truth_table_covers_every_combination() {
    let vectors = all_vectors();
    assert_eq!(vectors.len(), 32);
    let unique: std::collections::HashSet<_> = vectors.iter().collect();
    assert_eq!(unique.len(), 32);
}

#[test]
fn rotate_never_overlaps_target_actions() {
    for v in all_vectors() {
        if standing_eligible(ActionId::Rotate, &v) {
            for other in [ActionId::GoAhead, ActionId::Eat, ActionId::Sack, ActionId::Hide] {
                assert!(!standing_eligible(other, &v), "{other} with rotate on {v:?}");
            }
        }
    }
}

#[test]
fn standing_table_matches_literal_expressions() {
    for v in all_vectors() {
        let food = v.is_max(SensorDimension::FoodAhead);
        let leaflet = v.is_max(SensorDimension::LeafletJewelAhead);
        let other = v.is_max(SensorDimension::NonLeafletJewelAhead);
        let close = v.is_max(SensorDimension::CloseObjectAhead);
        let done = v.is_max(SensorDimension::HasCompletedLeaflet);

        assert_eq!(
            standing_eligible(ActionId::Rotate, &v),
            !close && !food && !leaflet && !other
        );
        assert_eq!(
            standing_eligible(ActionId::GoAhead, &v),
            food || leaflet || (other && !close)
        );
        assert_eq!(standing_eligible(ActionId::Eat, &v), food && close);
        assert_eq!(standing_eligible(ActionId::Sack, &v), leaflet && close);
        assert_eq!(standing_eligible(ActionId::Hide, &v), other && close);
        assert_eq!(standing_eligible(ActionId::Stop, &v), done);
    }
}

#[test]
fn go_ahead_stays_eligible_next_to_close_food() {
    let v = ActivationVector::builder()
        .on(SensorDimension::FoodAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();

    assert!(standing_eligible(ActionId::GoAhead, &v));
    assert!(standing_eligible(ActionId::Eat, &v));
}

#[test]
fn go_ahead_drops_close_non_leaflet_jewel() {
    let v = ActivationVector::builder()
        .on(SensorDimension::NonLeafletJewelAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();

    assert!(!standing_eligible(ActionId::GoAhead, &v));
    assert!(standing_eligible(ActionId::Hide, &v));
}

#[test]
fn standing_supports_are_binary_and_in_registration_order() {
    let rules = RuleSet::standing();
    for v in all_vectors() {
        let supports = rules.evaluate(&v);
        let order: Vec<_> = supports.iter().map(|s| s.action).collect();
        assert_eq!(order, RuleSet::STANDING_ORDER.to_vec());
        assert!(supports.iter().all(|s| s.support == 0.0 || s.support == 1.0));
    }
}

#[test]
fn custom_support_is_clamped() {
    let rules = RuleSet::new(vec![
        ActionRule::custom(ActionId::Rotate, |_| 3.5),
        ActionRule::custom(ActionId::Stop, |_| f64::NAN),
        ActionRule::custom(ActionId::Eat, |_| -1.0),
    ]);

    let supports = rules.evaluate(&ActivationVector::quiescent());

    assert_eq!(supports[0].support, 1.0);
    assert_eq!(supports[1].support, 0.0);
    assert_eq!(supports[2].support, 0.0);
    assert_eq!(rules.eligible(&ActivationVector::quiescent()).len(), 1);
}
