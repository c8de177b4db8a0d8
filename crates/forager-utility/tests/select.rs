use forager_core::{ActionId, ActivationVector, CycleContext, SensorDimension};
use forager_utility::{
    ActionRule, ActionSelector, LevelMeasures, RuleSet, SelectionConfig, SelectionConfigError,
};

fn ctx(cycle: u64) -> CycleContext {
    CycleContext::new(cycle, 42)
}

#[test]
fn empty_eligible_set_selects_nothing() {
    let rules = RuleSet::new(vec![
        ActionRule::standing(ActionId::Eat),
        ActionRule::standing(ActionId::Stop),
    ]);

    let selected = ActionSelector::default().select(&rules, &ActivationVector::quiescent(), &ctx(0));

    assert_eq!(selected, None);
}

#[test]
fn quiescent_vector_without_rotate_selects_nothing() {
    let rules = RuleSet::new(
        RuleSet::STANDING_ORDER
            .iter()
            .filter(|a| **a != ActionId::Rotate)
            .map(|a| ActionRule::standing(*a))
            .collect(),
    );

    for cycle in 0..8 {
        assert!(ActionSelector::default()
            .select(&rules, &ActivationVector::quiescent(), &ctx(cycle))
            .is_none());
    }
}

#[test]
fn quiescent_vector_scans() {
    let selected = ActionSelector::default()
        .select(&RuleSet::standing(), &ActivationVector::quiescent(), &ctx(0))
        .unwrap();

    assert_eq!(selected.action, ActionId::Rotate);
    assert_eq!(selected.eligible, vec![ActionId::Rotate]);
}

#[test]
fn close_food_is_eaten_under_fixed_priority() {
    let v = ActivationVector::builder()
        .on(SensorDimension::FoodAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();

    let selected = ActionSelector::default()
        .select(&RuleSet::standing(), &v, &ctx(0))
        .unwrap();

    assert_eq!(selected.action, ActionId::Eat);
    assert_eq!(selected.eligible, vec![ActionId::Eat, ActionId::GoAhead]);
}

#[test]
fn close_leaflet_jewel_is_sacked() {
    let v = ActivationVector::builder()
        .on(SensorDimension::LeafletJewelAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();

    let selected = ActionSelector::default()
        .select(&RuleSet::standing(), &v, &ctx(0))
        .unwrap();

    assert_eq!(selected.action, ActionId::Sack);
}

#[test]
fn completed_leaflet_stops_first() {
    let v = ActivationVector::builder()
        .on(SensorDimension::HasCompletedLeaflet)
        .on(SensorDimension::FoodAhead)
        .build();

    let selected = ActionSelector::default()
        .select(&RuleSet::standing(), &v, &ctx(0))
        .unwrap();

    assert_eq!(selected.action, ActionId::Stop);
}

#[test]
fn fixed_priority_follows_registration_order() {
    let rules = RuleSet::new(vec![
        ActionRule::standing(ActionId::GoAhead),
        ActionRule::standing(ActionId::Eat),
    ]);
    let v = ActivationVector::builder()
        .on(SensorDimension::FoodAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();

    let selected = ActionSelector::default().select(&rules, &v, &ctx(0)).unwrap();

    assert_eq!(selected.action, ActionId::GoAhead);
}

#[test]
fn stochastic_only_picks_eligible_and_is_reproducible() {
    let rules = RuleSet::standing();
    let v = ActivationVector::builder()
        .on(SensorDimension::FoodAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();
    let selector = ActionSelector::new(SelectionConfig::stochastic(42));

    let first: Vec<_> = (0..200)
        .map(|c| selector.select(&rules, &v, &ctx(c)).unwrap().action)
        .collect();
    let second: Vec<_> = (0..200)
        .map(|c| selector.select(&rules, &v, &ctx(c)).unwrap().action)
        .collect();

    assert_eq!(first, second);
    assert!(first
        .iter()
        .all(|a| *a == ActionId::Eat || *a == ActionId::GoAhead));
    assert!(first.contains(&ActionId::Eat));
    assert!(first.contains(&ActionId::GoAhead));
}

#[test]
fn zero_weight_removes_an_action_from_sampling() {
    let rules = RuleSet::standing();
    let v = ActivationVector::builder()
        .on(SensorDimension::LeafletJewelAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();
    let selector =
        ActionSelector::new(SelectionConfig::stochastic(9).with_weight(ActionId::GoAhead, 0.0));

    for c in 0..100 {
        assert_eq!(
            selector.select(&rules, &v, &ctx(c)).unwrap().action,
            ActionId::Sack
        );
    }
}

#[test]
fn all_zero_weights_fall_back_to_priority() {
    let v = ActivationVector::builder()
        .on(SensorDimension::FoodAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();
    let selector = ActionSelector::new(
        SelectionConfig::stochastic(1)
            .with_weight(ActionId::Eat, 0.0)
            .with_weight(ActionId::GoAhead, 0.0),
    );

    let selected = selector.select(&RuleSet::standing(), &v, &ctx(3)).unwrap();

    assert_eq!(selected.action, ActionId::Eat);
}

#[test]
fn default_config_is_valid_and_pins_fixed_level() {
    let config = SelectionConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.levels, LevelMeasures::default());
    assert_eq!(config.levels.fixed_rule, 1.0);
}

#[test]
fn invalid_selection_configs_are_rejected() {
    let refinement = SelectionConfig {
        rule_refinement: true,
        ..SelectionConfig::default()
    };
    assert_eq!(
        refinement.validate(),
        Err(SelectionConfigError::RefinementEnabled)
    );

    let bottom = SelectionConfig {
        levels: LevelMeasures {
            bottom_level: 0.5,
            ..LevelMeasures::default()
        },
        ..SelectionConfig::default()
    };
    assert!(matches!(
        bottom.validate(),
        Err(SelectionConfigError::UnsupportedLevel {
            level: "bottom_level",
            ..
        })
    ));

    let no_fixed = SelectionConfig {
        levels: LevelMeasures {
            fixed_rule: 0.0,
            ..LevelMeasures::default()
        },
        ..SelectionConfig::default()
    };
    assert!(matches!(
        no_fixed.validate(),
        Err(SelectionConfigError::FixedLevelDisabled(_))
    ));

    let negative = SelectionConfig::default().with_weight(ActionId::Hide, -1.0);
    assert!(matches!(
        negative.validate(),
        Err(SelectionConfigError::InvalidWeight { .. })
    ));
}
