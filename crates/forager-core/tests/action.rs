use forager_core::{ActionId, Category, Command, DispatchParams, Target};

fn target() -> Target {
    Target {
        name: "Jewel_7".to_string(),
        category: Category::Jewel,
        color: "Red".to_string(),
        x: 310.0,
        y: 45.5,
        distance: 22.0,
    }
}

#[test]
fn target_actions_need_a_target() {
    let params = DispatchParams::default();
    for action in [ActionId::GoAhead, ActionId::Eat, ActionId::Sack, ActionId::Hide] {
        assert!(action.requires_target());
        assert_eq!(action.command(None, &params), None, "{action}");
    }
}

#[test]
fn rotate_and_stop_dispatch_without_target() {
    let params = DispatchParams::default();

    assert_eq!(
        ActionId::Rotate.command(None, &params),
        Some(Command::SetHeading {
            right_wheel: 2.0,
            left_wheel: -2.0,
            speed: 2.0
        })
    );
    assert_eq!(ActionId::Stop.command(None, &params), Some(Command::Halt));
}

#[test]
fn target_parameters_flow_into_commands() {
    let params = DispatchParams::default();
    let t = target();

    assert_eq!(
        ActionId::GoAhead.command(Some(&t), &params),
        Some(Command::SetDestination {
            right_wheel: 1.0,
            left_wheel: 1.0,
            x: 310.0,
            y: 45.5
        })
    );
    assert_eq!(
        ActionId::Sack.command(Some(&t), &params).map(|c| c.name()),
        Some("pick_up")
    );
    assert_eq!(
        ActionId::Eat.command(Some(&t), &params),
        Some(Command::Consume {
            object: "Jewel_7".to_string()
        })
    );
    assert_eq!(
        ActionId::Hide.command(Some(&t), &params),
        Some(Command::Conceal {
            object: "Jewel_7".to_string()
        })
    );
}

#[test]
fn action_names_parse_back() {
    for action in ActionId::ALL {
        assert_eq!(ActionId::from_name(action.name()), Some(action));
    }
    assert_eq!(ActionId::from_name("ROTATE_CLOCKWISE"), Some(ActionId::Rotate));
    assert_eq!(ActionId::from_name("dance"), None);
}
