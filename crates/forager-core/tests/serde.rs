use forager_core::{ActivationVector, Command, SensorDimension, WorldSnapshot};

#[test]
fn commands_serialize_with_a_kind_tag() {
    let json = serde_json::to_value(Command::PickUp {
        object: "Jewel_7".to_string(),
    })
    .unwrap();

    assert_eq!(json, serde_json::json!({"kind": "pick_up", "object": "Jewel_7"}));

    let back: Command = serde_json::from_value(json).unwrap();
    assert_eq!(back.name(), "pick_up");
}

#[test]
fn activation_vector_survives_json() {
    let v = ActivationVector::builder()
        .on(SensorDimension::FoodAhead)
        .on(SensorDimension::CloseObjectAhead)
        .build();

    let json = serde_json::to_string(&v).unwrap();
    let back: ActivationVector = serde_json::from_str(&json).unwrap();

    assert_eq!(back, v);
}

#[test]
fn out_of_range_activations_are_clamped_on_load() {
    let back: ActivationVector =
        serde_json::from_str(r#"{"values": [3.5, -1.0, 0.0, 1.0, 0.0]}"#).unwrap();

    assert!(back.is_max(SensorDimension::FoodAhead));
    assert!(back.is_min(SensorDimension::LeafletJewelAhead));
    assert!(back.is_max(SensorDimension::CloseObjectAhead));
}

#[test]
fn unknown_leaflet_fields_are_ignored() {
    let json = r#"[{
        "name": "Creature_0",
        "category": "creature",
        "x": 1.0, "y": 2.0, "distance": 0.0,
        "leaflets": [{"id": 3, "items": {"Red": {"required": 2}}, "payment": 40}]
    }]"#;

    let snapshot: WorldSnapshot = serde_json::from_str(json).unwrap();

    let leaflet = &snapshot.things[0].leaflets[0];
    assert!(leaflet.needs("Red"));
    assert_eq!(leaflet.collected("Red"), 0);
}
