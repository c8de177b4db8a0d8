use forager_core::{ActionId, Command, SensorDimension};
use forager_runtime::{CycleEvent, CycleEventKind, EventEmitter, SkipReason, StopReason};
use uuid::Uuid;

fn decided(run_id: Uuid, cycle: u64) -> CycleEvent {
    CycleEvent::new(
        run_id,
        cycle,
        CycleEventKind::Decided {
            active: vec![SensorDimension::FoodAhead, SensorDimension::CloseObjectAhead],
            target: Some("Food_1".to_string()),
            eligible: vec![ActionId::Eat, ActionId::GoAhead],
            action: Some(ActionId::Eat),
            command: Some(Command::Consume {
                object: "Food_1".to_string(),
            }),
            inventory: None,
        },
    )
}

#[test]
fn emitter_appends_and_reads_back_the_tail() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = EventEmitter::for_project(dir.path());
    let run_id = Uuid::new_v4();

    for cycle in 0..5 {
        emitter.emit(&decided(run_id, cycle)).unwrap();
    }

    let recent = emitter.read_recent(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].cycle, 3);
    assert_eq!(recent[1].run_id, run_id);
    assert_eq!(recent[1].kind, decided(run_id, 4).kind);
    assert!(emitter.path().ends_with(".forager/events.jsonl"));
}

#[test]
fn missing_log_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = EventEmitter::new(dir.path().join("none.jsonl"));

    assert!(emitter.read_recent(10).is_empty());
}

#[test]
fn unparseable_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let emitter = EventEmitter::new(&path);
    emitter
        .emit(&CycleEvent::new(
            Uuid::nil(),
            0,
            CycleEventKind::Started { max_cycles: None },
        ))
        .unwrap();
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("not json\n");
    std::fs::write(&path, content).unwrap();

    let events = emitter.read_recent(10);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, CycleEventKind::Started { max_cycles: None });
}

#[test]
fn events_serialize_flat_with_a_type_tag() {
    let event = CycleEvent::new(
        Uuid::nil(),
        4,
        CycleEventKind::Skipped {
            reason: SkipReason::NoSnapshot,
            detail: None,
        },
    );

    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["type"], "skipped");
    assert_eq!(value["reason"], "no_snapshot");
    assert_eq!(value["cycle"], 4);
    assert!(value.get("detail").is_none());
}

#[test]
fn summary_reads_like_a_log_line() {
    let run_id = Uuid::nil();

    assert_eq!(decided(run_id, 0).summary(), "eat -> consume (Food_1)");
    assert_eq!(
        CycleEvent::new(
            run_id,
            9,
            CycleEventKind::Stopped {
                reason: StopReason::Aborted,
                cycles: 9,
                agent_destroyed: true,
            },
        )
        .summary(),
        "stopped after 9 cycles: Aborted, agent destroyed"
    );
    assert_eq!(
        decided(run_id, 0).dispatched().map(|(a, c)| (a, c.name())),
        Some((ActionId::Eat, "consume"))
    );
}
