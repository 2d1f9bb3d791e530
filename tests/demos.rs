use qt_state_viz::parser::Extractor;
use qt_state_viz::render::DotRenderer;
use qt_state_viz::state_machine::{
    Diagram, DiagramPolicy, MachineTransition, OwnershipPolicy, build_diagrams, build_machines,
};

const SIMPLE: &str = include_str!("../demos/qtSimpleStateMachine.cpp");
const DOUBLE: &str = include_str!("../demos/qtDoubleStateMachines.cpp");

fn timeout(from: &str, to: &str) -> MachineTransition {
    MachineTransition::new(from, to, Some("timeout".to_string()))
}

#[test]
fn single_machine_states_and_transitions() {
    let extraction = Extractor::new().unwrap().extract(SIMPLE);
    let machines = build_machines(&extraction, OwnershipPolicy::AllMatches);

    assert_eq!(machines.ids(), vec!["machine"]);
    let machine = machines.get("machine").unwrap();
    assert_eq!(
        machine.states,
        vec!["state1", "state2", "state3", "finalState"]
    );
    assert_eq!(
        machine.transitions,
        vec![
            timeout("state1", "state2"),
            timeout("state2", "state3"),
            timeout("state3", "state2"),
            timeout("state3", "finalState"),
        ]
    );
}

#[test]
fn two_machines_are_kept_apart() {
    let extraction = Extractor::new().unwrap().extract(DOUBLE);
    let machines = build_machines(&extraction, OwnershipPolicy::AllMatches);
    let diagrams = build_diagrams(&machines, DiagramPolicy::Strict).unwrap();

    assert_eq!(diagrams.len(), 2);

    let (id, first) = &diagrams[0];
    assert_eq!(id, "machine");
    assert_eq!(first.states(), vec!["state1", "state2", "state3", "finalState"]);
    assert_eq!(first.transitions().len(), 4);

    let (id, second) = &diagrams[1];
    assert_eq!(id, "machine2");
    assert_eq!(
        second.states(),
        vec!["state4", "state5", "state6", "finalState2"]
    );
    assert!(
        second
            .transitions()
            .iter()
            .all(|t| t.from_state != "state1" && t.to_state != "state1")
    );
}

#[test]
fn extraction_is_deterministic() {
    let extractor = Extractor::new().unwrap();
    assert_eq!(extractor.extract(DOUBLE), extractor.extract(DOUBLE));
    assert_eq!(
        extractor.find_transitions(SIMPLE),
        Extractor::new().unwrap().find_transitions(SIMPLE)
    );
}

#[test]
fn transitions_between_unregistered_states_are_dropped() {
    let code = r#"
        QStateMachine machine;
        QState *a = new QState();
        QState *b = new QState();
        a->addTransition(button, SIGNAL(clicked()), b);
    "#;
    let extraction = Extractor::new().unwrap().extract(code);
    assert_eq!(extraction.transitions.len(), 1);

    let machines = build_machines(&extraction, OwnershipPolicy::AllMatches);
    assert_eq!(machines.len(), 1);
    assert!(machines.all_transitions().is_empty());
}

#[test]
fn every_transition_idiom_reaches_the_model() {
    let code = r#"
        auto machine = new QStateMachine(this);
        machine->addState(idle);
        machine->addState(busy);
        machine->addState(done);
        machine->addState(failed);

        idle->addTransition(worker, &Worker::started, busy);
        busy->addTransition(worker, SIGNAL(finished()), done);
        busy->addTransition(watchdog, [] { }, failed);

        QSignalTransition *retry = new QSignalTransition(button, SIGNAL(clicked()));
        retry->setTargetState(idle);
        failed->addTransition(retry);
    "#;
    let extraction = Extractor::new().unwrap().extract(code);
    let machines = build_machines(&extraction, OwnershipPolicy::AllMatches);

    let machine = machines.get("machine").unwrap();
    assert_eq!(
        machine.transitions,
        vec![
            MachineTransition::new("idle", "busy", Some("started".to_string())),
            MachineTransition::new("busy", "done", Some("finished".to_string())),
            MachineTransition::new("busy", "failed", None),
            MachineTransition::new("failed", "idle", Some("clicked".to_string())),
        ]
    );
}

#[test]
fn rendered_dot_contains_only_own_machine() {
    let dir = tempfile::tempdir().unwrap();
    let extraction = Extractor::new().unwrap().extract(DOUBLE);
    let machines = build_machines(&extraction, OwnershipPolicy::AllMatches);

    let second = Diagram::from_machine(machines.get("machine2").unwrap(), DiagramPolicy::Strict)
        .unwrap();
    let target = dir.path().join("machine2.dot");
    second.render(&DotRenderer, &target, false, false).unwrap();

    let dot = std::fs::read_to_string(&target).unwrap();
    assert!(dot.contains("\"state6\" -> \"finalState2\" [label=\"timeout\"];"));
    assert!(!dot.contains("state1"));
}
