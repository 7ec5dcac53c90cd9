/// End-to-end lifecycle scenarios: a `FederateSession` driving a
/// `RecordingApp` over the loopback runtime.

use fedgate_federate::{
    FaultKind, FederateError, SessionState, READY_TO_POPULATE, READY_TO_RESIGN, READY_TO_RUN,
};
use fedgate_test::{
    assert_fault_kind, assert_fields,
    helpers::model_fixtures::{EXTERNAL_ALERT, SIM_END},
    init_logging, loopback_session, test_config, Observed, RecordingApp,
};

#[test]
fn simulation_end_stops_after_its_step_and_resigns_through_barrier() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.inject_interaction_at(EXTERNAL_ALERT, &[("level", "3")], 1.0);
    rti.inject_interaction_at(SIM_END, &[], 2.0);
    let mut app = RecordingApp::new();

    federate.run(&mut app).unwrap();

    assert_eq!(app.steps(), vec![0.0, 1.0, 2.0]);
    assert_eq!(
        rti.achieved_sync_points(),
        vec![READY_TO_POPULATE, READY_TO_RUN, READY_TO_RESIGN]
    );
    assert!(federate.simulation_ended());
    assert!(!federate.exit_requested());
    assert_eq!(federate.logical_time(), 2.0);
    assert_eq!(federate.state(), SessionState::Resigned);
    assert!(rti.is_resigned());

    // The end interaction itself still reaches the application, after the alert
    match app.interactions().as_slice() {
        [Observed::Interaction {
            time: alert_time,
            type_name: alert_type,
            fields: alert_fields,
            ..
        }, Observed::Interaction {
            time: end_time,
            type_name: end_type,
            ..
        }] => {
            assert_eq!(*alert_time, 1.0);
            assert_eq!(alert_type, EXTERNAL_ALERT);
            assert_fields!(alert_fields, { "level" => "3" });
            assert_eq!(*end_time, 2.0);
            assert_eq!(end_type, SIM_END);
        }
        other => panic!("Expected the alert then the simulation end, got {:?}", other),
    }

    let observed = app.observed();
    assert_eq!(observed.first(), Some(&Observed::InitializeSelf));
    assert_eq!(observed.get(1), Some(&Observed::InitializeWithPeers));
    assert_eq!(observed.last(), Some(&Observed::Terminate));
    assert_eq!(app.count(&Observed::Terminate), 1);
}

#[test]
fn exit_request_finishes_current_step_and_skips_resign_barrier() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new().exit_at(3.0);

    federate.run(&mut app).unwrap();

    assert_eq!(app.steps(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(federate.logical_time(), 4.0);
    assert_eq!(rti.logical_time(), 4.0);
    assert!(federate.exit_requested());
    assert!(!federate.simulation_ended());
    assert_eq!(rti.achieved_sync_points(), vec![READY_TO_POPULATE, READY_TO_RUN]);
    assert_eq!(app.observed().last(), Some(&Observed::Terminate));
    assert!(rti.is_resigned());
}

#[test]
fn late_joiner_skips_every_barrier() {
    init_logging();
    let mut config = test_config();
    config.late_joiner = true;
    let (mut federate, rti) = loopback_session(config);
    rti.inject_interaction_at(SIM_END, &[], 1.0);
    let mut app = RecordingApp::new();

    federate.run(&mut app).unwrap();

    assert_eq!(app.steps(), vec![0.0, 1.0]);
    assert!(federate.simulation_ended());
    assert!(rti.achieved_sync_points().is_empty());
    assert_eq!(rti.call_count("synchronization_point_achieved"), 0);
    assert!(rti.is_resigned());
}

#[test]
fn time_starts_only_after_run_barrier() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.inject_interaction(SIM_END, &[]);
    let mut app = RecordingApp::new();

    assert!(!federate.has_time_started());
    federate.run(&mut app).unwrap();
    assert!(federate.has_time_started());

    // The end interaction arrives during initialization and is drained
    // before the run barrier, which ends the loop right after step 0.
    match app.interactions().as_slice() {
        [Observed::Interaction { time_started, .. }] => assert!(!time_started),
        other => panic!("Expected one interaction, got {:?}", other),
    }
    assert_eq!(app.steps(), vec![0.0]);
}

#[test]
fn startup_calls_follow_protocol_order() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new().exit_at(0.0);

    federate.run(&mut app).unwrap();

    let calls = rti.calls();
    let position = |call: &str| calls.iter().position(|recorded| recorded == call).unwrap();
    assert_eq!(position("join_federation"), 0);
    assert!(position("enable_asynchronous_delivery") < position("enable_time_constrained"));
    assert!(position("enable_time_constrained") < position("enable_time_regulation"));
    assert!(position("enable_time_regulation") < position("publish_interaction_class"));
    assert!(position("publish_interaction_class") < position("synchronization_point_achieved"));
    assert_eq!(calls.last().map(String::as_str), Some("resign_federation"));
}

#[test]
fn already_enabled_capability_is_not_waited_for() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.preenable(fedgate_federate::Capability::TimeConstrained);
    let mut app = RecordingApp::new().exit_at(1.0);

    federate.run(&mut app).unwrap();

    assert_eq!(app.steps(), vec![0.0, 1.0]);
    assert!(federate.ambassador().is_time_constrained());
    assert!(federate.ambassador().is_time_regulating());
}

#[test]
fn preenabled_capabilities_are_reported_as_enabled() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.preenable(fedgate_federate::Capability::TimeConstrained);
    rti.preenable(fedgate_federate::Capability::TimeRegulation);
    let mut app = RecordingApp::new().exit_at(0.0);

    federate.run(&mut app).unwrap();

    assert!(federate.ambassador().is_time_constrained());
    assert!(federate.ambassador().is_time_regulating());
    assert_eq!(app.steps(), vec![0.0]);
}

#[test]
fn application_failure_still_terminates_and_resigns() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new().on_step(|_federate, time| {
        if time == 1.0 {
            return Err(FederateError::application("sensor offline"));
        }
        Ok(())
    });

    let result = federate.run(&mut app);

    assert_fault_kind!(result, FaultKind::Application);
    assert_eq!(app.steps(), vec![0.0, 1.0]);
    assert_eq!(app.observed().last(), Some(&Observed::Terminate));
    assert!(rti.is_resigned());
    assert_eq!(federate.state(), SessionState::Resigned);
}

#[test]
fn resign_failure_on_clean_run_is_returned() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.fail_resign(fedgate_federate::RtiError::Internal {
        reason: "connection dropped".to_string(),
    });
    let mut app = RecordingApp::new().exit_at(0.0);

    let result = federate.run(&mut app);

    match result {
        Err(FederateError::RuntimeContractViolated {
            operation: "resign",
            ..
        }) => {}
        other => panic!("Expected the resign failure, got {:?}", other),
    }
    assert_eq!(app.observed().last(), Some(&Observed::Terminate));
    assert_eq!(federate.state(), SessionState::Resigned);
}

#[test]
fn resign_failure_after_fault_keeps_original_fault() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.fail_resign(fedgate_federate::RtiError::NotJoined);
    let mut app = RecordingApp::new()
        .on_step(|_federate, _time| Err(FederateError::application("first fault")));

    let result = federate.run(&mut app);

    match result {
        Err(FederateError::Application { message }) => assert_eq!(message, "first fault"),
        other => panic!("Expected the application fault, got {:?}", other),
    }
}

#[test]
fn delayed_barrier_is_waited_for() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.delay_barrier(READY_TO_RUN, 3);
    let mut app = RecordingApp::new().exit_at(0.0);

    federate.run(&mut app).unwrap();

    assert_eq!(app.steps(), vec![0.0]);
    assert_eq!(rti.achieved_sync_points(), vec![READY_TO_POPULATE, READY_TO_RUN]);

    // Achieving readyToRun is the second achievement; no time advance may be
    // requested before the three delayed ticks have passed.
    let calls = rti.calls();
    let achieved_run = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| *call == "synchronization_point_achieved")
        .map(|(index, _)| index)
        .nth(1)
        .unwrap();
    let first_advance = calls
        .iter()
        .position(|call| call == "time_advance_request")
        .unwrap();
    let ticks_between = calls[achieved_run..first_advance]
        .iter()
        .filter(|call| *call == "tick")
        .count();
    assert!(ticks_between >= 3, "only {} ticks while waiting", ticks_between);
}
