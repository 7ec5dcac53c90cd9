use fedgate_federate::{
    shared::ObjectInstanceHandle, FaultKind, FederateApplication, FederateError, FederateSession,
    SessionState,
};
use fedgate_test::{
    assert_fault_kind, helpers::model_fixtures::VEHICLE, init_logging, loopback_session,
    test_config, Observed, RecordingApp,
};

#[test]
fn run_twice_is_misuse() {
    init_logging();
    let (mut federate, _rti) = loopback_session(test_config());
    federate.run(&mut RecordingApp::new().exit_at(0.0)).unwrap();

    let mut second = RecordingApp::new();
    let result = federate.run(&mut second);

    match result {
        Err(FederateError::InvalidState {
            operation: "run",
            state: SessionState::Resigned,
        }) => {}
        other => panic!("Expected an invalid state fault, got {:?}", other),
    }
    assert!(second.observed().is_empty());
}

struct Reentrant;

impl FederateApplication for Reentrant {
    fn do_time_step(&mut self, federate: &mut FederateSession, _time: f64) -> Result<(), FederateError> {
        let result = federate.run(&mut RecordingApp::new());
        match result {
            Err(FederateError::InvalidState {
                state: SessionState::Running,
                ..
            }) => {}
            other => panic!("Expected an invalid state fault, got {:?}", other),
        }
        federate.request_exit();
        Ok(())
    }
}

#[test]
fn reentrant_run_is_misuse() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());

    federate.run(&mut Reentrant).unwrap();

    assert_eq!(rti.call_count("join_federation"), 1);
}

#[test]
fn unsupported_services_fail_explicitly() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.inject_discover(3, VEHICLE, "remote-3");
    let mut app = RecordingApp::new()
        .on_step(|federate, _time| {
            match federate.request_federation_save("checkpoint") {
                Err(FederateError::UnsupportedService { service }) => {
                    assert_eq!(service, "federation save")
                }
                other => panic!("Expected an unsupported service, got {:?}", other),
            }
            assert_fault_kind!(
                federate.request_federation_restore("checkpoint"),
                FaultKind::UnsupportedService
            );
            assert_fault_kind!(
                federate.acquire_attribute_ownership(ObjectInstanceHandle::new(3), &["callsign"]),
                FaultKind::UnsupportedService
            );
            Ok(())
        })
        .exit_at(0.0);

    federate.run(&mut app).unwrap();
}

#[test]
fn unsupported_service_propagated_by_the_application_ends_the_run() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new().on_step(|federate, _time| {
        federate.request_federation_save("checkpoint")?;
        Ok(())
    });

    let result = federate.run(&mut app);

    assert_fault_kind!(result, FaultKind::UnsupportedService);
    assert_eq!(app.steps(), vec![0.0]);
    assert_eq!(app.observed().last(), Some(&Observed::Terminate));
    assert!(rti.is_resigned());
}

#[test]
fn ownership_of_unknown_instance_is_misuse() {
    init_logging();
    let (mut federate, _rti) = loopback_session(test_config());
    let mut app = RecordingApp::new()
        .on_step(|federate, _time| {
            assert_fault_kind!(
                federate.acquire_attribute_ownership(ObjectInstanceHandle::new(42), &["callsign"]),
                FaultKind::Misuse
            );
            Ok(())
        })
        .exit_at(0.0);

    federate.run(&mut app).unwrap();
}

#[test]
fn tick_before_join_is_misuse() {
    init_logging();
    let (mut federate, _rti) = loopback_session(test_config());

    match federate.tick() {
        Err(FederateError::InvalidState {
            operation: "tick",
            state: SessionState::Constructed,
        }) => {}
        other => panic!("Expected an invalid state fault, got {:?}", other),
    }
}

#[test]
fn explicit_tick_delivers_within_the_same_step() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let script = rti.clone();
    let mut app = RecordingApp::new()
        .on_step(move |federate, time| {
            if time == 1.0 {
                script.inject_discover(8, VEHICLE, "late-8");
                federate.tick()?;
            }
            Ok(())
        })
        .exit_at(1.0);

    federate.run(&mut app).unwrap();

    assert_eq!(federate.known_object_names().collect::<Vec<_>>(), vec!["late-8"]);
    assert_eq!(app.steps(), vec![0.0, 1.0]);
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let mut config = test_config();
    config.federate_name = String::new();
    let rti = fedgate_test::LoopbackRti::new(&fedgate_test::federation_model());

    let result = FederateSession::new(config, fedgate_test::gateway_model(), Box::new(rti));

    assert_fault_kind!(result, FaultKind::Configuration);
}
