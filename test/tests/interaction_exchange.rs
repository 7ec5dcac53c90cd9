/// Outgoing interactions, their bookkeeping, and the round trip back
/// through the loopback runtime.

use fedgate_federate::{shared::FieldMap, FaultKind, FederateError};
use fedgate_test::{
    assert_fault_kind, assert_fields,
    helpers::model_fixtures::{EXTERNAL_ALERT, PING, REPORT, SIM_END, UNMODELLED},
    init_logging, loopback_session, test_config, Observed, RecordingApp,
};

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn received_fields(app: &RecordingApp, class: &str) -> Vec<FieldMap> {
    app.interactions()
        .into_iter()
        .filter_map(|observed| match observed {
            Observed::Interaction {
                type_name, fields, ..
            } if type_name == class => Some(fields.clone()),
            _ => None,
        })
        .collect()
}

fn round_trip(nul_terminated: bool) {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.set_echo(true);
    rti.set_nul_terminated(nul_terminated);
    let mut app = RecordingApp::new()
        .on_step(|federate, time| {
            if time == 0.0 {
                federate.send_interaction(
                    PING,
                    &fields(&[("count", "3"), ("note", "hello"), ("bogus", "x")]),
                )?;
            }
            Ok(())
        })
        .exit_at(1.0);

    federate.run(&mut app).unwrap();

    let received = received_fields(&app, PING);
    assert_eq!(received.len(), 1);
    assert_fields!(&received[0], {
        "count" => "3",
        "note" => "hello",
        "sourceFed" => "gateway",
        "originFed" => "gateway",
        "actualLogicalGenerationTime" => "0",
    });
}

#[test]
fn round_trip_reproduces_known_fields() {
    round_trip(false);
}

#[test]
fn round_trip_strips_nul_terminators() {
    round_trip(true);
}

#[test]
fn bookkeeping_keeps_existing_origin() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new()
        .on_step(|federate, time| {
            if time == 2.0 {
                federate.send_interaction(
                    REPORT,
                    &fields(&[("body", "status"), ("originFed", "upstream")]),
                )?;
            }
            Ok(())
        })
        .exit_at(2.0);

    federate.run(&mut app).unwrap();

    let sent = rti.sent_interactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].class, REPORT);
    assert_eq!(sent[0].timestamp, None);
    assert_fields!(&sent[0].fields, {
        "body" => "status",
        "originFed" => "upstream",
        "sourceFed" => "gateway",
        "actualLogicalGenerationTime" => "2",
    });
}

#[test]
fn cleared_rewriter_sends_fields_untouched() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    federate.clear_interaction_rewriter();
    let mut app = RecordingApp::new()
        .on_step(|federate, _time| federate.send_interaction(REPORT, &fields(&[("body", "raw")])))
        .exit_at(0.0);

    federate.run(&mut app).unwrap();

    assert_fields!(&rti.sent_interactions()[0].fields, { "body" => "raw" });
}

#[test]
fn timestamped_send_respects_lookahead() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new()
        .on_step(|federate, time| {
            if time == 1.0 {
                let early = federate.send_interaction_at(PING, &FieldMap::new(), 1.2);
                match early {
                    Err(FederateError::TimestampTooEarly {
                        requested,
                        earliest,
                    }) => {
                        assert_eq!(requested, 1.2);
                        assert_eq!(earliest, 1.5);
                    }
                    other => panic!("Expected an early timestamp fault, got {:?}", other),
                }
                federate.send_interaction_at(PING, &fields(&[("count", "1")]), 1.5)?;
            }
            Ok(())
        })
        .exit_at(1.0);

    federate.run(&mut app).unwrap();

    let sent = rti.sent_interactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].timestamp, Some(1.5));
}

#[test]
fn timestamped_echo_arrives_with_its_grant() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.set_echo(true);
    let mut app = RecordingApp::new()
        .on_step(|federate, time| {
            if time == 0.0 {
                federate.send_interaction_at(PING, &fields(&[("count", "9")]), 2.0)?;
            }
            Ok(())
        })
        .exit_at(2.0);

    federate.run(&mut app).unwrap();

    let times: Vec<f64> = app
        .interactions()
        .into_iter()
        .filter_map(|observed| match observed {
            Observed::Interaction { time, .. } => Some(*time),
            _ => None,
        })
        .collect();
    assert_eq!(times, vec![2.0]);
}

#[test]
fn sending_classes_outside_the_model_or_unpublished_is_misuse() {
    init_logging();
    let (mut federate, _rti) = loopback_session(test_config());
    let mut app = RecordingApp::new()
        .on_step(|federate, _time| {
            match federate.send_interaction(UNMODELLED, &FieldMap::new()) {
                Err(FederateError::NotInObjectModel { kind, path }) => {
                    assert_eq!(kind, "interaction");
                    assert_eq!(path, UNMODELLED);
                }
                other => panic!("Expected an unknown class fault, got {:?}", other),
            }
            assert_fault_kind!(
                federate.send_interaction(EXTERNAL_ALERT, &FieldMap::new()),
                FaultKind::Misuse
            );
            Ok(())
        })
        .exit_at(0.0);

    federate.run(&mut app).unwrap();
}

#[test]
fn sending_before_run_is_misuse() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());

    let result = federate.send_interaction(PING, &FieldMap::new());

    match result {
        Err(FederateError::InvalidState { .. }) => {}
        other => panic!("Expected an invalid state fault, got {:?}", other),
    }
    assert!(rti.calls().is_empty());
}

#[test]
fn incoming_fields_unknown_to_the_model_are_dropped() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    rti.inject_interaction(PING, &[("count", "4"), ("priority", "high")]);
    rti.inject_interaction(UNMODELLED, &[]);
    rti.inject_interaction(EXTERNAL_ALERT, &[("level", "2")]);
    let mut app = RecordingApp::new().exit_at(0.0);

    federate.run(&mut app).unwrap();

    let received: Vec<&str> = app
        .interactions()
        .into_iter()
        .filter_map(|observed| match observed {
            Observed::Interaction { type_name, .. } => Some(type_name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(received, vec![PING, EXTERNAL_ALERT]);
    assert_fields!(&received_fields(&app, PING)[0], { "count" => "4" });
}

#[test]
fn declarations_follow_the_object_model() {
    init_logging();
    let (mut federate, rti) = loopback_session(test_config());
    let mut app = RecordingApp::new().exit_at(0.0);

    federate.run(&mut app).unwrap();

    let mut published = rti.published_interactions();
    published.sort();
    assert_eq!(published, vec![PING, REPORT]);

    let mut subscribed = rti.subscribed_interactions();
    subscribed.sort();
    assert_eq!(subscribed, vec![PING, SIM_END, EXTERNAL_ALERT]);
}
