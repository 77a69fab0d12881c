//! Integration tests for the Omaha XML codec.
//!
//! These exercise the public decode/encode surface against documents shaped
//! like the ones real update clients send.

use omaha_protocol::*;

const UPDATE_ENGINE_REQUEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<request protocol="3.0" version="CoreOSUpdateEngine-0.1.0.0" updaterversion="CoreOSUpdateEngine-0.1.0.0" installsource="scheduler" ismachine="1">
    <os version="Chateau" platform="CoreOS" sp="1298.7.0_x86_64"></os>
    <app appid="{e96281a6-d1af-4bde-9a0a-97b76e56dc57}" version="1235.9.0" track="stable" bootid="{3c5a3e0f-6d8a-4b1e-9a4c-1f0e2d3c4b5a}" oem="" machineid="0123456789abcdef" lang="en-US" board="amd64-usr" delta_okay="false">
        <ping active="1" a="-1" r="-1"></ping>
        <updatecheck targetversionprefix=""></updatecheck>
        <event eventtype="3" eventresult="2" previousversion="1235.6.0"></event>
    </app>
</request>
"#;

fn full_request() -> Request {
    Request {
        protocol: PROTOCOL_VERSION.to_owned(),
        version: "CoreOSUpdateEngine-0.1.0.0".to_owned(),
        request_id: "{a2c1c3e1-0000-4000-8000-000000000001}".to_owned(),
        session_id: "{a2c1c3e1-0000-4000-8000-000000000002}".to_owned(),
        install_source: "scheduler".to_owned(),
        is_machine: "1".to_owned(),
        updater_channel: "stable".to_owned(),
        os: Some(Os {
            platform: "CoreOS".to_owned(),
            version: "Chateau".to_owned(),
            sp: "1298.7.0_x86_64".to_owned(),
            arch: "x64".to_owned(),
        }),
        hw: Some(Hw {
            sse2: "1".to_owned(),
            avx: "1".to_owned(),
            phys_memory: "16".to_owned(),
            ..Default::default()
        }),
        apps: vec![
            App {
                app_id: "{e96281a6-d1af-4bde-9a0a-97b76e56dc57}".to_owned(),
                version: "1200.0.0".to_owned(),
                lang: "en-US".to_owned(),
                track: "stable".to_owned(),
                cohort: "1:a:".to_owned(),
                cohort_name: "canary & friends".to_owned(),
                data: vec![Data {
                    name: "install".to_owned(),
                    index: 2,
                }],
                disabled: vec![Disabled {
                    reason: "3".to_owned(),
                }],
                ping: Some(Ping {
                    active: "1".to_owned(),
                    ad: 4021,
                    rd: 4020,
                    ping_freshness: 1_234_567,
                    ..Default::default()
                }),
                update_check: Some(UpdateCheck {
                    target_version_prefix: "1298.".to_owned(),
                    tt_token: "opaque-token".to_owned(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            App {
                app_id: "{f0000000-0000-0000-0000-00000000000f}".to_owned(),
                events: vec![
                    Event {
                        event_type: EventType::UPDATE_DOWNLOAD_FINISHED,
                        event_result: EventResult::SUCCESS,
                        downloaded: 268_813_155,
                        total: 268_813_155,
                        download_time_ms: 5400,
                        ..Default::default()
                    },
                    Event {
                        event_type: EventType::UPDATE_COMPLETE,
                        event_result: EventResult::ERROR,
                        error_code: 12,
                        extra_code1: 7,
                        state_cancelled: CancelledState::INSTALLING,
                        previous_version: "1100.0.0".to_owned(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

fn update_response() -> Response {
    let mut packages = Packages::default();
    packages.add_package("KN5CSajd3mrFF0wXh81W+S1N6zI=", "update.gz", 268_813_155, false);

    let mut actions = Actions::default();
    actions.add_action(
        "postinstall",
        "PX/41xndZL/AGrobIJEmjiih2SNWQql7p34BMyrJq34=",
        false,
        false,
        true,
    );

    Response {
        protocol: PROTOCOL_VERSION.to_owned(),
        server: "update.example.com".to_owned(),
        daystart: DayStart::default(),
        apps: vec![App {
            app_id: "{e96281a6-d1af-4bde-9a0a-97b76e56dc57}".to_owned(),
            status: Some(AppStatus::Ok),
            ping: Some(Ping::acknowledged()),
            update_check: Some(UpdateCheck::available(
                Manifest {
                    version: "1298.7.0".to_owned(),
                    packages,
                    actions,
                },
                Urls::with_url("https://update.example.com/amd64-usr", "1298.7.0"),
            )),
            ..Default::default()
        }],
    }
}

#[test]
fn test_request_roundtrip() {
    let original = full_request();

    let xml = encode(&original).unwrap();
    let decoded: Request = decode(xml.as_bytes()).unwrap();

    assert_eq!(original, decoded);
}

#[test]
fn test_response_roundtrip() {
    let original = update_response();

    let xml = encode(&original).unwrap();
    let decoded = decode_response(xml.as_bytes()).unwrap();

    assert_eq!(original, decoded);
}

#[test]
fn test_pretty_output_decodes_to_same_tree() {
    let original = update_response();

    let compact = encode(&original).unwrap();
    let pretty = encode_with(&original, Indent::Spaces(2)).unwrap();

    assert_ne!(compact, pretty);
    assert!(pretty.contains('\n'));
    assert!(!compact.contains('\n'));
    assert_eq!(
        decode_response(compact.as_bytes()).unwrap(),
        decode_response(pretty.as_bytes()).unwrap()
    );
}

#[test]
fn test_app_with_only_appid_omits_optional_attributes() {
    let request = Request {
        protocol: PROTOCOL_VERSION.to_owned(),
        apps: vec![App::new("{abc}")],
        ..Default::default()
    };

    let xml = encode(&request).unwrap();

    assert!(xml.contains(r#"<app appid="{abc}"/>"#), "got: {}", xml);
    for attr in ["version=", "lang=", "track=", "cohort=", "status=", "<ping", "<updatecheck"] {
        let app = &xml[xml.find("<app").unwrap()..];
        assert!(!app.contains(attr), "unexpected {} in {}", attr, app);
    }
}

#[test]
fn test_always_present_attributes_are_written() {
    let xml = encode(&update_response()).unwrap();

    assert!(xml.contains(r#"protocol="3.0""#));
    assert!(xml.contains(r#"server="update.example.com""#));
    assert!(xml.contains(r#"elapsed_seconds="0""#));
    assert!(xml.contains(r#"elapsed_days="0""#));
    assert!(xml.contains(r#"required="false""#));
    assert!(xml.contains(r#"needsadmin="false""#));
    assert!(xml.contains(r#"IsDelta="false""#));
    assert!(xml.contains(r#"DisablePayloadBackoff="true""#));
    assert!(xml.contains(r#"<updatecheck status="ok">"#));
    assert!(xml.contains(r#"<ping status="ok"/>"#));
    // Empty optional action attributes stay out of the document
    assert!(!xml.contains("MetadataSize"));
    assert!(!xml.contains("deadline"));
}

#[test]
fn test_child_elements_follow_schema_order() {
    let xml = encode(&update_response()).unwrap();

    let position = |needle: &str| xml.find(needle).unwrap_or_else(|| panic!("missing {}", needle));
    assert!(position("<daystart") < position("<app"));
    assert!(position("<ping") < position("<updatecheck"));
    assert!(position("<urls>") < position("<manifest"));
    assert!(position("<packages>") < position("<actions>"));
}

#[test]
fn test_decode_update_engine_request() {
    let request = decode_request(UPDATE_ENGINE_REQUEST.as_bytes()).unwrap();

    assert_eq!(request.protocol, "3.0");
    assert_eq!(request.install_source, "scheduler");
    assert_eq!(request.os.as_ref().map(|os| os.platform.as_str()), Some("CoreOS"));
    assert!(request.hw.is_none());
    assert_eq!(request.apps.len(), 1);

    let app = &request.apps[0];
    assert_eq!(app.app_id, "{e96281a6-d1af-4bde-9a0a-97b76e56dc57}");
    assert_eq!(app.version, "1235.9.0");
    assert_eq!(app.track, "stable");
    assert_eq!(app.status, None);
    assert_eq!(app.ping.as_ref().map(|p| p.active.as_str()), Some("1"));

    let check = app.update_check.as_ref().unwrap();
    assert_eq!(check.status, None);
    assert!(check.target_version_prefix.is_empty());

    assert_eq!(app.events.len(), 1);
    assert_eq!(app.events[0].event_type, EventType::UPDATE_COMPLETE);
    assert_eq!(app.events[0].event_result, EventResult::SUCCESS_REBOOT);
    assert_eq!(app.events[0].previous_version, "1235.6.0");
}

#[test]
fn test_missing_optional_attributes_default() {
    let request =
        decode_request(br#"<request protocol="3.0"><app appid="{14B}"/></request>"#).unwrap();

    let app = &request.apps[0];
    assert!(app.version.is_empty());
    assert!(app.ping.is_none());
    assert!(app.update_check.is_none());
    assert!(app.events.is_empty());
    assert!(request.session_id.is_empty());
}

#[test]
fn test_request_without_apps_decodes() {
    // Emptiness is a decision concern, not a schema one
    let request = decode_request(br#"<request protocol="3.0"></request>"#).unwrap();
    assert!(request.apps.is_empty());
}

#[test]
fn test_repeated_single_children_keep_the_last() {
    let request = decode_request(
        br#"<request protocol="3.0"><app appid="a">
            <ping active="0"/>
            <updatecheck targetversionprefix="1200."/>
            <ping active="1"/>
            <updatecheck targetversionprefix="1298."/>
        </app></request>"#,
    )
    .unwrap();

    let app = &request.apps[0];
    assert_eq!(app.ping.as_ref().map(|p| p.active.as_str()), Some("1"));
    assert_eq!(
        app.update_check.as_ref().map(|c| c.target_version_prefix.as_str()),
        Some("1298.")
    );
}

#[test]
fn test_event_source_url_index_is_always_written() {
    let mut app = App::new("a");
    app.events.push(Event {
        event_type: EventType::UPDATE_COMPLETE,
        ..Default::default()
    });
    let request = Request {
        protocol: "3.0".to_owned(),
        apps: vec![app],
        ..Default::default()
    };

    let xml = encode(&request).unwrap();
    assert!(xml.contains(r#"source_url_index="""#), "{}", xml);
}

#[test]
fn test_malformed_documents_are_rejected() {
    let inputs: [&[u8]; 8] = [
        b"",
        b"not xml at all",
        br#"<request protocol="3.0"><app appid="x">"#,
        br#"<request protocol="3.0"><app appid="x"></request>"#,
        br#"<request><app appid="x"/></request>"#,
        br#"<request protocol="3.0"><app appid="x"/></request><junk"#,
        br#"<request protocol="3.0"><app appid="x"/></request><request protocol="1"/>"#,
        br#"<request protocol="3.0"><app appid="x"/></request>hello"#,
    ];

    for input in inputs {
        let result = decode_request(input);
        assert!(
            matches!(result, Err(ProtocolError::MalformedDocument(_))),
            "accepted {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_unknown_status_is_rejected() {
    let result = decode_response(
        br#"<response protocol="3.0" server="s"><daystart elapsed_seconds="0" elapsed_days="0"/><app appid="a" status="bogus"/></response>"#,
    );
    assert!(matches!(result, Err(ProtocolError::MalformedDocument(_))));
}
