//! End-to-end encoding through a Keyboard session.
//!
//! Runs against a RecordingTransport, so no hardware is needed.

use std::collections::BTreeMap;
use std::sync::Arc;

use regium_keyboard::{
    AnimationCommand, AnimationOption, ColorCommand, Keyboard, KeyDefinition, KeyboardError, Model,
    ParamSpecs, ParamValue, ParameterSpec, Profile, UserParams, ValidityRule,
};
use regium_transport::{
    PrinterConfig, PrinterTransport, RecordingTransport, ReportType, TransportDeviceInfo,
};

fn profile() -> Profile {
    Profile {
        name: "Test Board".into(),
        kb_size: (3, 1),
        models: vec![Model {
            name: "Test Board".into(),
            long_name: "Test Board USB".into(),
            connection_protocols: vec!["USB".into()],
            vid: 0xAAAA,
            pid: 0x0002,
            interface_number: 0,
            usage_page: 1,
            usage: 128,
            has_rgb: true,
            has_anim: true,
            has_custom_anim: false,
        }],
        colors: ColorCommand {
            label: "RGB settings".into(),
            description: "Set RGB values for keys".into(),
            steps: vec![
                [vec![0x0A, 0x07, 0x01], vec![0; 13]].concat(),
                [vec![0x0A, 0x07, 0x02], vec![0; 13]].concat(),
            ],
            report_type: ReportType::Output,
            param_base: vec![0x0A, 0x01, 0x01],
            params: ParamSpecs::new(vec![ParameterSpec::new(
                "sleep",
                [1],
                ValidityRule::RangeOf(1..=5),
            )]),
            padding: 16,
            shared_slots: vec![],
        },
        animations: AnimationCommand {
            base: vec![0x0A, 0x01, 0x01, 0x02, 0x29],
            report_type: ReportType::Feature,
            options: BTreeMap::from([
                (
                    "neon_stream".to_string(),
                    AnimationOption {
                        name: "Neon Stream".into(),
                        selector: vec![0x01, 0x00],
                    },
                ),
                (
                    "sin_wave".to_string(),
                    AnimationOption {
                        name: "Sin Wave".into(),
                        selector: vec![0x04, 0x00],
                    },
                ),
            ]),
            params: ParamSpecs::new(vec![
                ParameterSpec::new("speed", [3], ValidityRule::RangeOf(0..=4)),
                ParameterSpec::new("brightness", [5], ValidityRule::RangeOf(0..=5)),
                ParameterSpec::new("color", [0xFF, 0xFF, 0xFF], ValidityRule::RGB),
                ParameterSpec::new("color_mix", [0], ValidityRule::MemberOf(vec![0, 1])),
            ]),
            padding: 16,
        },
        keys: vec![
            KeyDefinition::new("ESC", [(0, 9), (0, 10), (0, 11)]),
            KeyDefinition::new("1", [(0, 12), (0, 13), (0, 14)]),
            KeyDefinition::new("Q", [(0, 15), (1, 3), (1, 4)]),
        ],
        layout: vec![],
    }
}

fn open() -> (Arc<RecordingTransport>, Keyboard) {
    let recorder = Arc::new(RecordingTransport::new(TransportDeviceInfo {
        vid: 0xAAAA,
        pid: 0x0002,
        ..Default::default()
    }));
    let profile = Arc::new(profile());
    profile.validate().unwrap();
    let kb = Keyboard::new(profile, recorder.clone()).unwrap();
    (recorder, kb)
}

#[test]
fn static_color_reports() {
    let (recorder, mut kb) = open();
    kb.set_color((0x01, 0x02, 0x03)).unwrap();
    kb.set_key_color("ESC", (0xFF, 0x10, 0x20)).unwrap();
    kb.apply_color(None).unwrap();

    let reports = recorder.take();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.report_type == ReportType::Output));

    let step0 = &reports[0].data;
    assert_eq!(step0[9..12], [0xFF, 0x10, 0x20]);
    assert_eq!(step0[12..16], [0x01, 0x02, 0x03, 0x01]);
    assert_eq!(reports[1].data[3..5], [0x02, 0x03]);

    let params = &reports[2].data;
    assert_eq!(params.len(), 16);
    assert_eq!(params[..4], [0x0A, 0x01, 0x01, 0x01]);
    assert!(params[4..].iter().all(|&b| b == 0));
}

#[test]
fn apply_color_with_rgb_and_repeat() {
    let (recorder, mut kb) = open();
    let first = kb.apply_color(Some((9, 8, 7))).unwrap();
    let second = kb.apply_color(None).unwrap();
    assert_eq!(first, second);
    assert_eq!(recorder.reports().len(), 6);
}

#[test]
fn animation_params_in_declared_order() {
    let (recorder, mut kb) = open();
    let mut user = UserParams::new();
    user.insert("color_mix".into(), ParamValue::Single(1));
    user.insert("color".into(), ParamValue::Sequence(vec![0x10, 0x20, 0x30]));
    user.insert("speed".into(), ParamValue::Single(0));

    kb.set_animation("sin_wave", Some(&user)).unwrap();
    assert!(recorder.reports().is_empty());

    let packet = kb.apply_animation().unwrap();
    assert_eq!(packet.len(), 16);
    // Base, selector, then parameters in wire order
    assert_eq!(packet[..5], [0x0A, 0x01, 0x01, 0x02, 0x29]);
    assert_eq!(packet[5..7], [0x04, 0x00]);
    assert_eq!(packet[7..], [0x00, 0x05, 0x10, 0x20, 0x30, 0x01, 0, 0, 0]);
    let reports = recorder.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].report_type, ReportType::Feature);
}

#[test]
fn animation_errors() {
    let (_, mut kb) = open();
    assert!(matches!(
        kb.set_animation("rainbow", None),
        Err(KeyboardError::UnknownAnimation { .. })
    ));

    let mut user = UserParams::new();
    user.insert("sleep".into(), ParamValue::Single(1));
    assert!(matches!(
        kb.set_animation("neon_stream", Some(&user)),
        Err(KeyboardError::UnknownParameter { .. })
    ));

    assert!(matches!(
        kb.apply_animation(),
        Err(KeyboardError::AnimationNotSet)
    ));
}

#[test]
fn printer_passes_reports_through() {
    let recorder = Arc::new(RecordingTransport::new(TransportDeviceInfo {
        vid: 0xAAAA,
        pid: 0x0002,
        ..Default::default()
    }));
    let printer = PrinterTransport::wrap(recorder.clone(), PrinterConfig::default());
    let mut kb = Keyboard::new(Arc::new(profile()), printer).unwrap();
    kb.set_animation("neon_stream", None).unwrap();
    kb.apply_animation().unwrap();
    assert_eq!(recorder.reports()[0].data[5..7], [0x01, 0x00]);
}
