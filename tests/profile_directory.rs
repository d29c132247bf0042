//! Loading extra JSON profiles next to the builtin ones

use std::fs;

use regium::devices::{open_dry_run, simulated_keyboards};
use regium::profile::ProfileRegistry;
use regium::udev::rules_text;
use regium_transport::{PrinterConfig, ReportType};

const MINI_JSON: &str = r#"{
    "name": "Mini Pad",
    "kbSize": [2, 1],
    "models": [{
        "name": "Mini Pad",
        "longName": "Mini Pad USB",
        "connectionProtocols": ["USB"],
        "vendorId": 4660,
        "productId": 22136,
        "usage": 1,
        "usagePage": 65280
    }],
    "commands": {
        "colors": {
            "steps": [[7, 1, 0, 0, 0, 0, 0, 0]],
            "reportType": 3,
            "colorParams": {"base": [7, 2], "params": []},
            "padding": 8
        },
        "animations": {
            "base": [7, 3],
            "reportType": 3,
            "options": {"breathe": {"name": "Breathe", "value": [2]}},
            "params": [
                {"name": "speed", "checks": {"range": [0, 2]}, "default": [1]}
            ],
            "padding": 8
        }
    },
    "presentKeys": [
        {"label": "K1", "coordinates": [[0, 2], [0, 3], [0, 4]]},
        {"label": "K2", "coordinates": [[0, 5], [0, 6], [0, 7]]}
    ]
}"#;

#[test]
fn directory_profiles_join_the_registry() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("mini.json"), MINI_JSON).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut registry = ProfileRegistry::with_builtins();
    assert_eq!(registry.load_from_directory(dir.path()).unwrap(), 1);
    assert_eq!(registry.len(), 2);
    assert!(registry.has_vid_pid(0x1234, 0x5678));

    let rules = rules_text(&registry);
    assert!(rules.contains("# Rules for device Mini Pad. Mini Pad USB\n"));
    assert!(rules.contains("ATTRS{idVendor}==\"1234\", ATTRS{idProduct}==\"5678\""));

    let simulated = simulated_keyboards(&registry);
    let names: Vec<_> = simulated.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["Mini Pad", "Royal Kludge RK68"]);

    let (mut keyboard, recorder) = open_dry_run(&simulated[0], PrinterConfig::default()).unwrap();
    keyboard.apply_color(Some((1, 2, 3))).unwrap();
    let reports = recorder.take();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].report_type, ReportType::Output);
    assert_eq!(reports[0].data, vec![7, 1, 1, 2, 3, 1, 2, 3]);
    assert_eq!(reports[1].data, vec![7, 2, 0, 0, 0, 0, 0, 0]);

    keyboard.set_animation("breathe", None).unwrap();
    assert_eq!(keyboard.apply_animation().unwrap(), vec![7, 3, 2, 1, 0, 0, 0, 0]);
}
