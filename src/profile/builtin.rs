// Builtin keyboard profiles
// Hardcoded profiles for known keyboards (no external JSON needed)

use std::collections::BTreeMap;

use regium_keyboard::{
    AnimationCommand, AnimationOption, ColorCommand, KeyDefinition, LayoutCell, Model,
    ParamSpecs, ParameterSpec, Profile, ValidityRule,
};
use regium_transport::ReportType;

/// Royal Kludge USB vendor ID
pub const VENDOR_ID_RK: u16 = 0x258A;

/// RK68 (BT and USB) product ID
pub const PRODUCT_ID_RK68: u16 = 0x005E;

/// Length of every RK68 report
const RK68_REPORT_LEN: usize = 65;

/// RK68 key table: label, then (step, offset) for red, green and blue.
/// Some keys straddle two step reports.
const RK68_KEYS: &[(&str, [(usize, usize); 3])] = &[
    ("ESC", [(0, 9), (0, 10), (0, 11)]),
    ("TAB", [(0, 12), (0, 13), (0, 14)]),
    ("CPS", [(0, 15), (0, 16), (0, 17)]),
    ("LSHFT", [(0, 18), (0, 19), (0, 20)]),
    ("LCTRL", [(0, 21), (0, 22), (0, 23)]),
    ("1", [(0, 27), (0, 28), (0, 29)]),
    ("Q", [(0, 30), (0, 31), (0, 32)]),
    ("A", [(0, 33), (0, 34), (0, 35)]),
    ("Z", [(0, 36), (0, 37), (0, 38)]),
    ("SPR", [(0, 39), (0, 40), (0, 41)]),
    ("2", [(0, 45), (0, 46), (0, 47)]),
    ("W", [(0, 48), (0, 49), (0, 50)]),
    ("S", [(0, 51), (0, 52), (0, 53)]),
    ("X", [(0, 54), (0, 55), (0, 56)]),
    ("LALT", [(0, 57), (0, 58), (0, 59)]),
    ("3", [(0, 63), (0, 64), (1, 3)]),
    ("E", [(1, 4), (1, 5), (1, 6)]),
    ("D", [(1, 7), (1, 8), (1, 9)]),
    ("C", [(1, 10), (1, 11), (1, 12)]),
    ("4", [(1, 19), (1, 20), (1, 21)]),
    ("R", [(1, 22), (1, 23), (1, 24)]),
    ("F", [(1, 25), (1, 26), (1, 27)]),
    ("V", [(1, 28), (1, 29), (1, 30)]),
    ("5", [(1, 37), (1, 38), (1, 39)]),
    ("T", [(1, 40), (1, 41), (1, 42)]),
    ("G", [(1, 43), (1, 44), (1, 45)]),
    ("B", [(1, 46), (1, 47), (1, 48)]),
    ("SPC", [(1, 49), (1, 50), (1, 51)]),
    ("6", [(1, 55), (1, 56), (1, 57)]),
    ("Y", [(1, 58), (1, 59), (1, 60)]),
    ("H", [(1, 61), (1, 62), (1, 63)]),
    ("N", [(1, 64), (2, 3), (2, 4)]),
    ("7", [(2, 11), (2, 12), (2, 13)]),
    ("U", [(2, 14), (2, 15), (2, 16)]),
    ("J", [(2, 17), (2, 18), (2, 19)]),
    ("M", [(2, 20), (2, 21), (2, 22)]),
    ("8", [(2, 29), (2, 30), (2, 31)]),
    ("I", [(2, 32), (2, 33), (2, 34)]),
    ("K", [(2, 35), (2, 36), (2, 37)]),
    (",", [(2, 38), (2, 39), (2, 40)]),
    ("RALT", [(2, 41), (2, 42), (2, 43)]),
    ("9", [(2, 47), (2, 48), (2, 49)]),
    ("O", [(2, 50), (2, 51), (2, 52)]),
    ("L", [(2, 53), (2, 54), (2, 55)]),
    (".", [(2, 56), (2, 57), (2, 58)]),
    ("FN", [(2, 59), (2, 60), (2, 61)]),
    ("0", [(3, 3), (3, 4), (3, 5)]),
    ("P", [(3, 6), (3, 7), (3, 8)]),
    (";", [(3, 9), (3, 10), (3, 11)]),
    ("/", [(3, 12), (3, 13), (3, 14)]),
    ("RCTRL", [(3, 15), (3, 16), (3, 17)]),
    ("-", [(3, 21), (3, 22), (3, 23)]),
    ("[", [(3, 24), (3, 25), (3, 26)]),
    ("'", [(3, 27), (3, 28), (3, 29)]),
    ("RSHFT", [(3, 30), (3, 31), (3, 32)]),
    ("=", [(3, 39), (3, 40), (3, 41)]),
    ("]", [(3, 42), (3, 43), (3, 44)]),
    ("BCK", [(3, 57), (3, 58), (3, 59)]),
    ("\\", [(3, 60), (3, 61), (3, 62)]),
    ("ENTR", [(3, 63), (3, 64), (4, 3)]),
    ("LEAR", [(4, 7), (4, 8), (4, 9)]),
    ("UPAR", [(4, 22), (4, 23), (4, 24)]),
    ("DOAR", [(4, 25), (4, 26), (4, 27)]),
    ("`", [(4, 31), (4, 32), (4, 33)]),
    ("DEL", [(4, 34), (4, 35), (4, 36)]),
    ("PGUP", [(4, 37), (4, 38), (4, 39)]),
    ("PGDWN", [(4, 40), (4, 41), (4, 42)]),
    ("RIAR", [(4, 43), (4, 44), (4, 45)]),
];

/// RK68 physical rows: label and width in key units
const RK68_LAYOUT: &[&[(&str, f32)]] = &[
    &[
        ("ESC", 1.0),
        ("1", 1.0),
        ("2", 1.0),
        ("3", 1.0),
        ("4", 1.0),
        ("5", 1.0),
        ("6", 1.0),
        ("7", 1.0),
        ("8", 1.0),
        ("9", 1.0),
        ("0", 1.0),
        ("-", 1.0),
        ("=", 1.0),
        ("BCK", 2.0),
        ("`", 1.0),
    ],
    &[
        ("TAB", 1.5),
        ("Q", 1.0),
        ("W", 1.0),
        ("E", 1.0),
        ("R", 1.0),
        ("T", 1.0),
        ("Y", 1.0),
        ("U", 1.0),
        ("I", 1.0),
        ("O", 1.0),
        ("P", 1.0),
        ("[", 1.0),
        ("]", 1.0),
        ("\\", 1.5),
        ("DEL", 1.0),
    ],
    &[
        ("CPS", 1.75),
        ("A", 1.0),
        ("S", 1.0),
        ("D", 1.0),
        ("F", 1.0),
        ("G", 1.0),
        ("H", 1.0),
        ("J", 1.0),
        ("K", 1.0),
        ("L", 1.0),
        (";", 1.0),
        ("'", 1.0),
        ("ENTR", 2.25),
        ("PGUP", 1.0),
    ],
    &[
        ("LSHFT", 2.25),
        ("Z", 1.0),
        ("X", 1.0),
        ("C", 1.0),
        ("V", 1.0),
        ("B", 1.0),
        ("N", 1.0),
        ("M", 1.0),
        (",", 1.0),
        (".", 1.0),
        ("/", 1.0),
        ("RSHFT", 1.75),
        ("UPAR", 1.0),
        ("PGDWN", 1.0),
    ],
    &[
        ("LCTRL", 1.25),
        ("SPR", 1.25),
        ("LALT", 1.25),
        ("SPC", 6.25),
        ("RALT", 1.0),
        ("FN", 1.0),
        ("RCTRL", 1.0),
        ("LEAR", 1.0),
        ("DOAR", 1.0),
        ("RIAR", 1.0),
    ],
];

/// Zero-filled report starting with `prefix`
fn report(prefix: &[u8]) -> Vec<u8> {
    let mut buf = prefix.to_vec();
    buf.resize(RK68_REPORT_LEN, 0x00);
    buf
}

/// Royal Kludge RK68
pub fn rk68() -> Profile {
    let mut steps = vec![report(&[0x0A, 0x07, 0x01, 0x03, 0x7E, 0x01])];
    steps.extend((0x02..=0x07).map(|n| report(&[0x0A, 0x07, n])));

    Profile {
        name: "Royal Kludge RK68".into(),
        kb_size: (16, 5),
        models: vec![Model {
            name: "Royal Kludge RK68".into(),
            long_name: "Royal Kludge RK68 BT and USB".into(),
            connection_protocols: vec!["USB".into(), "BT".into()],
            vid: VENDOR_ID_RK,
            pid: PRODUCT_ID_RK68,
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
            steps,
            report_type: ReportType::Feature,
            param_base: vec![
                0x0A, 0x01, 0x01, 0x02, 0x29, 0x0E, 0x00, 0x04, 0x05, 0x00, 0xFF, 0x00,
            ],
            params: ParamSpecs::new(vec![ParameterSpec::new(
                "sleep",
                [0x01],
                ValidityRule::RangeOf(1..=5),
            )
            .with_choices([1, 2, 3, 4, 5])]),
            padding: RK68_REPORT_LEN,
            shared_slots: Vec::new(),
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
            // Wire order
            params: ParamSpecs::new(vec![
                ParameterSpec::new("speed", [0x03], ValidityRule::RangeOf(0..=4))
                    .with_choices([0, 1, 2, 3, 4]),
                ParameterSpec::new("brightness", [0x05], ValidityRule::RangeOf(0..=5))
                    .with_choices([0, 1, 2, 3, 4, 5]),
                ParameterSpec::new("color", [0xFF, 0xFF, 0xFF], ValidityRule::RGB)
                    .with_description("red, green and blue, 0-255 each"),
                ParameterSpec::new("color_mix", [0x00], ValidityRule::MemberOf(vec![0, 1]))
                    .with_choices([0, 1]),
                ParameterSpec::new("sleep", [0x00], ValidityRule::RangeOf(0..=4))
                    .with_choices([0, 1, 2, 3, 4])
                    .with_unit("minutes", 10),
            ]),
            padding: RK68_REPORT_LEN,
        },
        keys: RK68_KEYS
            .iter()
            .map(|&(label, coordinates)| KeyDefinition::new(label, coordinates))
            .collect(),
        layout: RK68_LAYOUT
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&(label, width)| LayoutCell {
                        label: Some(label.to_string()),
                        width,
                    })
                    .collect()
            })
            .collect(),
    }
}

/// Every compiled-in profile
pub fn all() -> Vec<Profile> {
    vec![rk68()]
}
