//! Keyboard profile data model
//!
//! A [`Profile`] describes one keyboard family: which USB models it covers,
//! the report templates for each command, the parameters those commands take
//! and where every key's LED bytes live. Profiles are plain immutable values;
//! they are built once (compiled in or loaded from JSON) and shared behind an
//! `Arc`.

use std::collections::{BTreeMap, HashMap, HashSet};

use regium_transport::{DeviceMatch, ReportType};

use crate::error::KeyboardError;
use crate::key::{Coordinate, Key};
use crate::params::ParamSpecs;

/// One USB model of a keyboard family
#[derive(Debug, Clone)]
pub struct Model {
    /// Short name, e.g. "Royal Kludge RK68"
    pub name: String,
    /// Edition and connection specific name
    pub long_name: String,
    /// "USB", "BT", "2.4GHz" ...
    pub connection_protocols: Vec<String>,
    pub vid: u16,
    pub pid: u16,
    pub interface_number: i32,
    pub usage_page: u16,
    pub usage: u16,
    pub has_rgb: bool,
    pub has_anim: bool,
    pub has_custom_anim: bool,
}

impl Model {
    /// HID collection this model is driven through
    pub fn device_match(&self) -> DeviceMatch {
        DeviceMatch::new(self.vid, self.pid, self.usage_page, self.usage)
    }
}

/// Static per-key color command
#[derive(Debug, Clone)]
pub struct ColorCommand {
    pub label: String,
    pub description: String,
    /// Blank step reports; key channel bytes are written into copies
    pub steps: Vec<Vec<u8>>,
    pub report_type: ReportType,
    /// Prefix of the trailing parameter report
    pub param_base: Vec<u8>,
    pub params: ParamSpecs,
    /// Length of the parameter report
    pub padding: usize,
    /// Slots more than one key may write (e.g. legend and underglow sharing)
    pub shared_slots: Vec<Coordinate>,
}

/// A built-in animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationOption {
    /// Display name, e.g. "Neon Stream"
    pub name: String,
    /// Selector bytes following the command base
    pub selector: Vec<u8>,
}

/// Built-in animation command
#[derive(Debug, Clone)]
pub struct AnimationCommand {
    pub base: Vec<u8>,
    pub report_type: ReportType,
    /// Animation id (e.g. "neon_stream") to option
    pub options: BTreeMap<String, AnimationOption>,
    pub params: ParamSpecs,
    pub padding: usize,
}

impl AnimationCommand {
    /// Look up an animation by id
    pub fn option(&self, name: &str) -> Result<&AnimationOption, KeyboardError> {
        self.options
            .get(name)
            .ok_or_else(|| KeyboardError::UnknownAnimation {
                name: name.to_string(),
                available: self.options.keys().cloned().collect(),
            })
    }
}

/// Key table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub label: String,
    /// Red, green, blue
    pub coordinates: [Coordinate; 3],
}

impl KeyDefinition {
    pub fn new(label: impl Into<String>, coordinates: [(usize, usize); 3]) -> Self {
        Self {
            label: label.into(),
            coordinates: coordinates.map(Coordinate::from),
        }
    }
}

/// One cell of a layout row: a key (or a gap when `label` is None) and its width in units
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCell {
    pub label: Option<String>,
    pub width: f32,
}

/// Keyboard family description
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    /// Columns x rows
    pub kb_size: (u8, u8),
    pub models: Vec<Model>,
    pub colors: ColorCommand,
    pub animations: AnimationCommand,
    pub keys: Vec<KeyDefinition>,
    /// Physical rows, top to bottom
    pub layout: Vec<Vec<LayoutCell>>,
}

impl Profile {
    /// Find the model with the given USB IDs
    pub fn model(&self, vid: u16, pid: u16) -> Option<&Model> {
        self.models.iter().find(|m| m.vid == vid && m.pid == pid)
    }

    /// Fresh key table with every key black
    pub fn instantiate_keys(&self) -> BTreeMap<String, Key> {
        self.keys
            .iter()
            .map(|def| (def.label.clone(), Key::new(def.label.clone(), def.coordinates)))
            .collect()
    }

    fn invalid(&self, reason: impl Into<String>) -> KeyboardError {
        KeyboardError::InvalidProfile {
            profile: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Check the profile is internally consistent
    ///
    /// Rejects coordinates outside the step templates, slots written by two
    /// keys unless listed in `shared_slots`, defaults that fail their own
    /// rules and fixed report parts that already exceed the padding.
    pub fn validate(&self) -> Result<(), KeyboardError> {
        if self.models.is_empty() {
            return Err(self.invalid("no models declared"));
        }

        let mut labels = HashSet::new();
        let mut owners: HashMap<Coordinate, &str> = HashMap::new();
        let shared: HashSet<&Coordinate> = self.colors.shared_slots.iter().collect();

        for def in &self.keys {
            if !labels.insert(def.label.as_str()) {
                return Err(self.invalid(format!("duplicate key label {}", def.label)));
            }

            for coord in &def.coordinates {
                let in_range = self
                    .colors
                    .steps
                    .get(coord.step)
                    .is_some_and(|step| coord.offset < step.len());
                if !in_range {
                    return Err(KeyboardError::IndexOutOfRange {
                        label: def.label.clone(),
                        step: coord.step,
                        offset: coord.offset,
                    });
                }

                if let Some(first) = owners.insert(*coord, &def.label) {
                    if !shared.contains(coord) {
                        return Err(KeyboardError::AliasedCoordinate {
                            first: first.to_string(),
                            second: def.label.clone(),
                            step: coord.step,
                            offset: coord.offset,
                        });
                    }
                }
            }
        }

        for (command, specs) in [
            ("color", &self.colors.params),
            ("animation", &self.animations.params),
        ] {
            let mut names = HashSet::new();
            if let Some(spec) = specs.iter().find(|s| !names.insert(s.name.as_str())) {
                return Err(self.invalid(format!(
                    "{command} parameter {} declared twice",
                    spec.name
                )));
            }
            if let Some(spec) = specs.iter().find(|s| !s.default_is_valid()) {
                return Err(self.invalid(format!(
                    "default {:?} of {command} parameter {} fails its rule",
                    spec.default, spec.name
                )));
            }
        }

        let color_len =
            self.colors.param_base.len() + self.colors.params.defaults().to_bytes().len();
        if color_len > self.colors.padding {
            return Err(KeyboardError::ColorParamsTooLong {
                len: color_len,
                max: self.colors.padding,
            });
        }

        let selector_len = self
            .animations
            .options
            .values()
            .map(|o| o.selector.len())
            .max()
            .unwrap_or(0);
        let anim_len = self.animations.base.len()
            + selector_len
            + self.animations.params.defaults().to_bytes().len();
        if anim_len > self.animations.padding {
            return Err(KeyboardError::AnimationTooLong {
                len: anim_len,
                max: self.animations.padding,
            });
        }

        for cell in self.layout.iter().flatten() {
            if let Some(label) = &cell.label {
                if !labels.contains(label.as_str()) {
                    return Err(self.invalid(format!("layout references unknown key {label}")));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::params::{ParameterSpec, ValidityRule};

    /// Small two-step profile used across the crate's tests
    pub(crate) fn tiny_profile() -> Profile {
        Profile {
            name: "Tiny".into(),
            kb_size: (2, 1),
            models: vec![Model {
                name: "Tiny".into(),
                long_name: "Tiny USB".into(),
                connection_protocols: vec!["USB".into()],
                vid: 0x1234,
                pid: 0x0001,
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
                    vec![0x0A, 0x07, 0x01, 0, 0, 0, 0],
                    vec![0x0A, 0x07, 0x02, 0, 0, 0, 0],
                ],
                report_type: ReportType::Feature,
                param_base: vec![0x0A, 0x01],
                params: ParamSpecs::new(vec![ParameterSpec::new(
                    "sleep",
                    [1],
                    ValidityRule::RangeOf(1..=5),
                )]),
                padding: 8,
                shared_slots: vec![],
            },
            animations: AnimationCommand {
                base: vec![0x0A, 0x01],
                report_type: ReportType::Feature,
                options: BTreeMap::from([(
                    "wave".to_string(),
                    AnimationOption {
                        name: "Wave".into(),
                        selector: vec![0x04, 0x00],
                    },
                )]),
                params: ParamSpecs::new(vec![
                    ParameterSpec::new("speed", [3], ValidityRule::RangeOf(0..=4)),
                    ParameterSpec::new("color", [0xFF, 0xFF, 0xFF], ValidityRule::RGB),
                ]),
                padding: 10,
            },
            keys: vec![
                KeyDefinition::new("A", [(0, 3), (0, 4), (0, 5)]),
                KeyDefinition::new("B", [(0, 6), (1, 3), (1, 4)]),
            ],
            layout: vec![vec![
                LayoutCell {
                    label: Some("A".into()),
                    width: 1.0,
                },
                LayoutCell {
                    label: Some("B".into()),
                    width: 1.0,
                },
            ]],
        }
    }

    #[test]
    fn test_tiny_profile_valid() {
        tiny_profile().validate().unwrap();
    }

    #[test]
    fn test_model_lookup() {
        let profile = tiny_profile();
        assert!(profile.model(0x1234, 0x0001).is_some());
        assert!(profile.model(0x1234, 0x0002).is_none());
        assert_eq!(
            profile.models[0].device_match(),
            DeviceMatch::new(0x1234, 0x0001, 1, 128)
        );
    }

    #[test]
    fn test_unknown_animation_lists_available() {
        let profile = tiny_profile();
        match profile.animations.option("neon") {
            Err(KeyboardError::UnknownAnimation { name, available }) => {
                assert_eq!(name, "neon");
                assert_eq!(available, vec!["wave".to_string()]);
            }
            other => panic!("expected UnknownAnimation, got {other:?}"),
        }
    }

    #[test]
    fn test_aliasing_rejected_unless_shared() {
        let mut profile = tiny_profile();
        profile.keys[1].coordinates[0] = Coordinate::new(0, 5);
        assert!(matches!(
            profile.validate(),
            Err(KeyboardError::AliasedCoordinate { step: 0, offset: 5, .. })
        ));

        profile.colors.shared_slots.push(Coordinate::new(0, 5));
        profile.validate().unwrap();
    }

    #[test]
    fn test_out_of_range_key_rejected() {
        let mut profile = tiny_profile();
        profile.keys[0].coordinates[2] = Coordinate::new(2, 0);
        assert!(matches!(
            profile.validate(),
            Err(KeyboardError::IndexOutOfRange { step: 2, .. })
        ));
    }

    #[test]
    fn test_bad_default_rejected() {
        let mut profile = tiny_profile();
        profile.animations.params = ParamSpecs::new(vec![ParameterSpec::new(
            "speed",
            [9],
            ValidityRule::RangeOf(0..=4),
        )]);
        assert!(matches!(
            profile.validate(),
            Err(KeyboardError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_fixed_parts_exceed_padding() {
        let mut profile = tiny_profile();
        profile.animations.padding = 6;
        assert!(matches!(
            profile.validate(),
            Err(KeyboardError::AnimationTooLong { len: 8, max: 6 })
        ));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut profile = tiny_profile();
        profile.keys[1].label = "A".into();
        assert!(matches!(
            profile.validate(),
            Err(KeyboardError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let mut profile = tiny_profile();
        profile.animations.params = ParamSpecs::new(vec![
            ParameterSpec::new("speed", [3], ValidityRule::RangeOf(0..=4)),
            ParameterSpec::new("speed", [1], ValidityRule::RangeOf(0..=4)),
        ]);
        match profile.validate() {
            Err(KeyboardError::InvalidProfile { reason, .. }) => {
                assert!(reason.contains("animation parameter speed"));
            }
            other => panic!("expected InvalidProfile, got {other:?}"),
        }

        let mut profile = tiny_profile();
        profile.colors.params = ParamSpecs::new(vec![
            ParameterSpec::new("sleep", [1], ValidityRule::RangeOf(1..=5)),
            ParameterSpec::new("sleep", [2], ValidityRule::RangeOf(1..=5)),
        ]);
        assert!(matches!(
            profile.validate(),
            Err(KeyboardError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_layout_unknown_key_rejected() {
        let mut profile = tiny_profile();
        profile.layout[0][0].label = Some("ZZ".into());
        match profile.validate() {
            Err(KeyboardError::InvalidProfile { reason, .. }) => {
                assert!(reason.contains("ZZ"));
            }
            other => panic!("expected InvalidProfile, got {other:?}"),
        }

        // Gaps carry no label
        let mut profile = tiny_profile();
        profile.layout[0][0].label = None;
        profile.validate().unwrap();
    }
}
