// JSON profile loader
// Load keyboard profiles from JSON files at runtime

use std::collections::BTreeMap;
use std::path::Path;

use regium_keyboard::{
    AnimationCommand, AnimationOption, ColorCommand, Coordinate, Key, KeyDefinition,
    KeyboardError, LayoutCell, Model, ParamSpecs, ParameterSpec, Profile, ValidityRule,
};
use regium_transport::ReportType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile loading errors
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<KeyboardError> for LoadError {
    fn from(e: KeyboardError) -> Self {
        LoadError::Validation(e.to_string())
    }
}

/// Keyboard profile as stored in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonProfile {
    pub name: String,
    /// [columns, rows]
    pub kb_size: (u8, u8),
    pub models: Vec<JsonModel>,
    pub commands: JsonCommands,
    pub present_keys: Vec<JsonKey>,
    #[serde(default)]
    pub layout: Vec<Vec<JsonLayoutCell>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonModel {
    pub name: String,
    pub long_name: String,
    #[serde(default)]
    pub connection_protocols: Vec<String>,
    pub vendor_id: u16,
    pub product_id: u16,
    #[serde(default)]
    pub endpoint: i32,
    pub usage: u16,
    pub usage_page: u16,
    #[serde(default = "default_true")]
    pub has_rgb: bool,
    #[serde(default = "default_true")]
    pub has_anim: bool,
    #[serde(default)]
    pub has_custom_anim: bool,
}

fn default_true() -> bool {
    true
}

fn default_width() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCommands {
    pub colors: JsonColors,
    pub animations: JsonAnimations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonColors {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<Vec<u8>>,
    /// 0x02 feature report, 0x03 output report
    pub report_type: u8,
    pub color_params: JsonColorParams,
    pub padding: usize,
    /// [step, offset] pairs more than one key may write
    #[serde(default)]
    pub shared_slots: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonColorParams {
    pub base: Vec<u8>,
    #[serde(default)]
    pub params: Vec<JsonParam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAnimations {
    pub base: Vec<u8>,
    pub report_type: u8,
    #[serde(default)]
    pub options: BTreeMap<String, JsonAnimationOption>,
    /// Declaration order is wire order
    #[serde(default)]
    pub params: Vec<JsonParam>,
    pub padding: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonAnimationOption {
    pub name: String,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonParam {
    pub name: String,
    pub checks: JsonRule,
    pub default: Vec<u8>,
    #[serde(default)]
    pub choices: Vec<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub increments: Option<u32>,
}

/// `{"range": [lo, hi]}`, `{"memberOf": [..]}` or `{"predicate": "rgb" | "bytes"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JsonRule {
    Range(i64, i64),
    MemberOf(Vec<i64>),
    Predicate(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonKey {
    pub label: String,
    /// Three [step, offset] pairs: red, green, blue
    pub coordinates: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLayoutCell {
    /// null for a gap
    pub label: Option<String>,
    #[serde(default = "default_width")]
    pub width: f32,
}

impl JsonRule {
    fn into_rule(self, param: &str) -> Result<ValidityRule, LoadError> {
        match self {
            JsonRule::Range(lo, hi) if lo <= hi => Ok(ValidityRule::RangeOf(lo..=hi)),
            JsonRule::Range(lo, hi) => Err(LoadError::Validation(format!(
                "empty range [{lo}, {hi}] for parameter {param}"
            ))),
            JsonRule::MemberOf(values) => Ok(ValidityRule::MemberOf(values)),
            JsonRule::Predicate(name) => match name.as_str() {
                "rgb" => Ok(ValidityRule::RGB),
                "bytes" => Ok(ValidityRule::BYTES),
                other => Err(LoadError::Validation(format!(
                    "unknown predicate {other} for parameter {param}"
                ))),
            },
        }
    }
}

impl JsonParam {
    fn into_spec(self) -> Result<ParameterSpec, LoadError> {
        let rule = self.checks.into_rule(&self.name)?;
        let mut spec = ParameterSpec::new(self.name, self.default, rule).with_choices(self.choices);
        if let Some(description) = self.description {
            spec = spec.with_description(description);
        }
        if let Some(unit) = self.unit {
            spec = spec.with_unit(unit, self.increments.unwrap_or(1));
        }
        Ok(spec)
    }
}

fn param_specs(params: Vec<JsonParam>) -> Result<ParamSpecs, LoadError> {
    params.into_iter().map(JsonParam::into_spec).collect()
}

fn report_type(value: u8) -> Result<ReportType, LoadError> {
    ReportType::try_from(value)
        .map_err(|v| LoadError::Validation(format!("unknown report type 0x{v:02x}")))
}

impl JsonProfile {
    /// Load profile from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| LoadError::Io(e.to_string()))?;
        Self::load_from_json(&content)
    }

    /// Load profile from a JSON string
    pub fn load_from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Convert into a validated profile
    pub fn into_profile(self) -> Result<Profile, LoadError> {
        let models = self
            .models
            .into_iter()
            .map(|m| Model {
                name: m.name,
                long_name: m.long_name,
                connection_protocols: m.connection_protocols,
                vid: m.vendor_id,
                pid: m.product_id,
                interface_number: m.endpoint,
                usage_page: m.usage_page,
                usage: m.usage,
                has_rgb: m.has_rgb,
                has_anim: m.has_anim,
                has_custom_anim: m.has_custom_anim,
            })
            .collect();

        let colors = self.commands.colors;
        let colors = ColorCommand {
            label: colors.label,
            description: colors.description,
            steps: colors.steps,
            report_type: report_type(colors.report_type)?,
            param_base: colors.color_params.base,
            params: param_specs(colors.color_params.params)?,
            padding: colors.padding,
            shared_slots: colors
                .shared_slots
                .into_iter()
                .map(Coordinate::from)
                .collect(),
        };

        let anims = self.commands.animations;
        let animations = AnimationCommand {
            base: anims.base,
            report_type: report_type(anims.report_type)?,
            options: anims
                .options
                .into_iter()
                .map(|(id, o)| {
                    let option = AnimationOption {
                        name: o.name,
                        selector: o.value,
                    };
                    (id, option)
                })
                .collect(),
            params: param_specs(anims.params)?,
            padding: anims.padding,
        };

        let keys = self
            .present_keys
            .into_iter()
            .map(|k| {
                let key = Key::from_raw(k.label, &k.coordinates)?;
                Ok(KeyDefinition {
                    label: key.label().to_string(),
                    coordinates: *key.coordinates(),
                })
            })
            .collect::<Result<Vec<_>, KeyboardError>>()?;

        let layout = self
            .layout
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|c| LayoutCell {
                        label: c.label,
                        width: c.width,
                    })
                    .collect()
            })
            .collect();

        let profile = Profile {
            name: self.name,
            kb_size: self.kb_size,
            models,
            colors,
            animations,
            keys,
            layout,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Load and validate a profile from a JSON file
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile, LoadError> {
    JsonProfile::load_from_file(path)?.into_profile()
}
