//! Command parameters: specs, user values and resolution
//!
//! Every command a profile declares (static color, animation) carries an
//! ordered list of [`ParameterSpec`]s. The order is the wire order: resolved
//! values are concatenated into the report in declaration order, whatever order
//! the caller supplied them in.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::KeyboardError;

/// Acceptance rule for a parameter value
#[derive(Clone)]
pub enum ValidityRule {
    /// Custom check over the whole value sequence
    Predicate {
        name: &'static str,
        check: fn(&[i64]) -> bool,
    },
    /// Every element must be one of these
    MemberOf(Vec<i64>),
    /// Every element must be inside this range
    RangeOf(RangeInclusive<i64>),
}

impl ValidityRule {
    /// Exactly three values, each a byte
    pub const RGB: Self = Self::Predicate {
        name: "rgb",
        check: rgb_triplet,
    };

    /// Any number of byte values
    pub const BYTES: Self = Self::Predicate {
        name: "bytes",
        check: all_bytes,
    };

    pub fn accepts(&self, values: &[i64]) -> bool {
        match self {
            Self::Predicate { check, .. } => check(values),
            Self::MemberOf(set) => values.iter().all(|v| set.contains(v)),
            Self::RangeOf(range) => values.iter().all(|v| range.contains(v)),
        }
    }
}

impl fmt::Debug for ValidityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate { name, .. } => f.debug_tuple("Predicate").field(name).finish(),
            Self::MemberOf(set) => f.debug_tuple("MemberOf").field(set).finish(),
            Self::RangeOf(range) => f.debug_tuple("RangeOf").field(range).finish(),
        }
    }
}

impl fmt::Display for ValidityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate { name: "rgb", .. } => write!(f, "three values in 0-255"),
            Self::Predicate { name: "bytes", .. } => write!(f, "values in 0-255"),
            Self::Predicate { name, .. } => write!(f, "values passing the {name} check"),
            Self::MemberOf(set) => {
                let set: Vec<String> = set.iter().map(i64::to_string).collect();
                write!(f, "one of {}", set.join(", "))
            }
            Self::RangeOf(range) => write!(f, "{}-{}", range.start(), range.end()),
        }
    }
}

fn rgb_triplet(values: &[i64]) -> bool {
    values.len() == 3 && all_bytes(values)
}

fn all_bytes(values: &[i64]) -> bool {
    values.iter().all(|v| (0..=255).contains(v))
}

/// One tunable value of a command
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    /// Used when the caller omits the parameter
    pub default: Vec<u8>,
    pub rule: ValidityRule,
    /// Values offered in help output
    pub choices: Vec<i64>,
    pub description: Option<String>,
    /// Display unit and the unit amount one step represents, e.g. 10 minutes
    pub unit: Option<(String, u32)>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, default: impl Into<Vec<u8>>, rule: ValidityRule) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            rule,
            choices: Vec::new(),
            description: None,
            unit: None,
        }
    }

    pub fn with_choices(mut self, choices: impl Into<Vec<i64>>) -> Self {
        self.choices = choices.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>, increments: u32) -> Self {
        self.unit = Some((unit.into(), increments));
        self
    }

    /// Validate a user value and convert it to wire bytes
    pub fn check(&self, values: &[i64]) -> Result<Vec<u8>, KeyboardError> {
        let bytes: Option<Vec<u8>> = values.iter().map(|&v| u8::try_from(v).ok()).collect();
        match bytes {
            Some(bytes) if self.rule.accepts(values) => Ok(bytes),
            _ => Err(KeyboardError::InvalidParameterValue {
                name: self.name.clone(),
                value: values.to_vec(),
                accepted: self.rule.to_string(),
            }),
        }
    }

    /// Whether the declared default passes the rule
    pub fn default_is_valid(&self) -> bool {
        let values: Vec<i64> = self.default.iter().map(|&b| i64::from(b)).collect();
        self.rule.accepts(&values)
    }

    /// One-line help, e.g. `sleep: 0-4 (default 0, x10 minutes)`
    pub fn help(&self) -> String {
        let choices = if self.choices.is_empty() {
            self.rule.to_string()
        } else {
            self.choices
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let default = self
            .default
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut help = format!("{}: {choices} (default {default}", self.name);
        if let Some((unit, increments)) = &self.unit {
            help.push_str(&format!(", x{increments} {unit}"));
        }
        help.push(')');
        if let Some(description) = &self.description {
            help.push_str(&format!(" - {description}"));
        }
        help
    }
}

/// Ordered parameter declarations for one command
#[derive(Debug, Clone, Default)]
pub struct ParamSpecs(Vec<ParameterSpec>);

impl ParamSpecs {
    pub fn new(specs: Vec<ParameterSpec>) -> Self {
        Self(specs)
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.0.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|s| s.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every parameter at its default, in declaration order
    pub fn defaults(&self) -> ResolvedParameters {
        ResolvedParameters(
            self.0
                .iter()
                .map(|s| (s.name.clone(), s.default.clone()))
                .collect(),
        )
    }
}

impl FromIterator<ParameterSpec> for ParamSpecs {
    fn from_iter<T: IntoIterator<Item = ParameterSpec>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A caller-supplied parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Shorthand for a one-element sequence
    Single(i64),
    Sequence(Vec<i64>),
}

impl ParamValue {
    pub fn as_slice(&self) -> &[i64] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Sequence(values) => values,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(values: Vec<i64>) -> Self {
        Self::Sequence(values)
    }
}

/// Caller-supplied values by parameter name
pub type UserParams = BTreeMap<String, ParamValue>;

/// Wire bytes for every declared parameter, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedParameters(Vec<(String, Vec<u8>)>);

impl ResolvedParameters {
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All values concatenated in order
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|(_, v)| v.iter().copied()).collect()
    }
}

/// Fill in defaults and validate user values against the specs
///
/// With no user values every parameter takes its default. Names the specs do
/// not declare are rejected before anything else is checked.
pub fn resolve(
    user: Option<&UserParams>,
    specs: &ParamSpecs,
) -> Result<ResolvedParameters, KeyboardError> {
    let Some(user) = user else {
        return Ok(specs.defaults());
    };

    if let Some(name) = user.keys().find(|name| specs.get(name).is_none()) {
        return Err(KeyboardError::UnknownParameter {
            name: name.clone(),
            expected: specs.names(),
        });
    }

    let mut resolved = Vec::with_capacity(specs.len());
    for spec in specs.iter() {
        let bytes = match user.get(&spec.name) {
            Some(value) => spec.check(value.as_slice())?,
            None => spec.default.clone(),
        };
        resolved.push((spec.name.clone(), bytes));
    }
    Ok(ResolvedParameters(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> ParamSpecs {
        ParamSpecs::new(vec![
            ParameterSpec::new("speed", [3], ValidityRule::RangeOf(0..=4)),
            ParameterSpec::new("color", [0xFF, 0xFF, 0xFF], ValidityRule::RGB),
            ParameterSpec::new("color_mix", [0], ValidityRule::MemberOf(vec![0, 1])),
        ])
    }

    fn user(values: &[(&str, ParamValue)]) -> UserParams {
        values
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_without_user_values() {
        let resolved = resolve(None, &specs()).unwrap();
        assert_eq!(resolved.names(), vec!["speed", "color", "color_mix"]);
        assert_eq!(resolved.get("speed"), Some(&[3u8][..]));
        assert_eq!(resolved.get("color"), Some(&[0xFFu8, 0xFF, 0xFF][..]));
        assert_eq!(resolved.to_bytes(), vec![3, 0xFF, 0xFF, 0xFF, 0]);
    }

    #[test]
    fn test_empty_map_equals_defaults() {
        let resolved = resolve(Some(&UserParams::new()), &specs()).unwrap();
        assert_eq!(resolved, specs().defaults());
    }

    #[test]
    fn test_partial_values_keep_declaration_order() {
        let values = user(&[
            ("color_mix", ParamValue::Single(1)),
            ("color", ParamValue::Sequence(vec![1, 2, 3])),
        ]);
        let resolved = resolve(Some(&values), &specs()).unwrap();
        assert_eq!(resolved.to_bytes(), vec![3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_single_normalized() {
        let single = user(&[("speed", ParamValue::Single(2))]);
        let sequence = user(&[("speed", ParamValue::Sequence(vec![2]))]);
        let a = resolve(Some(&single), &specs()).unwrap();
        let b = resolve(Some(&sequence), &specs()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("speed"), Some(&[2u8][..]));
    }

    #[test]
    fn test_accepted_values_round_trip() {
        for speed in 0..=4i64 {
            let values = user(&[("speed", ParamValue::Single(speed))]);
            let resolved = resolve(Some(&values), &specs()).unwrap();
            assert_eq!(resolved.get("speed"), Some(&[speed as u8][..]));
        }
    }

    #[test]
    fn test_rejected_values() {
        let cases = [
            ("speed", ParamValue::Single(5)),
            ("speed", ParamValue::Single(-1)),
            ("speed", ParamValue::Sequence(vec![1, 9])),
            ("color", ParamValue::Sequence(vec![1, 2])),
            ("color", ParamValue::Sequence(vec![1, 2, 256])),
            ("color_mix", ParamValue::Single(2)),
        ];
        for (name, value) in cases {
            let err = resolve(Some(&user(&[(name, value.clone())])), &specs()).unwrap_err();
            match err {
                KeyboardError::InvalidParameterValue { name: n, value: v, .. } => {
                    assert_eq!(n, name);
                    assert_eq!(v, value.as_slice());
                }
                other => panic!("expected InvalidParameterValue, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let values = user(&[("unknown_name", ParamValue::Single(1))]);
        assert!(matches!(
            resolve(Some(&values), &specs()),
            Err(KeyboardError::UnknownParameter { name, .. }) if name == "unknown_name"
        ));
    }

    #[test]
    fn test_unknown_reported_before_invalid() {
        let values = user(&[
            ("speed", ParamValue::Single(99)),
            ("zzz", ParamValue::Single(1)),
        ]);
        assert!(matches!(
            resolve(Some(&values), &specs()),
            Err(KeyboardError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn test_bytes_predicate_rejects_wide_values() {
        let specs = ParamSpecs::new(vec![ParameterSpec::new(
            "range",
            [0],
            ValidityRule::RangeOf(0..=1000),
        )]);
        let values = user(&[("range", ParamValue::Single(300))]);
        assert!(matches!(
            resolve(Some(&values), &specs),
            Err(KeyboardError::InvalidParameterValue { .. })
        ));
        assert!(ValidityRule::BYTES.accepts(&[0, 255, 7]));
        assert!(!ValidityRule::BYTES.accepts(&[256]));
    }

    #[test]
    fn test_default_validity() {
        assert!(specs().iter().all(ParameterSpec::default_is_valid));
        let bad = ParameterSpec::new("speed", [9], ValidityRule::RangeOf(0..=4));
        assert!(!bad.default_is_valid());
    }

    #[test]
    fn test_help_text() {
        let spec = ParameterSpec::new("sleep", [0], ValidityRule::RangeOf(0..=4))
            .with_choices([0, 1, 2, 3, 4])
            .with_unit("minutes", 10);
        assert_eq!(spec.help(), "sleep: 0, 1, 2, 3, 4 (default 0, x10 minutes)");

        let spec = ParameterSpec::new("color_mix", [0], ValidityRule::MemberOf(vec![0, 1]));
        assert_eq!(spec.help(), "color_mix: one of 0, 1 (default 0)");
    }
}
