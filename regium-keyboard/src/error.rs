//! Keyboard interface error types

use regium_transport::TransportError;
use thiserror::Error;

/// Errors from encoding and applying keyboard commands
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A color component outside 0-255
    #[error("Invalid color {values:?}: every component must be in 0-255")]
    InvalidColor { values: Vec<i64> },

    /// Coordinate table is not three (step, offset) pairs
    #[error("Invalid coordinates for key {label}: {reason}")]
    InvalidIndexShape { label: String, reason: String },

    /// Parameter name not declared for the command
    #[error("Unknown parameter: {name} (expected one of: {})", .expected.join(", "))]
    UnknownParameter { name: String, expected: Vec<String> },

    /// Parameter value rejected by its rule
    #[error("Invalid value {value:?} for parameter {name}, accepted: {accepted}")]
    InvalidParameterValue {
        name: String,
        value: Vec<i64>,
        accepted: String,
    },

    /// Animation name not in the profile's table
    #[error("Unknown animation: {name} (available: {})", .available.join(", "))]
    UnknownAnimation { name: String, available: Vec<String> },

    /// Key coordinate outside the color step templates
    #[error("Key {label} addresses step {step} offset {offset}, outside the color templates")]
    IndexOutOfRange {
        label: String,
        step: usize,
        offset: usize,
    },

    /// Animation buffer does not fit the report
    #[error("Animation buffer is {len} bytes, longer than the {max} byte report")]
    AnimationTooLong { len: usize, max: usize },

    /// Color parameter buffer does not fit the report
    #[error("Color parameter buffer is {len} bytes, longer than the {max} byte report")]
    ColorParamsTooLong { len: usize, max: usize },

    /// Key label not present on this keyboard
    #[error("The {key} key was not found on {keyboard}")]
    KeyNotFound { keyboard: String, key: String },

    /// apply_animation called before set_animation
    #[error("No animation has been set")]
    AnimationNotSet,

    /// Feature not supported by this device
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Two keys write the same slot without the profile declaring it shared
    #[error("Keys {first} and {second} both address step {step} offset {offset}")]
    AliasedCoordinate {
        first: String,
        second: String,
        step: usize,
        offset: usize,
    },

    /// Profile data is internally inconsistent
    #[error("Invalid profile {profile}: {reason}")]
    InvalidProfile { profile: String, reason: String },
}
