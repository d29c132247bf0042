//! Profile-driven RGB command encoder for Regium keyboards
//!
//! This crate turns a desired lighting state (per-key static colors, or a
//! built-in animation with parameters) into the exact reports a keyboard model
//! expects, using the model's [`Profile`]. Encoding is pure; [`Keyboard`] ties
//! a key table and the last built reports to a transport.

pub mod error;
pub mod key;
pub mod led;
pub mod packet;
pub mod params;
pub mod profile;

pub use error::KeyboardError;
pub use key::{Coordinate, Key};
pub use led::RgbColor;
pub use packet::{build_animation_packet, build_color_packets};
pub use params::{
    resolve, ParamSpecs, ParamValue, ParameterSpec, ResolvedParameters, UserParams, ValidityRule,
};
pub use profile::{
    AnimationCommand, AnimationOption, ColorCommand, KeyDefinition, LayoutCell, Model, Profile,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use regium_transport::{BoxedTransport, TransportDeviceInfo};
use tracing::{debug, info};

/// A keyboard session: one device, its key colors and last built reports
///
/// Mutation goes through `&mut self`, so a session is never encoded from two
/// places at once. Share it across threads behind a lock.
pub struct Keyboard {
    profile: Arc<Profile>,
    model: Model,
    keys: BTreeMap<String, Key>,
    color_params: ResolvedParameters,
    animation_packet: Option<Vec<u8>>,
    transport: BoxedTransport,
}

impl Keyboard {
    /// Create a session for the device behind `transport`
    ///
    /// The model is picked from the profile by the transport's VID/PID.
    pub fn new(profile: Arc<Profile>, transport: BoxedTransport) -> Result<Self, KeyboardError> {
        let info = transport.device_info();
        let model = profile
            .model(info.vid, info.pid)
            .cloned()
            .ok_or_else(|| {
                KeyboardError::NotSupported(format!(
                    "{:04x}:{:04x} is not a {} model",
                    info.vid, info.pid, profile.name
                ))
            })?;

        let keys = profile.instantiate_keys();
        let color_params = profile.colors.params.defaults();
        debug!("Keyboard session for {} ({} keys)", model.long_name, keys.len());

        Ok(Self {
            profile,
            model,
            keys,
            color_params,
            animation_packet: None,
            transport,
        })
    }

    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    pub fn name(&self) -> &str {
        &self.model.name
    }

    pub fn long_name(&self) -> &str {
        &self.model.long_name
    }

    pub fn has_rgb(&self) -> bool {
        self.model.has_rgb
    }

    pub fn has_anim(&self) -> bool {
        self.model.has_anim
    }

    pub fn has_custom_anim(&self) -> bool {
        self.model.has_custom_anim
    }

    /// Layout width in key units
    pub fn width(&self) -> u8 {
        self.profile.kb_size.0
    }

    /// Layout height in rows
    pub fn height(&self) -> u8 {
        self.profile.kb_size.1
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, label: &str) -> Option<&Key> {
        self.keys.get(label)
    }

    /// Keys in label order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.values()
    }

    /// Key labels, sorted
    pub fn valid_keys(&self) -> Vec<&str> {
        self.keys.keys().map(String::as_str).collect()
    }

    /// Animation ids, sorted
    pub fn anim_options(&self) -> Vec<&str> {
        self.profile
            .animations
            .options
            .keys()
            .map(String::as_str)
            .collect()
    }

    /// Help line per animation parameter, in wire order
    pub fn anim_param_choices(&self) -> Vec<String> {
        self.profile.animations.params.iter().map(|s| s.help()).collect()
    }

    /// Help line per color parameter, in wire order
    pub fn color_param_choices(&self) -> Vec<String> {
        self.profile.colors.params.iter().map(|s| s.help()).collect()
    }

    /// Currently resolved color parameters
    pub fn color_params(&self) -> &ResolvedParameters {
        &self.color_params
    }

    /// Last built animation report, if any
    pub fn animation_packet(&self) -> Option<&[u8]> {
        self.animation_packet.as_deref()
    }

    /// Set every key to one color
    ///
    /// The color is checked once up front; on error no key changes.
    pub fn set_color(&mut self, rgb: (i64, i64, i64)) -> Result<(), KeyboardError> {
        let color = RgbColor::try_from(rgb)?;
        for key in self.keys.values_mut() {
            key.set_rgb(color);
        }
        Ok(())
    }

    /// Set the color of a single key
    pub fn set_key_color(
        &mut self,
        label: &str,
        rgb: (i64, i64, i64),
    ) -> Result<(), KeyboardError> {
        let key = self
            .keys
            .get_mut(label)
            .ok_or_else(|| KeyboardError::KeyNotFound {
                keyboard: self.model.name.clone(),
                key: label.to_string(),
            })?;
        key.set_color(rgb)
    }

    /// Resolve and keep the color command parameters
    ///
    /// `None` resets every parameter to its default.
    pub fn set_color_params(&mut self, params: Option<&UserParams>) -> Result<(), KeyboardError> {
        self.color_params = resolve(params, &self.profile.colors.params)?;
        Ok(())
    }

    /// Build the static color reports for the current key colors
    pub fn color_packets(&self) -> Result<Vec<Vec<u8>>, KeyboardError> {
        let colors = &self.profile.colors;
        build_color_packets(
            self.keys.values(),
            &colors.steps,
            &colors.param_base,
            &self.color_params,
            colors.padding,
        )
    }

    /// Write the static color reports to the device
    ///
    /// With `rgb` set, every key takes that color first. Returns the reports
    /// that were written.
    pub fn apply_color(
        &mut self,
        rgb: Option<(i64, i64, i64)>,
    ) -> Result<Vec<Vec<u8>>, KeyboardError> {
        if !self.model.has_rgb {
            return Err(KeyboardError::NotSupported(format!(
                "{} has no per-key RGB",
                self.model.long_name
            )));
        }
        if let Some(rgb) = rgb {
            self.set_color(rgb)?;
        }

        let packets = self.color_packets()?;
        self.transport
            .write_sequence(self.profile.colors.report_type, &packets)?;
        info!(
            "Applied static colors to {} ({} reports)",
            self.model.long_name,
            packets.len()
        );
        Ok(packets)
    }

    /// Build and keep the report for an animation
    ///
    /// Missing parameters take their defaults. Nothing is sent until
    /// [`Keyboard::apply_animation`].
    pub fn set_animation(
        &mut self,
        name: &str,
        params: Option<&UserParams>,
    ) -> Result<(), KeyboardError> {
        if !self.model.has_anim {
            return Err(KeyboardError::NotSupported(format!(
                "{} has no built-in animations",
                self.model.long_name
            )));
        }

        let animations = &self.profile.animations;
        let option = animations.option(name)?;
        let resolved = resolve(params, &animations.params)?;
        let packet = build_animation_packet(
            &animations.base,
            &option.selector,
            &resolved,
            animations.padding,
        )?;

        debug!("Animation {} built: {:02X?}", option.name, packet);
        self.animation_packet = Some(packet);
        Ok(())
    }

    /// Send the last built animation report again
    pub fn apply_animation(&self) -> Result<Vec<u8>, KeyboardError> {
        let packet = self
            .animation_packet
            .as_ref()
            .ok_or(KeyboardError::AnimationNotSet)?;
        self.transport
            .write_report(self.profile.animations.report_type, packet)?;
        info!("Applied animation to {}", self.model.long_name);
        Ok(packet.clone())
    }
}

impl std::fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info = self.transport.device_info();
        f.debug_struct("Keyboard")
            .field("name", &self.model.name)
            .field("long_name", &self.model.long_name)
            .field("vid", &format_args!("{:04x}", info.vid))
            .field("pid", &format_args!("{:04x}", info.pid))
            .finish()
    }
}
