//! Report builders for the static color and animation commands
//!
//! Both builders are pure: they copy the profile's templates, write into the
//! copies and either return every buffer or fail without returning any.

use crate::error::KeyboardError;
use crate::key::Key;
use crate::params::ResolvedParameters;

/// Build the reports for a static color command
///
/// Returns one buffer per step template with every key's channel bytes
/// written at its coordinates, followed by the parameter buffer
/// (`param_base` + resolved values, zero padded to `padded_len`).
pub fn build_color_packets<'a, I>(
    keys: I,
    templates: &[Vec<u8>],
    param_base: &[u8],
    params: &ResolvedParameters,
    padded_len: usize,
) -> Result<Vec<Vec<u8>>, KeyboardError>
where
    I: IntoIterator<Item = &'a Key>,
{
    let mut keys: Vec<&Key> = keys.into_iter().collect();
    keys.sort_by(|a, b| a.label().cmp(b.label()));

    let mut steps = templates.to_vec();
    for key in keys {
        for (coord, value) in key.channel_writes() {
            let slot = steps
                .get_mut(coord.step)
                .and_then(|step| step.get_mut(coord.offset))
                .ok_or_else(|| KeyboardError::IndexOutOfRange {
                    label: key.label().to_string(),
                    step: coord.step,
                    offset: coord.offset,
                })?;
            *slot = value;
        }
    }

    let param_packet = pad(param_base, &[], params, padded_len)
        .map_err(|len| KeyboardError::ColorParamsTooLong {
            len,
            max: padded_len,
        })?;
    steps.push(param_packet);
    Ok(steps)
}

/// Build the single report for an animation command
///
/// `base` + `selector` + resolved values, zero padded to exactly `padded_len`.
pub fn build_animation_packet(
    base: &[u8],
    selector: &[u8],
    params: &ResolvedParameters,
    padded_len: usize,
) -> Result<Vec<u8>, KeyboardError> {
    pad(base, selector, params, padded_len).map_err(|len| KeyboardError::AnimationTooLong {
        len,
        max: padded_len,
    })
}

/// Concatenate and zero pad; the unpadded length is the error
fn pad(
    base: &[u8],
    selector: &[u8],
    params: &ResolvedParameters,
    padded_len: usize,
) -> Result<Vec<u8>, usize> {
    let mut buf = Vec::with_capacity(padded_len);
    buf.extend_from_slice(base);
    buf.extend_from_slice(selector);
    for (_, value) in params.iter() {
        buf.extend_from_slice(value);
    }

    if buf.len() > padded_len {
        return Err(buf.len());
    }
    buf.resize(padded_len, 0x00);
    Ok(buf)
}
