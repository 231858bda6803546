//! Decoding of captured process output.
//!
//! Output is read as UTF-8 first. Only when that fails is the fallback
//! encoding consulted, and only if the caller supplied one.

use encoding_rs::Encoding;
use log::debug;

use crate::error::DecodeError;

/// Which encodings to try, in order, when turning output bytes into text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingPreference {
    pub fallback: Option<String>,
}

impl EncodingPreference {
    #[must_use]
    pub fn with_fallback(fallback: Option<String>) -> Self {
        Self {
            fallback: fallback.filter(|label| !label.trim().is_empty()),
        }
    }

    /// Decodes `bytes` with this preference. See [`decode_output`].
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when neither UTF-8 nor the fallback can
    /// decode the bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        decode_output(bytes, self.fallback.as_deref())
    }
}

/// Decodes process output, trying UTF-8 and then `fallback`.
///
/// # Errors
///
/// - [`DecodeError::InvalidUtf8`] if the bytes are not UTF-8 and there is no
///   fallback.
/// - [`DecodeError::UnknownEncoding`] if the fallback label is not an
///   encoding we know.
/// - [`DecodeError::Malformed`] if the bytes are not valid in the fallback
///   encoding either.
pub fn decode_output(bytes: &[u8], fallback: Option<&str>) -> Result<String, DecodeError> {
    let utf8_error = match std::str::from_utf8(bytes) {
        Ok(text) => return Ok(text.to_string()),
        Err(e) => e,
    };

    let Some(label) = fallback else {
        return Err(DecodeError::InvalidUtf8(utf8_error));
    };

    let encoding = resolve_encoding(label)?;
    debug!(
        "Output is not UTF-8 ({utf8_error}), decoding as {}",
        encoding.name()
    );

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(DecodeError::Malformed {
            encoding: encoding.name(),
        })
}

/// Looks up an encoding by the kind of label editors display, e.g.
/// `Windows 1252` or `ISO 8859-2`.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownEncoding`] for labels that do not name an
/// encoding.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, DecodeError> {
    let normalized = label.trim().to_lowercase().replace(' ', "-");

    Encoding::for_label(normalized.as_bytes())
        .ok_or_else(|| DecodeError::UnknownEncoding(label.to_string()))
}

/// Extracts the encoding label from an editor setting value.
///
/// Settings such as `fallback_encoding` hold a display string like
/// `Western (Windows 1252)`; the label is inside the last pair of
/// parentheses. Values without parentheses are taken as the label itself.
#[must_use]
pub fn fallback_label(setting: &str) -> Option<String> {
    let setting = setting.trim();

    let label = match setting.rsplit_once('(') {
        Some((_, rest)) => rest.rsplit_once(')').map_or(rest, |(inside, _)| inside),
        None => setting,
    }
    .trim();

    (!label.is_empty()).then(|| label.to_string())
}
