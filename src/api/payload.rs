//! Stream payload decoder
//!
//! The stream endpoint returns quality links as one string:
//! `[360p]https://a.mp4 or https://b.mp4,[720p]https://c.mp4,...`
//! usually base64-encoded with a `#h` prefix and junk tokens spliced in
//! between `//_//` separators.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::PayloadError;
use crate::models::{RawQuality, RawStreamData};

const ENCODED_PREFIX: &str = "#h";
const SEPARATOR: &str = "//_//";
const TRASH_SYMBOLS: [char; 5] = ['@', '#', '!', '^', '$'];

/// Upstream omits padding more often than not
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64 forms of every 2- and 3-symbol junk string
fn trash_tokens() -> &'static [String] {
    static TOKENS: OnceLock<Vec<String>> = OnceLock::new();
    TOKENS.get_or_init(|| {
        let mut tokens = Vec::with_capacity(25 + 125);
        for a in TRASH_SYMBOLS {
            for b in TRASH_SYMBOLS {
                tokens.push(STANDARD.encode(format!("{a}{b}")));
            }
        }
        for a in TRASH_SYMBOLS {
            for b in TRASH_SYMBOLS {
                for c in TRASH_SYMBOLS {
                    tokens.push(STANDARD.encode(format!("{a}{b}{c}")));
                }
            }
        }
        tokens
    })
}

fn entry_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]([^\[]*)").ok())
        .as_ref()
}

fn tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

/// Strip the obfuscation layer, returning the plain `[label]url` string.
/// Strings without the `#h` prefix are returned unchanged.
pub fn clear_payload(payload: &str) -> Result<String, PayloadError> {
    let Some(encoded) = payload.strip_prefix(ENCODED_PREFIX) else {
        return Ok(payload.to_string());
    };

    let mut cleaned = encoded.replace(SEPARATOR, "");
    for token in trash_tokens() {
        cleaned = cleaned.replace(token.as_str(), "");
    }

    let bytes = PAYLOAD_ENGINE
        .decode(cleaned.trim_end_matches('='))
        .map_err(|_| PayloadError::Base64)?;
    String::from_utf8(bytes).map_err(|_| PayloadError::Utf8)
}

/// Decode a stream payload into ordered quality entries
pub fn decode_stream_payload(payload: &str) -> Result<RawStreamData, PayloadError> {
    let plain = clear_payload(payload)?;
    let (Some(entry_re), Some(tag_re)) = (entry_regex(), tag_regex()) else {
        return Err(PayloadError::Empty);
    };

    let mut data = RawStreamData::default();
    for caps in entry_re.captures_iter(&plain) {
        let label = tag_re.replace_all(&caps[1], "");
        let label = label.trim();
        if label.is_empty() {
            continue;
        }

        let candidates: Vec<String> = caps[2]
            .trim()
            .trim_end_matches(',')
            .split(" or ")
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect();

        data.push(label, RawQuality::Candidates(candidates));
    }

    if data.is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(data)
}
