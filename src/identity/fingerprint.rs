//! Device fingerprint hashing. Serializes a fixed set of environment
//! attributes to JSON in schema order and folds the UTF-16 code units of the
//! serialization into a 32-bit hash. A collision-prone classification aid,
//! not a security token.

use serde::{Deserialize, Serialize};

/// Fixed fingerprint attribute schema. Field declaration order is the
/// serialization order; absent attributes serialize as `null` and are never
/// dropped from the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintAttributes {
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub platform: Option<String>,
    /// "WxH", e.g. "1920x1080"
    pub screen_resolution: Option<String>,
    pub color_depth: Option<u32>,
    /// IANA zone name
    pub timezone: Option<String>,
    pub cookie_enabled: Option<bool>,
    pub do_not_track: Option<String>,
    pub hardware_concurrency: Option<u32>,
    pub max_touch_points: Option<u32>,
}

/// Fingerprint result: the hash plus the attribute snapshot it was computed
/// from, for reproducibility display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    #[serde(rename = "hashHex")]
    pub hash_hex: String,
    pub attributes: FingerprintAttributes,
}

/// Compute the fingerprint hash for an attribute snapshot. Identical
/// snapshots yield identical hashes on every host.
pub fn fingerprint(attributes: FingerprintAttributes) -> Fingerprint {
    let serialized =
        serde_json::to_string(&attributes).expect("Failed to serialize fingerprint attributes");
    let hash = fold_utf16(&serialized);

    Fingerprint {
        // Hex of the absolute value of the signed 32-bit result, no leading
        // zeros, lowercase
        hash_hex: format!("{:x}", hash.unsigned_abs()),
        attributes,
    }
}

/// Classic multiplicative string hash: `h = ((h << 5) - h) + c` over each
/// UTF-16 code unit, truncated to signed 32 bits at every step.
fn fold_utf16(text: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    hash
}

/// Fill the schema from what a headless host process can observe. Everything
/// a host has no analogue for is recorded as absent, exercising the
/// missing-attribute path.
pub fn host_attributes() -> FingerprintAttributes {
    FingerprintAttributes {
        user_agent: Some(format!(
            "{}/{} ({} {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        )),
        language: std::env::var("LANG").ok().filter(|v| !v.is_empty()),
        platform: Some(std::env::consts::OS.to_string()),
        screen_resolution: None,
        color_depth: None,
        timezone: std::env::var("TZ").ok().filter(|v| !v.is_empty()),
        cookie_enabled: None,
        do_not_track: None,
        hardware_concurrency: std::thread::available_parallelism()
            .ok()
            .map(|n| n.get() as u32),
        max_touch_points: None,
    }
}
