//! Device identity primitives: host interface enumeration, the derived
//! fingerprint hash, and the persisted random identifier.

pub mod device_uuid;
pub mod fingerprint;
pub mod interfaces;
