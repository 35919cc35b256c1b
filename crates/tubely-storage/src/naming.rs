//! Random, unguessable asset names.
//!
//! Names carry 256 bits of OS randomness, so uniqueness is assumed rather than
//! checked against existing objects before writing.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Extension used when the declared content type is not `type/subtype`.
pub const FALLBACK_EXTENSION: &str = ".bin";

const ASSET_ID_BYTES: usize = 32;

/// Name of a stored asset: random identifier plus an extension derived from
/// the declared content type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetName {
    id: String,
    extension: String,
}

impl AssetName {
    /// Generate a fresh asset name for the declared content type.
    ///
    /// The extension is taken verbatim from the subtype. Callers must check the
    /// content type against an allow-list first.
    ///
    /// # Panics
    /// Panics if the operating system's random source fails. Falling back to a
    /// weaker generator is never acceptable for asset names.
    pub fn generate(content_type: &str) -> Self {
        let mut bytes = [0u8; ASSET_ID_BYTES];
        if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
            panic!("failed to generate random bytes for asset name: {}", e);
        }

        AssetName {
            id: URL_SAFE_NO_PAD.encode(bytes),
            extension: extension_for(content_type),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `{id}{extension}`, e.g. `Zx3...Qk.png`
    pub fn file_name(&self) -> String {
        format!("{}{}", self.id, self.extension)
    }
}

impl Display for AssetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.id, self.extension)
    }
}

/// Derive a file extension from a `type/subtype` content type.
///
/// Anything that does not split into exactly two non-empty parts on `/` gets
/// [`FALLBACK_EXTENSION`].
pub fn extension_for(content_type: &str) -> String {
    let mut parts = content_type.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(subtype), None) if !kind.is_empty() && !subtype.is_empty() => {
            format!(".{}", subtype)
        }
        _ => FALLBACK_EXTENSION.to_string(),
    }
}
