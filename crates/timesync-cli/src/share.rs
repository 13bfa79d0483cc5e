//! Share-link blobs: compact config JSON as unpadded URL-safe base64.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use timesync_engine::ConfigRecord;

const MAX_BLOB_CHARS: usize = 16_384;

pub fn encode(record: &ConfigRecord) -> Result<String> {
    let bytes = serde_json::to_vec(record).context("serialize configuration")?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

pub fn decode(blob: &str) -> Result<ConfigRecord> {
    // Links are often pasted whole; keep only the fragment.
    let blob = blob.trim();
    let blob = blob.rsplit_once('#').map_or(blob, |(_, fragment)| fragment);
    if blob.len() > MAX_BLOB_CHARS {
        anyhow::bail!("Share blob too large ({} chars)", blob.len());
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(blob)
        .context("decode share blob (base64url)")?;
    let json = String::from_utf8(bytes).context("share blob is not UTF-8")?;
    Ok(ConfigRecord::from_json(&json)?)
}
