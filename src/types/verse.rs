use serde::{Deserialize, Serialize};

/// Subset of the upstream verse payload that the proxy reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamVerse {
    pub surah_name: String,
    pub ayah_no: u32,
    pub english: String,
    pub arabic1: String,
}

/// Reshaped verse returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verse {
    pub arabic: String,
    pub english: String,
    pub surah: String,
    pub ayah: u32,
}

impl From<UpstreamVerse> for Verse {
    fn from(v: UpstreamVerse) -> Self {
        Self {
            arabic: v.arabic1,
            english: v.english,
            surah: v.surah_name,
            ayah: v.ayah_no,
        }
    }
}
