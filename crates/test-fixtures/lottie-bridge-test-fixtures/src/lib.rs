//! Lottie compositions shared by the workspace tests.
//!
//! `fixtures/manifest.json` names every composition, points at its file and
//! records the timing a correct loader should report for it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    compositions: BTreeMap<String, CompositionEntry>,
}

/// One manifest entry.
#[derive(Clone, Debug, Deserialize)]
pub struct CompositionEntry {
    /// Path relative to [`fixtures_root`].
    pub file: String,
    /// `[ip, op]` a loader should report.
    #[serde(default)]
    pub frames: Option<(i32, i32)>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// The document parses as JSON but must be rejected as a composition.
    #[serde(default)]
    pub invalid: bool,
}

impl CompositionEntry {
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    pub fn path(&self) -> PathBuf {
        fixtures_root().join(&self.file)
    }

    pub fn text(&self) -> Result<String> {
        let path = self.path();
        fs::read_to_string(&path)
            .with_context(|| format!("reading composition fixture {}", path.display()))
    }
}

/// Root of the shared fixture tree, usable as the assets root of a player that
/// resolves file references.
pub fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

pub mod compositions {
    use super::*;

    /// Every composition name, sorted.
    pub fn keys() -> Vec<String> {
        MANIFEST.compositions.keys().cloned().collect()
    }

    pub fn entry(name: &str) -> Result<&'static CompositionEntry> {
        match MANIFEST.compositions.get(name) {
            Some(entry) => Ok(entry),
            None => bail!("unknown composition fixture '{name}'"),
        }
    }

    /// Raw Lottie JSON, suitable for inline loading.
    pub fn json(name: &str) -> Result<String> {
        entry(name)?.text()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("parsing composition fixture {name}"))
    }

    /// File reference relative to [`fixtures_root`](super::fixtures_root).
    pub fn reference(name: &str) -> Result<String> {
        Ok(entry(name)?.file.clone())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(entry(name)?.path())
    }

    /// Compositions a loader must accept.
    pub fn valid() -> impl Iterator<Item = (&'static str, &'static CompositionEntry)> {
        MANIFEST
            .compositions
            .iter()
            .filter(|(_, entry)| !entry.invalid)
            .map(|(name, entry)| (name.as_str(), entry))
    }
}
