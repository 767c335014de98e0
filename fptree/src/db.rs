use std::fs;
use std::path::Path;

use imgsig_fingerprint::BitFingerprint;
use serde::{Deserialize, Serialize};

use crate::{Collection, Entry, TreeError};

/// On-disk encoding of a [`FingerprintDb`], chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFormat {
    Yaml,
    Json,
}

impl DbFormat {
    /// `.yaml`/`.yml` or `.json`, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(DbFormat::Yaml),
            Some("json") => Ok(DbFormat::Json),
            _ => Err(TreeError::InvalidFormat(format!(
                "{}: expected a .yaml, .yml or .json file",
                path.display()
            ))),
        }
    }
}

/// Fingerprints persisted as two parallel arrays.
///
/// ```yaml
/// filenames: [a.jpg, b.jpg]
/// fingerprints:
///   - [969, 22401, ...]
///   - [4112, 0, ...]
/// ```
///
/// Older databases name the second list `fingerprints_as_ints`; it is read
/// under that key too and always written back as `fingerprints`.
///
/// Order is preserved end to end; it decides which entries become pivots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintDb {
    #[serde(default)]
    pub filenames: Vec<String>,
    #[serde(default, alias = "fingerprints_as_ints")]
    pub fingerprints: Vec<Vec<u16>>,
}

impl FingerprintDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filename: impl Into<String>, fingerprint: &BitFingerprint) {
        self.filenames.push(filename.into());
        self.fingerprints.push(fingerprint.samples().to_vec());
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Appends `other` after the entries already held.
    pub fn merge(&mut self, other: FingerprintDb) {
        self.filenames.extend(other.filenames);
        self.fingerprints.extend(other.fingerprints);
    }

    fn check(&self) -> Result<(), TreeError> {
        if self.filenames.len() != self.fingerprints.len() {
            return Err(TreeError::InvalidFormat(format!(
                "{} filenames but {} fingerprints",
                self.filenames.len(),
                self.fingerprints.len()
            )));
        }
        Ok(())
    }

    pub fn parse(text: &str, format: DbFormat) -> Result<Self, TreeError> {
        let db: Self = match format {
            DbFormat::Yaml => serde_yaml::from_str(text)
                .map_err(|e| TreeError::InvalidFormat(e.to_string()))?,
            DbFormat::Json => serde_json::from_str(text)
                .map_err(|e| TreeError::InvalidFormat(e.to_string()))?,
        };
        db.check()?;
        Ok(db)
    }

    pub fn encode(&self, format: DbFormat) -> Result<String, TreeError> {
        self.check()?;
        match format {
            DbFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| TreeError::InvalidFormat(e.to_string()))
            }
            DbFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| TreeError::InvalidFormat(e.to_string())),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let path = path.as_ref();
        let format = DbFormat::from_path(path)?;
        let text = fs::read_to_string(path)
            .map_err(|e| TreeError::Io(format!("read {}: {e}", path.display())))?;
        Self::parse(&text, format).map_err(|e| match e {
            TreeError::InvalidFormat(msg) => {
                TreeError::InvalidFormat(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Loads every path in order and concatenates them.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self, TreeError> {
        let mut db = Self::new();
        for path in paths {
            db.merge(Self::load(path)?);
        }
        Ok(db)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let path = path.as_ref();
        let text = self.encode(DbFormat::from_path(path)?)?;
        fs::write(path, text).map_err(|e| TreeError::Io(format!("write {}: {e}", path.display())))
    }

    pub fn from_collection(collection: &Collection<BitFingerprint>) -> Self {
        let mut db = Self::new();
        for entry in collection {
            db.push(entry.id.clone(), &entry.fingerprint);
        }
        db
    }

    /// Converts to default-capacity fingerprints; longer sample lists are
    /// truncated and shorter ones zero-filled.
    pub fn into_collection(self) -> Result<Collection<BitFingerprint>, TreeError> {
        self.check()?;
        Ok(self
            .filenames
            .into_iter()
            .zip(self.fingerprints)
            .map(|(name, samples)| Entry::new(name, BitFingerprint::from_samples(&samples)))
            .collect())
    }
}
