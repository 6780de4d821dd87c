//! The list fetch seam.
//!
//! A [`ListFetcher`] produces one [`RawLists`] per refresh. The bundled
//! [`DirectoryFetcher`] reads pre-parsed list files from a data directory
//! (the form the external parsers emit); deployments wanting live
//! downloads implement the trait over their own transport.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{IngestError, Result};
use crate::records::RawLists;

/// Async source of raw list records.
#[async_trait]
pub trait ListFetcher: Send + Sync {
    async fn fetch(&self) -> Result<RawLists>;
}

/// List group keys accepted in the disabled-lists configuration.
pub const LIST_GROUP_US_OFAC: &str = "us_ofac";
pub const LIST_GROUP_US_CSL: &str = "us_csl";
pub const LIST_GROUP_EU_CSL: &str = "eu_csl";
pub const LIST_GROUP_UK_CSL: &str = "uk_csl";

/// Reads per-list JSON files from a directory.
///
/// Each file is optional (a missing file yields an empty list), but the
/// directory itself must exist and be readable, so a misconfigured
/// deployment fails at the initial refresh rather than serving an empty
/// index. Disabled list groups are skipped without touching their files.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    dir: PathBuf,
    disabled: HashSet<String>,
}

impl DirectoryFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            disabled: HashSet::new(),
        }
    }

    /// Disable list groups by key (`us_ofac`, `us_csl`, `eu_csl`, `uk_csl`).
    pub fn with_disabled_lists<I, S>(mut self, disabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.disabled = disabled
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    fn enabled(&self, group: &str) -> bool {
        !self.disabled.contains(group)
    }

    async fn read_list<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let bytes = tokio::fs::read(&path).await.map_err(|source| IngestError::Read {
            path: display_path(&path),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| IngestError::Decode {
            path: display_path(&path),
            source,
        })
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[async_trait]
impl ListFetcher for DirectoryFetcher {
    async fn fetch(&self) -> Result<RawLists> {
        let metadata = tokio::fs::metadata(&self.dir).await.map_err(|e| {
            IngestError::DataDirectory {
                path: display_path(&self.dir),
                message: e.to_string(),
            }
        })?;
        if !metadata.is_dir() {
            return Err(IngestError::DataDirectory {
                path: display_path(&self.dir),
                message: "not a directory".to_string(),
            });
        }

        let mut raw = RawLists::default();

        if self.enabled(LIST_GROUP_US_OFAC) {
            raw.sdns = self.read_list("sdn.json").await?;
            raw.sdn_addresses = self.read_list("sdn_addresses.json").await?;
            raw.sdn_alt_names = self.read_list("sdn_alt_names.json").await?;
            raw.sdn_comments = self.read_list("sdn_comments.json").await?;
        } else {
            tracing::info!(group = LIST_GROUP_US_OFAC, "list group disabled");
        }

        if self.enabled(LIST_GROUP_US_CSL) {
            raw.sectoral_sanctions = self.read_list("ssi.json").await?;
            raw.bis_entities = self.read_list("el.json").await?;
            raw.denied_persons = self.read_list("dpl.json").await?;
            raw.unverified = self.read_list("uvl.json").await?;
            raw.nonproliferation = self.read_list("isn.json").await?;
            raw.foreign_sanctions_evaders = self.read_list("fse.json").await?;
            raw.palestinian_legislative_council = self.read_list("plc.json").await?;
            raw.capta = self.read_list("capta.json").await?;
            raw.itar_debarred = self.read_list("itar_debarred.json").await?;
            raw.cmic = self.read_list("cmic.json").await?;
            raw.ns_mbs = self.read_list("ns_mbs.json").await?;
        } else {
            tracing::info!(group = LIST_GROUP_US_CSL, "list group disabled");
        }

        if self.enabled(LIST_GROUP_EU_CSL) {
            raw.eu_csl = self.read_list("eu_csl.json").await?;
        }
        if self.enabled(LIST_GROUP_UK_CSL) {
            raw.uk_csl = self.read_list("uk_csl.json").await?;
            raw.uk_sanctions = self.read_list("uk_sanctions.json").await?;
        }

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SdnRecord;

    async fn write_file(dir: &Path, name: &str, contents: &str) {
        tokio::fs::write(dir.join(name), contents).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let fetcher = DirectoryFetcher::new("/definitely/not/here");
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, IngestError::DataDirectory { .. }));
    }

    #[tokio::test]
    async fn test_missing_files_yield_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());

        let raw = fetcher.fetch().await.unwrap();
        assert!(raw.sdns.is_empty());
        assert!(raw.eu_csl.is_empty());
    }

    #[tokio::test]
    async fn test_reads_present_lists() {
        let dir = tempfile::tempdir().unwrap();
        let sdns = vec![SdnRecord {
            entity_id: "15022".into(),
            name: "IVAN IVANOV".into(),
            sdn_type: "individual".into(),
            ..SdnRecord::default()
        }];
        write_file(
            dir.path(),
            "sdn.json",
            &serde_json::to_string(&sdns).unwrap(),
        )
        .await;
        write_file(dir.path(), "eu_csl.json", r#"[{"name":"ACME GMBH"}]"#).await;

        let raw = DirectoryFetcher::new(dir.path()).fetch().await.unwrap();
        assert_eq!(raw.sdns.len(), 1);
        assert_eq!(raw.sdns[0].name, "IVAN IVANOV");
        assert_eq!(raw.eu_csl.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_group_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "sdn.json",
            r#"[{"entityId":"1","name":"SKIPPED"}]"#,
        )
        .await;
        write_file(dir.path(), "eu_csl.json", r#"[{"name":"KEPT"}]"#).await;

        let fetcher = DirectoryFetcher::new(dir.path())
            .with_disabled_lists(["us_ofac", " US_CSL "]);
        let raw = fetcher.fetch().await.unwrap();

        assert!(raw.sdns.is_empty());
        assert_eq!(raw.eu_csl.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "sdn.json", "not json").await;

        let err = DirectoryFetcher::new(dir.path()).fetch().await.unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
    }
}
