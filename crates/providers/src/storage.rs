//! Local file storage for generated assets and site archives.
//!
//! Files land in `<uploads_dir>/<project_id>/<file_name>` and are referenced
//! as `<url_prefix>/<project_id>/<file_name>`.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use bob_core::generators::{AssetStore, GeneratorResult, SitePackager};
use bob_core::types::DbId;

use crate::error::ProviderError;

/// Name of the page inside the site archive.
pub const SITE_ENTRY_NAME: &str = "index.html";

#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn reference(&self, project_id: DbId, file_name: &str) -> String {
        format!("{}/{project_id}/{file_name}", self.url_prefix)
    }

    /// Map a reference back to its path under the root. Only references of
    /// the form `<url_prefix>/<project_id>/<file_name>` resolve.
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let rest = reference.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        let (project, file_name) = rest.split_once('/')?;
        project.parse::<DbId>().ok()?;
        let plain = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && file_name != "."
            && file_name != "..";
        plain.then(|| self.root.join(project).join(file_name))
    }

    async fn write(
        &self,
        project_id: DbId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ProviderError> {
        let dir = self.root.join(project_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(file_name), bytes).await?;
        tracing::debug!(project_id, file_name, size = bytes.len(), "Stored project file");
        Ok(self.reference(project_id, file_name))
    }
}

/// Build a zip archive holding the page as `index.html`.
pub fn zip_site(markup: &str) -> Result<Vec<u8>, ProviderError> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    writer
        .start_file(SITE_ENTRY_NAME, options)
        .map_err(|e| ProviderError::malformed("zip", e.to_string()))?;
    writer.write_all(markup.as_bytes())?;
    let cursor = writer
        .finish()
        .map_err(|e| ProviderError::malformed("zip", e.to_string()))?;
    Ok(cursor.into_inner())
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store_file(&self, project_id: DbId, file_name: &str, bytes: Vec<u8>) -> GeneratorResult<String> {
        Ok(self.write(project_id, file_name, &bytes).await?)
    }

    async fn remove_file(&self, reference: &str) -> GeneratorResult<()> {
        let path = self.resolve(reference).ok_or_else(|| {
            ProviderError::malformed("storage", format!("'{reference}' is not a stored file"))
        })?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(reference, "Removed project file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProviderError::from(e).into()),
        }
    }
}

#[async_trait]
impl SitePackager for LocalAssetStore {
    async fn package_site(&self, project_id: DbId, archive_name: &str, markup: &str) -> GeneratorResult<String> {
        let archive = zip_site(markup)?;
        Ok(self.write(project_id, archive_name, &archive).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use assert_matches::assert_matches;
    use bob_core::generators::GeneratorError;

    use super::*;

    #[tokio::test]
    async fn store_file_writes_under_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "/uploads/");

        let reference = store
            .store_file(7, "business-card.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();

        assert_eq!(reference, "/uploads/7/business-card.pdf");
        let written = std::fs::read(dir.path().join("7").join("business-card.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn package_site_produces_zip_with_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "/uploads");

        let reference = store
            .package_site(3, "website-01.zip", "<!DOCTYPE html><html></html>")
            .await
            .unwrap();
        assert_eq!(reference, "/uploads/3/website-01.zip");

        let bytes = std::fs::read(dir.path().join("3").join("website-01.zip")).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name(SITE_ENTRY_NAME).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "<!DOCTYPE html><html></html>");
    }

    #[tokio::test]
    async fn remove_file_deletes_only_the_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "/uploads");
        let kept = store.store_file(5, "card-a.pdf", b"a".to_vec()).await.unwrap();
        let dropped = store.store_file(5, "card-b.pdf", b"b".to_vec()).await.unwrap();

        store.remove_file(&dropped).await.unwrap();
        // Already gone.
        store.remove_file(&dropped).await.unwrap();

        assert!(!dir.path().join("5").join("card-b.pdf").exists());
        assert_eq!(std::fs::read(dir.path().join("5").join("card-a.pdf")).unwrap(), b"a");
        assert_eq!(kept, "/uploads/5/card-a.pdf");
    }

    #[tokio::test]
    async fn remove_file_rejects_foreign_references() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "/uploads");

        for reference in ["/elsewhere/5/a.pdf", "/uploads/5/../secret", "/uploads/x/a.pdf", "/uploads/5/"] {
            assert_matches!(
                store.remove_file(reference).await,
                Err(GeneratorError::Malformed(_)),
                "{reference}"
            );
        }
    }
}
