use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::{
    config::StudioConfig,
    error::{Result, StudioError},
};

/// Slot the Gemini API key is stored under.
pub const GEMINI_API_KEY_SLOT: &str = "gemini_api_key";

/// User-supplied API secret. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn save(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Stores the API key after trimming it. Blank keys are rejected.
pub async fn store_api_key(store: &dyn CredentialStore, api_key: &str) -> Result<Credential> {
    let trimmed = api_key.trim();
    if trimmed.is_empty() {
        return Err(StudioError::MissingCredential);
    }
    store.save(GEMINI_API_KEY_SLOT, trimmed).await?;
    log::info!("🔑 API key saved ({} chars)", trimmed.len());
    Ok(Credential::new(trimmed))
}

/// Picks the credential for a call: an explicitly configured key wins over the stored one.
/// Missing keys resolve to an empty credential so the call fails with `MissingCredential`.
pub async fn resolve_credential(
    config: &StudioConfig,
    store: &dyn CredentialStore,
) -> Result<Credential> {
    if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        log::debug!("Using API key from configuration");
        return Ok(Credential::new(key.trim()));
    }

    match store.load(GEMINI_API_KEY_SLOT).await? {
        Some(key) => {
            log::debug!("Using stored API key");
            Ok(Credential::new(key))
        }
        None => {
            log::warn!("⚠️  No API key configured or stored");
            Ok(Credential::empty())
        }
    }
}

/// JSON object on disk, one entry per slot.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StudioError::SerializationError(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StudioError::StorageError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Like `read_all`, but an unparseable file is treated as empty so it can be overwritten.
    async fn read_for_update(&self) -> Result<(HashMap<String, String>, bool)> {
        match self.read_all().await {
            Ok(entries) => Ok((entries, false)),
            Err(StudioError::SerializationError(e)) => {
                log::warn!(
                    "⚠️  Discarding unreadable credentials file {}: {}",
                    self.path.display(),
                    e
                );
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StudioError::StorageError(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StudioError::SerializationError(e.to_string()))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            StudioError::StorageError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let (mut entries, _) = self.read_for_update().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let (mut entries, recovered) = self.read_for_update().await?;
        if entries.remove(key).is_some() || recovered {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> FileCredentialStore {
        let path = std::env::temp_dir()
            .join(format!("imagen-studio-{}", Uuid::new_v4()))
            .join("credentials.json");
        FileCredentialStore::new(path)
    }

    #[test]
    fn debug_output_hides_secret() {
        let credential = Credential::new("AIza-super-secret");
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("17 chars"));
    }

    #[tokio::test]
    async fn file_store_round_trips_across_instances() {
        let store = temp_store();
        assert_eq!(store.load(GEMINI_API_KEY_SLOT).await.unwrap(), None);

        store.save(GEMINI_API_KEY_SLOT, "key-1").await.unwrap();
        let reopened = FileCredentialStore::new(store.path().to_path_buf());
        assert_eq!(
            reopened.load(GEMINI_API_KEY_SLOT).await.unwrap().as_deref(),
            Some("key-1")
        );

        reopened.remove(GEMINI_API_KEY_SLOT).await.unwrap();
        assert_eq!(store.load(GEMINI_API_KEY_SLOT).await.unwrap(), None);

        let _ = std::fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[tokio::test]
    async fn corrupt_file_is_overwritten_on_update() {
        let store = temp_store();
        let dir = store.path().parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(
            store.load(GEMINI_API_KEY_SLOT).await,
            Err(StudioError::SerializationError(_))
        ));

        store.save(GEMINI_API_KEY_SLOT, "key-2").await.unwrap();
        assert_eq!(
            store.load(GEMINI_API_KEY_SLOT).await.unwrap().as_deref(),
            Some("key-2")
        );

        std::fs::write(store.path(), "[1, 2").unwrap();
        store.remove(GEMINI_API_KEY_SLOT).await.unwrap();
        assert_eq!(store.load(GEMINI_API_KEY_SLOT).await.unwrap(), None);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn store_api_key_trims_and_rejects_blank() {
        let store = MemoryCredentialStore::new();

        let err = store_api_key(&store, "   ").await.unwrap_err();
        assert!(matches!(err, StudioError::MissingCredential));

        let credential = store_api_key(&store, "  abc123 \n").await.unwrap();
        assert_eq!(credential.expose(), "abc123");
        assert_eq!(
            store.load(GEMINI_API_KEY_SLOT).await.unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[tokio::test]
    async fn configured_key_wins_over_stored_key() {
        let store = MemoryCredentialStore::new();
        store.save(GEMINI_API_KEY_SLOT, "stored").await.unwrap();

        let config = StudioConfig::new().with_api_key("from-env");
        let credential = resolve_credential(&config, &store).await.unwrap();
        assert_eq!(credential.expose(), "from-env");

        let credential = resolve_credential(&StudioConfig::new(), &store).await.unwrap();
        assert_eq!(credential.expose(), "stored");
    }

    #[tokio::test]
    async fn missing_key_resolves_to_blank_credential() {
        let store = MemoryCredentialStore::new();
        let credential = resolve_credential(&StudioConfig::new(), &store).await.unwrap();
        assert!(credential.is_empty());
    }
}
