use crate::api::MediaKind;
use crate::playback::{ListEntry, ListError, ListStore, ProviderRegistry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "cineplay.app_settings";
#[cfg(target_arch = "wasm32")]
const MY_LIST_KEY: &str = "cineplay.my_list";
#[cfg(target_arch = "wasm32")]
const WATCH_PROGRESS_KEY: &str = "cineplay.watch_progress";

#[derive(Debug, Error)]
pub enum DbError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_storage::errors::StorageError> for DbError {
    fn from(err: gloo_storage::errors::StorageError) -> Self {
        DbError::Storage(err.to_string())
    }
}

impl From<DbError> for ListError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Json(err) => ListError::Serialization(err),
            other => ListError::Storage(other.to_string()),
        }
    }
}

fn default_tmdb_api_key() -> String {
    option_env!("CINEPLAY_TMDB_API_KEY")
        .unwrap_or_default()
        .to_string()
}

fn default_provider_key() -> String {
    ProviderRegistry.default_provider().id.key().to_string()
}

fn default_true() -> bool {
    true
}

/// User-editable settings persisted alongside the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_provider_key")]
    pub preferred_provider: String,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default = "default_true")]
    pub show_episode_panel: bool,
    #[serde(default = "default_tmdb_api_key")]
    pub tmdb_api_key: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            preferred_provider: default_provider_key(),
            auto_advance: true,
            show_episode_panel: true,
            tmdb_api_key: default_tmdb_api_key(),
        }
    }
}

impl AppSettings {
    /// Stored key, or the registry default when the key is no longer registered.
    pub fn preferred_provider_id(&self) -> crate::playback::ProviderId {
        ProviderRegistry
            .provider_or_default(&self.preferred_provider)
            .id
    }
}

// Native targets keep everything in one SQLite file under the platform data dir.

#[cfg(not(target_arch = "wasm32"))]
fn database_path() -> std::path::PathBuf {
    let data_dir = dirs::data_local_dir()
        .map(|dir| dir.join("cineplay"))
        .unwrap_or_else(|| std::path::PathBuf::from(".cineplay"));
    if let Err(err) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!(dir = %data_dir.display(), %err, "could not create data directory");
    }
    data_dir.join("cineplay.db")
}

#[cfg(not(target_arch = "wasm32"))]
fn open_database(path: &std::path::Path) -> Result<rusqlite::Connection, DbError> {
    let conn = rusqlite::Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS my_list (
            id INTEGER PRIMARY KEY,
            media_type TEXT NOT NULL,
            date_added TEXT NOT NULL
        );",
    )?;
    Ok(conn)
}

#[cfg(not(target_arch = "wasm32"))]
fn get_db_connection() -> Result<rusqlite::Connection, DbError> {
    open_database(&database_path())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn initialize_database() -> Result<(), DbError> {
    get_db_connection().map(|_| ())
}

#[cfg(target_arch = "wasm32")]
pub async fn initialize_database() -> Result<(), DbError> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn save_settings(settings: AppSettings) -> Result<(), DbError> {
    let conn = get_db_connection()?;
    let settings_json = serde_json::to_string(&settings)?;
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES ('app_settings', ?1)",
        [&settings_json],
    )?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub async fn save_settings(settings: AppSettings) -> Result<(), DbError> {
    LocalStorage::set(SETTINGS_KEY, settings)?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load_settings() -> Result<AppSettings, DbError> {
    let conn = get_db_connection()?;
    let result: Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM settings WHERE key = 'app_settings'",
        [],
        |row: &rusqlite::Row| row.get(0),
    );

    match result {
        Ok(json) => Ok(serde_json::from_str(&json)?),
        Err(_) => Ok(AppSettings::default()),
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn load_settings() -> Result<AppSettings, DbError> {
    match LocalStorage::get(SETTINGS_KEY) {
        Ok(settings) => Ok(settings),
        Err(_) => Ok(AppSettings::default()),
    }
}

/// Stores the provider's opaque progress blob. Last write wins.
///
/// Synchronous so it can run straight from a browser event callback.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_watch_progress(progress: &serde_json::Value) -> Result<(), DbError> {
    write_watch_progress(&database_path(), progress)
}

#[cfg(not(target_arch = "wasm32"))]
fn write_watch_progress(
    path: &std::path::Path,
    progress: &serde_json::Value,
) -> Result<(), DbError> {
    let conn = open_database(path)?;
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES ('watch_progress', ?1)",
        [&progress.to_string()],
    )?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn save_watch_progress(progress: &serde_json::Value) -> Result<(), DbError> {
    LocalStorage::set(WATCH_PROGRESS_KEY, progress)?;
    Ok(())
}

/// The "my list" store backing [`crate::playback::ListMembershipGate`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalListStore {
    #[cfg(not(target_arch = "wasm32"))]
    path: std::path::PathBuf,
}

impl Default for LocalListStore {
    fn default() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            path: database_path(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalListStore {
    pub fn at(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<Vec<ListEntry>, DbError> {
        let conn = open_database(&self.path)?;
        let mut stmt =
            conn.prepare("SELECT id, media_type, date_added FROM my_list ORDER BY date_added")?;
        let entries = stmt
            .query_map([], |row: &rusqlite::Row| {
                let id: i64 = row.get(0)?;
                let kind: String = row.get(1)?;
                let added: String = row.get(2)?;
                Ok((id, kind, added))
            })?
            .filter_map(|row| row.ok())
            .filter_map(|(id, kind, added)| {
                Some(ListEntry {
                    id: u64::try_from(id).ok()?,
                    media_kind: kind.parse().ok()?,
                    date_added: added.parse().ok()?,
                })
            })
            .collect();
        Ok(entries)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ListStore for LocalListStore {
    fn contains(&self, title_id: u64) -> bool {
        self.read_entries()
            .map(|entries| entries.iter().any(|entry| entry.id == title_id))
            .unwrap_or(false)
    }

    fn entries(&self) -> Vec<ListEntry> {
        self.read_entries().unwrap_or_else(|err| {
            tracing::warn!(%err, "could not read my list");
            Vec::new()
        })
    }

    async fn insert(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError> {
        let conn = open_database(&self.path)?;
        let id = i64::try_from(title_id).map_err(|err| ListError::Storage(err.to_string()))?;
        conn.execute(
            "INSERT OR IGNORE INTO my_list (id, media_type, date_added) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, kind.as_str(), chrono::Utc::now().to_rfc3339()],
        )
        .map_err(DbError::from)?;
        Ok(())
    }

    async fn remove(&self, title_id: u64, _kind: MediaKind) -> Result<(), ListError> {
        let conn = open_database(&self.path)?;
        let id = i64::try_from(title_id).map_err(|err| ListError::Storage(err.to_string()))?;
        conn.execute("DELETE FROM my_list WHERE id = ?1", [id])
            .map_err(DbError::from)?;
        Ok(())
    }
}

/// Parses the stored list. A missing key is an empty list; an unreadable one is an error so
/// callers never overwrite it.
#[cfg(any(target_arch = "wasm32", test))]
fn decode_list(raw: Option<&str>) -> Result<Vec<ListEntry>, DbError> {
    match raw {
        None => Ok(Vec::new()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalListStore {
    fn read_entries(&self) -> Result<Vec<ListEntry>, DbError> {
        let raw = LocalStorage::raw()
            .get_item(MY_LIST_KEY)
            .map_err(|err| DbError::Storage(format!("{err:?}")))?;
        decode_list(raw.as_deref())
    }

    fn write_entries(&self, entries: &[ListEntry]) -> Result<(), DbError> {
        LocalStorage::set(MY_LIST_KEY, entries)?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl ListStore for LocalListStore {
    fn contains(&self, title_id: u64) -> bool {
        self.entries().iter().any(|entry| entry.id == title_id)
    }

    fn entries(&self) -> Vec<ListEntry> {
        self.read_entries().unwrap_or_else(|err| {
            tracing::warn!(%err, "could not read my list");
            Vec::new()
        })
    }

    async fn insert(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError> {
        let mut entries = self.read_entries()?;
        if !entries.iter().any(|entry| entry.id == title_id) {
            entries.push(ListEntry {
                id: title_id,
                media_kind: kind,
                date_added: chrono::Utc::now(),
            });
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    async fn remove(&self, title_id: u64, _kind: MediaKind) -> Result<(), ListError> {
        let mut entries = self.read_entries()?;
        entries.retain(|entry| entry.id != title_id);
        self.write_entries(&entries)?;
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::playback::ProviderId;

    fn scratch_db(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cineplay-{name}-{}-{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"auto_advance": false}"#).unwrap();
        assert!(!settings.auto_advance);
        assert!(settings.show_episode_panel);
        assert_eq!(settings.preferred_provider, "vidpro");
    }

    #[test]
    fn unknown_preferred_provider_falls_back() {
        let settings = AppSettings {
            preferred_provider: "gone".into(),
            ..AppSettings::default()
        };
        assert_eq!(settings.preferred_provider_id(), ProviderId::VidPro);
    }

    #[test]
    fn stored_list_decodes() {
        assert!(decode_list(None).unwrap().is_empty());

        let entries = decode_list(Some(
            r#"[{"id": 1399, "mediaType": "tv", "dateAdded": "2024-05-01T10:00:00Z"}]"#,
        ))
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].media_kind, MediaKind::Series);
    }

    #[test]
    fn corrupt_list_is_an_error_not_an_empty_list() {
        let err = decode_list(Some("{not json")).unwrap_err();
        assert!(matches!(err, DbError::Json(_)));
        assert!(matches!(ListError::from(err), ListError::Serialization(_)));
    }

    #[test]
    fn watch_progress_last_write_wins() {
        let path = scratch_db("progress");
        write_watch_progress(&path, &serde_json::json!({ "1399": { "progress": 10 } })).unwrap();
        write_watch_progress(&path, &serde_json::json!({ "1399": { "progress": 90 } })).unwrap();

        let conn = open_database(&path).unwrap();
        let stored: String = conn
            .query_row(
                "SELECT value FROM settings WHERE key = 'watch_progress'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored["1399"]["progress"], 90);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn sqlite_list_store_dedupes_and_removes() {
        let path = scratch_db("list");
        let store = LocalListStore::at(&path);

        store.insert(1399, MediaKind::Series).await.unwrap();
        store.insert(1399, MediaKind::Series).await.unwrap();
        store.insert(550, MediaKind::Movie).await.unwrap();
        assert!(store.contains(1399));
        assert_eq!(store.entries().len(), 2);

        store.remove(1399, MediaKind::Series).await.unwrap();
        assert!(!store.contains(1399));
        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].media_kind, MediaKind::Movie);

        let _ = std::fs::remove_file(&path);
    }
}
