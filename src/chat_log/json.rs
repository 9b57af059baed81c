//! JSON file chat log.
//!
//! Layout: `{"_default": {"1": {"username": "...", "messages": [...]}, ...}}`.
//! The whole document is kept in memory and rewritten on every change via a
//! temp file and rename.

use super::{ChatLogError, ChatLogProvider, ChatRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChatLogDocument {
    #[serde(rename = "_default", default)]
    records: BTreeMap<u64, ChatRecord>,
}

impl ChatLogDocument {
    fn find_mut(&mut self, username: &str) -> Option<&mut ChatRecord> {
        self.records.values_mut().find(|r| r.username == username)
    }

    fn next_id(&self) -> u64 {
        self.records.keys().next_back().map_or(1, |id| id + 1)
    }
}

pub struct JsonChatLog {
    path: PathBuf,
    doc: Mutex<ChatLogDocument>,
}

impl JsonChatLog {
    /// Open the log at `path`, creating an empty document if missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ChatLogError> {
        let path = path.into();
        match Self::open_existing(&path).await? {
            Some(log) => Ok(log),
            None => {
                let log = Self {
                    path,
                    doc: Mutex::new(ChatLogDocument::default()),
                };
                log.persist(&*log.doc.lock().await).await?;
                debug!(path = %log.path.display(), "Created chat log");
                Ok(log)
            }
        }
    }

    /// Open the log at `path` only if it already exists.
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Option<Self>, ChatLogError> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc = if bytes.iter().all(u8::is_ascii_whitespace) {
            ChatLogDocument::default()
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(Some(Self {
            path: path.to_path_buf(),
            doc: Mutex::new(doc),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record, in insertion order.
    pub async fn records(&self) -> Vec<ChatRecord> {
        self.doc.lock().await.records.values().cloned().collect()
    }

    async fn persist(&self, doc: &ChatLogDocument) -> Result<(), ChatLogError> {
        let bytes = serde_json::to_vec(doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatLogProvider for JsonChatLog {
    async fn append(&self, sender: &str, message: &str) -> Result<(), ChatLogError> {
        let mut doc = self.doc.lock().await;
        match doc.find_mut(sender) {
            Some(record) => record.messages.push(message.to_string()),
            None => {
                let id = doc.next_id();
                doc.records.insert(
                    id,
                    ChatRecord {
                        username: sender.to_string(),
                        messages: vec![message.to_string()],
                    },
                );
            }
        }
        self.persist(&doc).await
    }

    async fn history(&self, username: &str) -> Result<Option<Vec<String>>, ChatLogError> {
        let doc = self.doc.lock().await;
        Ok(doc
            .records
            .values()
            .find(|r| r.username == username)
            .map(|r| r.messages.clone()))
    }

    async fn clear(&self) -> Result<(), ChatLogError> {
        let mut doc = self.doc.lock().await;
        doc.records.clear();
        self.persist(&doc).await
    }
}
