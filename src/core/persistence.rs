//! # Durable Conversations
//!
//! Opt-in file-backed [`ConversationRepository`] under `~/.ragchat/conversations/`.
//!
//! Each conversation is a JSON file (`<uuid>.json`) plus a lightweight index
//! (`conversations.json`) listing ids newest first, so startup does not
//! depend on directory iteration order.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::message::Message;
use crate::core::store::{
    Conversation, ConversationRepository, ConversationSummary, InMemoryRepository,
    RepositoryError,
};

const INDEX_FILE: &str = "conversations.json";

#[derive(Serialize, Deserialize, Default, Debug)]
struct ConversationIndex {
    ids: Vec<String>,
}

/// Returns `~/.ragchat/conversations/`.
pub fn default_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    Ok(home.join(".ragchat").join("conversations"))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), RepositoryError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Write-through repository: every mutation is mirrored to disk, reads are
/// served from memory.
pub struct FileRepository {
    dir: PathBuf,
    order: Vec<String>,
    cache: InMemoryRepository,
}

impl FileRepository {
    /// Open (creating if needed) the store in `dir` and load every
    /// conversation listed in its index. Unreadable files are skipped.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let index_path = dir.join(INDEX_FILE);
        let index: ConversationIndex = if index_path.exists() {
            serde_json::from_str(&fs::read_to_string(&index_path)?)?
        } else {
            ConversationIndex::default()
        };

        let mut conversations = Vec::with_capacity(index.ids.len());
        for id in &index.ids {
            match load_conversation(&dir, id) {
                Ok(conversation) => conversations.push(conversation),
                Err(e) => warn!("Skipping unreadable conversation {id}: {e}"),
            }
        }
        info!(
            "Loaded {} conversations from {}",
            conversations.len(),
            dir.display()
        );

        let order = conversations.iter().map(|c| c.id.clone()).collect();
        Ok(Self {
            dir,
            order,
            cache: InMemoryRepository::from_conversations(conversations),
        })
    }

    fn conversation_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn write_conversation(&self, id: &str) -> Result<(), RepositoryError> {
        let conversation = self
            .cache
            .get_ref(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        atomic_write_json(&self.conversation_path(id), conversation)?;
        debug!("Conversation saved: {id}");
        Ok(())
    }

    fn write_index(&self) -> Result<(), RepositoryError> {
        let index = ConversationIndex {
            ids: self.order.clone(),
        };
        atomic_write_json(&self.dir.join(INDEX_FILE), &index)
    }
}

fn load_conversation(dir: &Path, id: &str) -> Result<Conversation, RepositoryError> {
    let json = fs::read_to_string(dir.join(format!("{id}.json")))?;
    Ok(serde_json::from_str(&json)?)
}

impl ConversationRepository for FileRepository {
    fn list(&self) -> Vec<ConversationSummary> {
        self.cache.list()
    }

    fn get(&self, id: &str) -> Option<Conversation> {
        self.cache.get(id)
    }

    fn insert_front(&mut self, conversation: Conversation) -> Result<(), RepositoryError> {
        let id = conversation.id.clone();
        self.cache.insert_front(conversation)?;
        self.order.insert(0, id.clone());
        self.write_conversation(&id)?;
        self.write_index()
    }

    fn append(&mut self, id: &str, message: Message) -> Result<(), RepositoryError> {
        self.cache.append(id, message)?;
        self.write_conversation(id)
    }
}
