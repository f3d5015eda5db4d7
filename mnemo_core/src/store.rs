//! Deck persistence with file locking.
//!
//! The deck is the system of record for every card, so unlike transient
//! caches a corrupt file is surfaced as an error rather than replaced
//! with an empty collection. Saves go through a temp file and an atomic
//! rename.

use crate::{Card, Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// The full card collection
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Load a deck from a file with shared locking.
    ///
    /// A missing file is a fresh install and yields an empty deck; an
    /// unreadable or unparseable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No deck file found at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let deck: Deck = serde_json::from_str(&contents)
            .map_err(|e| Error::Store(format!("deck file {:?} is corrupt: {}", path, e)))?;

        tracing::debug!("Loaded {} cards from {:?}", deck.cards.len(), path);
        Ok(deck)
    }

    /// Save the deck with exclusive locking.
    ///
    /// Writes to a temp file in the same directory, syncs it, then
    /// renames over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "deck path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} cards to {:?}", self.cards.len(), path);
        Ok(())
    }

    /// Look up a card by id
    pub fn get(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Insert a card, or replace the stored card with the same id
    pub fn upsert(&mut self, card: Card) {
        match self.cards.iter_mut().find(|existing| existing.id == card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
