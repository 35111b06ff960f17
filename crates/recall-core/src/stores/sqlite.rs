//! SQLite card store.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text
//! (`2024-05-10T18:30:00.000000000Z`) so that lexical order in SQL matches
//! chronological order.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{RecallError, RecallResult};
use crate::traits::CardStore;
use crate::types::{LearningStatus, VocabularyCard, VocabularyQuery};

const CARD_COLUMNS: &str = "id, learner_id, word_id, status, ease_factor, interval_days,
    repetition_number, times_seen, times_correct, times_incorrect, last_reviewed,
    next_review, user_notes, created_at, updated_at, version";

/// SQLite-backed card store.
pub struct SqliteCardStore {
    conn: Mutex<Connection>,
}

impl SqliteCardStore {
    /// Open (or create) a store at the given database path.
    pub fn new(path: impl AsRef<Path>) -> RecallResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> RecallResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> RecallResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RecallError::database(e.to_string()))
    }

    fn init_schema(&self) -> RecallResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS vocabulary_cards (
                id TEXT PRIMARY KEY,
                learner_id TEXT NOT NULL,
                word_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'new',
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 1,
                repetition_number INTEGER NOT NULL DEFAULT 0,
                times_seen INTEGER NOT NULL DEFAULT 0,
                times_correct INTEGER NOT NULL DEFAULT 0,
                times_incorrect INTEGER NOT NULL DEFAULT 0,
                last_reviewed TEXT,
                next_review TEXT,
                user_notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 0,
                UNIQUE(learner_id, word_id)
            );

            CREATE INDEX IF NOT EXISTS idx_cards_learner_next_review
                ON vocabulary_cards(learner_id, next_review);
            CREATE INDEX IF NOT EXISTS idx_cards_learner_status
                ON vocabulary_cards(learner_id, status);
            CREATE INDEX IF NOT EXISTS idx_cards_learner_created_at
                ON vocabulary_cards(learner_id, created_at);
            "#,
        )?;
        Ok(())
    }

    fn query_cards(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RecallResult<Vec<VocabularyCard>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, CardRow::from_row)?;

        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?.into_card()?);
        }
        Ok(cards)
    }

    fn find_one(
        &self,
        clause: &str,
        params: impl rusqlite::Params,
    ) -> RecallResult<Option<VocabularyCard>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM vocabulary_cards WHERE {}", CARD_COLUMNS, clause);
        let row = conn.query_row(&sql, params, CardRow::from_row).optional()?;
        row.map(CardRow::into_card).transpose()
    }

    /// Total number of cards across all learners.
    pub fn count(&self) -> RecallResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM vocabulary_cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl CardStore for SqliteCardStore {
    async fn find_by_learner_and_id(
        &self,
        learner_id: &str,
        card_id: Uuid,
    ) -> RecallResult<Option<VocabularyCard>> {
        self.find_one(
            "id = ?1 AND learner_id = ?2",
            params![card_id.to_string(), learner_id],
        )
    }

    async fn find_by_learner_and_word(
        &self,
        learner_id: &str,
        word_id: &str,
    ) -> RecallResult<Option<VocabularyCard>> {
        self.find_one(
            "learner_id = ?1 AND word_id = ?2",
            params![learner_id, word_id],
        )
    }

    async fn insert(&self, card: &VocabularyCard) -> RecallResult<()> {
        let ts = EncodedTimestamps::from_card(card)?;
        let conn = self.lock()?;
        let result = conn.execute(
            &format!(
                "INSERT INTO vocabulary_cards ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                CARD_COLUMNS
            ),
            params![
                card.id.to_string(),
                card.learner_id,
                card.word_id,
                card.status.as_str(),
                card.ease_factor,
                card.interval_days,
                card.repetition_number,
                card.times_seen,
                card.times_correct,
                card.times_incorrect,
                ts.last_reviewed,
                ts.next_review,
                card.user_notes,
                ts.created_at,
                ts.updated_at,
                card.version as i64,
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(card_id = %card.id, learner_id = %card.learner_id, "Inserted card");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(RecallError::duplicate_word(&card.learner_id, &card.word_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, learner_id: &str, card_id: Uuid) -> RecallResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM vocabulary_cards WHERE id = ?1 AND learner_id = ?2",
            params![card_id.to_string(), learner_id],
        )?;
        Ok(deleted > 0)
    }

    async fn update(&self, card: &VocabularyCard) -> RecallResult<()> {
        let ts = EncodedTimestamps::from_card(card)?;
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE vocabulary_cards SET
                status = ?3, ease_factor = ?4, interval_days = ?5, repetition_number = ?6,
                times_seen = ?7, times_correct = ?8, times_incorrect = ?9,
                last_reviewed = ?10, next_review = ?11, user_notes = ?12,
                updated_at = ?13, version = ?14
             WHERE id = ?1 AND learner_id = ?2",
            params![
                card.id.to_string(),
                card.learner_id,
                card.status.as_str(),
                card.ease_factor,
                card.interval_days,
                card.repetition_number,
                card.times_seen,
                card.times_correct,
                card.times_incorrect,
                ts.last_reviewed,
                ts.next_review,
                card.user_notes,
                ts.updated_at,
                card.version as i64,
            ],
        )?;

        if updated == 0 {
            return Err(RecallError::not_found(card.id.to_string()));
        }
        Ok(())
    }

    async fn update_if_version(
        &self,
        card: &VocabularyCard,
        expected_version: u64,
    ) -> RecallResult<bool> {
        let ts = EncodedTimestamps::from_card(card)?;
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE vocabulary_cards SET
                status = ?3, ease_factor = ?4, interval_days = ?5, repetition_number = ?6,
                times_seen = ?7, times_correct = ?8, times_incorrect = ?9,
                last_reviewed = ?10, next_review = ?11, user_notes = ?12,
                updated_at = ?13, version = ?14
             WHERE id = ?1 AND learner_id = ?2 AND version = ?15",
            params![
                card.id.to_string(),
                card.learner_id,
                card.status.as_str(),
                card.ease_factor,
                card.interval_days,
                card.repetition_number,
                card.times_seen,
                card.times_correct,
                card.times_incorrect,
                ts.last_reviewed,
                ts.next_review,
                card.user_notes,
                ts.updated_at,
                card.version as i64,
                expected_version as i64,
            ],
        )?;
        Ok(updated > 0)
    }

    async fn list_due_for_learner(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> RecallResult<Vec<VocabularyCard>> {
        let now = encode_timestamp(now)?;
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM vocabulary_cards
             WHERE learner_id = ?1 AND (next_review IS NULL OR next_review <= ?2)
             ORDER BY next_review IS NULL, next_review ASC, created_at ASC, id ASC
             LIMIT ?3",
            CARD_COLUMNS
        );
        Self::query_cards(
            &conn,
            &sql,
            params![learner_id, now, limit as i64],
        )
    }

    async fn list_for_learner(
        &self,
        learner_id: &str,
        query: &VocabularyQuery,
    ) -> RecallResult<Vec<VocabularyCard>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM vocabulary_cards
             WHERE learner_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY created_at DESC, id ASC
             LIMIT ?3 OFFSET ?4",
            CARD_COLUMNS
        );
        Self::query_cards(
            &conn,
            &sql,
            params![
                learner_id,
                query.status.map(LearningStatus::as_str),
                query.limit as i64,
                query.offset as i64,
            ],
        )
    }

    async fn count_by_status_for_learner(
        &self,
        learner_id: &str,
    ) -> RecallResult<HashMap<LearningStatus, usize>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT status, COUNT(*) FROM vocabulary_cards
             WHERE learner_id = ?1 GROUP BY status",
        )?;
        let rows = stmt.query_map(params![learner_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (status, count) = row?;
            counts.insert(decode_status(&status)?, count as usize);
        }
        Ok(counts)
    }

    async fn count_due_for_learner(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> RecallResult<usize> {
        let now = encode_timestamp(now)?;
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM vocabulary_cards
             WHERE learner_id = ?1 AND (next_review IS NULL OR next_review <= ?2)",
            params![learner_id, now],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Raw column values, decoded into a card outside the rusqlite row callback.
struct CardRow {
    id: String,
    learner_id: String,
    word_id: String,
    status: String,
    ease_factor: f64,
    interval_days: u32,
    repetition_number: u32,
    times_seen: u32,
    times_correct: u32,
    times_incorrect: u32,
    last_reviewed: Option<String>,
    next_review: Option<String>,
    user_notes: Option<String>,
    created_at: String,
    updated_at: String,
    version: i64,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            learner_id: row.get(1)?,
            word_id: row.get(2)?,
            status: row.get(3)?,
            ease_factor: row.get(4)?,
            interval_days: row.get(5)?,
            repetition_number: row.get(6)?,
            times_seen: row.get(7)?,
            times_correct: row.get(8)?,
            times_incorrect: row.get(9)?,
            last_reviewed: row.get(10)?,
            next_review: row.get(11)?,
            user_notes: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
            version: row.get(15)?,
        })
    }

    fn into_card(self) -> RecallResult<VocabularyCard> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RecallError::corrupted_row(format!("Invalid card id '{}': {}", self.id, e)))?;

        Ok(VocabularyCard {
            id,
            learner_id: self.learner_id,
            word_id: self.word_id,
            status: decode_status(&self.status)?,
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetition_number: self.repetition_number,
            times_seen: self.times_seen,
            times_correct: self.times_correct,
            times_incorrect: self.times_incorrect,
            last_reviewed: self.last_reviewed.as_deref().map(decode_timestamp).transpose()?,
            next_review: self.next_review.as_deref().map(decode_timestamp).transpose()?,
            user_notes: self.user_notes,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
            version: u64::try_from(self.version).map_err(|_| {
                RecallError::corrupted_row(format!("Negative version {}", self.version))
            })?,
        })
    }
}

/// Card timestamps in their column encoding.
struct EncodedTimestamps {
    last_reviewed: Option<String>,
    next_review: Option<String>,
    created_at: String,
    updated_at: String,
}

impl EncodedTimestamps {
    fn from_card(card: &VocabularyCard) -> RecallResult<Self> {
        Ok(Self {
            last_reviewed: card.last_reviewed.map(encode_timestamp).transpose()?,
            next_review: card.next_review.map(encode_timestamp).transpose()?,
            created_at: encode_timestamp(card.created_at)?,
            updated_at: encode_timestamp(card.updated_at)?,
        })
    }
}

/// Only four-digit years keep the text sortable and parseable.
fn encode_timestamp(dt: DateTime<Utc>) -> RecallResult<String> {
    if !(0..=9999).contains(&dt.year()) {
        return Err(RecallError::validation(format!(
            "Timestamp {} is outside the storable range (years 0-9999)",
            dt
        )));
    }
    Ok(dt.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

fn decode_timestamp(value: &str) -> RecallResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RecallError::corrupted_row(format!("Invalid timestamp '{}': {}", value, e)))
}

fn decode_status(value: &str) -> RecallResult<LearningStatus> {
    LearningStatus::from_str(value)
        .map_err(|_| RecallError::corrupted_row(format!("Unknown status '{}'", value)))
}
