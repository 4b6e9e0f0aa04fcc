//! Relational store behind the chat tools.
//!
//! Thin parameterized queries over sqlite: articles fed by the scraper's
//! ingest endpoint, journal notes, and chat-message counters. All calls go
//! through `spawn_blocking` so the async loop never holds the connection.

mod migrations;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use tokio::task;
use uuid::Uuid;

use fieldnote_schema::{dod_categories, Article, NewArticle, Note, NoteSummary, PlatformStats};

pub use migrations::run_migrations;

#[derive(Clone)]
pub struct JournalStore {
    db: Arc<Mutex<Connection>>,
}

impl JournalStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        run_migrations(&conn)?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            insert_article_tx(&conn, article)
        })
        .await?
    }

    /// Bulk variant for the ingest endpoint. Returns the inserted count.
    pub async fn insert_articles(&self, articles: Vec<NewArticle>) -> Result<usize> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let mut conn = lock(&db)?;
            let tx = conn.transaction()?;
            let mut inserted = 0;
            for article in articles {
                insert_article_tx(&tx, article)?;
                inserted += 1;
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await?
    }

    /// Case-insensitive substring match over title/summary/source, optional
    /// category equality, newest first.
    pub async fn search_articles(
        &self,
        query: Option<String>,
        category: Option<String>,
        limit: usize,
    ) -> Result<Vec<Article>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            let pattern = query.map(|q| format!("%{}%", q.to_lowercase()));
            let mut stmt = conn.prepare(
                r#"
                SELECT id, title, summary, source, category, url, published_at
                FROM articles
                WHERE (?1 IS NULL
                       OR LOWER(title) LIKE ?1
                       OR LOWER(summary) LIKE ?1
                       OR LOWER(source) LIKE ?1)
                  AND (?2 IS NULL OR category = ?2)
                ORDER BY published_at DESC
                LIMIT ?3
                "#,
            )?;
            let rows = stmt.query_map(params![pattern, category, limit as i64], article_row)?;
            collect_articles(rows)
        })
        .await?
    }

    /// Articles in any of `categories`, optional topic substring over
    /// title/summary, newest first.
    pub async fn search_news(
        &self,
        topic: Option<String>,
        categories: Vec<String>,
        limit: usize,
    ) -> Result<Vec<Article>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            let placeholders = vec!["?"; categories.len()].join(", ");
            let mut sql = format!(
                "SELECT id, title, summary, source, category, url, published_at \
                 FROM articles WHERE category IN ({placeholders})"
            );
            let mut values: Vec<rusqlite::types::Value> = categories
                .into_iter()
                .map(rusqlite::types::Value::Text)
                .collect();
            if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
                let pattern = format!("%{}%", topic.to_lowercase());
                sql.push_str(" AND (LOWER(title) LIKE ? OR LOWER(summary) LIKE ?)");
                values.push(rusqlite::types::Value::Text(pattern.clone()));
                values.push(rusqlite::types::Value::Text(pattern));
            }
            sql.push_str(" ORDER BY published_at DESC LIMIT ?");
            values.push(rusqlite::types::Value::Integer(limit as i64));

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(values), article_row)?;
            collect_articles(rows)
        })
        .await?
    }

    pub async fn insert_note(&self, note: Note) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let tags = serde_json::to_string(&note.tags)?;
            let conn = lock(&db)?;
            conn.execute(
                r#"
                INSERT INTO notes (id, content, headline, summary, tags, mood, quick_type, deleted, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)
                "#,
                params![
                    note.id.to_string(),
                    note.content,
                    note.headline,
                    note.summary,
                    tags,
                    note.mood,
                    note.quick_type,
                    note.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?
    }

    /// Newest non-deleted notes, projected without their content.
    pub async fn recent_notes(&self, limit: usize) -> Result<Vec<NoteSummary>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            let mut stmt = conn.prepare(
                r#"
                SELECT id, headline, summary, tags, mood, quick_type, created_at
                FROM notes
                WHERE deleted = 0
                ORDER BY created_at DESC
                LIMIT ?1
                "#,
            )?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?;

            let mut notes = Vec::new();
            for row in rows {
                let (id, headline, summary, tags, mood, quick_type, created_at) = row?;
                notes.push(NoteSummary {
                    id: Uuid::parse_str(&id)?,
                    headline,
                    summary,
                    tags: serde_json::from_str(&tags).unwrap_or_default(),
                    mood,
                    quick_type,
                    created_at: parse_ts(&created_at)?,
                });
            }
            Ok(notes)
        })
        .await?
    }

    pub async fn soft_delete_note(&self, id: Uuid) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            let changed =
                conn.execute("UPDATE notes SET deleted = 1 WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
        .await?
    }

    pub async fn record_chat_message(&self, role: &str, agent_id: &str) -> Result<()> {
        let role = role.to_string();
        let agent_id = agent_id.to_string();
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            conn.execute(
                "INSERT INTO chat_messages (role, agent_id, created_at) VALUES (?1, ?2, ?3)",
                params![role, agent_id, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await?
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = lock(&db)?;
            let count = |sql: &str| -> Result<u64> {
                let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
                Ok(n as u64)
            };

            let cutoff = (Utc::now() - Duration::hours(24)).to_rfc3339();
            let notes_last_24h: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE deleted = 0 AND created_at >= ?1",
                params![cutoff],
                |row| row.get(0),
            )?;

            let dod = dod_categories();
            let placeholders = vec!["?"; dod.len()].join(", ");
            let dod_articles: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM articles WHERE category IN ({placeholders})"),
                rusqlite::params_from_iter(dod.iter().map(|c| c.to_string())),
                |row| row.get(0),
            )?;

            Ok(PlatformStats {
                total_notes: count("SELECT COUNT(*) FROM notes WHERE deleted = 0")?,
                total_articles: count("SELECT COUNT(*) FROM articles")?,
                total_chat_messages: count("SELECT COUNT(*) FROM chat_messages")?,
                notes_last_24h: notes_last_24h as u64,
                dod_articles: dod_articles as u64,
            })
        })
        .await?
    }
}

fn lock(db: &Arc<Mutex<Connection>>) -> Result<std::sync::MutexGuard<'_, Connection>> {
    db.lock()
        .map_err(|_| anyhow!("failed to lock sqlite connection"))
}

fn insert_article_tx(conn: &Connection, article: NewArticle) -> Result<Article> {
    let stored = Article {
        id: Uuid::new_v4(),
        title: article.title,
        summary: article.summary,
        source: article.source,
        category: article.category,
        url: article.url,
        published_at: article.published_at.unwrap_or_else(Utc::now),
    };
    conn.execute(
        r#"
        INSERT INTO articles (id, title, summary, source, category, url, published_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            stored.id.to_string(),
            stored.title,
            stored.summary,
            stored.source,
            stored.category,
            stored.url,
            stored.published_at.to_rfc3339(),
        ],
    )?;
    Ok(stored)
}

type ArticleRow = (String, String, String, String, String, String, String);

fn article_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArticleRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn collect_articles(
    rows: impl Iterator<Item = rusqlite::Result<ArticleRow>>,
) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    for row in rows {
        let (id, title, summary, source, category, url, published_at) = row?;
        articles.push(Article {
            id: Uuid::parse_str(&id)?,
            title,
            summary,
            source,
            category,
            url,
            published_at: parse_ts(&published_at)?,
        });
    }
    Ok(articles)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, category: &str, hours_ago: i64) -> NewArticle {
        NewArticle {
            title: title.into(),
            summary: format!("{title} summary"),
            source: "Feed".into(),
            category: category.into(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            published_at: Some(Utc::now() - Duration::hours(hours_ago)),
        }
    }

    fn note(content: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            content: content.into(),
            headline: content.chars().take(100).collect(),
            summary: "Summary pending.".into(),
            tags: vec!["test".into()],
            mood: Some("focused".into()),
            quick_type: "note".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn search_articles_matches_substring_case_insensitive() {
        let store = JournalStore::open_in_memory().unwrap();
        store
            .insert_article(article("Rust 2.0 Released", "software", 1))
            .await
            .unwrap();
        store
            .insert_article(article("New LLM benchmark", "ai-ml", 2))
            .await
            .unwrap();

        let hits = store
            .search_articles(Some("rust".into()), None, 5)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust 2.0 Released");

        let hits = store
            .search_articles(None, Some("ai-ml".into()), 5)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "ai-ml");
    }

    #[tokio::test]
    async fn search_articles_orders_newest_first_and_limits() {
        let store = JournalStore::open_in_memory().unwrap();
        for i in 0..4 {
            store
                .insert_article(article(&format!("story {i}"), "software", i))
                .await
                .unwrap();
        }

        let hits = store.search_articles(None, None, 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "story 0");
        assert_eq!(hits[1].title, "story 1");
    }

    #[tokio::test]
    async fn search_news_filters_by_category_set_and_topic() {
        let store = JournalStore::open_in_memory().unwrap();
        store
            .insert_article(article("FIAR audit progress", "audit", 1))
            .await
            .unwrap();
        store
            .insert_article(article("FY26 budget request", "budget", 2))
            .await
            .unwrap();
        store
            .insert_article(article("FIAR misc coverage", "software", 3))
            .await
            .unwrap();

        let hits = store
            .search_news(
                Some("fiar".into()),
                vec!["audit".into(), "ig-report".into()],
                5,
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "audit");

        let empty = store
            .search_news(None, Vec::new(), 5)
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn recent_notes_skips_deleted_and_omits_content() {
        let store = JournalStore::open_in_memory().unwrap();
        let kept = note("keep me around");
        let dropped = note("delete me");
        let dropped_id = dropped.id;
        store.insert_note(kept).await.unwrap();
        store.insert_note(dropped).await.unwrap();

        assert!(store.soft_delete_note(dropped_id).await.unwrap());

        let notes = store.recent_notes(10).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].headline, "keep me around");
        assert_eq!(notes[0].tags, vec!["test".to_string()]);
    }

    #[tokio::test]
    async fn platform_stats_counts_all_tables() {
        let store = JournalStore::open_in_memory().unwrap();
        store
            .insert_articles(vec![
                article("audit news", "audit", 1),
                article("tech news", "software", 1),
            ])
            .await
            .unwrap();
        store.insert_note(note("fresh note")).await.unwrap();
        store.record_chat_message("user", "portfolio").await.unwrap();
        store
            .record_chat_message("assistant", "portfolio")
            .await
            .unwrap();

        let stats = store.platform_stats().await.unwrap();
        assert_eq!(stats.total_articles, 2);
        assert_eq!(stats.total_notes, 1);
        assert_eq!(stats.total_chat_messages, 2);
        assert_eq!(stats.notes_last_24h, 1);
        assert_eq!(stats.dod_articles, 1);
    }

    #[tokio::test]
    async fn open_on_disk_persists_between_opens() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("journal.db");
        let path_str = path.to_str().unwrap();

        {
            let store = JournalStore::open(path_str).unwrap();
            store
                .insert_article(article("persisted", "policy", 1))
                .await
                .unwrap();
        }

        let store = JournalStore::open(path_str).unwrap();
        let hits = store.search_articles(None, None, 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "persisted");
    }
}
