use anyhow::Result;
use rusqlite::Connection;

/// Applies the schema. Safe to run on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            summary TEXT NOT NULL DEFAULT '',
            source TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL DEFAULT '',
            published_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_articles_published
            ON articles (published_at DESC);
        CREATE INDEX IF NOT EXISTS idx_articles_category
            ON articles (category);

        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            headline TEXT NOT NULL,
            summary TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            mood TEXT,
            quick_type TEXT NOT NULL DEFAULT 'note',
            deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notes_created
            ON notes (created_at DESC);

        CREATE TABLE IF NOT EXISTS chat_messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            role TEXT NOT NULL,
            agent_id TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
