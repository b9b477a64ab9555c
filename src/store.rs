//! SQLite persistence for blog posts.
//!
//! A [`Store`] owns one connection for its lifetime; dropping it closes the
//! database. Every workflow opens its own store, does its reads and writes,
//! and lets it go. There is no shared or global connection.
//!
//! The `posts` table is append-only from this crate's point of view:
//!
//! ```text
//! posts
//! ├── id         INTEGER PRIMARY KEY AUTOINCREMENT
//! ├── title      TEXT NOT NULL
//! ├── date       TEXT NOT NULL      -- YYYY-MM-DD
//! ├── blog_name  TEXT NOT NULL
//! ├── link       TEXT NOT NULL UNIQUE
//! └── full_text  TEXT
//! ```
//!
//! Databases created by older tooling may lack the `UNIQUE` constraint on
//! `link`. [`Store::insert_post`] does not rely on it: the insert is guarded
//! by a `NOT EXISTS` check, so duplicates are refused either way.

use crate::types::Post;
use rusqlite::{Connection, params};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Post already stored: {0}")]
    DuplicateLink(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// The parent directory is created when missing.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Store {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// A private, schema-initialised database that lives as long as the value.
    pub fn open_in_memory() -> Result<Self> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS posts (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                date        TEXT NOT NULL,
                blog_name   TEXT NOT NULL,
                link        TEXT NOT NULL UNIQUE,
                full_text   TEXT
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_posts_date ON posts(date DESC)",
            [],
        )?;
        Ok(())
    }

    /// Every stored link for one source.
    pub fn links_for_source(&self, blog_name: &str) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT link FROM posts WHERE blog_name = ?1")?;
        let links = stmt
            .query_map([blog_name], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(links)
    }

    pub fn contains_link(&self, link: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE link = ?1",
            [link],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert one post. Refuses a link that is already stored.
    pub fn insert_post(&self, post: &Post) -> Result<()> {
        let inserted = self.conn.execute(
            "INSERT INTO posts (title, date, blog_name, link, full_text)
             SELECT ?1, ?2, ?3, ?4, ?5
             WHERE NOT EXISTS (SELECT 1 FROM posts WHERE link = ?4)",
            params![
                post.title,
                post.date,
                post.blog_name,
                post.link,
                post.full_text
            ],
        )?;
        if inserted == 0 {
            return Err(StoreError::DuplicateLink(post.link.clone()));
        }
        Ok(())
    }

    /// All posts, newest date first. Same-day posts keep reverse insertion
    /// order.
    ///
    /// The body is not loaded; `full_text` is always `None` here.
    pub fn all_posts_desc(&self) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, date, blog_name, link FROM posts
             ORDER BY date DESC, rowid DESC",
        )?;
        let posts = stmt
            .query_map([], |row| {
                Ok(Post {
                    title: row.get(0)?,
                    date: row.get(1)?,
                    blog_name: row.get(2)?,
                    link: row.get(3)?,
                    full_text: None,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Stored body of a post, if any.
    pub fn full_text(&self, link: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT full_text FROM posts WHERE link = ?1")?;
        let mut rows = stmt.query([link])?;
        match rows.next()? {
            Some(row) => Ok(row.get(0)?),
            None => Ok(None),
        }
    }
}
