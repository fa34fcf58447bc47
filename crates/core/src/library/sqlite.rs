//! SQLite-backed book library implementation.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{Library, LibraryError, LibraryStats, SnapshotOutcome, StoredBook};
use crate::snapshot::NewBook;

/// SQLite-backed book library.
pub struct SqliteLibrary {
    conn: Mutex<Connection>,
}

impl SqliteLibrary {
    /// Create a new SQLite library, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path).map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite library (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            -- SQLite ships with foreign keys off; cascades need them on
            PRAGMA foreign_keys = ON;

            -- One row per work, identified by (title, author)
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                life_span TEXT,
                year INTEGER NOT NULL,
                isbn TEXT,
                pages INTEGER,
                avg_rating REAL,
                ratings_count INTEGER,
                image_id TEXT,
                book_url TEXT,
                instances INTEGER NOT NULL DEFAULT 1,
                UNIQUE(title, author)
            );

            CREATE TABLE IF NOT EXISTS genres (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
            );

            CREATE TABLE IF NOT EXISTS book_genre (
                book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
                genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
                PRIMARY KEY(book_id, genre_id)
            );

            CREATE INDEX IF NOT EXISTS idx_books_year ON books(year);
            "#,
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(())
    }

    /// Two-branch upsert: look the work up, then either merge or insert.
    ///
    /// Merging only touches `instances` and `year`; the earliest-seen
    /// snapshot's metadata stays authoritative. Returns the row id and
    /// whether a new row was inserted.
    fn upsert_book_inner(
        conn: &Connection,
        book: &NewBook,
        year: i32,
    ) -> Result<(i64, bool), LibraryError> {
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM books WHERE title = ? AND author = ?",
                params![&book.title, &book.author],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        if let Some(id) = existing {
            conn.execute(
                "UPDATE books SET instances = instances + 1, year = MIN(year, ?) WHERE id = ?",
                params![year, id],
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;
            debug!("Merged occurrence of '{}' by {}", book.title, book.author);
            Ok((id, false))
        } else {
            conn.execute(
                "INSERT INTO books (title, author, life_span, year, isbn, pages, avg_rating, ratings_count, image_id, book_url, instances)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
                params![
                    &book.title,
                    &book.author,
                    &book.life_span,
                    year,
                    &book.isbn,
                    &book.pages,
                    &book.avg_rating,
                    &book.ratings_count,
                    &book.image_id,
                    &book.book_url,
                ],
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;
            Ok((conn.last_insert_rowid(), true))
        }
    }

    fn upsert_genre_inner(conn: &Connection, name: &str) -> Result<i64, LibraryError> {
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM genres WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute("INSERT INTO genres (name) VALUES (?)", params![name])
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    fn link_inner(conn: &Connection, book_id: i64, genre_id: i64) -> Result<(), LibraryError> {
        conn.execute(
            "INSERT OR IGNORE INTO book_genre (book_id, genre_id) VALUES (?, ?)",
            params![book_id, genre_id],
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(())
    }

    fn row_to_stored_book(row: &rusqlite::Row) -> rusqlite::Result<StoredBook> {
        Ok(StoredBook {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            life_span: row.get(3)?,
            year: row.get(4)?,
            isbn: row.get(5)?,
            pages: row.get(6)?,
            avg_rating: row.get(7)?,
            ratings_count: row.get(8)?,
            image_id: row.get(9)?,
            book_url: row.get(10)?,
            instances: row.get(11)?,
        })
    }
}

const BOOK_COLUMNS: &str = "id, title, author, life_span, year, isbn, pages, avg_rating, ratings_count, image_id, book_url, instances";

impl Library for SqliteLibrary {
    fn upsert_book(&self, book: &NewBook, year: i32) -> Result<i64, LibraryError> {
        let conn = self.conn.lock().unwrap();
        Self::upsert_book_inner(&conn, book, year).map(|(id, _)| id)
    }

    fn upsert_genre(&self, name: &str) -> Result<i64, LibraryError> {
        let conn = self.conn.lock().unwrap();
        Self::upsert_genre_inner(&conn, name)
    }

    fn link_book_genre(&self, book_id: i64, genre_id: i64) -> Result<(), LibraryError> {
        let conn = self.conn.lock().unwrap();
        Self::link_inner(&conn, book_id, genre_id)
    }

    fn merge_snapshot(
        &self,
        books: &[NewBook],
        year: i32,
    ) -> Result<SnapshotOutcome, LibraryError> {
        let conn = self.conn.lock().unwrap();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let mut outcome = SnapshotOutcome::default();
        for book in books {
            let (book_id, inserted) = Self::upsert_book_inner(&tx, book, year)?;
            if inserted {
                outcome.books_new += 1;
            } else {
                outcome.books_merged += 1;
            }

            for genre in &book.genres {
                let genre_id = Self::upsert_genre_inner(&tx, genre)?;
                Self::link_inner(&tx, book_id, genre_id)?;
            }
        }

        tx.commit().map_err(|e| LibraryError::Database(e.to_string()))?;
        Ok(outcome)
    }

    fn get(&self, title: &str, author: &str) -> Result<StoredBook, LibraryError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE title = ? AND author = ?"),
            params![title, author],
            Self::row_to_stored_book,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                LibraryError::NotFound(format!("{title} by {author}"))
            }
            _ => LibraryError::Database(e.to_string()),
        })
    }

    fn genres_of(&self, book_id: i64) -> Result<Vec<String>, LibraryError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT g.name FROM genres g
                 JOIN book_genre bg ON bg.genre_id = g.id
                 WHERE bg.book_id = ?
                 ORDER BY g.name",
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![book_id], |row| row.get(0))
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let mut genres = Vec::new();
        for row in rows {
            genres.push(row.map_err(|e| LibraryError::Database(e.to_string()))?);
        }
        Ok(genres)
    }

    fn stats(&self) -> Result<LibraryStats, LibraryError> {
        let conn = self.conn.lock().unwrap();

        let books: u64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let genres: u64 = conn
            .query_row("SELECT COUNT(*) FROM genres", [], |row| row.get(0))
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let links: u64 = conn
            .query_row("SELECT COUNT(*) FROM book_genre", [], |row| row.get(0))
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(LibraryStats {
            books,
            genres,
            links,
        })
    }

    fn remove(&self, title: &str, author: &str) -> Result<(), LibraryError> {
        let conn = self.conn.lock().unwrap();

        // Cascades to book_genre
        let rows_affected = conn
            .execute(
                "DELETE FROM books WHERE title = ? AND author = ?",
                params![title, author],
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(LibraryError::NotFound(format!("{title} by {author}")));
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), LibraryError> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            "DELETE FROM book_genre;
             DELETE FROM genres;
             DELETE FROM books;",
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(())
    }
}
