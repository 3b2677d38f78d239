//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listing over `books` and its relations.
//! - Own find-or-create resolution for name-keyed reference rows.
//!
//! # Invariants
//! - Multi-row writes (book + author links) happen in one transaction.
//! - `country`/`publisher` must already exist when a book is written;
//!   authors are created on demand.
//! - Listing order is `name, release_date, id`.

use crate::db::DbError;
use crate::model::book::{Book, BookDraft, BookId, BookPatch, BookValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    b.id,
    b.name,
    b.isbn,
    b.number_of_pages,
    b.release_date,
    c.name AS country,
    p.name AS publisher
FROM books b
INNER JOIN countries c ON c.id = b.country_id
INNER JOIN publishers p ON p.id = b.publisher_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    UnknownCountry(String),
    UnknownPublisher(String),
    DuplicateIsbn(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::UnknownCountry(name) => write!(f, "Country {name} does not exist."),
            Self::UnknownPublisher(name) => write!(f, "Publisher {name} does not exist."),
            Self::DuplicateIsbn(isbn) => write!(f, "book with isbn {isbn} already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing books. All present fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListFilter {
    /// Exact book name match.
    pub name: Option<String>,
    /// Exact ISBN match.
    pub isbn: Option<String>,
    /// Match by publisher name, not id.
    pub publisher: Option<String>,
    /// Calendar year of the release date.
    pub release_year: Option<i32>,
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    fn create_book(&mut self, draft: &BookDraft) -> RepoResult<Book>;
    fn update_book(&mut self, id: BookId, patch: &BookPatch) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(&self, filter: &BookListFilter) -> RepoResult<Vec<Book>>;
    /// Deletes the book and returns its last persisted state.
    fn delete_book(&mut self, id: BookId) -> RepoResult<Book>;
    fn find_or_create_author(&mut self, name: &str) -> RepoResult<i64>;
    fn find_or_create_country(&mut self, name: &str) -> RepoResult<i64>;
    fn find_or_create_publisher(&mut self, name: &str) -> RepoResult<i64>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&mut self, draft: &BookDraft) -> RepoResult<Book> {
        draft.validate()?;

        let tx = self.conn.transaction()?;

        let country_id = entity_id_by_name(&tx, "countries", &draft.country)?
            .ok_or_else(|| RepoError::UnknownCountry(draft.country.clone()))?;
        let publisher_id = entity_id_by_name(&tx, "publishers", &draft.publisher)?
            .ok_or_else(|| RepoError::UnknownPublisher(draft.publisher.clone()))?;

        tx.execute(
            "INSERT INTO books (
                name,
                isbn,
                country_id,
                publisher_id,
                number_of_pages,
                release_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                draft.name.as_str(),
                draft.isbn.as_str(),
                country_id,
                publisher_id,
                draft.number_of_pages,
                draft.release_date.format("%Y-%m-%d").to_string(),
            ],
        )
        .map_err(|err| map_isbn_conflict(err, &draft.isbn))?;
        let book_id = tx.last_insert_rowid();

        link_authors(&tx, book_id, &draft.authors)?;

        let book = load_book(&tx, book_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created book {book_id} missing on read-back"))
        })?;
        tx.commit()?;

        Ok(book)
    }

    fn update_book(&mut self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        patch.validate()?;

        let tx = self.conn.transaction()?;

        if !book_exists(&tx, id)? {
            return Err(RepoError::NotFound(id));
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &patch.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(isbn) = &patch.isbn {
            assignments.push("isbn = ?");
            bind_values.push(Value::Text(isbn.clone()));
        }
        if let Some(pages) = patch.number_of_pages {
            assignments.push("number_of_pages = ?");
            bind_values.push(Value::Integer(pages));
        }
        if let Some(release_date) = patch.release_date {
            assignments.push("release_date = ?");
            bind_values.push(Value::Text(release_date.format("%Y-%m-%d").to_string()));
        }
        if let Some(country) = &patch.country {
            let country_id = entity_id_by_name(&tx, "countries", country)?
                .ok_or_else(|| RepoError::UnknownCountry(country.clone()))?;
            assignments.push("country_id = ?");
            bind_values.push(Value::Integer(country_id));
        }
        if let Some(publisher) = &patch.publisher {
            let publisher_id = entity_id_by_name(&tx, "publishers", publisher)?
                .ok_or_else(|| RepoError::UnknownPublisher(publisher.clone()))?;
            assignments.push("publisher_id = ?");
            bind_values.push(Value::Integer(publisher_id));
        }

        if !assignments.is_empty() {
            let sql = format!("UPDATE books SET {} WHERE id = ?;", assignments.join(", "));
            bind_values.push(Value::Integer(id));
            tx.execute(&sql, params_from_iter(bind_values)).map_err(|err| {
                match &patch.isbn {
                    Some(isbn) => map_isbn_conflict(err, isbn),
                    None => err.into(),
                }
            })?;
        }

        // Authors present in the patch replace the full link set; an omitted
        // field keeps the existing links untouched.
        if let Some(authors) = &patch.authors {
            tx.execute("DELETE FROM book_authors WHERE book_id = ?1;", [id])?;
            link_authors(&tx, id, authors)?;
        }

        let book = load_book(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("updated book {id} missing on read-back"))
        })?;
        tx.commit()?;

        Ok(book)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        load_book(self.conn, id)
    }

    fn list_books(&self, filter: &BookListFilter) -> RepoResult<Vec<Book>> {
        let mut sql = format!("{BOOK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &filter.name {
            sql.push_str(" AND b.name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(isbn) = &filter.isbn {
            sql.push_str(" AND b.isbn = ?");
            bind_values.push(Value::Text(isbn.clone()));
        }
        if let Some(publisher) = &filter.publisher {
            sql.push_str(" AND p.name = ?");
            bind_values.push(Value::Text(publisher.clone()));
        }
        if let Some(year) = filter.release_year {
            sql.push_str(" AND CAST(strftime('%Y', b.release_date) AS INTEGER) = ?");
            bind_values.push(Value::Integer(i64::from(year)));
        }

        sql.push_str(" ORDER BY b.name ASC, b.release_date ASC, b.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(self.conn, row)?);
        }

        Ok(books)
    }

    fn delete_book(&mut self, id: BookId) -> RepoResult<Book> {
        let tx = self.conn.transaction()?;

        let book = load_book(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        // Author link rows cascade via ON DELETE CASCADE.
        tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(book)
    }

    fn find_or_create_author(&mut self, name: &str) -> RepoResult<i64> {
        find_or_create_entity(self.conn, "authors", name)
    }

    fn find_or_create_country(&mut self, name: &str) -> RepoResult<i64> {
        find_or_create_entity(self.conn, "countries", name)
    }

    fn find_or_create_publisher(&mut self, name: &str) -> RepoResult<i64> {
        find_or_create_entity(self.conn, "publishers", name)
    }
}

/// Resolves a name-keyed row id, creating the row when absent.
///
/// Idempotent: the UNIQUE(name) constraint plus `INSERT OR IGNORE` make
/// concurrent duplicate calls converge on one row.
fn find_or_create_entity(conn: &Connection, table: &'static str, name: &str) -> RepoResult<i64> {
    if let Some(id) = entity_id_by_name(conn, table, name)? {
        return Ok(id);
    }

    conn.execute(
        &format!("INSERT OR IGNORE INTO {table} (name) VALUES (?1);"),
        [name],
    )?;
    entity_id_by_name(conn, table, name)?.ok_or_else(|| {
        RepoError::InvalidData(format!("{table} row for `{name}` missing after insert"))
    })
}

fn entity_id_by_name(
    conn: &Connection,
    table: &'static str,
    name: &str,
) -> RepoResult<Option<i64>> {
    let mut stmt = conn.prepare(&format!("SELECT id FROM {table} WHERE name = ?1;"))?;
    let mut rows = stmt.query([name])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

fn link_authors(conn: &Connection, book_id: BookId, authors: &[String]) -> RepoResult<()> {
    for author in authors {
        let author_id = find_or_create_entity(conn, "authors", author)?;
        conn.execute(
            "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2);",
            params![book_id, author_id],
        )?;
    }
    Ok(())
}

fn book_exists(conn: &Connection, id: BookId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_book(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE b.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(conn, row)?));
    }
    Ok(None)
}

fn parse_book_row(conn: &Connection, row: &rusqlite::Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;
    let release_date_text: String = row.get("release_date")?;
    let release_date = chrono::NaiveDate::parse_from_str(&release_date_text, "%Y-%m-%d")
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid release date `{release_date_text}` in books.release_date"
            ))
        })?;

    Ok(Book {
        id,
        name: row.get("name")?,
        isbn: row.get("isbn")?,
        authors: load_authors_for_book(conn, id)?,
        number_of_pages: row.get("number_of_pages")?,
        publisher: row.get("publisher")?,
        country: row.get("country")?,
        release_date,
    })
}

fn load_authors_for_book(conn: &Connection, book_id: BookId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT a.name
         FROM authors a
         INNER JOIN book_authors ba ON ba.author_id = a.id
         WHERE ba.book_id = ?1
         ORDER BY a.name ASC;",
    )?;
    let mut rows = stmt.query([book_id])?;
    let mut authors = Vec::new();
    while let Some(row) = rows.next()? {
        authors.push(row.get(0)?);
    }
    Ok(authors)
}

fn map_isbn_conflict(err: rusqlite::Error, isbn: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == ErrorCode::ConstraintViolation && message.contains("books.isbn") {
            return RepoError::DuplicateIsbn(isbn.to_string());
        }
    }
    err.into()
}
