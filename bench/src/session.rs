//! The seam between the benchmark harness and a database client.
//!
//! The harness only ever needs four things from a database: open a session,
//! issue a query and drain it, send a pre-built batch, and close the session.
//! Keeping that behind traits lets the iteration loop run against the real
//! PostgreSQL client (see [`crate::pg`]) or an in-process stub in tests.

use crate::error::{BoxError, Result};

/// Opens sessions. One session per benchmark invocation.
pub trait Connector {
    type Session: Session;

    fn connect(&self) -> Result<Self::Session>;
}

/// One live connection to the database.
///
/// `Send + 'static` so that [`crate::harness::close_with_timeout`] can hand
/// the session to a helper thread.
pub trait Session: Send + 'static {
    type Error: Into<BoxError>;

    /// Result handle for a single query. Borrows the session, so it has to
    /// be released before the next query can be issued.
    type Cursor<'a>: Cursor<Error = Self::Error>
    where
        Self: 'a;

    /// Issue `sql` with `args` bound as `int4` parameters.
    ///
    /// Never fails directly: an error raised while issuing the query is
    /// parked in the cursor and reported by [`Cursor::take_err`].
    fn query(&mut self, sql: &str, args: &[i32]) -> Self::Cursor<'_>;

    /// Execute every statement of `batch` in a single round trip.
    fn send_batch(&mut self, batch: &Batch) -> std::result::Result<(), Self::Error>;

    fn close(self) -> std::result::Result<(), Self::Error>;
}

/// Deferred-error result handle.
///
/// Callers must [`close`](Cursor::close) the cursor and then consult
/// [`take_err`](Cursor::take_err): some failures only surface while rows are
/// being read, so a successful issue does not mean a successful query.
pub trait Cursor {
    type Error;

    /// Read and discard any remaining rows. Idempotent.
    fn close(&mut self);

    /// The pending error, if issuing or draining the query failed.
    fn take_err(&mut self) -> Option<Self::Error>;
}

/// A client-side queue of statements sent to the server as one exchange.
///
/// The batch is assembled up front and only ever lent out by shared
/// reference afterwards, so its contents cannot change while timing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    sql: String,
    len: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch holding `count` copies of `statement`.
    pub fn repeat(statement: &str, count: usize) -> Self {
        let statement = statement.trim().trim_end_matches(';').trim_end();
        let mut batch = Batch {
            sql: String::with_capacity((statement.len() + 1) * count),
            len: 0,
        };
        for _ in 0..count {
            batch.queue(statement);
        }
        batch
    }

    pub fn queue(&mut self, statement: &str) {
        let statement = statement.trim().trim_end_matches(';').trim_end();
        if self.len > 0 {
            self.sql.push(';');
        }
        self.sql.push_str(statement);
        self.len += 1;
    }

    /// Number of queued statements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The batch as one multi-statement query string.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl<S: AsRef<str>> FromIterator<S> for Batch {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut batch = Batch::new();
        for statement in iter {
            batch.queue(statement.as_ref());
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_joins_statements_with_semicolons() {
        let batch = Batch::repeat("select 1", 3);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.sql(), "select 1;select 1;select 1");
    }

    #[test]
    fn trailing_semicolons_are_not_doubled() {
        let mut batch = Batch::new();
        batch.queue("select 1;");
        batch.queue("  select 2 ;");
        assert_eq!(batch.sql(), "select 1;select 2");
    }

    #[test]
    fn empty_batch() {
        let batch = Batch::repeat("select 1", 0);
        assert!(batch.is_empty());
        assert_eq!(batch.sql(), "");
    }

    #[test]
    fn collects_from_statement_list() {
        let batch: Batch = ["create table t (x int)", "drop table t"].into_iter().collect();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.sql(), "create table t (x int);drop table t");
    }

    #[test]
    fn large_batch_keeps_exact_count() {
        let batch = Batch::repeat("select 1", 1_000_000);
        assert_eq!(batch.len(), 1_000_000);
        assert_eq!(batch.sql().len(), "select 1;".len() * 1_000_000 - 1);
    }
}
