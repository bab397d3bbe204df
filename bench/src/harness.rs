//! Harness adapter: the connection lifecycle around a timed callback and the
//! iteration loop every case shares.
//!
//! The external benchmark runner decides how many iterations to ask for and
//! what to do with the elapsed time. This module guarantees that only the
//! iterations are timed, that the session is closed exactly once, and that
//! the first error aborts the invocation.

use crate::cases::Plan;
use crate::error::{BenchError, BoxError, Result};
use crate::session::{Connector, Cursor, Session};
use log::{debug, error};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on how long closing a session may take.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a session, time `f` against it, then close the session.
///
/// Connection setup and teardown are excluded from the returned duration.
/// If `f` fails, its error is returned and a close failure is only logged;
/// otherwise a close failure is the result.
pub fn with_session<C, F>(connector: &C, f: F) -> Result<Duration>
where
    C: Connector,
    F: FnOnce(&mut C::Session) -> Result<()>,
{
    with_session_timeout(connector, CLOSE_TIMEOUT, f)
}

pub fn with_session_timeout<C, F>(connector: &C, close_timeout: Duration, f: F) -> Result<Duration>
where
    C: Connector,
    F: FnOnce(&mut C::Session) -> Result<()>,
{
    let mut guard = SessionGuard::new(connector.connect()?, close_timeout);

    let start = Instant::now();
    let outcome = f(guard.session_mut());
    let elapsed = start.elapsed();

    match (outcome, guard.close()) {
        (Ok(()), Ok(())) => Ok(elapsed),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            error!("closing session after failed run: {close_err}");
            Err(err)
        }
    }
}

/// Run `iterations` executions of `plan` on an open session.
///
/// Every result is drained before the next query is issued. The first error,
/// whether raised on issue or while draining, ends the loop.
pub fn run_iterations<S: Session>(session: &mut S, plan: &Plan, iterations: u64) -> Result<()> {
    match plan {
        Plan::Query { sql, args } => {
            for iteration in 0..iterations {
                let mut rows = session.query(sql, args);
                rows.close();
                if let Some(err) = rows.take_err() {
                    return Err(BenchError::query(iteration, err));
                }
            }
        }
        Plan::Batch(batch) => {
            for iteration in 0..iterations {
                session
                    .send_batch(batch)
                    .map_err(|err| BenchError::query(iteration, err))?;
            }
        }
    }
    Ok(())
}

/// One benchmark invocation: connect, time `iterations` runs of `plan`,
/// close. Returns the time spent in the loop.
pub fn run_case<C: Connector>(connector: &C, plan: &Plan, iterations: u64) -> Result<Duration> {
    with_session(connector, |session| run_iterations(session, plan, iterations))
}

/// Close `session` on a helper thread and wait at most `timeout` for it.
///
/// A close that outlives the timeout is abandoned; its thread finishes (or
/// not) in the background.
pub fn close_with_timeout<S: Session>(session: S, timeout: Duration) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("pl-bench-close".into())
        .spawn(move || {
            let closed: std::result::Result<(), BoxError> = session.close().map_err(Into::into);
            let _ = tx.send(closed);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(())) => {
            debug!("session closed");
            Ok(())
        }
        Ok(Err(err)) => Err(BenchError::Close(err)),
        Err(RecvTimeoutError::Timeout) => Err(BenchError::CloseTimeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => {
            Err(BenchError::Close("close thread exited without a result".into()))
        }
    }
}

/// Owns the session for the duration of a run and closes it exactly once:
/// explicitly through [`SessionGuard::close`], or on drop when the run
/// panicked.
struct SessionGuard<S: Session> {
    session: Option<S>,
    timeout: Duration,
}

impl<S: Session> SessionGuard<S> {
    fn new(session: S, timeout: Duration) -> Self {
        Self {
            session: Some(session),
            timeout,
        }
    }

    fn session_mut(&mut self) -> &mut S {
        self.session
            .as_mut()
            .expect("session is only taken when the guard is closed")
    }

    fn close(mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => close_with_timeout(session, self.timeout),
            None => Ok(()),
        }
    }
}

impl<S: Session> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(err) = close_with_timeout(session, self.timeout) {
                error!("closing session after aborted run: {err}");
            }
        }
    }
}
