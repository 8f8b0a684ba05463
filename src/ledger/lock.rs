//! Exclusive advisory lock on a sibling lock file.
//!
//! Advisory locks die with their file handle, so a crashed writer never
//! wedges the ledger; the lock file itself is left in place because removing
//! it would let a waiter lock a stale inode while a newcomer locks a fresh
//! one.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::thread;

use fs2::FileExt;
use log::debug;

use crate::ledger::retry::RetryPolicy;

/// Held for the duration of one read-modify-write transaction; released on
/// drop.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Acquire the lock at `path`, retrying per `policy`. Exhausting the
    /// budget returns `ErrorKind::WouldBlock`; callers translate that into
    /// their own contention error.
    pub fn acquire(path: &Path, policy: &RetryPolicy) -> io::Result<FileLock> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).write(true).open(path)?;

        for attempt in 0..policy.attempts() {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(FileLock { file }),
                Err(err) if is_contention(&err) => match policy.delay_for(attempt) {
                    Some(delay) => {
                        debug!(
                            "lock {} busy (attempt {}), backing off {:?}",
                            path.display(),
                            attempt + 1,
                            delay
                        );
                        thread::sleep(delay);
                    }
                    None => break,
                },
                Err(err) => return Err(err),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            format!(
                "gave up locking {} after {} attempts",
                path.display(),
                policy.attempts()
            ),
        ))
    }
}

fn is_contention(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
