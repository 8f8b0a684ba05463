//! Filesystem helpers shared by the ledger and the processed-marker store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Serialize `value` as pretty JSON into a sibling `.tmp` file, then rename
/// it over `path`. A crash mid-write leaves the previous contents intact.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, payload)?;
    fs::rename(&tmp, path)
}
