//! Writing calendar documents to disk.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::generate::{generate_calendar, OutputStyle};
use crate::error::SeminarResult;
use crate::event::CalendarEvent;

/// Write the rendered calendar to any writer.
pub fn write_calendar<W: Write>(
    writer: &mut W,
    events: &[CalendarEvent],
    style: OutputStyle,
) -> SeminarResult<()> {
    writer.write_all(generate_calendar(events, style).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Symlinks followed before giving up and replacing the last one
const MAX_SYMLINK_HOPS: usize = 40;

/// Write the calendar to `path`.
///
/// The document goes to a temporary file next to the real target first and is
/// renamed into place once complete, so an interrupted write never leaves a
/// truncated calendar behind. The temporary file is removed on every error path.
///
/// If `path` is a symlink, the file it points to is replaced and the link is
/// kept. An existing file keeps its permissions; a new one gets 0644 on unix.
pub fn write_calendar_file(
    path: &Path,
    events: &[CalendarEvent],
    style: OutputStyle,
) -> SeminarResult<()> {
    let target = resolve_symlinks(path)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_calendar(&mut writer, events, style)?;
    }

    match fs::metadata(&target) {
        Ok(existing) => fs::set_permissions(tmp.path(), existing.permissions())?,
        // NamedTempFile is created 0600, calendars are meant to be shared
        Err(_) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644))?;
            }
        }
    }

    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Follow `path` through any symlinks to the file that should be replaced.
/// Dangling links resolve to their (missing) target.
fn resolve_symlinks(path: &Path) -> SeminarResult<PathBuf> {
    let mut current = path.to_path_buf();

    for _ in 0..MAX_SYMLINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            _ => return Ok(current),
        }
    }

    Ok(current)
}
