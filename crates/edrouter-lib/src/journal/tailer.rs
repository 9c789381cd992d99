//! Incremental reader for a journal file that another process keeps appending to.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::state::Location;

use super::events::{parse_line, JournalEvent, Loadout};

const JOURNAL_PREFIX: &str = "Journal.";
const JOURNAL_SUFFIX: &str = ".log";

/// Polling reader over a single journal file.
///
/// The tailer starts at end-of-file and only ever yields events appended after
/// it was opened. Incomplete trailing lines are held back until the writer
/// finishes them.
#[derive(Debug)]
pub struct JournalTailer {
    path: PathBuf,
    file: File,
    position: u64,
    pending: Vec<u8>,
    lines_read: u64,
    malformed: u64,
}

impl JournalTailer {
    /// Open `path` and position the tailer at its current end.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|err| unavailable_or_io(path, err))?;
        let position = file.seek(SeekFrom::End(0))?;
        info!(path = %path.display(), offset = position, "attached journal tailer");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            position,
            pending: Vec::new(),
            lines_read: 0,
            malformed: 0,
        })
    }

    /// Path of the tailed journal.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset up to which the file has been consumed.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of lines skipped because they could not be parsed.
    pub fn malformed_lines(&self) -> u64 {
        self.malformed
    }

    /// Read everything appended since the previous poll.
    ///
    /// Returns an empty vector when nothing new is available. Fails with
    /// [`Error::FileUnavailable`] once the file disappears or shrinks below the
    /// consumed offset; the tailer is unusable after that.
    pub fn poll(&mut self) -> Result<Vec<JournalEvent>> {
        let length = fs::metadata(&self.path)
            .map_err(|err| unavailable_or_io(&self.path, err))?
            .len();

        if length < self.position {
            warn!(
                path = %self.path.display(),
                length,
                position = self.position,
                "journal shrank underneath the tailer"
            );
            return Err(Error::FileUnavailable {
                path: self.path.clone(),
            });
        }
        if length == self.position {
            return Ok(Vec::new());
        }

        self.file.seek(SeekFrom::Start(self.position))?;
        let mut chunk = Vec::with_capacity((length - self.position) as usize);
        let read = (&mut self.file)
            .take(length - self.position)
            .read_to_end(&mut chunk)?;
        self.position += read as u64;
        self.pending.extend_from_slice(&chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.lines_read += 1;
            let text = String::from_utf8_lossy(&line);
            match parse_line(self.lines_read, &text) {
                Ok(Some(event)) => {
                    trace!(kind = event.kind(), "journal event");
                    events.push(event);
                }
                Ok(None) => {}
                Err(err) => {
                    self.malformed += 1;
                    warn!(path = %self.path.display(), error = %err, "skipping journal line");
                }
            }
        }

        debug!(
            path = %self.path.display(),
            bytes = read,
            events = events.len(),
            "polled journal"
        );
        Ok(events)
    }
}

/// Snapshot reconstructed from a full pass over an existing journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayedState {
    pub loadout: Option<Loadout>,
    pub location: Option<Location>,
    pub cargo: Option<u32>,
    pub shut_down: bool,
}

/// Scan a journal from the start, keeping only the last occurrence of each
/// event relevant to the live state.
pub fn replay(path: &Path) -> Result<ReplayedState> {
    let file = File::open(path).map_err(|err| unavailable_or_io(path, err))?;
    let reader = BufReader::new(file);
    let mut state = ReplayedState::default();

    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let text = String::from_utf8_lossy(&line);
        match parse_line(index as u64 + 1, &text) {
            Ok(Some(JournalEvent::Loadout(loadout))) => state.loadout = Some(loadout),
            Ok(Some(
                JournalEvent::FsdJump(arrival)
                | JournalEvent::CarrierJump(arrival)
                | JournalEvent::Location(arrival),
            )) => {
                state.location = Some(Location::from_arrival(&arrival));
            }
            Ok(Some(JournalEvent::Cargo(cargo))) => state.cargo = Some(cargo.count),
            Ok(Some(JournalEvent::Shutdown)) => state.shut_down = true,
            Ok(Some(JournalEvent::LoadGame)) => state.shut_down = false,
            Ok(_) => {}
            Err(err) => warn!(path = %path.display(), error = %err, "skipping journal line"),
        }
    }

    debug!(
        path = %path.display(),
        has_loadout = state.loadout.is_some(),
        has_location = state.location.is_some(),
        shut_down = state.shut_down,
        "replayed journal"
    );
    Ok(state)
}

/// Replay an existing journal and attach a tailer at its end.
pub fn open_with_replay(path: &Path) -> Result<(ReplayedState, JournalTailer)> {
    let replayed = replay(path)?;
    let tailer = JournalTailer::open(path)?;
    Ok((replayed, tailer))
}

/// Locate the newest `Journal.*.log` file in a journal directory.
///
/// The game names journals with a sortable timestamp, so the lexicographically
/// greatest name wins; modification time breaks ties between equal names
/// differing only in case.
pub fn latest_journal(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|err| unavailable_or_io(dir, err))?;

    let mut newest: Option<(String, std::time::SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !(name.starts_with(JOURNAL_PREFIX) && name.ends_with(JOURNAL_SUFFIX)) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(std::time::UNIX_EPOCH);
        let candidate = (name.to_ascii_lowercase(), modified, entry.path());
        let replace = match &newest {
            Some((best_name, best_modified, _)) => {
                (&candidate.0, candidate.1) > (best_name, *best_modified)
            }
            None => true,
        };
        if replace {
            newest = Some(candidate);
        }
    }

    newest
        .map(|(_, _, path)| path)
        .ok_or_else(|| Error::JournalDirEmpty {
            path: dir.to_path_buf(),
        })
}

fn unavailable_or_io(path: &Path, err: io::Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        Error::FileUnavailable {
            path: path.to_path_buf(),
        }
    } else {
        Error::Io(err)
    }
}
