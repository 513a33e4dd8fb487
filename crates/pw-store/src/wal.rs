// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only, newline-delimited JSON write-ahead log, generic over the
//! operation payload type.
//!
//! Mirrors the teacher's `storage::Wal` contract: `open` tolerates a
//! corrupt or truncated tail by rotating it to a numbered `.bak` file and
//! continuing with whatever prefix of valid entries it could recover;
//! `entries_after`/`next_unprocessed` read only from the in-memory replay
//! buffer built at `open`, so corruption appended to the file after open
//! (by some other process) is invisible until the next `open`.
//!
//! `open` also accepts the `:memory:` / `memory://<name>` DSN forms
//! `spec.md` §4.A requires: an anonymous `:memory:` log is a fresh,
//! private buffer that vanishes when the `Wal` is dropped; a named
//! `memory://<name>` log is shared process-wide by name, so two `Db::open`
//! calls with the same name see the same entries, the way a real shared
//! in-memory database would.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

const FLUSH_THRESHOLD: usize = 100;
const FLUSH_INTERVAL: Duration = Duration::from_millis(50);
const MAX_BACKUPS: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalLine<Op> {
    seq: u64,
    event: Op,
}

/// One decoded entry returned by [`Wal::next_unprocessed`] / `entries_after`.
#[derive(Debug, Clone)]
pub struct WalEntry<Op> {
    pub seq: u64,
    pub event: Op,
}

type MemoryBuffer = Arc<Mutex<Vec<u8>>>;

static MEMORY_WALS: OnceLock<Mutex<HashMap<String, MemoryBuffer>>> = OnceLock::new();

fn memory_registry() -> &'static Mutex<HashMap<String, MemoryBuffer>> {
    MEMORY_WALS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// `Some(None)` for the anonymous `:memory:` form, `Some(Some(name))` for
/// `memory://<name>`, `None` if `path` names a real file.
pub(crate) fn memory_dsn_name(path: &Path) -> Option<Option<String>> {
    let raw = path.to_str()?;
    if raw == ":memory:" {
        Some(None)
    } else {
        raw.strip_prefix("memory://").map(|name| Some(name.to_string()))
    }
}

enum Storage {
    File(File),
    Memory(MemoryBuffer),
}

impl Storage {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Storage::File(file) => file.write_all(bytes),
            Storage::Memory(buffer) => {
                buffer.lock().extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Storage::File(file) => {
                file.flush()?;
                file.sync_data()
            }
            // Already durable the moment it's written — there's no
            // separate OS page cache to force for a `Vec<u8>` behind a lock.
            Storage::Memory(_) => Ok(()),
        }
    }

    /// Replaces the entire backing store's contents with `bytes`, used to
    /// compact the log (`Wal::truncate_before`) or rewrite it clean after a
    /// corrupt tail was dropped.
    fn rewrite(&mut self, bytes: &[u8], path: &Path) -> io::Result<()> {
        match self {
            Storage::File(file) => {
                let mut fresh = File::create(path)?;
                fresh.write_all(bytes)?;
                fresh.sync_all()?;
                *file = OpenOptions::new().append(true).open(path)?;
                Ok(())
            }
            Storage::Memory(buffer) => {
                let mut guard = buffer.lock();
                guard.clear();
                guard.extend_from_slice(bytes);
                Ok(())
            }
        }
    }
}

pub struct Wal<Op> {
    path: PathBuf,
    storage: Storage,
    entries: Vec<WalEntry<Op>>,
    write_seq: u64,
    processed_seq: u64,
    read_cursor: u64,
    unflushed: usize,
    last_flush: Instant,
}

impl<Op> Wal<Op>
where
    Op: Serialize + DeserializeOwned + Clone,
{
    /// Opens (creating if absent) the WAL at `path`, replaying every valid
    /// entry into memory. `processed_seq` seeds both the "already durable"
    /// marker and the initial read cursor, matching recovery from a
    /// snapshot taken after that sequence number. `path` may also be a
    /// `:memory:` / `memory://<name>` DSN (see module docs).
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        match memory_dsn_name(&path) {
            Some(name) => Self::open_memory(path, name, processed_seq),
            None => Self::open_file(path, processed_seq),
        }
    }

    fn open_file(path: PathBuf, processed_seq: u64) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = fs::read(&path).unwrap_or_default();
        let (entries, consumed) = Self::parse_prefix(&raw);
        let corrupt = consumed < raw.len();

        if corrupt {
            Self::rotate_backups(&path)?;
            Self::write_clean(&path, &entries)?;
        } else if !path.exists() {
            File::create(&path)?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);
        let file = OpenOptions::new().append(true).open(&path)?;

        Ok(Self {
            path,
            storage: Storage::File(file),
            entries,
            write_seq,
            processed_seq,
            read_cursor: processed_seq,
            unflushed: 0,
            last_flush: Instant::now(),
        })
    }

    /// `name: None` gets a brand-new, unshared buffer; `Some(name)` gets
    /// (or creates) the process-wide buffer registered under `name`, so a
    /// second `open` with the same name replays the first's entries.
    fn open_memory(path: PathBuf, name: Option<String>, processed_seq: u64) -> io::Result<Self> {
        let buffer = match name {
            Some(name) => memory_registry().lock().entry(name).or_default().clone(),
            None => Arc::new(Mutex::new(Vec::new())),
        };
        let raw = buffer.lock().clone();
        let (entries, _consumed) = Self::parse_prefix(&raw);
        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);

        Ok(Self {
            path,
            storage: Storage::Memory(buffer),
            entries,
            write_seq,
            processed_seq,
            read_cursor: processed_seq,
            unflushed: 0,
            last_flush: Instant::now(),
        })
    }

    /// Parses as many whole `WalLine`s as possible from the front of `raw`,
    /// returning the decoded entries and the byte offset up to which
    /// parsing succeeded. A byte offset short of `raw.len()` means
    /// whatever follows is corrupt (non-UTF8, invalid JSON, or a partial
    /// write) and must be rotated away.
    fn parse_prefix(raw: &[u8]) -> (Vec<WalEntry<Op>>, usize) {
        let mut entries = Vec::new();
        let mut offset = 0usize;
        let mut reader = BufReader::new(raw);
        loop {
            let mut line = Vec::new();
            let read = match reader.read_until(b'\n', &mut line) {
                Ok(n) => n,
                Err(_) => break,
            };
            if read == 0 {
                break;
            }
            let trimmed: &[u8] =
                if line.last() == Some(&b'\n') { &line[..line.len() - 1] } else { &line[..] };
            if trimmed.is_empty() {
                offset += read;
                continue;
            }
            match serde_json::from_slice::<WalLine<Op>>(trimmed) {
                Ok(parsed) => {
                    offset += read;
                    entries.push(WalEntry { seq: parsed.seq, event: parsed.event });
                }
                Err(_) => break,
            }
        }
        (entries, offset)
    }

    /// Shifts `.bak` → `.bak.2` → `.bak.3`, evicting whatever was in
    /// `.bak.3`, then moves the current (corrupt) file into `.bak`. Keeps
    /// at most [`MAX_BACKUPS`] generations.
    fn rotate_backups(path: &Path) -> io::Result<()> {
        let bak1 = path.with_extension("bak");
        let bak2 = path.with_extension("bak.2");
        let bak3 = path.with_extension("bak.3");
        debug_assert_eq!(MAX_BACKUPS, 3, "rotation chain is hard-coded to 3 generations");

        if bak3.exists() {
            fs::remove_file(&bak3)?;
        }
        if bak2.exists() {
            fs::rename(&bak2, &bak3)?;
        }
        if bak1.exists() {
            fs::rename(&bak1, &bak2)?;
        }
        if path.exists() {
            fs::rename(path, &bak1)?;
        }
        Ok(())
    }

    fn write_clean(path: &Path, entries: &[WalEntry<Op>]) -> io::Result<()> {
        let mut file = File::create(path)?;
        for entry in entries {
            let line = WalLine { seq: entry.seq, event: entry.event.clone() };
            serde_json::to_writer(&mut file, &line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            file.write_all(b"\n")?;
        }
        file.sync_all()?;
        Ok(())
    }

    fn serialize_entries(entries: &[WalEntry<Op>]) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        for entry in entries {
            let line = WalLine { seq: entry.seq, event: entry.event.clone() };
            serde_json::to_writer(&mut bytes, &line)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            bytes.push(b'\n');
        }
        Ok(bytes)
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Appends one entry, assigning it the next sequence number. Buffered
    /// until `flush()` (or the threshold in `needs_flush()` prompts the
    /// caller to flush).
    pub fn append(&mut self, event: &Op) -> io::Result<u64> {
        let seq = self.write_seq + 1;
        let line = WalLine { seq, event: event.clone() };
        let mut bytes = serde_json::to_vec(&line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        bytes.push(b'\n');
        self.storage.write_all(&bytes)?;
        self.entries.push(WalEntry { seq, event: event.clone() });
        self.write_seq = seq;
        self.unflushed += 1;
        Ok(seq)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.storage.flush()?;
        self.unflushed = 0;
        self.last_flush = Instant::now();
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD
            || (self.unflushed > 0 && self.last_flush.elapsed() >= FLUSH_INTERVAL)
    }

    /// Returns and consumes the next entry past the internal read cursor,
    /// regardless of `mark_processed`. Returns `None` (never an error) once
    /// the cursor reaches `write_seq`.
    pub fn next_unprocessed(&mut self) -> io::Result<Option<WalEntry<Op>>> {
        let next_seq = self.read_cursor + 1;
        if next_seq > self.write_seq {
            return Ok(None);
        }
        let found = self.entries.iter().find(|e| e.seq == next_seq).cloned();
        if let Some(entry) = &found {
            self.read_cursor = entry.seq;
        }
        Ok(found)
    }

    /// Marks `seq` as durably processed (e.g. covered by a snapshot).
    /// Independent of the `next_unprocessed` read cursor.
    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    /// All replayed entries with `seq > after`, in order.
    pub fn entries_after(&self, after: u64) -> io::Result<Vec<WalEntry<Op>>> {
        Ok(self.entries.iter().filter(|e| e.seq > after).cloned().collect())
    }

    /// Compacts the log, dropping entries with `seq < keep_from` from both
    /// memory and the backing store.
    pub fn truncate_before(&mut self, keep_from: u64) -> io::Result<()> {
        self.entries.retain(|e| e.seq >= keep_from);
        let bytes = Self::serialize_entries(&self.entries)?;
        self.storage.rewrite(&bytes, &self.path)?;
        self.unflushed = 0;
        Ok(())
    }
}
