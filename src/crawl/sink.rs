// src/crawl/sink.rs
// =============================================================================
// This module writes found emails to the output file.
//
// Format: one line per address, the first page it was seen on:
//   sales@acme.io -> https://acme.io/contact
//
// The file is truncated when the sink is created, so every run starts clean.
//
// Checking "have we seen this address?" and appending the line happen while
// holding the same lock. Two workers finding the same address at the same
// time can't both write it: each address lands in the file at most once.
// =============================================================================

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// An address and the page it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRecord {
    pub address: String,
    pub source: String,
}

#[derive(Debug)]
struct SinkState {
    file: File,
    seen: HashSet<String>,
    records: Vec<EmailRecord>,
}

/// Append-only, deduplicating email output
#[derive(Debug)]
pub struct EmailSink {
    path: PathBuf,
    state: Mutex<SinkState>,
}

impl EmailSink {
    /// Creates (or truncates) the output file
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .await
            .with_context(|| format!("Failed to create output file {}", path.display()))?;

        Ok(EmailSink {
            path,
            state: Mutex::new(SinkState {
                file,
                seen: HashSet::new(),
                records: Vec::new(),
            }),
        })
    }

    /// Records an address found on `source`
    ///
    /// Returns Ok(true) if this address was new and has been written,
    /// Ok(false) if it had already been recorded.
    pub async fn record(&self, address: &str, source: &str) -> Result<bool> {
        let mut state = self.state.lock().await;

        if !state.seen.insert(address.to_string()) {
            return Ok(false);
        }

        let line = format!("{} -> {}\n", address, source);
        let written = async {
            state.file.write_all(line.as_bytes()).await?;
            state.file.flush().await
        }
        .await;

        if let Err(e) = written {
            // Not in the file, so it mustn't count as seen either
            state.seen.remove(address);
            return Err(e).with_context(|| format!("Failed to write to {}", self.path.display()));
        }

        state.records.push(EmailRecord {
            address: address.to_string(),
            source: source.to_string(),
        });
        Ok(true)
    }

    /// Number of distinct addresses recorded so far
    pub async fn len(&self) -> usize {
        self.state.lock().await.seen.len()
    }

    /// Everything recorded so far, in the order it was found
    pub async fn records(&self) -> Vec<EmailRecord> {
        self.state.lock().await.records.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
