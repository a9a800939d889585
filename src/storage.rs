use crate::models::{CleanListing, RawListing};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::{info, warn};

/// Rows read back from a raw file
#[derive(Debug, Default)]
pub struct RawTable {
    pub rows: Vec<RawListing>,
    /// Records that failed to deserialize and were skipped
    pub skipped: usize,
}

pub fn encode_raw(rows: &[RawListing]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(RawListing::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("Failed to flush raw listings: {}", e.error()))
}

/// Parse raw file contents; malformed records are skipped, not fatal
pub fn decode_raw(bytes: &[u8]) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let mut table = RawTable::default();

    for (idx, record) in rdr.deserialize::<RawListing>().enumerate() {
        match record {
            Ok(row) => table.rows.push(row),
            Err(e) if e.is_io_error() => return Err(e).context("Failed to read raw listings"),
            Err(e) => {
                warn!("Skipping malformed raw record {}: {}", idx + 1, e);
                table.skipped += 1;
            }
        }
    }

    Ok(table)
}

pub fn encode_clean(rows: &[CleanListing]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(CleanListing::HEADERS)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("Failed to flush clean listings: {}", e.error()))
}

async fn write_file(path: &Path, bytes: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Overwrite `path` with the raw table
pub async fn write_raw(path: &Path, rows: &[RawListing]) -> Result<()> {
    write_file(path, encode_raw(rows)?).await?;
    info!("💾 Saved {} raw listings to {}", rows.len(), path.display());
    Ok(())
}

pub async fn read_raw(path: &Path) -> Result<RawTable> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read raw listings from {}", path.display()))?;
    let table = decode_raw(&bytes)?;
    info!(
        "Loaded {} raw listings from {} ({} malformed)",
        table.rows.len(),
        path.display(),
        table.skipped
    );
    Ok(table)
}

/// Overwrite `path` with the clean table
pub async fn write_clean(path: &Path, rows: &[CleanListing]) -> Result<()> {
    write_file(path, encode_clean(rows)?).await?;
    info!("💾 Saved {} clean listings to {}", rows.len(), path.display());
    Ok(())
}
