//! Item feed writer: JSON Lines or a single JSON array.

use std::io::Write;

use alkoharvest_core::NormalizedItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// One JSON object per line.
    Jsonl,
    /// A single JSON array.
    Json,
}

/// Counts reported once the feed is closed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExportStats {
    pub written: usize,
    pub discounted: usize,
}

pub(crate) struct ItemWriter<W: Write> {
    out: W,
    format: OutputFormat,
    stats: ExportStats,
}

impl<W: Write> ItemWriter<W> {
    pub(crate) fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            stats: ExportStats::default(),
        }
    }

    pub(crate) fn write_item(&mut self, item: &NormalizedItem) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut self.out, item)?;
                self.out.write_all(b"\n")?;
            }
            OutputFormat::Json => {
                let sep: &[u8] = if self.stats.written == 0 { b"[\n" } else { b",\n" };
                self.out.write_all(sep)?;
                serde_json::to_writer(&mut self.out, item)?;
            }
        }
        self.stats.written += 1;
        if item.is_discounted() {
            self.stats.discounted += 1;
        }
        Ok(())
    }

    /// Closes the array (JSON format) and flushes.
    pub(crate) fn finish(mut self) -> anyhow::Result<(W, ExportStats)> {
        if self.format == OutputFormat::Json {
            let tail: &[u8] = if self.stats.written == 0 { b"[]\n" } else { b"\n]\n" };
            self.out.write_all(tail)?;
        }
        self.out.flush()?;
        Ok((self.out, self.stats))
    }
}
