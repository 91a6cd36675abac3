use std::io::{self, Write};

use contents::Section;
use walk::{FileRecord, RecordSink, SinkError};

use crate::config::OutputFormat;

/// Key of the record array in the `json` document.
pub const DOCUMENT_KEY: &str = "file_permissions";

/// Progress through the `json` document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Document {
    NotStarted,
    InRecords,
    InSections,
}

/// Streams records and sections to a writer in one of the [`OutputFormat`]s.
///
/// Records are written as they arrive, so memory use does not grow with the
/// size of the census. Sections follow the records; the `json` format needs
/// [`RecordWriter::finish`] to close the document.
///
/// The first failed write closes the writer: later records and sections are
/// refused with [`SinkError::Closed`] without touching the output again.
pub struct RecordWriter<W: Write> {
    out: W,
    format: OutputFormat,
    written: u64,
    document: Document,
    failed: bool,
}

impl<W: Write> RecordWriter<W> {
    /// Creates a writer emitting `format` into `out`.
    pub const fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            written: 0,
            document: Document::NotStarted,
            failed: false,
        }
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Writes a named section.
    ///
    /// In the `json` document the section becomes a top-level object after
    /// the record array; `jsonl` writes `{"<key>": {...}}` on one line;
    /// `text` writes one `section=<key> key=<name> value=<value>` line per
    /// entry with the value escaped onto a single line.
    ///
    /// # Errors
    ///
    /// Propagates write failures and refuses to write once an earlier write
    /// failed.
    pub fn write_section(&mut self, key: &str, section: &Section) -> io::Result<()> {
        if self.failed {
            return Err(closed());
        }
        let result = self.emit_section(key, section);
        self.failed = result.is_err();
        result
    }

    /// Completes the output and flushes it.
    ///
    /// # Errors
    ///
    /// Propagates write and flush failures of the underlying writer, and
    /// fails without writing when an earlier write failed.
    pub fn finish(mut self) -> io::Result<W> {
        if self.failed {
            return Err(closed());
        }
        if self.format == OutputFormat::Json {
            self.open_document()?;
            if self.document == Document::InRecords {
                self.out.write_all(b"]")?;
            }
            self.out.write_all(b"}\n")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn open_document(&mut self) -> io::Result<()> {
        if self.document == Document::NotStarted {
            write!(self.out, "{{\"{DOCUMENT_KEY}\":[")?;
            self.document = Document::InRecords;
        }
        Ok(())
    }

    fn write_record(&mut self, record: &FileRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.open_document()?;
                if self.document == Document::InSections {
                    return Err(io::Error::other(
                        "records cannot follow sections in a json document",
                    ));
                }
                if self.written > 0 {
                    self.out.write_all(b",")?;
                }
                serde_json::to_writer(&mut self.out, record)?;
            }
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.out, record)?;
                self.out.write_all(b"\n")?;
            }
            OutputFormat::Text => writeln!(self.out, "{record}")?,
        }
        Ok(())
    }

    fn emit_section(&mut self, key: &str, section: &Section) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.open_document()?;
                if self.document == Document::InRecords {
                    self.out.write_all(b"]")?;
                    self.document = Document::InSections;
                }
                self.out.write_all(b",")?;
                serde_json::to_writer(&mut self.out, key)?;
                self.out.write_all(b":")?;
                serde_json::to_writer(&mut self.out, section)?;
            }
            OutputFormat::JsonLines => {
                self.out.write_all(b"{")?;
                serde_json::to_writer(&mut self.out, key)?;
                self.out.write_all(b":")?;
                serde_json::to_writer(&mut self.out, section)?;
                self.out.write_all(b"}\n")?;
            }
            OutputFormat::Text => {
                for (name, value) in section {
                    writeln!(
                        self.out,
                        "section={key} key={} value={}",
                        name.escape_debug(),
                        value.escape_debug()
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn closed() -> io::Error {
    io::Error::other("output closed by an earlier write failure")
}

impl<W: Write> RecordSink for RecordWriter<W> {
    fn append(&mut self, record: FileRecord) -> Result<(), SinkError> {
        if self.failed {
            return Err(SinkError::Closed);
        }
        if let Err(error) = self.write_record(&record) {
            self.failed = true;
            return Err(error.into());
        }
        self.written += 1;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.failed
    }
}
