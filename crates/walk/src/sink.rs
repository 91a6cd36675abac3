use crate::error::SinkError;
use crate::record::FileRecord;

/// Destination for completed records.
///
/// The walker hands every record over by value; the sink owns it from then
/// on. A failed append is logged by the walker and the scan goes on, unless
/// the sink reports itself closed, in which case the walker stops early.
pub trait RecordSink {
    /// Accepts one record.
    fn append(&mut self, record: FileRecord) -> Result<(), SinkError>;

    /// Reports whether every further append is going to fail.
    fn is_closed(&self) -> bool {
        false
    }
}

impl RecordSink for Vec<FileRecord> {
    fn append(&mut self, record: FileRecord) -> Result<(), SinkError> {
        self.push(record);
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn append(&mut self, record: FileRecord) -> Result<(), SinkError> {
        (**self).append(record)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Sink adapter that forwards records to a closure.
///
/// # Examples
///
/// ```
/// use walk::{FnSink, RecordSink, FileRecord};
///
/// let mut paths = Vec::new();
/// let mut sink = FnSink::new(|record: FileRecord| {
///     paths.push(record.path().to_vec());
///     Ok(())
/// });
/// sink.append(FileRecord::from_parts(b"/x".to_vec(), None, 0, 0, 0, 0o100_644, None))?;
/// drop(sink);
/// assert_eq!(paths, vec![b"/x".to_vec()]);
/// # Ok::<(), walk::SinkError>(())
/// ```
pub struct FnSink<F> {
    callback: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FileRecord) -> Result<(), SinkError>,
{
    /// Wraps `callback`.
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> RecordSink for FnSink<F>
where
    F: FnMut(FileRecord) -> Result<(), SinkError>,
{
    fn append(&mut self, record: FileRecord) -> Result<(), SinkError> {
        (self.callback)(record)
    }
}
