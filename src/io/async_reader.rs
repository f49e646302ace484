//! Asynchronous CSV reader with batch interface
//!
//! Reads participant or expense rows from any `futures::io::AsyncRead` in
//! batches, so the async strategy can hand whole batches to the batch
//! processor.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader<T> → Batches of T::Output
//!                  ↓
//!           csv_format module
//!           (CsvRecord::convert)
//! ```

use crate::io::csv_format::CsvRecord;
use crate::types::SettlementError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Invalid rows are logged with their line number and skipped.
pub struct AsyncReader<R: AsyncRead + Unpin, T> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<R, T> AsyncReader<R, T>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: CsvRecord + 'static,
{
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
            _row: PhantomData,
        }
    }

    /// Read a batch of rows
    ///
    /// Reads up to `batch_size` rows and returns the ones that converted
    /// successfully. Returns an empty vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T::Output> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<T>();

        while batch.len() < batch_size {
            let Some(row) = rows.next().await else {
                break;
            };

            self.line_num += 1;
            let line = self.line_num + 1;

            match row.map_err(SettlementError::from).and_then(T::convert) {
                Ok(value) => batch.push(value),
                Err(e) => warn!("Row skipped: {}", e.at_line(line)),
            }
        }

        batch
    }

    /// Read every remaining row
    pub async fn read_all(&mut self, batch_size: usize) -> Vec<T::Output> {
        let mut all = Vec::new();
        loop {
            let batch = self.read_batch(batch_size).await;
            if batch.is_empty() {
                break;
            }
            all.extend(batch);
        }
        all
    }
}
