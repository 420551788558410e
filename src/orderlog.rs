//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Durable append-only order log: the ingress pipeline between the submission
// adapter (producer) and the matcher runtime (consumer).
//
// | Component     | Description                                                               |
// |---------------|---------------------------------------------------------------------------|
// | LogRecord     | One submitted operation: submit, cancel, or an unknown future kind        |
// | LogWriter     | Appends length-prefixed frames to segmented files, rotating on size       |
// | LogCursor     | Forward reader that replays from the start and then tails the live file   |
//
// Records are framed as primitive integers plus the raw order-id bytes so that
// encode/decode stays allocation-light:
//
//   [body_len: u32]
//   [kind:     u8]      1 = submit, 2 = cancel
//   [id_len:   u16][order_id bytes]
//   [side:     i32]     0 = BUY, 1 = SELL (zero for cancel)
//   [price:    i64]     (zero for cancel)
//   [quantity: i64]     (zero for cancel)
//   [checksum: u32]     CRC32C over kind..quantity
//
// The writer and the cursor hold independent file handles; between one
// producer and one consumer there is no locking anywhere on the append or
// read path. Ordering across multiple producers is the caller's problem (the
// HTTP adapter serializes on a mutex before appending).
//--------------------------------------------------------------------------------------------------

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crc32c::crc32c;
use thiserror::Error;

use crate::types::{Price, Qty, Side};

/// Fixed frame overhead: kind + id_len + side + price + quantity + checksum.
const FIXED_BODY_BYTES: u32 = 1 + 2 + 4 + 8 + 8 + 4;

/// Largest legal body: fixed fields plus a maximal (u16) order id.
const MAX_BODY_BYTES: u32 = FIXED_BODY_BYTES + u16::MAX as u32;

const KIND_SUBMIT: u8 = 1;
const KIND_CANCEL: u8 = 2;

//--------------------------------------------------------------------------------------------------
//  ERRORS
//--------------------------------------------------------------------------------------------------

/// Failure modes of the order log.
#[derive(Error, Debug)]
pub enum LogError {
    /// Underlying storage failed. Fatal to the matcher; restart replays.
    #[error("order log I/O failure: {0}")]
    Io(#[from] io::Error),

    /// The record could not be encoded; the log was not advanced.
    #[error("cannot encode record: {0}")]
    Encode(String),

    /// A stored frame could not be decoded. The cursor has already skipped
    /// past it; the consumer should log the event and continue.
    #[error("corrupt record in segment {segment} at offset {offset}: {detail}")]
    Corrupt {
        segment: u64,
        offset: u64,
        detail: String,
    },
}

//--------------------------------------------------------------------------------------------------
//  RECORDS
//--------------------------------------------------------------------------------------------------

/// Payload of a submit record: the fields needed to reconstruct an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: String,
    pub side: Side,
    pub price: Price,
    pub quantity: Qty,
}

/// One decoded log record.
///
/// `Unknown` preserves forward compatibility: a record kind this build does
/// not understand is surfaced (and skipped by the consumer with a warning)
/// instead of wedging the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Submit(OrderRecord),
    Cancel { order_id: String },
    Unknown { kind: u8 },
}

impl LogRecord {
    fn encode(&self) -> Result<Vec<u8>, LogError> {
        let (kind, order_id, side_wire, price, quantity) = match self {
            LogRecord::Submit(rec) => {
                if rec.price <= 0 {
                    return Err(LogError::Encode(format!(
                        "price must be > 0, got {}",
                        rec.price
                    )));
                }
                if rec.quantity <= 0 {
                    return Err(LogError::Encode(format!(
                        "quantity must be > 0, got {}",
                        rec.quantity
                    )));
                }
                (KIND_SUBMIT, &rec.order_id, rec.side.to_wire(), rec.price, rec.quantity)
            }
            LogRecord::Cancel { order_id } => (KIND_CANCEL, order_id, 0, 0, 0),
            LogRecord::Unknown { kind } => {
                return Err(LogError::Encode(format!("cannot encode unknown kind {kind}")));
            }
        };

        if order_id.is_empty() {
            return Err(LogError::Encode("order id must not be empty".into()));
        }
        if order_id.len() > u16::MAX as usize {
            return Err(LogError::Encode(format!(
                "order id of {} bytes exceeds the frame limit",
                order_id.len()
            )));
        }

        let id_bytes = order_id.as_bytes();
        let body_len = FIXED_BODY_BYTES + id_bytes.len() as u32;

        let mut buf = Vec::with_capacity(4 + body_len as usize);
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.push(kind);
        buf.extend_from_slice(&(id_bytes.len() as u16).to_le_bytes());
        buf.extend_from_slice(id_bytes);
        buf.extend_from_slice(&side_wire.to_le_bytes());
        buf.extend_from_slice(&price.to_le_bytes());
        buf.extend_from_slice(&quantity.to_le_bytes());

        // Checksum covers everything after the length prefix.
        let checksum = crc32c(&buf[4..]);
        buf.extend_from_slice(&checksum.to_le_bytes());
        Ok(buf)
    }

    /// Decodes one frame body (everything after the length prefix, checksum
    /// included). The caller has already verified the body is complete.
    fn decode(body: &[u8]) -> Result<LogRecord, String> {
        if (body.len() as u32) < FIXED_BODY_BYTES {
            return Err(format!("body of {} bytes is too short", body.len()));
        }

        let payload = &body[..body.len() - 4];
        let stored = u32::from_le_bytes(body[body.len() - 4..].try_into().expect("4-byte slice"));
        let computed = crc32c(payload);
        if stored != computed {
            return Err(format!(
                "checksum mismatch: stored {stored:#010x}, computed {computed:#010x}"
            ));
        }

        let kind = payload[0];
        let id_len = u16::from_le_bytes(payload[1..3].try_into().expect("2-byte slice")) as usize;
        let expected = FIXED_BODY_BYTES as usize - 4 + id_len;
        if payload.len() != expected {
            return Err(format!(
                "payload of {} bytes does not match id length {id_len}",
                payload.len()
            ));
        }

        let mut pos = 3;
        let order_id = std::str::from_utf8(&payload[pos..pos + id_len])
            .map_err(|e| format!("order id is not UTF-8: {e}"))?
            .to_string();
        pos += id_len;

        let side_wire = i32::from_le_bytes(payload[pos..pos + 4].try_into().expect("4-byte slice"));
        pos += 4;
        let price = i64::from_le_bytes(payload[pos..pos + 8].try_into().expect("8-byte slice"));
        pos += 8;
        let quantity = i64::from_le_bytes(payload[pos..pos + 8].try_into().expect("8-byte slice"));

        match kind {
            KIND_SUBMIT => {
                let side = Side::from_wire(side_wire).map_err(|e| e.to_string())?;
                Ok(LogRecord::Submit(OrderRecord {
                    order_id,
                    side,
                    price,
                    quantity,
                }))
            }
            KIND_CANCEL => Ok(LogRecord::Cancel { order_id }),
            other => Ok(LogRecord::Unknown { kind: other }),
        }
    }
}

//--------------------------------------------------------------------------------------------------
//  CONFIG
//--------------------------------------------------------------------------------------------------

/// Order log settings. The directory is the one required piece of
/// configuration in the whole system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the log segments.
    pub dir: PathBuf,
    /// Segment rotation threshold in bytes.
    pub segment_bytes: u64,
    /// Call fsync after every append. Off by default; a flush to the OS is
    /// enough for records to survive a consumer restart.
    pub sync_every_append: bool,
}

impl LogConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            segment_bytes: 64 * 1024 * 1024,
            sync_every_append: false,
        }
    }
}

fn segment_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("orders-{index:06}.log"))
}

/// All segment indices present in `dir`, sorted ascending.
fn segment_indices(dir: &Path) -> Result<Vec<u64>, LogError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut indices: Vec<u64> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.strip_prefix("orders-")?
                .strip_suffix(".log")?
                .parse::<u64>()
                .ok()
        })
        .collect();
    indices.sort_unstable();
    Ok(indices)
}

//--------------------------------------------------------------------------------------------------
//  WRITER
//--------------------------------------------------------------------------------------------------

/// Single-producer appender. Opening the writer truncates any torn frame at
/// the tail of the newest segment so appends never follow garbage left by a
/// crash mid-write.
pub struct LogWriter {
    config: LogConfig,
    writer: BufWriter<File>,
    segment_index: u64,
    segment_len: u64,
}

impl LogWriter {
    pub fn open(config: LogConfig) -> Result<LogWriter, LogError> {
        fs::create_dir_all(&config.dir)?;

        let segment_index = segment_indices(&config.dir)?.last().copied().unwrap_or(0);
        let path = segment_path(&config.dir, segment_index);
        let segment_len = Self::recover_segment(&path)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(LogWriter {
            config,
            writer: BufWriter::new(file),
            segment_index,
            segment_len,
        })
    }

    /// Scans a segment for its longest prefix of complete frames and truncates
    /// anything after it. Returns the recovered length. A frame with a bad
    /// checksum but a complete body is left in place; the cursor skips it.
    fn recover_segment(path: &Path) -> Result<u64, LogError> {
        let mut data = Vec::new();
        match File::open(path) {
            Ok(mut file) => {
                file.read_to_end(&mut data)?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        }

        let mut pos: usize = 0;
        loop {
            if pos + 4 > data.len() {
                break;
            }
            let body_len =
                u32::from_le_bytes(data[pos..pos + 4].try_into().expect("4-byte slice")) as usize;
            if body_len < FIXED_BODY_BYTES as usize
                || body_len > MAX_BODY_BYTES as usize
                || pos + 4 + body_len > data.len()
            {
                break;
            }
            pos += 4 + body_len;
        }

        if pos < data.len() {
            tracing::warn!(
                path = %path.display(),
                valid_bytes = pos,
                torn_bytes = data.len() - pos,
                "truncating torn tail of order log segment"
            );
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(pos as u64)?;
            file.sync_all()?;
        }
        Ok(pos as u64)
    }

    /// Appends one record and flushes it to the OS. Returns only after the
    /// frame is readable by a fresh cursor.
    pub fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        let frame = record.encode()?;

        if self.segment_len >= self.config.segment_bytes {
            self.rotate()?;
        }

        self.writer.write_all(&frame)?;
        self.writer.flush()?;
        if self.config.sync_every_append {
            self.writer.get_ref().sync_data()?;
        }
        self.segment_len += frame.len() as u64;
        Ok(())
    }

    /// Convenience wrapper for the common submit case.
    pub fn append_submit(
        &mut self,
        order_id: &str,
        side: Side,
        price: Price,
        quantity: Qty,
    ) -> Result<(), LogError> {
        self.append(&LogRecord::Submit(OrderRecord {
            order_id: order_id.to_string(),
            side,
            price,
            quantity,
        }))
    }

    /// Convenience wrapper for cancel records.
    pub fn append_cancel(&mut self, order_id: &str) -> Result<(), LogError> {
        self.append(&LogRecord::Cancel {
            order_id: order_id.to_string(),
        })
    }

    /// Flush and fsync the current segment. Used at shutdown.
    pub fn sync(&mut self) -> Result<(), LogError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }

    fn rotate(&mut self) -> Result<(), LogError> {
        self.sync()?;
        self.segment_index += 1;
        let path = segment_path(&self.config.dir, self.segment_index);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.writer = BufWriter::new(file);
        self.segment_len = 0;
        tracing::debug!(segment = self.segment_index, "rotated order log segment");
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
//  CURSOR
//--------------------------------------------------------------------------------------------------

/// Forward cursor over the log. Starts at the first frame of the oldest
/// segment, yields records in exact append order, and returns `None` (not
/// end-of-stream) when it has caught up with the producer.
///
/// The cursor owns its file handle; dropping it releases the handle, so
/// holding it in the consumer loop's scope guarantees release on every exit
/// path.
pub struct LogCursor {
    dir: PathBuf,
    segment_index: u64,
    file: Option<File>,
    offset: u64,
}

impl LogCursor {
    pub fn open(dir: impl Into<PathBuf>) -> Result<LogCursor, LogError> {
        let dir = dir.into();
        let segment_index = segment_indices(&dir)?.first().copied().unwrap_or(0);
        Ok(LogCursor {
            dir,
            segment_index,
            file: None,
            offset: 0,
        })
    }

    /// Yields the next record, or `None` when no complete frame is available
    /// right now. A `Corrupt` error reports a skipped frame; the cursor has
    /// already advanced past it and the next call continues normally.
    pub fn next(&mut self) -> Result<Option<LogRecord>, LogError> {
        loop {
            if self.file.is_none() && !self.try_open_segment()? {
                return Ok(None);
            }
            let Some(file) = self.file.as_ref() else {
                return Ok(None);
            };
            let available = file.metadata()?.len();

            if self.offset + 4 > available {
                if self.advance_segment()? {
                    continue;
                }
                return Ok(None);
            }

            let mut len_buf = [0u8; 4];
            read_at(file, self.offset, &mut len_buf)?;
            let body_len = u32::from_le_bytes(len_buf);

            if body_len < FIXED_BODY_BYTES || body_len > MAX_BODY_BYTES {
                // Garbage where a length prefix should be. The writer only
                // leaves this behind on real corruption, so resynchronizing
                // within the segment is hopeless; jump to its end.
                let offset = self.offset;
                self.offset = available;
                return Err(LogError::Corrupt {
                    segment: self.segment_index,
                    offset,
                    detail: format!("implausible frame length {body_len}"),
                });
            }

            if self.offset + 4 + body_len as u64 > available {
                // Tail of a live segment: the producer has not finished this
                // frame yet. Stay put and report no data.
                return Ok(None);
            }

            let mut body = vec![0u8; body_len as usize];
            read_at(file, self.offset + 4, &mut body)?;
            let frame_start = self.offset;
            self.offset += 4 + body_len as u64;

            match LogRecord::decode(&body) {
                Ok(record) => return Ok(Some(record)),
                Err(detail) => {
                    return Err(LogError::Corrupt {
                        segment: self.segment_index,
                        offset: frame_start,
                        detail,
                    });
                }
            }
        }
    }

    /// Opens the current segment. Returns false when the producer has not
    /// created it yet.
    fn try_open_segment(&mut self) -> Result<bool, LogError> {
        let path = segment_path(&self.dir, self.segment_index);
        match File::open(&path) {
            Ok(file) => {
                self.file = Some(file);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Moves to the next segment if the writer has rotated past the current
    /// one. A rotated-away segment receives no further appends, so exhausting
    /// it while a successor exists means it is safe to leave behind.
    fn advance_segment(&mut self) -> Result<bool, LogError> {
        let next = segment_path(&self.dir, self.segment_index + 1);
        if next.exists() {
            self.segment_index += 1;
            self.file = None;
            self.offset = 0;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn read_at(mut file: &File, offset: u64, buf: &mut [u8]) -> Result<(), LogError> {
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(buf)?;
    Ok(())
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn submit(id: &str, side: Side, price: Price, qty: Qty) -> LogRecord {
        LogRecord::Submit(OrderRecord {
            order_id: id.to_string(),
            side,
            price,
            quantity: qty,
        })
    }

    /// Drains every record currently readable.
    fn drain(cursor: &mut LogCursor) -> Vec<LogRecord> {
        let mut out = Vec::new();
        while let Some(record) = cursor.next().unwrap() {
            out.push(record);
        }
        out
    }

    #[test]
    fn test_append_and_read_in_order() {
        let tmp = TempDir::new().unwrap();
        let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();

        writer.append(&submit("S1", Side::Sell, 10_000, 5)).unwrap();
        writer.append(&submit("B1", Side::Buy, 10_100, 5)).unwrap();
        writer.append(&LogRecord::Cancel { order_id: "S1".into() }).unwrap();

        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        let records = drain(&mut cursor);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], submit("S1", Side::Sell, 10_000, 5));
        assert_eq!(records[1], submit("B1", Side::Buy, 10_100, 5));
        assert_eq!(records[2], LogRecord::Cancel { order_id: "S1".into() });

        // Caught up: no data, not an error.
        assert!(cursor.next().unwrap().is_none());
    }

    #[test]
    fn test_encode_rejects_invalid_fields() {
        let tmp = TempDir::new().unwrap();
        let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();

        assert!(matches!(
            writer.append(&submit("", Side::Buy, 10_000, 5)),
            Err(LogError::Encode(_))
        ));
        assert!(matches!(
            writer.append(&submit("B1", Side::Buy, 0, 5)),
            Err(LogError::Encode(_))
        ));
        assert!(matches!(
            writer.append(&submit("B1", Side::Buy, 10_000, -2)),
            Err(LogError::Encode(_))
        ));

        // Nothing reached the log.
        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        assert!(cursor.next().unwrap().is_none());
    }

    /// A fresh cursor opened after the writer is gone sees every record:
    /// the restart-replay contract.
    #[test]
    fn test_fresh_cursor_replays_everything() {
        let tmp = TempDir::new().unwrap();
        {
            let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
            for i in 0..100 {
                writer
                    .append(&submit(&format!("O{i}"), Side::Buy, 100 + i, 1 + i))
                    .unwrap();
            }
        }

        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        let records = drain(&mut cursor);
        assert_eq!(records.len(), 100);
        assert_eq!(records[99], submit("O99", Side::Buy, 199, 100));
    }

    #[test]
    fn test_cursor_tails_live_appends() {
        let tmp = TempDir::new().unwrap();
        let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
        let mut cursor = LogCursor::open(tmp.path()).unwrap();

        assert!(cursor.next().unwrap().is_none());

        writer.append(&submit("B1", Side::Buy, 10_000, 5)).unwrap();
        assert_eq!(
            cursor.next().unwrap(),
            Some(submit("B1", Side::Buy, 10_000, 5))
        );
        assert!(cursor.next().unwrap().is_none());

        writer.append(&submit("B2", Side::Buy, 10_001, 6)).unwrap();
        assert_eq!(
            cursor.next().unwrap(),
            Some(submit("B2", Side::Buy, 10_001, 6))
        );
    }

    #[test]
    fn test_segment_rotation_is_transparent_to_cursor() {
        let tmp = TempDir::new().unwrap();
        let config = LogConfig {
            segment_bytes: 128, // force frequent rotation
            ..LogConfig::new(tmp.path())
        };
        let mut writer = LogWriter::open(config).unwrap();
        for i in 0..50 {
            writer
                .append(&submit(&format!("O{i}"), Side::Sell, 1000 + i, 1))
                .unwrap();
        }

        assert!(
            segment_indices(tmp.path()).unwrap().len() > 1,
            "expected rotation to create multiple segments"
        );

        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        let records = drain(&mut cursor);
        assert_eq!(records.len(), 50);
        assert_eq!(records[49], submit("O49", Side::Sell, 1049, 1));
    }

    /// A torn frame at the tail (crash mid-append) is truncated when the
    /// writer reopens, and subsequent appends read back cleanly.
    #[test]
    fn test_writer_truncates_torn_tail() {
        let tmp = TempDir::new().unwrap();
        {
            let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
            writer.append(&submit("B1", Side::Buy, 10_000, 5)).unwrap();
        }

        // Simulate a torn write: a length prefix promising more than exists.
        let path = segment_path(tmp.path(), 0);
        let mut data = fs::read(&path).unwrap();
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&[0xAB; 7]);
        fs::write(&path, &data).unwrap();

        let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
        writer.append(&submit("B2", Side::Buy, 10_001, 3)).unwrap();

        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        let records = drain(&mut cursor);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], submit("B2", Side::Buy, 10_001, 3));
    }

    /// Flipping a byte inside a stored frame trips the checksum; the cursor
    /// reports the corruption once and keeps going with the next frame.
    #[test]
    fn test_cursor_skips_checksum_corruption() {
        let tmp = TempDir::new().unwrap();
        let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
        writer.append(&submit("B1", Side::Buy, 10_000, 5)).unwrap();
        writer.append(&submit("B2", Side::Buy, 10_001, 6)).unwrap();

        let path = segment_path(tmp.path(), 0);
        let mut data = fs::read(&path).unwrap();
        data[10] ^= 0xFF; // inside the first frame's body
        fs::write(&path, &data).unwrap();

        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        match cursor.next() {
            Err(LogError::Corrupt { segment: 0, offset: 0, .. }) => {}
            other => panic!("expected corruption at frame 0, got {other:?}"),
        }
        assert_eq!(
            cursor.next().unwrap(),
            Some(submit("B2", Side::Buy, 10_001, 6))
        );
    }

    /// Unknown record kinds decode as `Unknown` so newer producers cannot
    /// crash an older matcher.
    #[test]
    fn test_unknown_kind_is_surfaced_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut writer = LogWriter::open(LogConfig::new(tmp.path())).unwrap();
        writer.append(&submit("B1", Side::Buy, 10_000, 5)).unwrap();

        // Hand-craft a frame with kind 9.
        let mut body = Vec::new();
        body.push(9u8);
        body.extend_from_slice(&2u16.to_le_bytes());
        body.extend_from_slice(b"XX");
        body.extend_from_slice(&0i32.to_le_bytes());
        body.extend_from_slice(&0i64.to_le_bytes());
        body.extend_from_slice(&0i64.to_le_bytes());
        let checksum = crc32c(&body);
        body.extend_from_slice(&checksum.to_le_bytes());

        let path = segment_path(tmp.path(), 0);
        let mut data = fs::read(&path).unwrap();
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(&body);
        fs::write(&path, &data).unwrap();

        let mut cursor = LogCursor::open(tmp.path()).unwrap();
        assert!(matches!(cursor.next().unwrap(), Some(LogRecord::Submit(_))));
        assert_eq!(cursor.next().unwrap(), Some(LogRecord::Unknown { kind: 9 }));
        assert!(cursor.next().unwrap().is_none());
    }

    #[test]
    fn test_cursor_on_missing_directory_reports_no_data() {
        let tmp = TempDir::new().unwrap();
        let mut cursor = LogCursor::open(tmp.path().join("not-created-yet")).unwrap();
        assert!(cursor.next().unwrap().is_none());
    }
}
