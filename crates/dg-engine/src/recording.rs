//! Recording codec — the append-only keystroke log that makes a run
//! replayable byte-for-byte (spec §4.J).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::warn;

use crate::error::RecordingError;

/// On-disk header length. The source leaves room for reserved fields
/// past the last one this implementation defines; they stay zeroed.
pub const RECORDING_HEADER_LENGTH: usize = 37;

/// Circular buffer capacity before a forced flush to disk.
pub const INPUT_RECORD_BUFFER_MAX_SIZE: usize = 16 * 1024;

const VERSION_FIELD_LEN: usize = 16;

/// Keystroke compression table (spec §4.J body). Index position is the
/// byte written after `128 +`.
const COMPRESSIBLE_KEYS: [u16; 18] = [
    0xE000, // UP_ARROW
    0xE001, // LEFT_ARROW
    0xE002, // DOWN_ARROW
    0xE003, // RIGHT_ARROW
    0xE004, // ESCAPE_KEY
    0xE005, // RETURN_KEY
    0xE006, // DELETE_KEY
    0xE007, // TAB_KEY
    0xE010, // NUMPAD_0
    0xE011, 0xE012, 0xE013, 0xE014, 0xE015, 0xE016, 0xE017, 0xE018, 0xE019, // NUMPAD_9
];

const UNKNOWN_KEY: u8 = 0xFF;

/// Compress a logical keycode into the one-byte form stored in a
/// keystroke event. Plain ASCII-range codes pass through unchanged;
/// symbolic keys in [`COMPRESSIBLE_KEYS`] map to `128 + index`.
pub fn compress_keystroke(key: u16) -> u8 {
    if let Some(index) = COMPRESSIBLE_KEYS.iter().position(|&k| k == key) {
        128 + index as u8
    } else if key < 256 {
        key as u8
    } else {
        UNKNOWN_KEY
    }
}

/// Inverse of [`compress_keystroke`]. Bytes `128 + i` with `i` outside
/// the table pass through as their own (unmapped) code, matching the
/// source's "unknown bytes pass through" rule.
pub fn uncompress_keystroke(byte: u8) -> u16 {
    if byte >= 128 {
        let index = (byte - 128) as usize;
        COMPRESSIBLE_KEYS.get(index).copied().unwrap_or(byte as u16)
    } else {
        byte as u16
    }
}

/// Big-endian encode `value` into exactly `length` bytes (spec §4.J
/// `numberToBytes`). `length` must be 4 or 8.
fn numbers_to_bytes_be(value: u64, length: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(length);
    match length {
        4 => buf.write_u32::<BigEndian>(value as u32).unwrap(),
        8 => buf.write_u64::<BigEndian>(value).unwrap(),
        other => panic!("numbers_to_bytes_be: unsupported length {other}"),
    }
    buf
}

/// Inverse of [`numbers_to_bytes_be`] (spec §4.J `bytesToNumber`).
fn bytes_to_number_be(mut bytes: &[u8]) -> u64 {
    match bytes.len() {
        4 => bytes.read_u32::<BigEndian>().unwrap() as u64,
        8 => bytes.read_u64::<BigEndian>().unwrap(),
        other => panic!("bytes_to_number_be: unsupported length {other}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHeader {
    pub version: String,
    pub mode: u8,
    pub seed: u64,
    pub player_turn_count: u32,
    pub max_depth_changes: u32,
    pub playback_file_length: u32,
}

impl RecordingHeader {
    pub fn encode(&self) -> [u8; RECORDING_HEADER_LENGTH] {
        let mut buf = [0u8; RECORDING_HEADER_LENGTH];
        let version_bytes = self.version.as_bytes();
        let n = version_bytes.len().min(VERSION_FIELD_LEN - 1);
        buf[0..n].copy_from_slice(&version_bytes[0..n]);
        buf[16] = self.mode;
        buf[17..25].copy_from_slice(&self.seed.to_be_bytes());
        buf[25..29].copy_from_slice(&self.player_turn_count.to_be_bytes());
        buf[29..33].copy_from_slice(&self.max_depth_changes.to_be_bytes());
        buf[33..37].copy_from_slice(&self.playback_file_length.to_be_bytes());
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, RecordingError> {
        if buf.len() < RECORDING_HEADER_LENGTH {
            return Err(RecordingError::TruncatedHeader {
                needed: RECORDING_HEADER_LENGTH,
                found: buf.len(),
            });
        }
        let version_end = buf[0..VERSION_FIELD_LEN].iter().position(|&b| b == 0).unwrap_or(VERSION_FIELD_LEN);
        let version = String::from_utf8_lossy(&buf[0..version_end]).into_owned();
        Ok(Self {
            version,
            mode: buf[16],
            seed: bytes_to_number_be(&buf[17..25]),
            player_turn_count: bytes_to_number_be(&buf[25..29]) as u32,
            max_depth_changes: bytes_to_number_be(&buf[29..33]) as u32,
            playback_file_length: bytes_to_number_be(&buf[33..37]) as u32,
        })
    }
}

/// One recorded event. Only the keystroke variant is modeled in full;
/// mouse/ack events keep their raw payload opaque, per the spec's note
/// that their exact encoding is "not detailed here".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Keystroke(u16),
    Raw { event_type: u8, payload: Vec<u8> },
}

const EVENT_TYPE_KEYSTROKE: u8 = 0;

/// The circular recording buffer plus the backing file, owning the
/// write side of the codec (spec §4.J "Recording buffer").
pub struct Recorder {
    path: PathBuf,
    buffer: Vec<u8>,
    header: RecordingHeader,
    file: File,
}

impl Recorder {
    /// Start a fresh recording at `path`: removes any existing file,
    /// writes the header, and leaves the buffer empty.
    pub fn begin(path: impl AsRef<Path>, seed: u64, version: impl Into<String>) -> Result<Self, RecordingError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        let header = RecordingHeader {
            version: version.into(),
            mode: 0,
            seed,
            player_turn_count: 0,
            max_depth_changes: 0,
            playback_file_length: 0,
        };
        let mut file = OpenOptions::new().create(true).write(true).read(true).open(&path)?;
        file.write_all(&header.encode())?;
        Ok(Self {
            path,
            buffer: Vec::with_capacity(INPUT_RECORD_BUFFER_MAX_SIZE),
            header,
            file,
        })
    }

    /// Append one byte to the buffer, dropping it with a warning if the
    /// buffer is already at capacity rather than growing unbounded.
    pub fn record_char(&mut self, byte: u8) {
        if self.buffer.len() >= INPUT_RECORD_BUFFER_MAX_SIZE {
            warn!("recording buffer full, dropping byte 0x{byte:02x}");
            return;
        }
        self.buffer.push(byte);
        if self.buffer.len() >= INPUT_RECORD_BUFFER_MAX_SIZE {
            let _ = self.consider_flushing();
        }
    }

    pub fn record_keystroke(&mut self, key: u16) {
        self.record_char(EVENT_TYPE_KEYSTROKE);
        self.record_char(compress_keystroke(key));
    }

    /// Flush the buffer to the file and rewrite the header with the
    /// updated playback length, matching `considerFlushingBufferToFile`.
    pub fn consider_flushing(&mut self) -> Result<(), RecordingError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(&self.buffer)?;
        self.header.playback_file_length += self.buffer.len() as u32;
        self.buffer.clear();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.header.encode())?;
        self.file.seek(SeekFrom::End(0))?;
        Ok(())
    }

    pub fn record_turn_ended(&mut self) {
        self.header.player_turn_count += 1;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads a recording back for non-interactive playback, detecting
/// divergence (out-of-sync) against a live expected-byte stream.
pub struct Playback {
    pub header: RecordingHeader,
    body: Vec<u8>,
    cursor: usize,
}

impl Playback {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let mut file = File::open(path)?;
        let mut full = Vec::new();
        file.read_to_end(&mut full)?;
        let header = RecordingHeader::decode(&full)?;
        let body = full[RECORDING_HEADER_LENGTH..].to_vec();
        Ok(Self { header, body, cursor: 0 })
    }

    pub fn next_event(&mut self) -> Option<RecordedEvent> {
        let event_type = *self.body.get(self.cursor)?;
        self.cursor += 1;
        match event_type {
            EVENT_TYPE_KEYSTROKE => {
                let byte = *self.body.get(self.cursor)?;
                self.cursor += 1;
                Some(RecordedEvent::Keystroke(uncompress_keystroke(byte)))
            }
            other => {
                let payload = self.body[self.cursor..].to_vec();
                self.cursor = self.body.len();
                Some(RecordedEvent::Raw { event_type: other, payload })
            }
        }
    }

    /// Confirm the live stream's next byte matches what was recorded;
    /// returns an `OutOfSync` error at the first divergence.
    pub fn check_in_sync(&self, observed: &[u8]) -> Result<(), RecordingError> {
        let expected = &self.body[self.cursor..(self.cursor + observed.len()).min(self.body.len())];
        if expected != observed {
            return Err(RecordingError::OutOfSync(self.cursor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystroke_compression_round_trips_for_table_entries() {
        for &k in &COMPRESSIBLE_KEYS {
            let byte = compress_keystroke(k);
            assert!(byte >= 128);
            assert_eq!(uncompress_keystroke(byte), k);
        }
    }

    #[test]
    fn ascii_keystrokes_pass_through_unmodified() {
        assert_eq!(compress_keystroke(b'j' as u16), b'j');
        assert_eq!(uncompress_keystroke(b'j'), b'j' as u16);
    }

    #[test]
    fn out_of_range_keystroke_is_unknown() {
        assert_eq!(compress_keystroke(0xBEEF), UNKNOWN_KEY);
    }

    #[test]
    fn header_round_trips_through_encode_decode() {
        let header = RecordingHeader {
            version: "dg-1.0".to_string(),
            mode: 1,
            seed: 0xDEAD_BEEF_u64,
            player_turn_count: 42,
            max_depth_changes: 3,
            playback_file_length: 1024,
        };
        let encoded = header.encode();
        let decoded = RecordingHeader::decode(&encoded).unwrap();
        assert_eq!(header, decoded);
    }

    #[test]
    fn decode_rejects_truncated_buffer() {
        let err = RecordingHeader::decode(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, RecordingError::TruncatedHeader { .. }));
    }

    #[test]
    fn numbers_to_bytes_and_back_round_trip() {
        let bytes = numbers_to_bytes_be(123456789, 4);
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes_to_number_be(&bytes), 123456789);
    }

    #[test]
    fn recorder_flush_writes_header_and_body() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("dg-recording-test-{}.bin", std::process::id()));
        let mut rec = Recorder::begin(&path, 99, "dg-test").unwrap();
        rec.record_keystroke(b'h' as u16);
        rec.record_keystroke(0xE000);
        rec.consider_flushing().unwrap();
        drop(rec);

        let mut playback = Playback::open(&path).unwrap();
        assert_eq!(playback.header.seed, 99);
        assert_eq!(playback.next_event(), Some(RecordedEvent::Keystroke(b'h' as u16)));
        assert_eq!(playback.next_event(), Some(RecordedEvent::Keystroke(0xE000)));
        std::fs::remove_file(&path).ok();
    }
}
