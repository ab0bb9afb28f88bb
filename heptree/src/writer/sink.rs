use std::io;
use std::io::{BufRead, Read, Write};
use bincode::config;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::record::branch::EventRecords;
use crate::writer::error::TreeWriterResult;

/// Destination for projected events.
pub trait RecordSink {
    fn append(&mut self, event: &EventRecords) -> TreeWriterResult<()>;

    /// Flushes whatever the sink buffers. Called once after the last event.
    fn finish(&mut self) -> TreeWriterResult<()> {
        Ok(())
    }
}

/// Keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub events: Vec<EventRecords>,
}

impl RecordSink for MemorySink {
    fn append(&mut self, event: &EventRecords) -> TreeWriterResult<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Writes one JSON object per event and line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn append(&mut self, event: &EventRecords) -> TreeWriterResult<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> TreeWriterResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads events written by [`JsonLinesSink`], skipping blank lines.
pub fn read_json_lines<R: BufRead>(reader: R) -> TreeWriterResult<Vec<EventRecords>> {
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}

// frame payload: zstd stream of the bincode-encoded event
fn pack_payload(encoded: &[u8], level: i32) -> io::Result<Vec<u8>> {
    let mut encoder = zstd::Encoder::new(Vec::with_capacity(encoded.len() / 2), level)?;
    encoder.write_all(encoded)?;
    encoder.finish()
}

fn unpack_payload(payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoded = Vec::new();
    zstd::Decoder::new(payload)?.read_to_end(&mut encoded)?;
    Ok(encoded)
}

/// Writes each event as a frame: `u32` little-endian payload length, then
/// the zstd-compressed bincode encoding of the event.
pub struct FrameSink<W: Write> {
    writer: W,
    compression_level: i32,
    frames: usize,
}

impl<W: Write> FrameSink<W> {
    pub fn new(writer: W, compression_level: i32) -> Self {
        FrameSink { writer, compression_level, frames: 0 }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for FrameSink<W> {
    fn append(&mut self, event: &EventRecords) -> TreeWriterResult<()> {
        let encoded = bincode::encode_to_vec(event, config::standard())?;
        let compressed = pack_payload(&encoded, self.compression_level)?;

        // frame length header (4 bytes)
        self.writer.write_u32::<LittleEndian>(compressed.len() as u32)?;
        self.writer.write_all(&compressed)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> TreeWriterResult<()> {
        self.writer.flush()?;
        debug!("wrote {} frames", self.frames);
        Ok(())
    }
}

/// Reads a stream written by [`FrameSink`] back into events.
///
/// A stream that ends cleanly between two frames is complete; a stream cut
/// inside a frame is an error.
///
/// # Examples
///
/// ```
/// use heptree::record::branch::EventRecords;
/// use heptree::writer::sink::{read_frames, FrameSink, RecordSink};
///
/// let mut sink = FrameSink::new(Vec::new(), 3);
/// sink.append(&EventRecords { number: 42, branches: Vec::new() }).unwrap();
/// sink.finish().unwrap();
///
/// let bytes = sink.into_inner();
/// let events = read_frames(bytes.as_slice()).unwrap();
/// assert_eq!(events[0].number, 42);
/// ```
pub fn read_frames<R: Read>(mut reader: R) -> TreeWriterResult<Vec<EventRecords>> {
    let mut events = Vec::new();

    loop {
        let length = match reader.read_u32::<LittleEndian>() {
            Ok(length) => length as usize,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        };

        let mut compressed = vec![0u8; length];
        reader.read_exact(&mut compressed)?;

        let encoded = unpack_payload(&compressed)?;
        let (event, _) = bincode::decode_from_slice(&encoded, config::standard())?;
        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hepcore::candidate::model::UniqueId;

    use crate::record::branch::{Branch, BranchRecords};
    use crate::record::generator::GenParticle;
    use crate::record::summary::MissingEt;
    use crate::writer::error::TreeWriterError;

    fn sample(number: u64) -> EventRecords {
        EventRecords {
            number,
            branches: vec![
                Branch {
                    name: "Particle".to_string(),
                    records: BranchRecords::GenParticle(vec![GenParticle {
                        unique_id: UniqueId(1),
                        pid: 22,
                        e: 10.0,
                        eta: -999.9,
                        ..Default::default()
                    }]),
                },
                Branch {
                    name: "MissingET".to_string(),
                    records: BranchRecords::MissingEt(vec![MissingEt { met: 5.0, eta: 0.0, phi: 1.2 }]),
                },
            ],
        }
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::default();
        sink.append(&sample(0)).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.events, vec![sample(0)]);
    }

    #[test]
    fn test_json_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.append(&sample(0)).unwrap();
        sink.append(&sample(1)).unwrap();
        sink.finish().unwrap();

        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\"MissingEt\""));

        let events = read_json_lines(bytes.as_slice()).unwrap();
        assert_eq!(events, vec![sample(0), sample(1)]);
    }

    #[test]
    fn test_frames() {
        let mut sink = FrameSink::new(Vec::new(), 1);
        for n in 0..3 {
            sink.append(&sample(n)).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(sink.frames(), 3);

        let bytes = sink.into_inner();
        let first_length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert!(first_length + 4 < bytes.len());

        let events = read_frames(bytes.as_slice()).unwrap();
        assert_eq!(events, vec![sample(0), sample(1), sample(2)]);
    }

    #[test]
    fn test_empty_frame_stream() {
        assert!(read_frames(&[][..]).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_frame_is_an_error() {
        let mut sink = FrameSink::new(Vec::new(), 1);
        sink.append(&sample(0)).unwrap();
        let mut bytes = sink.into_inner();
        bytes.truncate(bytes.len() - 2);

        assert!(matches!(read_frames(bytes.as_slice()), Err(TreeWriterError::Io(_))));
    }

    #[test]
    fn test_frame_layout() {
        let event = sample(9);
        let mut sink = FrameSink::new(Vec::new(), 5);
        sink.append(&event).unwrap();
        let bytes = sink.into_inner();

        let length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(bytes.len(), 4 + length);

        let encoded = unpack_payload(&bytes[4..]).unwrap();
        assert_eq!(encoded, bincode::encode_to_vec(&event, config::standard()).unwrap());
    }
}
