//! Headerless rawvideo reading and writing.

use std::io::{ErrorKind, Read, Write};

use super::{FrameSource, SourceError};
use crate::frame::{Frame, FrameGeometry};

/// Reads consecutive tightly packed frames from a byte stream.
pub struct RawVideoSource<R> {
    reader: R,
    geometry: Option<FrameGeometry>,
    buffer: Vec<u8>,
    sequence: u64,
}

impl<R: Read> RawVideoSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            geometry: None,
            buffer: Vec::new(),
            sequence: 0,
        }
    }

    /// Frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.sequence
    }

    /// Fills the buffer, returning how many bytes arrived before EOF.
    fn fill_buffer(&mut self) -> Result<usize, SourceError> {
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.reader.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> FrameSource for RawVideoSource<R> {
    fn open(&mut self, geometry: FrameGeometry) -> Result<(), SourceError> {
        geometry.validate()?;
        self.buffer = vec![0; geometry.frame_size()];
        self.geometry = Some(geometry);
        self.sequence = 0;
        tracing::info!(geometry = %geometry, frame_bytes = self.buffer.len(), "Rawvideo source opened");
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let geometry = self.geometry.ok_or(SourceError::NotOpen)?;

        match self.fill_buffer()? {
            0 => Ok(None),
            read if read < self.buffer.len() => Err(SourceError::TruncatedFrame {
                read,
                expected: self.buffer.len(),
            }),
            _ => {
                let frame = Frame::from_packed_bytes(geometry, &self.buffer, self.sequence)?;
                self.sequence += 1;
                Ok(Some(frame))
            }
        }
    }

    fn is_open(&self) -> bool {
        self.geometry.is_some()
    }

    fn close(&mut self) {
        self.geometry = None;
        self.buffer = Vec::new();
        tracing::info!(frames = self.sequence, "Rawvideo source closed");
    }
}

/// Writes frames as tightly packed rawvideo.
pub struct RawVideoSink<W> {
    writer: W,
    scratch: Vec<u8>,
    frames_written: u64,
}

impl<W: Write> RawVideoSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            scratch: Vec::new(),
            frames_written: 0,
        }
    }

    /// Appends one frame to the stream.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), SourceError> {
        self.scratch.clear();
        frame.write_packed_bytes(&mut self.scratch);
        self.writer.write_all(&self.scratch)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn flush(&mut self) -> Result<(), SourceError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W, SourceError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;
    use std::io::Cursor;

    fn geometry() -> FrameGeometry {
        FrameGeometry::new(4, 4, PixelFormat::Yuv420p)
    }

    #[test]
    fn test_reads_frames_until_eof() {
        let frame_size = geometry().frame_size();
        let bytes: Vec<u8> = (0..frame_size * 2).map(|i| i as u8).collect();
        let mut source = RawVideoSource::new(Cursor::new(bytes));
        source.open(geometry()).unwrap();

        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(first.sequence(), 0);
        assert_eq!(second.sequence(), 1);
        assert_eq!(second.sample(0, 0, 0), Some(frame_size as u8));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_truncated_trailing_frame() {
        let bytes = vec![0u8; geometry().frame_size() + 5];
        let mut source = RawVideoSource::new(Cursor::new(bytes));
        source.open(geometry()).unwrap();

        assert!(source.next_frame().unwrap().is_some());
        assert!(matches!(
            source.next_frame(),
            Err(SourceError::TruncatedFrame { read: 5, .. })
        ));
    }

    #[test]
    fn test_read_without_open() {
        let mut source = RawVideoSource::new(Cursor::new(Vec::new()));
        assert!(matches!(source.next_frame(), Err(SourceError::NotOpen)));
    }

    #[test]
    fn test_sink_round_trips_source_bytes() {
        let bytes: Vec<u8> = (0..geometry().frame_size()).map(|i| (i * 7) as u8).collect();
        let mut source = RawVideoSource::new(Cursor::new(bytes.clone()));
        source.open(geometry()).unwrap();

        let mut sink = RawVideoSink::new(Vec::new());
        while let Some(frame) = source.next_frame().unwrap() {
            sink.write_frame(&frame).unwrap();
        }
        assert_eq!(sink.frames_written(), 1);
        assert_eq!(sink.into_inner().unwrap(), bytes);
    }
}
