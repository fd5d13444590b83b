//! Binary machine-file reader
//!
//! Decodes the fixed 32-byte header and the tagged little-endian records
//! that follow it. Two signatures are recognised:
//!
//! - `MCAX`: geometry records (`LINE`, `ARC`, `POINT`) returned as
//!   [`BinaryEntity`] values.
//! - `MCTP`: tool-number tagged point runs returned as [`Toolpath`]s.
//!
//! Reads are all-or-nothing: a structural error discards everything decoded
//! so far.

use tracing::{debug, info, warn};

use camkit_core::{ArcEntity, BinaryEntity, FileFormatError, Point3, Toolpath, Units};

/// Size of the fixed header preceding the record stream
pub const HEADER_LEN: usize = 32;

/// Signature of geometry files
pub const GEOMETRY_MAGIC: &[u8; 4] = b"MCAX";

/// Signature of toolpath run files
pub const TOOLPATH_MAGIC: &[u8; 4] = b"MCTP";

/// Bytes skipped after an unrecognised record tag
pub const UNKNOWN_TAG_STRIDE: usize = 4;

const VERSION_OFFSET: usize = 4;
const UNITS_OFFSET: usize = 6;

/// Record tags of the geometry stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordTag {
    Line = 0x01,
    Arc = 0x02,
    Point = 0x04,
}

impl RecordTag {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Line),
            0x02 => Some(Self::Arc),
            0x04 => Some(Self::Point),
            _ => None,
        }
    }

    /// Payload size following the tag byte
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Line => 6 * 4,
            Self::Arc => 9 * 4,
            Self::Point => 3 * 4,
        }
    }
}

/// Decoded file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub units: Units,
}

/// Contents of an `MCAX` file
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFile {
    pub version: u16,
    pub units: Units,
    pub entities: Vec<BinaryEntity>,
    /// Number of unrecognised tags skipped
    pub skipped_records: usize,
}

/// Contents of an `MCTP` file
#[derive(Debug, Clone, PartialEq)]
pub struct ToolpathFile {
    pub version: u16,
    pub units: Units,
    pub toolpaths: Vec<Toolpath>,
}

/// Anything the reader can decode
#[derive(Debug, Clone, PartialEq)]
pub enum BinaryContents {
    Geometry(GeometryFile),
    Toolpaths(ToolpathFile),
}

/// Little-endian cursor that reports short reads as [`FileFormatError::TruncatedData`]
struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless `needed` bytes are available, reporting from `start`
    fn require(&self, start: usize, needed: usize) -> Result<(), FileFormatError> {
        let available = self.data.len().saturating_sub(start);
        if available < needed {
            return Err(FileFormatError::TruncatedData {
                offset: start,
                needed,
                available,
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], FileFormatError> {
        self.require(self.offset, N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, FileFormatError> {
        Ok(self.take::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, FileFormatError> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    fn f32(&mut self) -> Result<f64, FileFormatError> {
        Ok(f32::from_le_bytes(self.take::<4>()?) as f64)
    }

    fn point(&mut self) -> Result<Point3, FileFormatError> {
        Ok(Point3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    fn skip(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.data.len());
    }
}

/// Reader for binary machine files
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryToolpathReader;

impl BinaryToolpathReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode the fixed header
    ///
    /// The length check runs before the signature check, so any buffer
    /// shorter than [`HEADER_LEN`] is reported as truncated.
    pub fn read_header(&self, data: &[u8]) -> Result<FileHeader, FileFormatError> {
        if data.len() < HEADER_LEN {
            return Err(FileFormatError::TruncatedData {
                offset: 0,
                needed: HEADER_LEN,
                available: data.len(),
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[..4]);
        if &magic != GEOMETRY_MAGIC && &magic != TOOLPATH_MAGIC {
            return Err(signature_error(&magic, "MCAX, MCTP"));
        }

        let version = u16::from_le_bytes([data[VERSION_OFFSET], data[VERSION_OFFSET + 1]]);
        let units = if data[UNITS_OFFSET] == 0 {
            Units::INCH
        } else {
            Units::MM
        };

        Ok(FileHeader {
            magic,
            version,
            units,
        })
    }

    /// Decode a complete file of either kind
    pub fn read(&self, data: &[u8]) -> Result<BinaryContents, FileFormatError> {
        let header = self.read_header(data)?;
        debug!(
            "Binary header: {} v{} ({})",
            String::from_utf8_lossy(&header.magic),
            header.version,
            header.units
        );
        if &header.magic == GEOMETRY_MAGIC {
            self.read_geometry_records(data, header)
                .map(BinaryContents::Geometry)
        } else {
            self.read_toolpath_runs(data, header)
                .map(BinaryContents::Toolpaths)
        }
    }

    /// Decode an `MCAX` geometry file
    pub fn read_entities(&self, data: &[u8]) -> Result<GeometryFile, FileFormatError> {
        let header = self.read_header(data)?;
        if &header.magic != GEOMETRY_MAGIC {
            return Err(signature_error(&header.magic, "MCAX"));
        }
        self.read_geometry_records(data, header)
    }

    /// Decode an `MCTP` toolpath file
    pub fn read_toolpaths(&self, data: &[u8]) -> Result<ToolpathFile, FileFormatError> {
        let header = self.read_header(data)?;
        if &header.magic != TOOLPATH_MAGIC {
            return Err(signature_error(&header.magic, "MCTP"));
        }
        self.read_toolpath_runs(data, header)
    }

    fn read_geometry_records(
        &self,
        data: &[u8],
        header: FileHeader,
    ) -> Result<GeometryFile, FileFormatError> {
        let mut cursor = ByteCursor::new(data, HEADER_LEN);
        let mut entities = Vec::new();
        let mut skipped_records = 0;

        while !cursor.is_empty() {
            let record_start = cursor.offset;
            let byte = cursor.u8()?;
            let Some(tag) = RecordTag::from_byte(byte) else {
                warn!(
                    "Unknown record tag 0x{:02x} at offset {}, skipping {} bytes",
                    byte, record_start, UNKNOWN_TAG_STRIDE
                );
                skipped_records += 1;
                cursor.skip(UNKNOWN_TAG_STRIDE);
                continue;
            };

            cursor.require(cursor.offset, tag.payload_len()).map_err(|_| {
                FileFormatError::TruncatedData {
                    offset: record_start,
                    needed: 1 + tag.payload_len(),
                    available: data.len() - record_start,
                }
            })?;

            let entity = match tag {
                RecordTag::Line => BinaryEntity::Line {
                    start: cursor.point()?,
                    end: cursor.point()?,
                },
                RecordTag::Arc => BinaryEntity::Arc(ArcEntity {
                    center: cursor.point()?,
                    radius: cursor.f32()?,
                    start_angle: cursor.f32()?,
                    end_angle: cursor.f32()?,
                    normal: cursor.point()?,
                }),
                RecordTag::Point => BinaryEntity::Point {
                    position: cursor.point()?,
                },
            };
            entities.push(entity);
        }

        info!(
            "Read {} geometry entities ({} unknown records skipped)",
            entities.len(),
            skipped_records
        );
        Ok(GeometryFile {
            version: header.version,
            units: header.units,
            entities,
            skipped_records,
        })
    }

    fn read_toolpath_runs(
        &self,
        data: &[u8],
        header: FileHeader,
    ) -> Result<ToolpathFile, FileFormatError> {
        const POINT_LEN: usize = 4 * 4;

        let mut cursor = ByteCursor::new(data, HEADER_LEN);
        let mut toolpaths = Vec::new();

        while !cursor.is_empty() {
            let run_start = cursor.offset;
            let tool_number = cursor.u32()?;
            let count = cursor.u32()? as usize;
            let needed = count.saturating_mul(POINT_LEN);
            cursor.require(cursor.offset, needed).map_err(|_| {
                FileFormatError::TruncatedData {
                    offset: run_start,
                    needed: needed.saturating_add(8),
                    available: data.len() - run_start,
                }
            })?;

            let mut points = Vec::with_capacity(count);
            for _ in 0..count {
                let position = cursor.point()?;
                let feed = cursor.f32()?;
                points.push(position.with_feed_rate(feed));
            }
            if points.is_empty() {
                debug!("Dropping empty run for T{} at offset {}", tool_number, run_start);
                continue;
            }
            toolpaths.push(Toolpath::with_points(tool_number, header.units, points));
        }

        info!("Read {} toolpath runs", toolpaths.len());
        Ok(ToolpathFile {
            version: header.version,
            units: header.units,
            toolpaths,
        })
    }
}

fn signature_error(found: &[u8; 4], expected: &str) -> FileFormatError {
    FileFormatError::InvalidSignature {
        expected: expected.to_string(),
        found: String::from_utf8_lossy(found).into_owned(),
    }
}
