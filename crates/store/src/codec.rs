//! Fixed-size float32 record codec for `.vec` files
//!
//! ## Format
//!
//! A `.vec` file is a flat sequence of records with no header, footer, or
//! checksum. Each record is `dim` IEEE-754 f32 values, little-endian, so
//! record `i` occupies bytes `[i * dim * 4, (i + 1) * dim * 4)` and position
//! in the file is the record's identity.
//!
//! A trailing partial record (from an interrupted write) silently ends the
//! stream on read. Readers must not treat it as an error.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{StoreError, StoreResult};

/// Bytes occupied by one record of the given dimension.
pub const fn record_size(dim: usize) -> usize {
    dim * 4
}

/// Encode one vector as a `dim * 4` byte little-endian record.
pub fn encode_vector(vector: &[f32], dim: usize) -> StoreResult<Vec<u8>> {
    if vector.len() != dim {
        return Err(StoreError::DimensionMismatch {
            expected: dim,
            got: vector.len(),
        });
    }
    let mut record = Vec::with_capacity(record_size(dim));
    for &value in vector {
        record.write_f32::<LittleEndian>(value)?;
    }
    Ok(record)
}

/// Decode one record. `bytes` must be exactly `dim * 4` bytes; callers stop
/// at end-of-file boundaries before reaching a short slice.
pub fn decode_vector(bytes: &[u8], dim: usize) -> StoreResult<Vec<f32>> {
    debug_assert_eq!(bytes.len(), record_size(dim));
    let mut cursor = bytes;
    let mut vector = vec![0.0f32; dim];
    for value in &mut vector {
        *value = cursor.read_f32::<LittleEndian>()?;
    }
    Ok(vector)
}

/// Write all vectors to a `.vec` file, creating parent directories.
pub fn write_vec_file(path: &Path, vectors: &[Vec<f32>], dim: usize) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for vector in vectors {
        if vector.len() != dim {
            return Err(StoreError::DimensionMismatch {
                expected: dim,
                got: vector.len(),
            });
        }
        for &value in vector {
            writer.write_f32::<LittleEndian>(value)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Eagerly read a whole `.vec` file (sanity checks and tests).
pub fn read_vec_file(path: &Path, dim: usize) -> StoreResult<Vec<Vec<f32>>> {
    VecFileReader::open(path, dim)?.collect()
}

/// Streaming reader over a `.vec` file.
///
/// Yields decoded vectors in file order and stops silently on a truncated
/// final record. Re-open from the same path to restart the stream.
pub struct VecFileReader {
    reader: BufReader<File>,
    record: Vec<u8>,
    dim: usize,
}

impl VecFileReader {
    /// Open a `.vec` file for streaming decode.
    pub fn open(path: &Path, dim: usize) -> StoreResult<Self> {
        if dim == 0 {
            return Err(StoreError::InvalidDimension { dim });
        }
        let file = File::open(path)?;
        Ok(VecFileReader {
            reader: BufReader::new(file),
            record: vec![0u8; record_size(dim)],
            dim,
        })
    }
}

impl Iterator for VecFileReader {
    type Item = StoreResult<Vec<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        match read_record_into(&mut self.reader, &mut self.record) {
            Ok(true) => Some(decode_vector(&self.record, self.dim)),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Fill `buf` with the next record. Returns `Ok(false)` at end of stream;
/// a short final read counts as end of stream, not an error.
pub(crate) fn read_record_into<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Copy exactly `remaining` bytes from `src` to `dst` through `buf`.
pub(crate) fn copy_exact(
    src: &mut File,
    dst: &mut File,
    mut remaining: u64,
    buf: &mut [u8],
) -> io::Result<()> {
    while remaining > 0 {
        let want = remaining.min(buf.len() as u64) as usize;
        src.read_exact(&mut buf[..want])?;
        dst.write_all(&buf[..want])?;
        remaining -= want as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_encode_length() {
        let record = encode_vector(&[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(record.len(), 12);
    }

    #[test]
    fn test_encode_little_endian() {
        let record = encode_vector(&[1.0], 1).unwrap();
        assert_eq!(record, 1.0f32.to_le_bytes());
    }

    #[test]
    fn test_encode_dimension_mismatch() {
        let result = encode_vector(&[1.0, 2.0], 3);
        assert!(matches!(
            result,
            Err(StoreError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_roundtrip() {
        let vector = vec![0.5, -1.25, f32::MIN_POSITIVE, 1e30];
        let record = encode_vector(&vector, 4).unwrap();
        let decoded = decode_vector(&record, 4).unwrap();
        assert_eq!(decoded, vector);
    }

    #[test]
    fn test_roundtrip_preserves_bit_patterns() {
        // NaN payloads and signed zero must survive the codec untouched.
        let vector = vec![f32::from_bits(0x7fc0_0001), -0.0, f32::INFINITY];
        let record = encode_vector(&vector, 3).unwrap();
        let decoded = decode_vector(&record, 3).unwrap();
        for (a, b) in vector.iter().zip(&decoded) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_write_read_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sub").join("docs.vec");

        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]];
        write_vec_file(&path, &vectors, 2).unwrap();

        let read = read_vec_file(&path, 2).unwrap();
        assert_eq!(read, vectors);
    }

    #[test]
    fn test_write_file_dimension_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");

        let vectors = vec![vec![1.0, 0.0], vec![0.0]];
        let result = write_vec_file(&path, &vectors, 2);
        assert!(matches!(
            result,
            Err(StoreError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_reader_ignores_truncated_tail() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");

        write_vec_file(&path, &[vec![1.0, 2.0], vec![3.0, 4.0]], 2).unwrap();
        // Append half a record.
        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&5.0f32.to_le_bytes());
        fs::write(&path, &bytes).unwrap();

        let read = read_vec_file(&path, 2).unwrap();
        assert_eq!(read, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_reader_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");
        write_vec_file(&path, &[], 8).unwrap();

        assert!(read_vec_file(&path, 8).unwrap().is_empty());
    }

    #[test]
    fn test_reader_restartable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.vec");
        let vectors = vec![vec![1.0], vec![2.0]];
        write_vec_file(&path, &vectors, 1).unwrap();

        let first: Vec<_> = VecFileReader::open(&path, 1)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        let second: Vec<_> = VecFileReader::open(&path, 1)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(first, second);
    }
}
