//! core::checksum
//!
//! Checksum file generation for release assets.
//!
//! For every algorithm and every file, a sibling file named
//! `<file>.<algorithm>` is written in the `sha256sum` format
//! (`<digest>  <base name>\n`) and returned for upload.
//!
//! Files that are themselves checksum files for one of the requested
//! algorithms (left behind by an earlier run in the same workspace) are not
//! hashed again.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Blake2s256};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::core::config::ConfigError;
use crate::core::types::AssetFile;
use crate::error::PublishError;

/// BLAKE2b with a 256-bit output.
type Blake2b256 = Blake2b<U32>;

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Adler32,
    Crc32,
    Blake2b,
    Blake2s,
}

impl ChecksumAlgorithm {
    /// Every algorithm, in the order they are listed to users.
    pub const ALL: [ChecksumAlgorithm; 10] = [
        ChecksumAlgorithm::Md5,
        ChecksumAlgorithm::Sha1,
        ChecksumAlgorithm::Sha224,
        ChecksumAlgorithm::Sha256,
        ChecksumAlgorithm::Sha384,
        ChecksumAlgorithm::Sha512,
        ChecksumAlgorithm::Adler32,
        ChecksumAlgorithm::Crc32,
        ChecksumAlgorithm::Blake2b,
        ChecksumAlgorithm::Blake2s,
    ];

    /// Configuration spelling, also used as the file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Sha224 => "sha224",
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha384 => "sha384",
            ChecksumAlgorithm::Sha512 => "sha512",
            ChecksumAlgorithm::Adler32 => "adler32",
            ChecksumAlgorithm::Crc32 => "crc32",
            ChecksumAlgorithm::Blake2b => "blake2b",
            ChecksumAlgorithm::Blake2s => "blake2s",
        }
    }

    /// Checksum of everything `reader` yields.
    ///
    /// Cryptographic digests are lowercase hex. The 32-bit checksums
    /// (`adler32`, `crc32`) are printed as unsigned decimal.
    pub fn digest_reader(self, reader: &mut impl Read) -> io::Result<String> {
        fn run<D: Digest + io::Write>(mut hasher: D, reader: &mut impl Read) -> io::Result<String> {
            io::copy(reader, &mut hasher)?;
            Ok(hex::encode(hasher.finalize()))
        }

        match self {
            ChecksumAlgorithm::Md5 => run(Md5::new(), reader),
            ChecksumAlgorithm::Sha1 => run(Sha1::new(), reader),
            ChecksumAlgorithm::Sha224 => run(Sha224::new(), reader),
            ChecksumAlgorithm::Sha256 => run(Sha256::new(), reader),
            ChecksumAlgorithm::Sha384 => run(Sha384::new(), reader),
            ChecksumAlgorithm::Sha512 => run(Sha512::new(), reader),
            ChecksumAlgorithm::Blake2b => run(Blake2b256::new(), reader),
            ChecksumAlgorithm::Blake2s => run(Blake2s256::new(), reader),
            ChecksumAlgorithm::Adler32 => {
                let mut hasher = adler::Adler32::new();
                for_each_chunk(reader, |chunk| hasher.write_slice(chunk))?;
                Ok(hasher.checksum().to_string())
            }
            ChecksumAlgorithm::Crc32 => {
                let mut hasher = crc32fast::Hasher::new();
                for_each_chunk(reader, |chunk| hasher.update(chunk))?;
                Ok(hasher.finalize().to_string())
            }
        }
    }

    /// Checksum of a file's contents.
    pub fn digest_file(self, path: &Path) -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        self.digest_reader(&mut reader)
    }
}

/// Feed `reader` to `update` in fixed-size chunks.
fn for_each_chunk(reader: &mut impl Read, mut update: impl FnMut(&[u8])) -> io::Result<()> {
    let mut buf = [0u8; 64 * 1024];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChecksumAlgorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownChecksum(s.to_string()))
    }
}

/// Parse algorithm names, keeping their order and dropping repeats.
pub fn parse_algorithms(names: &[String]) -> Result<Vec<ChecksumAlgorithm>, ConfigError> {
    let mut algorithms = Vec::with_capacity(names.len());
    for name in names {
        let algorithm: ChecksumAlgorithm = name.parse()?;
        if !algorithms.contains(&algorithm) {
            algorithms.push(algorithm);
        }
    }
    Ok(algorithms)
}

/// Path of the checksum file for `file`.
fn checksum_path(file: &Path, algorithm: ChecksumAlgorithm) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".");
    name.push(algorithm.as_str());
    PathBuf::from(name)
}

/// Whether `file` looks like a checksum file for one of `algorithms`.
fn is_checksum_file(file: &AssetFile, algorithms: &[ChecksumAlgorithm]) -> bool {
    file.path()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| algorithms.iter().any(|a| a.as_str() == ext))
}

/// Write checksum files for `files` and return them, algorithm-major.
///
/// # Errors
///
/// Returns `PublishError::Io` if a file cannot be hashed or a checksum file
/// cannot be written.
pub fn write_checksums(
    files: &[AssetFile],
    algorithms: &[ChecksumAlgorithm],
) -> Result<Vec<AssetFile>, PublishError> {
    let sources: Vec<&AssetFile> = files
        .iter()
        .filter(|f| !is_checksum_file(f, algorithms))
        .collect();
    let mut written = Vec::with_capacity(sources.len() * algorithms.len());

    for &algorithm in algorithms {
        for file in &sources {
            let digest = algorithm
                .digest_file(file.path())
                .map_err(|e| PublishError::read(file.path(), e))?;

            let path = checksum_path(file.path(), algorithm);
            fs::write(&path, format!("{}  {}\n", digest, file.name()))
                .map_err(|e| PublishError::write(&path, e))?;

            written.push(AssetFile::new(path));
        }
    }

    Ok(written)
}
