//! File upload intake: file-name validation and size-capped reads.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::error::InputError;
use crate::pipeline::types::FileKind;

impl FileKind {
    /// Infer the kind from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self, InputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::MissingContent);
        }
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if lower.ends_with(".txt") {
            Ok(Self::Txt)
        } else {
            Err(InputError::UnsupportedFileType(name.to_string()))
        }
    }
}

/// An uploaded file's bytes and declared kind.
#[derive(Debug, Clone)]
pub struct Upload {
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(kind: FileKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    /// Read a file from disk, inferring its kind from the extension unless
    /// `kind` is given. Files larger than `max_bytes` are rejected without
    /// being read in full.
    pub async fn from_path(
        path: &Path,
        kind: Option<FileKind>,
        max_bytes: usize,
    ) -> Result<Self, InputError> {
        let kind = match kind {
            Some(kind) => kind,
            None => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                FileKind::from_file_name(&name)?
            }
        };

        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        if size > max_bytes as u64 {
            return Err(InputError::TooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                max: max_bytes,
            });
        }

        let mut bytes = Vec::with_capacity(size as usize);
        // The file may grow between stat and read; the cap still holds.
        file.take(max_bytes as u64 + 1).read_to_end(&mut bytes).await?;
        if bytes.len() > max_bytes {
            return Err(InputError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        Ok(Self { kind, bytes })
    }
}
