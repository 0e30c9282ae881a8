//! HTTP byte-range model (RFC 7233 subset: single range only).
//!
//! Parsing and resolution are separated: `RangeSpec::parse` rejects malformed
//! header values as `InvalidInput`, while `RangeSpec::resolve` decides
//! satisfiability against a concrete resource size and yields the exact byte
//! window to serve.

use crate::error::AppError;

/// A parsed `Range: bytes=<start>-[end]` header value.
///
/// Multi-range requests and suffix ranges (`bytes=-N`) are outside the
/// supported grammar and fail at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    /// Inclusive end; `None` means "through the last byte".
    pub end: Option<u64>,
}

/// A satisfiable byte window: inclusive bounds, `start <= end < size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub end: u64,
}

impl ByteWindow {
    /// Number of bytes covered; bounds are inclusive so this is never zero.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl RangeSpec {
    /// Parse a raw `Range` header value.
    pub fn parse(raw: &str) -> Result<RangeSpec, AppError> {
        let value = raw.trim();
        let spec = value.strip_prefix("bytes=").ok_or_else(|| {
            AppError::InvalidInput(format!("Unsupported Range unit in '{}'", value))
        })?;

        if spec.contains(',') {
            return Err(AppError::InvalidInput(
                "Multi-range requests are not supported".to_string(),
            ));
        }

        let (start_raw, end_raw) = spec.split_once('-').ok_or_else(|| {
            AppError::InvalidInput(format!("Malformed Range value '{}'", value))
        })?;

        let start = start_raw.trim().parse::<u64>().map_err(|_| {
            AppError::InvalidInput(format!("Malformed Range start in '{}'", value))
        })?;

        let end_raw = end_raw.trim();
        let end = if end_raw.is_empty() {
            None
        } else {
            Some(end_raw.parse::<u64>().map_err(|_| {
                AppError::InvalidInput(format!("Malformed Range end in '{}'", value))
            })?)
        };

        Ok(RangeSpec { start, end })
    }

    /// Resolve against a resource of `size` bytes.
    ///
    /// An omitted end means the last byte; a supplied end is clamped to
    /// `size - 1`. After clamping, `start > end` (which also covers
    /// `start >= size` and empty resources) is unsatisfiable.
    pub fn resolve(&self, size: u64) -> Result<ByteWindow, AppError> {
        if size == 0 {
            return Err(AppError::RangeNotSatisfiable { size });
        }

        let end = self.end.map_or(size - 1, |e| e.min(size - 1));
        if self.start > end {
            return Err(AppError::RangeNotSatisfiable { size });
        }

        Ok(ByteWindow {
            start: self.start,
            end,
        })
    }
}
