//! Content sniffing for uploaded bytes.
//!
//! Types are decided from leading magic bytes only. Client supplied names and
//! headers never influence which extension a record gets.

/// Number of leading bytes considered when sniffing.
pub const SNIFF_LEN: usize = 512;

/// Fallback label for text-looking content.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Fallback label for binary content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A stored image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// JPEG, stored as `.jpg`.
    Jpeg,
    /// PNG, stored as `.png`.
    Png,
}

impl ImageKind {
    /// Maps a sniffed content type to an accepted kind.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// File extension used on disk, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Exact-prefix signature, optionally masked.
struct Signature {
    pattern: &'static [u8],
    mask: Option<&'static [u8]>,
    content_type: &'static str,
}

impl Signature {
    const fn exact(pattern: &'static [u8], content_type: &'static str) -> Self {
        Self {
            pattern,
            mask: None,
            content_type,
        }
    }

    const fn masked(
        pattern: &'static [u8],
        mask: &'static [u8],
        content_type: &'static str,
    ) -> Self {
        Self {
            pattern,
            mask: Some(mask),
            content_type,
        }
    }

    fn matches(&self, data: &[u8]) -> bool {
        if data.len() < self.pattern.len() {
            return false;
        }
        match self.mask {
            None => data.starts_with(self.pattern),
            Some(mask) => self
                .pattern
                .iter()
                .zip(mask)
                .zip(data)
                .all(|((p, m), d)| d & m == *p),
        }
    }
}

// Browser sniffing table, binary types only.
const SIGNATURES: &[Signature] = &[
    Signature::exact(b"%PDF-", "application/pdf"),
    Signature::exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::exact(b"BM", "image/bmp"),
    Signature::exact(b"GIF87a", "image/gif"),
    Signature::exact(b"GIF89a", "image/gif"),
    Signature::masked(
        b"RIFF\x00\x00\x00\x00WEBPVP",
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        "image/webp",
    ),
    Signature::exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::exact(b"\xFF\xD8\xFF", "image/jpeg"),
    Signature::exact(b"PK\x03\x04", "application/zip"),
    Signature::exact(b"\x1F\x8B\x08", "application/x-gzip"),
];

// Markup is recognised after leading whitespace, case-insensitively.
const MARKUP: &[(&[u8], &str)] = &[
    (b"<?xml", "text/xml; charset=utf-8"),
    (b"<!DOCTYPE HTML", "text/html; charset=utf-8"),
    (b"<HTML", "text/html; charset=utf-8"),
    (b"<HEAD", "text/html; charset=utf-8"),
    (b"<BODY", "text/html; charset=utf-8"),
];

/// Returns a MIME-style label for the given content prefix.
///
/// Only the first [`SNIFF_LEN`] bytes are examined. Shorter input is fine;
/// empty input sniffs as plain text.
#[must_use]
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    if let Some(sig) = SIGNATURES.iter().find(|sig| sig.matches(data)) {
        return sig.content_type;
    }

    let trimmed = trim_leading_whitespace(data);
    for &(tag, content_type) in MARKUP {
        if trimmed.len() >= tag.len() && trimmed[..tag.len()].eq_ignore_ascii_case(tag) {
            return content_type;
        }
    }

    if data.iter().copied().any(is_binary_byte) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

const fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
