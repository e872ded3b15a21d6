//! MIME type detection from file contents.
//!
//! Attachments arrive without a trustworthy type, so images are recognised
//! by their leading signature bytes.

/// Detect a MIME type from the first bytes of `data`.
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'B', b'M', ..] => "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        [b'%', b'P', b'D', b'F', b'-', ..] => "application/pdf",
        _ if is_text(data) => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn is_text(data: &[u8]) -> bool {
    !data.is_empty()
        && std::str::from_utf8(data).is_ok()
        && !data.iter().any(|b| b.is_ascii_control() && !b.is_ascii_whitespace())
}

/// Whether the platform accepts this type as an avatar.
pub fn is_avatar_type(mime: &str) -> bool {
    matches!(mime, "image/gif" | "image/jpeg" | "image/png")
}
