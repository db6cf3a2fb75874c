//! Preview classification for fetched file bodies.

use std::fmt;

/// Guesses a MIME type from the file name or the leading magic bytes.
///
/// Used when the server did not send a `TYPE` header. Returns `None` when
/// neither the extension nor the content is recognised.
pub fn sniff_mime(name: &str, data: &[u8]) -> Option<&'static str> {
    let name = name.to_ascii_lowercase();
    let has_ext = |exts: &[&str]| exts.iter().any(|ext| name.ends_with(ext));

    if has_ext(&[".png"]) || data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if has_ext(&[".jpg", ".jpeg"]) || data.starts_with(b"\xff\xd8") {
        Some("image/jpeg")
    } else if has_ext(&[".gif"]) || data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if has_ext(&[".bmp"]) || data.starts_with(b"BM") {
        Some("image/bmp")
    } else if has_ext(&[".webp"]) || (data.starts_with(b"RIFF") && data.get(8..12) == Some(&b"WEBP"[..])) {
        Some("image/webp")
    } else if has_ext(&[".txt"]) {
        Some("text/plain")
    } else if has_ext(&[".md"]) {
        Some("text/markdown")
    } else {
        None
    }
}

/// How a fetched body should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// An image; decoding and scaling are left to the presentation layer.
    Image { mime: String, len: usize },
    /// Valid UTF-8 text.
    Text(String),
    /// Anything else.
    Binary { len: usize },
}

impl Preview {
    /// Classifies `data`, preferring the server-supplied `mime` over sniffing.
    pub fn classify(name: &str, mime: &str, data: &[u8]) -> Self {
        let mime = if mime.is_empty() {
            sniff_mime(name, data).unwrap_or_default()
        } else {
            mime
        };

        if mime.starts_with("image/") {
            return Preview::Image {
                mime: mime.to_string(),
                len: data.len(),
            };
        }

        match std::str::from_utf8(data) {
            Ok(text) => Preview::Text(text.to_string()),
            Err(_) => Preview::Binary { len: data.len() },
        }
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Image { mime, len } => write!(f, "<image {len} bytes> ({mime})"),
            Preview::Text(text) => f.write_str(text),
            Preview::Binary { len } => write!(f, "<binary {len} bytes>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_mime_by_extension_is_case_insensitive() {
        assert_eq!(sniff_mime("PHOTO.JPEG", b""), Some("image/jpeg"));
        assert_eq!(sniff_mime("notes.txt", b""), Some("text/plain"));
        assert_eq!(sniff_mime("README.md", b""), Some("text/markdown"));
    }

    #[test]
    fn test_sniff_mime_by_magic_bytes() {
        assert_eq!(sniff_mime("blob", b"\x89PNG\r\n\x1a\n...."), Some("image/png"));
        assert_eq!(sniff_mime("blob", b"GIF89a..."), Some("image/gif"));
        assert_eq!(sniff_mime("blob", b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
    }

    #[test]
    fn test_sniff_mime_unknown_returns_none() {
        assert_eq!(sniff_mime("data.bin", b"\0\x01\x02"), None);
        assert_eq!(sniff_mime("blob", b"RIFF\0\0\0\0WAVE"), None);
    }

    #[test]
    fn test_classify_prefers_declared_mime() {
        // A .txt name, but the server says it is an image.
        let preview = Preview::classify("x.txt", "image/png", b"abc");
        assert_eq!(
            preview,
            Preview::Image {
                mime: "image/png".to_string(),
                len: 3
            }
        );
    }

    #[test]
    fn test_classify_falls_back_to_sniffing() {
        let preview = Preview::classify("cat.gif", "", b"GIF87a");
        assert!(matches!(preview, Preview::Image { ref mime, .. } if mime == "image/gif"));
    }

    #[test]
    fn test_classify_text_and_binary() {
        assert_eq!(
            Preview::classify("a", "text/plain", b"HELLO"),
            Preview::Text("HELLO".to_string())
        );
        assert_eq!(
            Preview::classify("a", "", b"\xff\xfe\x00"),
            Preview::Binary { len: 3 }
        );
    }

    #[test]
    fn test_preview_display() {
        assert_eq!(Preview::Binary { len: 7 }.to_string(), "<binary 7 bytes>");
        assert_eq!(Preview::Text("hi".to_string()).to_string(), "hi");
        assert_eq!(
            Preview::Image {
                mime: "image/png".to_string(),
                len: 10
            }
            .to_string(),
            "<image 10 bytes> (image/png)"
        );
    }
}
