//! Text Extractor — turns uploaded resume bytes into normalized plain text.
//!
//! PDF goes through `pdf-extract`, DOCX is opened as a ZIP container and
//! `word/document.xml` is scanned for text runs, TXT is decoded as strict
//! UTF-8. Everything funnels through `clean_text` so downstream keyword
//! matching sees one whitespace convention.

use std::io::Read;

use thiserror::Error;
use tracing::debug;

/// Supported resume file formats, detected from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pdf,
    Docx,
    Txt,
}

impl FileFormat {
    /// Detects the format from a filename. Returns `None` for anything
    /// outside the supported set.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())?;
        match ext.as_str() {
            "pdf" => Some(FileFormat::Pdf),
            "docx" => Some(FileFormat::Docx),
            "txt" => Some(FileFormat::Txt),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt or unreadable file: {0}")]
    CorruptFile(String),

    #[error("text encoding error: {0}")]
    Encoding(String),
}

/// Extracts normalized text from raw file bytes.
///
/// Guarantees on success: valid UTF-8, no NUL or control artifacts,
/// CRLF normalized, runs of blank lines collapsed, non-empty.
pub fn extract_text(bytes: &[u8], format: FileFormat) -> Result<String, ExtractError> {
    let raw = match format {
        FileFormat::Pdf => extract_pdf(bytes)?,
        FileFormat::Docx => extract_docx(bytes)?,
        FileFormat::Txt => extract_txt(bytes)?,
    };

    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(ExtractError::CorruptFile(
            "file contained no extractable text".to_string(),
        ));
    }

    debug!("Extracted {} chars from {:?} upload", text.len(), format);
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::CorruptFile(format!("PDF parse failed: {e}")))
}

/// DOCX is a ZIP container; the document body lives in `word/document.xml`.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| ExtractError::CorruptFile(format!("not a DOCX container: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::CorruptFile(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| ExtractError::CorruptFile(format!("unreadable word/document.xml: {e}")))?;

    Ok(wordprocessing_text(&document_xml))
}

fn extract_txt(bytes: &[u8]) -> Result<String, ExtractError> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|e| ExtractError::Encoding(format!("invalid UTF-8 at byte {}", e.valid_up_to())))
}

/// Converts WordprocessingML to plain text. Only `<w:t>` runs carry
/// document text; paragraph ends and explicit breaks become newlines,
/// tabs become tabs, and the five predefined XML entities are decoded.
fn wordprocessing_text(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    let mut rest = xml;
    let mut in_text_run = false;

    while let Some(open) = rest.find('<') {
        if in_text_run {
            out.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break; // truncated tag at end of input
        };
        let tag = &rest[open + 1..open + close];
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or_default();
        match name {
            "w:t" if !self_closing => in_text_run = true,
            "/w:t" => in_text_run = false,
            "/w:p" | "w:br" | "w:cr" => out.push('\n'),
            "w:tab" => out.push('\t'),
            _ => {}
        }
        rest = &rest[open + close + 1..];
    }
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Normalizes extracted text: strips NUL and control artifacts left by
/// PDF parsers, converts CRLF, trims trailing space per line, and
/// collapses runs of blank lines to a single blank line.
pub fn clean_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0usize;

    for line in normalized.lines() {
        let line: String = line
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        let line = line.trim_end();

        if line.is_empty() {
            blank_run += 1;
            if blank_run == 1 && !lines.is_empty() {
                lines.push(String::new());
            }
        } else {
            blank_run = 0;
            lines.push(line.to_string());
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(document_xml: &str) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(FileFormat::from_filename("resume.PDF"), Some(FileFormat::Pdf));
        assert_eq!(
            FileFormat::from_filename("resume.Docx"),
            Some(FileFormat::Docx)
        );
        assert_eq!(FileFormat::from_filename("resume.txt"), Some(FileFormat::Txt));
    }

    #[test]
    fn test_format_detection_rejects_unknown_extensions() {
        assert_eq!(FileFormat::from_filename("resume.exe"), None);
        assert_eq!(FileFormat::from_filename("resume.doc"), None);
        assert_eq!(FileFormat::from_filename("resume"), None);
    }

    #[test]
    fn test_txt_roundtrip() {
        let text = extract_text("Five years of Python.\n".as_bytes(), FileFormat::Txt).unwrap();
        assert_eq!(text, "Five years of Python.");
    }

    #[test]
    fn test_txt_invalid_utf8_is_encoding_error() {
        let err = extract_text(&[0x50, 0xff, 0xfe, 0x51], FileFormat::Txt).unwrap_err();
        assert!(matches!(err, ExtractError::Encoding(_)));
    }

    #[test]
    fn test_garbage_pdf_is_corrupt_file() {
        let err = extract_text(b"not a pdf at all", FileFormat::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::CorruptFile(_)));
    }

    #[test]
    fn test_garbage_docx_is_corrupt_file() {
        let err = extract_text(b"PK but not really a zip", FileFormat::Docx).unwrap_err();
        assert!(matches!(err, ExtractError::CorruptFile(_)));
    }

    #[test]
    fn test_zip_without_document_xml_is_corrupt_file() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("unrelated.txt", options).unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();
        let bytes = cursor.into_inner();

        let err = extract_text(&bytes, FileFormat::Docx).unwrap_err();
        assert!(matches!(err, ExtractError::CorruptFile(_)));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0"?><w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p><w:r><w:t>Python &amp; Docker engineer</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = extract_text(&docx_with_body(xml), FileFormat::Docx).unwrap();
        assert_eq!(text, "Jane Doe\nPython & Docker engineer");
    }

    #[test]
    fn test_docx_breaks_and_tabs() {
        let xml = "<w:p><w:r><w:t>a</w:t><w:br/><w:t>b</w:t><w:tab/><w:t>c</w:t></w:r></w:p>";
        let text = extract_text(&docx_with_body(xml), FileFormat::Docx).unwrap();
        assert_eq!(text, "a\nb\tc");
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let xml = "<w:document><w:body></w:body></w:document>";
        let err = extract_text(&docx_with_body(xml), FileFormat::Docx).unwrap_err();
        assert!(matches!(err, ExtractError::CorruptFile(_)));
    }

    #[test]
    fn test_clean_text_collapses_blank_runs() {
        let cleaned = clean_text("a\n\n\n\nb\r\nc  \n");
        assert_eq!(cleaned, "a\n\nb\nc");
    }

    #[test]
    fn test_clean_text_strips_nul_and_control_bytes() {
        let cleaned = clean_text("a\u{0}b\u{7}c");
        assert_eq!(cleaned, "abc");
    }

    #[test]
    fn test_clean_text_keeps_tabs() {
        assert_eq!(clean_text("a\tb"), "a\tb");
    }
}
