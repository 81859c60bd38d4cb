//! 上传文件的文本提取
//!
//! 仅做薄封装：PDF 交给 `pdf-extract`，DOCX 读取 `word/document.xml`。图片需要 OCR，不支持。

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, TutorHubError};
use crate::utils::file_extension;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".bmp", ".tif", ".tiff", ".webp"];
const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".csv"];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-z]+);").expect("Invalid entity regex"));

/// 按扩展名提取文本
pub fn extract_text(file_name: &str, data: &[u8]) -> Result<String> {
    let extension = file_extension(file_name);
    match extension.as_str() {
        ".pdf" => extract_pdf(data),
        ".docx" => extract_docx(data),
        ext if TEXT_EXTENSIONS.contains(&ext) => Ok(String::from_utf8_lossy(data).into_owned()),
        ext if IMAGE_EXTENSIONS.contains(&ext) => Err(TutorHubError::unsupported_file_type(
            format!("Text extraction from images ({ext}) requires OCR, which is not supported"),
        )),
        ext => Err(TutorHubError::unsupported_file_type(format!(
            "Unsupported file type for text extraction: {}",
            if ext.is_empty() { file_name } else { ext }
        ))),
    }
}

/// 在阻塞线程池中提取，避免占用 worker
pub async fn extract_text_blocking(file_name: String, data: Vec<u8>) -> Result<String> {
    tokio::task::spawn_blocking(move || extract_text(&file_name, &data))
        .await
        .map_err(|e| TutorHubError::text_extraction(format!("Extraction task failed: {e}")))?
}

fn extract_pdf(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data)
        .map_err(|e| TutorHubError::text_extraction(format!("Failed to read PDF: {e}")))
}

fn extract_docx(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| TutorHubError::text_extraction(format!("Failed to open DOCX: {e}")))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| TutorHubError::text_extraction(format!("DOCX has no document body: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| TutorHubError::text_extraction(format!("Failed to read DOCX: {e}")))?;

    Ok(docx_xml_to_text(&xml))
}

fn docx_xml_to_text(xml: &str) -> String {
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:br/>", "\n")
        .replace("<w:tab/>", "\t");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text_is_lossy_utf8() {
        assert_eq!(extract_text("notes.TXT", b"1/2 + 1/4 = 3/4").unwrap(), "1/2 + 1/4 = 3/4");
        assert_eq!(extract_text("data.csv", b"a,\xffb").unwrap(), "a,\u{fffd}b");
    }

    #[test]
    fn test_docx_paragraphs_and_entities() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Q1: 3 &lt; 5</w:t></w:r></w:p><w:p><w:r><w:t>Tom &amp; Jerry&#39;s &#x41;</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract_text("worksheet.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Q1: 3 < 5\nTom & Jerry's A");
    }

    #[test]
    fn test_docx_without_body_fails() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        let data = writer.finish().unwrap().into_inner();

        let err = extract_text("broken.docx", &data).unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    #[test]
    fn test_images_and_unknown_types_are_unsupported() {
        for name in ["scan.jpg", "scan.png", "scan.webp", "archive.zip", "README"] {
            let err = extract_text(name, b"data").unwrap_err();
            assert_eq!(err.code(), "E016", "{name}");
        }
    }

    #[tokio::test]
    async fn test_extract_blocking() {
        let text = extract_text_blocking("a.md".to_string(), b"# Title".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "# Title");
    }
}
