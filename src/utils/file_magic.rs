use std::path::Path;

/// 取文件扩展名（小写，含点号），没有扩展名时返回空串
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// `extension` 包含点号，如 ".pdf"。文本类文件只要求内容非空。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => data.starts_with(b"%PDF"),
        // OOXML 是 ZIP 容器
        ".docx" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        ".bmp" => data.starts_with(b"BM"),
        ".tif" | ".tiff" => data.starts_with(b"II*\0") || data.starts_with(b"MM\0*"),
        ".txt" | ".md" | ".csv" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Worksheet.PDF"), ".pdf");
        assert_eq!(file_extension("notes.tar.md"), ".md");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn test_document_magic() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".docx"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
    }

    #[test]
    fn test_image_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
    }

    #[test]
    fn test_text_and_unknown() {
        assert!(validate_magic_bytes(b"score: 10", ".txt"));
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"MZ", ".exe"));
    }
}
