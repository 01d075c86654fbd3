//! 上传文件的魔术字节校验

/// 文件头签名：偏移量和字节序列
struct Signature {
    offset: usize,
    bytes: &'static [u8],
}

const fn at_start(bytes: &'static [u8]) -> Signature {
    Signature { offset: 0, bytes }
}

const PNG: &[Signature] = &[at_start(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])];
const JPEG: &[Signature] = &[at_start(&[0xFF, 0xD8, 0xFF])];
const GIF: &[Signature] = &[at_start(b"GIF87a"), at_start(b"GIF89a")];
const WEBP: &[Signature] = &[
    at_start(b"RIFF"),
    Signature {
        offset: 8,
        bytes: b"WEBP",
    },
];
const PDF: &[Signature] = &[at_start(b"%PDF")];
// 旧版 Office（OLE 复合文档）
const OLE: &[Signature] = &[at_start(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])];
// OOXML 与 zip 共用
const ZIP: &[Signature] = &[at_start(&[0x50, 0x4B, 0x03, 0x04])];

/// 扩展名对应的签名规则
enum Rule {
    /// 任意一个签名匹配即可
    AnyOf(&'static [Signature]),
    /// 所有签名都必须匹配
    AllOf(&'static [Signature]),
    /// 纯文本类，不检查
    Text,
}

fn rule_for(extension: &str) -> Option<Rule> {
    let rule = match extension {
        ".png" => Rule::AnyOf(PNG),
        ".jpg" | ".jpeg" => Rule::AnyOf(JPEG),
        ".gif" => Rule::AnyOf(GIF),
        ".webp" => Rule::AllOf(WEBP),
        ".pdf" => Rule::AnyOf(PDF),
        ".doc" | ".xls" | ".ppt" => Rule::AnyOf(OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => Rule::AnyOf(ZIP),
        ".txt" | ".md" | ".csv" => Rule::Text,
        _ => return None,
    };
    Some(rule)
}

fn matches(data: &[u8], sig: &Signature) -> bool {
    data.get(sig.offset..sig.offset + sig.bytes.len()) == Some(sig.bytes)
}

/// 检查文件开头的字节是否与扩展名（含点号，如 ".pdf"）相符
///
/// 空文件和不认识的扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match rule_for(&extension.to_ascii_lowercase()) {
        Some(Rule::AnyOf(sigs)) => sigs.iter().any(|s| matches(data, s)),
        Some(Rule::AllOf(sigs)) => sigs.iter().all(|s| matches(data, s)),
        Some(Rule::Text) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert!(validate_magic_bytes(&png, ".png"));
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));

        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        assert!(validate_magic_bytes(webp, ".webp"));
        assert!(!validate_magic_bytes(b"RIFF\x00\x00\x00\x00WAVE", ".webp"));
    }

    #[test]
    fn test_past_paper_documents() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(!validate_magic_bytes(b"<html>", ".pdf"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
        assert!(!validate_magic_bytes(&[0x50, 0x4B], ".docx"));
    }

    #[test]
    fn test_text_and_unknown() {
        assert!(validate_magic_bytes(b"Term 1 notes", ".txt"));
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }
}
