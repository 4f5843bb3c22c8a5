// ==========================================
// 资产盘点系统 - 文件分词器实现
// ==========================================
// 阶段 0: 文件解码与分词
// 格式: 单字符分隔、无引号、\n 或 \r\n 换行
// ==========================================

use crate::domain::RawRecord;
use crate::importer::asset_importer_trait::FileParser;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use tracing::warn;

/// 解码文件内容
///
/// UTF-8（去除 BOM）优先；非法 UTF-8 按 Windows-1252 解码（旧系统导出文件）
pub fn decode_content(bytes: &[u8]) -> Cow<'_, str> {
    let (decoded, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return decoded;
    }

    warn!("文件不是合法的 UTF-8，按 Windows-1252 解码");
    let (decoded, _, _) = WINDOWS_1252.decode(bytes);
    decoded
}

// ==========================================
// DelimitedParser - 分隔符文本分词器
// ==========================================
pub struct DelimitedParser;

impl FileParser for DelimitedParser {
    fn parse_records<'a>(
        &self,
        content: &'a str,
        separator: u8,
    ) -> Box<dyn Iterator<Item = RawRecord> + 'a> {
        let separator = separator as char;

        // 行号按物理行计算（空行也占行号）；lines() 同时处理 \n 与 \r\n
        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(move |(idx, line)| {
                let fields = line.split(separator).map(str::to_string).collect();
                RawRecord::new(idx + 1, fields)
            });

        Box::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<RawRecord> {
        DelimitedParser.parse_records(content, b'|').collect()
    }

    #[test]
    fn test_empty_content_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\r\n").is_empty());
    }

    #[test]
    fn test_line_numbers_are_physical() {
        let records = parse("1|HEADER\n\n2|T1|MESA\r\n2|T2|CADEIRA\n");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].line, 3);
        assert_eq!(records[1].field(1), "T1");
        assert_eq!(records[2].line, 4);
        assert_eq!(records[2].field(2), "CADEIRA");
    }

    #[test]
    fn test_short_lines_pass_through() {
        let records = parse("2|T1\n2|T2|MESA|SALA 1 (BLOCO A)|100|JOAO|42\n");
        assert_eq!(records[0].fields.len(), 2);
        assert_eq!(records[0].field(4), "");
        assert_eq!(records[1].fields.len(), 7);
    }

    #[test]
    fn test_quotes_are_plain_text() {
        let records = parse("2|T1|MESA \"GRANDE\"|SALA\n");
        assert_eq!(records[0].field(2), "MESA \"GRANDE\"");
    }

    #[test]
    fn test_custom_separator() {
        let records: Vec<_> = DelimitedParser.parse_records("2;T1;MESA\n", b';').collect();
        assert_eq!(records[0].field(2), "MESA");
    }

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBF2|T1|CADEIRA";
        assert_eq!(decode_content(bytes), "2|T1|CADEIRA");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // "AÇÃO" 的 Windows-1252 编码
        let bytes = b"A\xC7\xC3O";
        assert_eq!(decode_content(bytes), "AÇÃO");
    }
}
