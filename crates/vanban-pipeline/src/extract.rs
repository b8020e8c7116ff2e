//! Document-level and per-block metadata extraction.
//!
//! The decision number, date, and issuing authority resolve once from
//! the document header and propagate to every block. Amendment flags
//! are lexical properties of each block's own text. Nothing here is
//! fatal: unresolved header fields stay empty and the caller gets an
//! incompleteness warning.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use vanban_core::parse_vn_date;

/// Header region scanned for the decision number, in chars.
const HEADER_CHARS: usize = 2000;

static DOC_ID_SO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^Số\s*:\s*([0-9A-ZĐƠƯ/.&–-]+)\s*$").expect("static doc_id pattern")
});

// Citation-number grammars, most specific first.
static DOC_ID_FALLBACKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+/QĐ-[A-ZĐƠƯ&]+",
        r"\d+/\d+/TT-[A-ZĐƠƯ&]+",
        r"\d+/\d+/NĐ-CP",
        r"\d+/NQ-[A-ZĐƠƯ&]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static doc_id fallback pattern"))
    .collect()
});

// The issuing authority, not the parent university: a bare
// "ĐẠI HỌC ..." line is the umbrella institution above the school
// that actually signs the decision.
static DEPARTMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(TRƯỜNG [^\n]+|BỘ [^\n]+|UBND [^\n]+)$")
        .expect("static department pattern")
});

static MODIFY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(sửa đổi|bổ sung|thay thế|điều chỉnh)\b").expect("static modify pattern")
});

// An amendment scoped to a clause or point of a cited article, not to
// a whole instrument.
static PARTIAL_MOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(sửa đổi|bổ sung|thay thế|điều chỉnh)[^.;\n]{0,100}?(khoản\s+\d+|điểm\s+[a-zđ]\b)[^.;\n]{0,80}?điều\s+\d+",
    )
    .expect("static partial_mod pattern")
});

static AMEND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:bãi bỏ|hủy bỏ|thay thế)\s+quyết định\s+số\s+([0-9A-ZĐƠƯ/.&–-]+)")
        .expect("static amend pattern")
});

/// Document-level header fields, resolved once per document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocHeader {
    pub doc_id: String,
    pub date: String,
    pub department: String,
}

impl DocHeader {
    /// Fields the extractor could not resolve, for the warning path.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.doc_id.is_empty() {
            missing.push("doc_id");
        }
        if self.date.is_empty() {
            missing.push("date");
        }
        missing
    }
}

/// Resolve doc_id, date, and department from the document header.
pub fn extract_header(text: &str) -> DocHeader {
    let header = head_chars(text, HEADER_CHARS);

    let doc_id = DOC_ID_SO
        .captures(header)
        .map(|c| c[1].trim_end_matches([',', '.']).to_string())
        .or_else(|| {
            DOC_ID_FALLBACKS
                .iter()
                .find_map(|re| re.find(text).map(|m| m.as_str().to_string()))
        })
        .unwrap_or_default();

    let date = parse_vn_date(header).unwrap_or_default();

    let department = DEPARTMENT
        .find(header)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    if doc_id.is_empty() || date.is_empty() {
        debug!(
            doc_id = %doc_id,
            date = %date,
            "header extraction incomplete"
        );
    }

    DocHeader {
        doc_id,
        date,
        department,
    }
}

/// Per-block amendment flags derived from the block's own text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmendmentFlags {
    pub modify: bool,
    pub partial_mod: bool,
    pub amend: String,
}

pub fn extract_amendments(content: &str) -> AmendmentFlags {
    let modify = MODIFY.is_match(content);
    let partial_mod = modify && PARTIAL_MOD.is_match(content);
    let amend = AMEND
        .captures(content)
        .map(|c| c[1].trim_end_matches([',', '.']).to_string())
        .unwrap_or_default();
    AmendmentFlags {
        modify,
        partial_mod,
        amend,
    }
}

/// First `n` chars of `text` as a slice, safe on UTF-8 boundaries.
pub(crate) fn head_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ĐẠI HỌC THÁI NGUYÊN\n\
        TRƯỜNG ĐẠI HỌC CÔNG NGHỆ THÔNG TIN VÀ TRUYỀN THÔNG\n\
        Số: 429/QĐ-ĐHCNTT&TT\n\
        Thái Nguyên, ngày 22 tháng 6 năm 2022\n\
        QUYẾT ĐỊNH";

    #[test]
    fn resolves_sample_header() {
        let h = extract_header(HEADER);
        assert_eq!(h.doc_id, "429/QĐ-ĐHCNTT&TT");
        assert_eq!(h.date, "2022-06-22");
        assert_eq!(
            h.department,
            "TRƯỜNG ĐẠI HỌC CÔNG NGHỆ THÔNG TIN VÀ TRUYỀN THÔNG"
        );
        assert!(h.missing_fields().is_empty());
    }

    #[test]
    fn parent_university_line_is_not_the_department() {
        let text = "ĐẠI HỌC THÁI NGUYÊN\n\
            TRƯỜNG ĐẠI HỌC KỸ THUẬT CÔNG NGHIỆP\n\
            Số: 10/QĐ-ĐHKTCN";
        let h = extract_header(text);
        assert_eq!(h.department, "TRƯỜNG ĐẠI HỌC KỸ THUẬT CÔNG NGHIỆP");
    }

    #[test]
    fn falls_back_to_citation_grammar_without_so_line() {
        let text = "Quyết định 1893/QĐ-ĐHTN ngày 5 tháng 9 năm 2020";
        let h = extract_header(text);
        assert_eq!(h.doc_id, "1893/QĐ-ĐHTN");
        assert_eq!(h.date, "2020-09-05");
    }

    #[test]
    fn citation_grammar_variants() {
        assert_eq!(extract_header("xem 48/2020/TT-BGDĐT").doc_id, "48/2020/TT-BGDĐT");
        assert_eq!(extract_header("theo 11/2015/NĐ-CP").doc_id, "11/2015/NĐ-CP");
        assert_eq!(extract_header("tại 15/NQ-HĐT").doc_id, "15/NQ-HĐT");
    }

    #[test]
    fn unresolved_header_is_empty_not_fatal() {
        let h = extract_header("văn bản không có số hiệu hay ngày tháng");
        assert!(h.doc_id.is_empty());
        assert!(h.date.is_empty());
        assert_eq!(h.missing_fields(), vec!["doc_id", "date"]);
    }

    #[test]
    fn modify_flag_from_amendment_vocabulary() {
        let flags = extract_amendments("Quyết định này thay thế Quyết định số 1271/QĐ-ĐHCNTT&TT.");
        assert!(flags.modify);
        assert!(!flags.partial_mod);
        assert_eq!(flags.amend, "1271/QĐ-ĐHCNTT&TT");
    }

    #[test]
    fn partial_mod_when_scoped_to_clause_of_article() {
        let flags =
            extract_amendments("Sửa đổi Khoản 3 Điều 8 của Quy định ban hành kèm theo Quyết định");
        assert!(flags.modify);
        assert!(flags.partial_mod);
    }

    #[test]
    fn whole_instrument_replacement_is_not_partial() {
        let flags = extract_amendments("Bãi bỏ Quyết định số 99/QĐ-ĐHTN ngày 1 tháng 2 năm 2019");
        assert!(!flags.partial_mod);
        assert_eq!(flags.amend, "99/QĐ-ĐHTN");
    }

    #[test]
    fn plain_content_has_no_flags() {
        let flags = extract_amendments("Giáo trình phải được phê duyệt trước khi sử dụng.");
        assert_eq!(flags, AmendmentFlags::default());
    }

    #[test]
    fn head_chars_respects_utf8() {
        let s = "Điều 1";
        assert_eq!(head_chars(s, 2), "Đi");
        assert_eq!(head_chars(s, 100), s);
    }
}
