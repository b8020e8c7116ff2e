//! Boundary detection.
//!
//! Scans the normalized body line by line against the priority-ordered
//! rule table. A candidate is accepted only at a line start and only
//! when the full numbering grammar for its kind matches, so in-body
//! citations ("...theo quy định tại Điều 8...") never produce a
//! boundary. Labels are composed hierarchically from the enclosing
//! article and clause.

use tracing::debug;
use vanban_core::{Boundary, BoundaryKind};

use crate::config::CompiledConfig;

/// Detect ordered, de-duplicated boundaries in the normalized body.
pub(crate) fn detect_boundaries(cfg: &CompiledConfig, text: &str) -> Vec<Boundary> {
    let mut boundaries: Vec<Boundary> = Vec::new();
    let mut article: Option<String> = None;
    let mut clause: Option<String> = None;

    let mut offset = 0usize;
    for line in text.split('\n') {
        if !line.is_empty() {
            let matched: Vec<_> = cfg
                .rules
                .iter()
                .filter_map(|rule| rule.regex.captures(line).map(|caps| (rule, caps)))
                .collect();
            if matched.len() > 1 {
                // Resolved deterministically by priority order.
                debug!(
                    line = %line.chars().take(60).collect::<String>(),
                    winner = ?matched[0].0.kind,
                    candidates = matched.len(),
                    "ambiguous boundary resolved by rule priority"
                );
            }

            if let Some((rule, caps)) = matched.first() {
                let token = caps.get(1).map(|m| m.as_str().trim().to_string());

                let label = match rule.kind {
                    BoundaryKind::Chapter => {
                        article = None;
                        clause = None;
                        token.map(|n| format!("Chương {n}"))
                    }
                    BoundaryKind::Article => {
                        clause = None;
                        article = token.clone();
                        token.map(|n| format!("Điều {n}"))
                    }
                    BoundaryKind::Clause => match (&article, token) {
                        (Some(a), Some(k)) => {
                            clause = Some(k.clone());
                            Some(format!("Điều {a}, Khoản {k}"))
                        }
                        // A numbered line outside any article is not a
                        // clause boundary.
                        _ => None,
                    },
                    BoundaryKind::Point => match (&article, &clause, token) {
                        (Some(a), Some(k), Some(p)) => {
                            Some(format!("Điều {a}, Khoản {k}, Điểm {p}"))
                        }
                        _ => None,
                    },
                    BoundaryKind::Basis => {
                        // Consecutive "Căn cứ" lines group into one block.
                        if boundaries.last().is_some_and(|b| b.kind == BoundaryKind::Basis) {
                            None
                        } else {
                            Some("Căn cứ".to_string())
                        }
                    }
                    BoundaryKind::Decision => Some("Quyết định".to_string()),
                    BoundaryKind::Special => {
                        // Special enumerations only structure documents
                        // without article hierarchy.
                        if article.is_some() {
                            None
                        } else {
                            Some(token.unwrap_or_else(|| line.trim().to_string()))
                        }
                    }
                };

                if let Some(label) = label {
                    boundaries.push(Boundary {
                        kind: rule.kind,
                        start_offset: offset,
                        label,
                    });
                }
            }
        }
        offset += line.len() + 1; // the split '\n'
    }

    // One rule fires per line, so offsets are strictly increasing;
    // keep the guarantee explicit.
    boundaries.dedup_by_key(|b| b.start_offset);
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn detect(text: &str) -> Vec<Boundary> {
        let cfg = PipelineConfig::default().compile().unwrap();
        detect_boundaries(&cfg, text)
    }

    #[test]
    fn article_boundary_at_line_start() {
        let text = "Điều 1. Phạm vi điều chỉnh\nnội dung điều một";
        let bs = detect(text);
        assert_eq!(bs.len(), 1);
        assert_eq!(bs[0].kind, BoundaryKind::Article);
        assert_eq!(bs[0].label, "Điều 1");
        assert_eq!(bs[0].start_offset, 0);
    }

    #[test]
    fn mid_sentence_citation_is_not_a_boundary() {
        let text = "Điều 5. Tổ chức thực hiện\n\
                    Việc thẩm định thực hiện theo quy định tại Điều 8 của Quy định này.\n\
                    Điều 6. Hiệu lực thi hành";
        let bs = detect(text);
        let labels: Vec<_> = bs.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Điều 5", "Điều 6"]);
    }

    #[test]
    fn clause_labels_carry_enclosing_article() {
        let text = "Điều 8. Sử dụng giáo trình\n\
                    1. Khoản thứ nhất.\n\
                    2. Khoản thứ hai.\n\
                    3. Khoản thứ ba.";
        let bs = detect(text);
        assert_eq!(bs.len(), 4);
        assert_eq!(bs[3].label, "Điều 8, Khoản 3");
        assert_eq!(bs[3].kind, BoundaryKind::Clause);
    }

    #[test]
    fn numbered_line_outside_article_is_not_a_clause() {
        let text = "1. Danh sách đính kèm\n2. Ghi chú";
        assert!(detect(text).is_empty());
    }

    #[test]
    fn point_requires_article_and_clause_context() {
        let text = "Điều 3. Tiêu chuẩn\n\
                    1. Điều kiện chung:\n\
                    a) có bằng đại học;\n\
                    b) có chứng chỉ ngoại ngữ.";
        let bs = detect(text);
        assert_eq!(bs[2].label, "Điều 3, Khoản 1, Điểm a");
        assert_eq!(bs[3].label, "Điều 3, Khoản 1, Điểm b");
    }

    #[test]
    fn basis_lines_group_into_one_boundary() {
        let text = "Căn cứ Quyết định số 468/QĐ-TTg;\n\
                    Căn cứ Nghị quyết số 15/NQ-HĐT;\n\
                    Theo đề nghị của Trưởng phòng Đào tạo,";
        let bs = detect(text);
        assert_eq!(bs.len(), 1);
        assert_eq!(bs[0].kind, BoundaryKind::Basis);
        assert_eq!(bs[0].label, "Căn cứ");
    }

    #[test]
    fn chapter_resets_article_context() {
        let text = "Điều 2. Giải thích từ ngữ\n\
                    Chương II\n\
                    1. Một dòng đánh số ngay sau chương";
        let bs = detect(text);
        let kinds: Vec<_> = bs.iter().map(|b| b.kind).collect();
        // The numbered line after the chapter has no enclosing article.
        assert_eq!(kinds, vec![BoundaryKind::Article, BoundaryKind::Chapter]);
        assert_eq!(bs[1].label, "Chương II");
    }

    #[test]
    fn decision_header_detected() {
        let text = "QUYẾT ĐỊNH\nVề việc ban hành Quy định";
        let bs = detect(text);
        assert_eq!(bs[0].kind, BoundaryKind::Decision);
        assert_eq!(bs[0].label, "Quyết định");
    }

    #[test]
    fn special_rules_only_fire_outside_articles() {
        let inside = "Điều 4. Trình tự\nCác bước thực hiện như sau:";
        assert_eq!(detect(inside).len(), 1);

        let standalone = "Quy trình đăng ký học phần\nBước 1: nộp đơn";
        let bs = detect(standalone);
        assert_eq!(bs.len(), 1);
        assert_eq!(bs[0].kind, BoundaryKind::Special);
        assert_eq!(bs[0].label, "Quy trình đăng ký học phần");
    }

    #[test]
    fn offsets_strictly_increasing_and_unique() {
        let text = "Điều 1. Một\n1. Khoản\nĐiều 2. Hai\n1. Khoản khác";
        let bs = detect(text);
        for pair in bs.windows(2) {
            assert!(pair[0].start_offset < pair[1].start_offset);
        }
    }

    #[test]
    fn empty_text_has_no_boundaries() {
        assert!(detect("").is_empty());
    }
}
