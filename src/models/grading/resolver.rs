//! 分数到等级的解析
//!
//! 区间按 score_from 降序排列后取第一个包含该分数的等级；
//! 区间有空隙时落在空隙里的分数没有等级。

use super::entities::GradeScale;

/// 在已加载的等级表中查找分数对应的等级
pub fn resolve_grade(scales: &[GradeScale], score: f64) -> Option<&GradeScale> {
    let mut ordered: Vec<&GradeScale> = scales.iter().collect();
    ordered.sort_by(|a, b| b.score_from.total_cmp(&a.score_from));
    ordered.into_iter().find(|scale| scale.contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(id: i64, from: f64, to: f64, name: &str) -> GradeScale {
        GradeScale {
            id,
            name: name.to_string(),
            score_from: from,
            score_to: to,
            comment: String::new(),
        }
    }

    #[test]
    fn test_resolves_inside_range() {
        let scales = vec![scale(1, 90.0, 100.0, "A"), scale(2, 80.0, 89.0, "B")];
        assert_eq!(resolve_grade(&scales, 85.0).map(|g| g.name.as_str()), Some("B"));
        assert_eq!(resolve_grade(&scales, 90.0).map(|g| g.name.as_str()), Some("A"));
        assert_eq!(resolve_grade(&scales, 100.0).map(|g| g.name.as_str()), Some("A"));
    }

    #[test]
    fn test_out_of_range_and_gaps() {
        let scales = vec![scale(1, 90.0, 100.0, "A"), scale(2, 80.0, 89.0, "B")];
        assert!(resolve_grade(&scales, 101.0).is_none());
        assert!(resolve_grade(&scales, 89.5).is_none());
        assert!(resolve_grade(&scales, 10.0).is_none());
        assert!(resolve_grade(&[], 50.0).is_none());
    }

    #[test]
    fn test_overlap_prefers_higher_band() {
        // 输入顺序无关
        let scales = vec![scale(2, 70.0, 85.0, "C"), scale(1, 80.0, 100.0, "B")];
        assert_eq!(resolve_grade(&scales, 82.0).map(|g| g.id), Some(1));
    }
}
