//! Built-in alternate names observed in live model output.

use crate::table::FieldTable;

/// The default lookup table covering the analysis, safety-check and
/// fact-extraction schemas. Models drift between Chinese labels,
/// snake_case and synonyms for the same field; these are the variants
/// seen in production traffic.
#[must_use]
pub fn builtin_table() -> FieldTable {
    let mut table = FieldTable::new();
    table.add_mapping("isSafe", ["安全", "是否安全", "safe", "is_safe", "安全性"]);
    table.add_mapping(
        "riskLevel",
        ["风险等级", "风险", "risk", "risk_level", "危险等级"],
    );
    table.add_mapping("suggestion", ["建议", "回复建议", "advice", "建议内容", "提示"]);
    table.add_mapping("emotion", ["情绪", "情感", "心情", "mood", "情绪状态"]);
    table.add_mapping(
        "interestLevel",
        ["兴趣度", "好感度", "兴趣", "interest", "interest_level"],
    );
    table.add_mapping(
        "replySuggestions",
        ["回复建议列表", "推荐回复", "replies", "reply_suggestions", "建议回复"],
    );
    table.add_mapping("analysis", ["分析", "解析", "分析结果", "详细分析"]);
    table.add_mapping("facts", ["事实", "信息", "关键信息", "要点", "fact_list"]);
    table.add_mapping("summary", ["总结", "摘要", "概要", "小结"]);
    table.add_mapping("category", ["类别", "分类", "类型"]);
    table.add_mapping("content", ["内容", "描述", "具体内容"]);
    table
}
