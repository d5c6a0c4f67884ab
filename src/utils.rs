//! 通用工具函数

use std::fmt::Write;

/// HTML 编码
///
/// 编码 `< > & " '`，以及 U+00A0..=U+00FF 和 BMP 之外的字符（十进制字符引用）。
pub fn html_encode(input: &str) -> String {
    if !input.chars().any(needs_encoding) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if needs_encoding(c) => {
                let _ = write!(out, "&#{};", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// 对可选字段编码，`None` 保持不变
pub fn html_encode_opt(input: Option<&str>) -> Option<String> {
    input.map(html_encode)
}

fn needs_encoding(c: char) -> bool {
    matches!(c, '<' | '>' | '&' | '"' | '\'' | '\u{a0}'..='\u{ff}') || c as u32 > 0xFFFF
}
