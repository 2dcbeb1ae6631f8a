use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Truncate text to a display width, counting wide (CJK) characters as two
/// columns. Remarks written by operators are frequently Chinese.
///
/// # Examples
/// ```
/// use mountctl_core::utils::text::truncate_text;
/// assert_eq!(truncate_text("Hello World!", 8), "Hello...");
/// assert_eq!(truncate_text("百度网盘配置", 7), "百度...");
/// ```
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let ellipsis_width = ELLIPSIS.width();
    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Leading `count` characters, never splitting a UTF-8 sequence
pub fn head_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

/// Trailing `count` characters, never splitting a UTF-8 sequence
pub fn tail_chars(text: &str, count: usize) -> String {
    let total = text.chars().count();
    text.chars().skip(total.saturating_sub(count)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Hello", 10), "Hello");
        assert_eq!(truncate_text("Hello World!", 8), "Hello...");
        assert_eq!(truncate_text("", 5), "");
        assert_eq!(truncate_text("Hello World!", 2), "..");
    }

    #[test]
    fn test_truncate_wide_characters() {
        assert_eq!(truncate_text("夸克网盘示例配置", 9), "夸克网...");
        assert_eq!(truncate_text("夸克", 4), "夸克");
    }

    #[test]
    fn test_head_and_tail_chars() {
        assert_eq!(head_chars("abcdef", 3), "abc");
        assert_eq!(tail_chars("abcdef", 2), "ef");
        assert_eq!(tail_chars("ab", 5), "ab");
        assert_eq!(head_chars("网盘令牌", 2), "网盘");
        assert_eq!(tail_chars("网盘令牌", 1), "牌");
    }
}
