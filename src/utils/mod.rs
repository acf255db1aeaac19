pub mod url_validator;

/// 从给定字母表中随机生成指定长度的短码
///
/// `alphabet` 为空时返回空串，由调用方的配置校验保证不会发生。
pub fn generate_random_code(alphabet: &[char], length: usize) -> String {
    if alphabet.is_empty() {
        return String::new();
    }

    std::iter::repeat_with(|| alphabet[rand::random_range(0..alphabet.len())])
        .take(length)
        .collect()
}

/// 短码允许的字符：ASCII 字母、数字、`-`、`_`
#[inline]
pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// 校验短码字符集与长度（按字符数计算）
pub fn is_valid_short_code(code: &str, min_len: usize, max_len: usize) -> bool {
    let len = code.chars().count();
    (min_len..=max_len).contains(&len) && code.chars().all(is_code_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_uses_alphabet() {
        let alphabet: Vec<char> = "xyz".chars().collect();
        for _ in 0..50 {
            let code = generate_random_code(&alphabet, 8);
            assert_eq!(code.chars().count(), 8);
            assert!(code.chars().all(|c| alphabet.contains(&c)));
        }
    }

    #[test]
    fn test_generate_random_code_empty_alphabet() {
        assert_eq!(generate_random_code(&[], 6), "");
    }

    #[test]
    fn test_short_code_charset() {
        assert!(is_valid_short_code("abc", 3, 20));
        assert!(is_valid_short_code("my-link_2", 3, 20));
        assert!(!is_valid_short_code("ab", 3, 20));
        assert!(!is_valid_short_code(&"a".repeat(21), 3, 20));
        assert!(!is_valid_short_code("has space", 3, 20));
        assert!(!is_valid_short_code("a/b/c", 3, 20));
        assert!(!is_valid_short_code("dot.ted", 3, 20));
        assert!(!is_valid_short_code("ünï", 3, 20));
    }
}
