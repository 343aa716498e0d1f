/// Escape untrusted text for embedding in element content or a quoted
/// attribute. Covers `& < > " ' \` = /`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '`' => out.push_str("&#96;"),
            '=' => out.push_str("&#61;"),
            '/' => out.push_str("&#47;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only http(s) links survive; anything else (javascript:, data:, relative
/// junk) is rejected.
pub fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// Escaped `href`/`src` value, or `None` when the URL isn't http(s).
pub fn safe_url(url: &str) -> Option<String> {
    is_web_url(url).then(|| escape_html(url.trim()))
}

/// Group digits in threes with commas: 1234567 -> "1,234,567".
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_every_special_char() {
        assert_eq!(
            escape_html(r#"&<>"'`=/"#),
            "&amp;&lt;&gt;&quot;&#39;&#96;&#61;&#47;"
        );
    }

    #[test]
    fn test_escape_leaves_no_raw_specials() {
        let nasty = r#"<script>alert("x")</script> a=b `c` 'd' & /e"#;
        let escaped = escape_html(nasty);
        for c in ['<', '>', '"', '\'', '`', '=', '/'] {
            assert!(!escaped.contains(c), "found raw {c:?} in {escaped}");
        }
        // every & must start an entity we produced
        let entities = ["&amp;", "&lt;", "&gt;", "&quot;", "&#"];
        for (i, _) in escaped.match_indices('&') {
            let rest = &escaped[i..];
            assert!(entities.iter().any(|e| rest.starts_with(e)));
        }
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_plain_and_unicode_untouched() {
        assert_eq!(escape_html("general"), "general");
        assert_eq!(escape_html("café 🔊"), "café 🔊");
    }

    #[test]
    fn test_safe_url() {
        assert_eq!(
            safe_url("https://discord.gg/abc").as_deref(),
            Some("https:&#47;&#47;discord.gg&#47;abc")
        );
        assert!(safe_url("javascript:alert(1)").is_none());
        assert!(safe_url("JAVASCRIPT:alert(1)").is_none());
        assert!(safe_url("#").is_none());
        assert!(is_web_url("HTTP://example.com"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(5), "5");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
