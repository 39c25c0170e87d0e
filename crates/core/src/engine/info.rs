//! Parsing for the engine's info dump

/// Ordered `key=value` pairs reported by [`super::MailEngine::get_info`]
pub type CoreInfo = Vec<(String, String)>;

/// Split an info dump into pairs.
///
/// Blank lines are skipped, a line without `=` yields an empty value and
/// only the first `=` separates key from value.
pub fn parse_core_info(raw: &str) -> CoreInfo {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_core_info() {
        let info = parse_core_info("deltachat_core_version=v0.40\nsqlite_version=3.26\n\nnumber_of_chats=4");
        assert_eq!(
            info,
            vec![
                ("deltachat_core_version".to_string(), "v0.40".to_string()),
                ("sqlite_version".to_string(), "3.26".to_string()),
                ("number_of_chats".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_core_info_keeps_keys_without_value() {
        let info = parse_core_info("e2ee_enabled\nfingerprint=AB=CD");
        assert_eq!(info[0], ("e2ee_enabled".to_string(), String::new()));
        assert_eq!(info[1], ("fingerprint".to_string(), "AB=CD".to_string()));
    }
}
