/// Utilitários de string para logs (tokens, codes e states nunca aparecem inteiros)

/// Corta em no máximo `max_bytes` sem partir um caractere UTF-8
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Versão para log de um segredo: prefixo curto + "..." (ou "<empty>")
///
/// # Exemplo
/// ```
/// use hubspot_integration_middleware::utils::string_utils::mask_secret;
///
/// assert_eq!(mask_secret("abcdefghijklmnop", 6), "abcdef...");
/// assert_eq!(mask_secret("", 6), "<empty>");
/// ```
pub fn mask_secret(s: &str, visible_bytes: usize) -> String {
    if s.is_empty() {
        return "<empty>".to_string();
    }

    format!("{}...", truncate_safe(s, visible_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_safe_ascii() {
        assert_eq!(truncate_safe("Hello, World!", 5), "Hello");
        assert_eq!(truncate_safe("short", 100), "short");
    }

    #[test]
    fn test_truncate_safe_utf8() {
        // "á" ocupa 2 bytes
        assert_eq!(truncate_safe("Olá", 3), "Ol");
        assert_eq!(truncate_safe("Olá", 4), "Olá");
    }

    #[test]
    fn test_mask_secret_never_returns_full_value() {
        let token = "CKDs8p3xMBIHAAEAQAAAARjp";
        let masked = mask_secret(token, 8);
        assert_eq!(masked, "CKDs8p3x...");
        assert!(!masked.contains(token));
    }
}
