use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 姓名：字母（含非 ASCII）、空格、连字符、撇号
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L} '\-]*$").expect("Invalid name regex"));

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "school123",
    "welcome1",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 名或姓
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required");
    }
    if name.chars().count() > 50 {
        return Err("Name must be at most 50 characters");
    }
    if !NAME_RE.is_match(name) {
        return Err("Name may only contain letters, spaces, hyphens and apostrophes");
    }
    Ok(())
}

/// 密码策略：至少 8 位，含大小写字母和数字，且不是常见弱密码。
/// 返回全部不满足的条目。
pub fn password_policy_violations(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let errors = password_policy_violations(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("head@greenhill.ac.ke").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_names() {
        assert!(validate_name("Wanjiru").is_ok());
        assert!(validate_name("O'Neil-Smith").is_ok());
        assert!(validate_name("Zoë").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("R2D2").is_err());
        assert!(validate_name(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_password_policy_lists_every_violation() {
        assert!(validate_password("Greenhill2024").is_ok());

        let errors = password_policy_violations("abc");
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&"Password must be at least 8 characters long"));
        assert!(errors.contains(&"Password must contain at least one uppercase letter"));

        let common = validate_password("Password1").unwrap_err();
        assert!(common.contains("too common"));
    }
}
