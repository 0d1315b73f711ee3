use std::sync::LazyLock;

use regex::Regex;

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("static regex"));
static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("static regex"));

/// `user_profile` becomes `UserProfile`. Words without underscores are
/// returned unchanged.
pub fn convert_snake_to_camel(word: &str) -> String {
    if !word.contains('_') {
        return word.to_string();
    }

    word.split('_')
        .map(|part| match part {
            "" => "_".to_string(),
            part => capitalize(part),
        })
        .collect()
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `UserProfile` becomes `user_profile` and `APIKey` becomes `api_key`.
pub fn convert_camel_to_snake(word: &str) -> String {
    let split = WORD_BOUNDARY.replace_all(word, "${1}_${2}");
    LOWER_UPPER.replace_all(&split, "${1}_${2}").to_lowercase()
}

/// Type name without its module path, e.g. `UserRole` for
/// `rowguard::models::user_role::UserRole`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UserSetting;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(convert_snake_to_camel("user_profile"), "UserProfile");
        assert_eq!(convert_snake_to_camel("simple"), "simple");
        assert_eq!(convert_snake_to_camel("user__role"), "User_Role");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("user_settings"), "User_settings");
        assert_eq!(capitalize("NOTES"), "Notes");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(convert_camel_to_snake("UserProfile"), "user_profile");
        assert_eq!(convert_camel_to_snake("APIKey"), "api_key");
        assert_eq!(convert_camel_to_snake("Token"), "token");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<UserSetting>(), "UserSetting");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }
}
