use rand::{distributions::Alphanumeric, Rng};

/// Length of API tokens issued to users.
pub const API_TOKEN_LENGTH: usize = 64;

/// Random alphanumeric string of `length` characters, drawn from the
/// thread-local CSPRNG.
pub fn generate_secure_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// First characters of a token followed by an ellipsis, safe to log.
pub fn token_preview(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    format!("{visible}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_secure_token(API_TOKEN_LENGTH);

        assert_eq!(token.len(), API_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_secure_token(API_TOKEN_LENGTH));
    }

    #[test]
    fn test_preview_hides_the_rest() {
        assert_eq!(token_preview("abcdefghijkl"), "abcdef…");
        assert_eq!(token_preview("abc"), "abc…");
    }
}
