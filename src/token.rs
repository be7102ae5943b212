use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

const FRAGMENT_LENGTH: usize = 8;

/// Issues an opaque 16-character login token: two independent
/// 8-character alphanumeric fragments, concatenated.
///
/// There is no collision detection and no association with any user
/// identity; any 16-character value is accepted by the auth gate.
pub fn issue() -> String {
    format!("{}{}", fragment(), fragment())
}

fn fragment() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FRAGMENT_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_sixteen_alphanumeric_characters() {
        let token = issue();

        assert_eq!(token.chars().count(), 16);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn successive_tokens_differ() {
        assert_ne!(issue(), issue());
    }
}
