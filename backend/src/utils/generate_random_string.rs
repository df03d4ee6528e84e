use rand::{Rng, distributions::Alphanumeric};

/// Generates a random alphanumeric string of the specified length.
///
/// The generated string contains uppercase letters (A-Z), lowercase letters
/// (a-z), and digits (0-9), suitable for identifiers such as check-in ids.
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_alphabet() {
        let value = generate_random_string(8);

        assert_eq!(value.len(), 8);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
