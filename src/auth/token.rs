use rand::{rngs::OsRng, RngCore};

pub const KEY_BYTES: usize = 20;

/// New opaque token key: 20 random bytes as 40 lowercase hex characters.
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_forty_hex_chars() {
        let key = generate_key();
        assert_eq!(key.len(), KEY_BYTES * 2);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn keys_differ() {
        assert_ne!(generate_key(), generate_key());
    }
}
