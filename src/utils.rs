use chrono::{Local, TimeZone, Utc};
use rand::Rng;

/// Share ids are typed and read out loud, so the alphabet drops the
/// lookalikes (0/O, 1/I/L). 31^8 values, unique enough for a low-volume
/// manual-review list, collisions are not checked.
const ID_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const ID_LENGTH: usize = 8;

const SESSION_TOKEN_LENGTH: usize = 32;

pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();

    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

pub fn generate_session_token() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Submission time the way the admin panel prints it, e.g.
/// `07/08/2026, 14:33:21`. None if the stored millis are out of range.
pub fn format_local(timestamp_millis: i64) -> Option<String> {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.format("%d/%m/%Y, %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_fixed_length_and_alphabet() {
        let id = generate_id();

        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn session_tokens_differ() {
        assert_ne!(generate_session_token(), generate_session_token());
        assert_eq!(generate_session_token().len(), SESSION_TOKEN_LENGTH);
    }

    #[test]
    fn format_local_handles_the_epoch_range() {
        assert!(format_local(0).is_some());
        assert!(format_local(now_millis()).is_some());
        assert_eq!(format_local(i64::MAX), None);
    }
}
