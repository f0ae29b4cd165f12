/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque string identifier for a ledger record.
///
/// Layout: `{prefix}_{millis}_{9 random base36 chars}`. Unique within a
/// process lifetime with overwhelming probability; no cryptographic
/// uniqueness is required for these ids (session tokens included, since the
/// token space is far larger than the live session count).
pub fn new_id(prefix: &str) -> String {
    use rand::Rng;
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{prefix}_{}_{suffix}", now_millis())
}
