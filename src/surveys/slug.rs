use rand::Rng;

/// Random bytes behind each slug. 128 bits keeps collisions negligible; the
/// unique constraint on `survey_instances.slug` rejects the rare duplicate.
pub const SLUG_BYTES: usize = 16;

/// Generate a URL-safe slug: 32 lowercase hex characters from the thread CSPRNG.
pub fn generate_slug() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; SLUG_BYTES] = rng.random();
    hex::encode(bytes)
}
