//! Filename helpers for stored avatars.
//!
//! ## Sanitizing
//!
//! [`sanitize_filename`] keeps ASCII letters, digits, `_`, `.` and `-`.
//! Every other character becomes `_`, and the result is cut to
//! [`MAX_FILENAME_LEN`] characters:
//! - `"my photo.jpg"` → `"my_photo.jpg"`
//! - `"../../etc/passwd"` → `".._.._etc_passwd"`
//! - `"Grüße.png"` → `"Gr__e.png"`
//!
//! ## Secure names
//!
//! [`generate_secure_filename`] builds `{user}_{millis}_{suffix}.{ext}`. The
//! timestamp orders names and the 12-character random suffix makes collisions
//! unlikely. The suffix comes from a fast non-cryptographic source, so names
//! are not meant to be unguessable.

use rand::Rng;

pub const MAX_FILENAME_LEN: usize = 100;

const SUFFIX_LEN: usize = 12;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Replace disallowed characters with `_` and truncate.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .take(MAX_FILENAME_LEN)
        .collect()
}

fn random_suffix(rng: &mut impl Rng) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Generate a collision-resistant filename for a user's upload.
///
/// Both parts are sanitized; a leading `.` on the extension is ignored.
pub fn generate_secure_filename(user_id: &str, extension: &str) -> String {
    let user = sanitize_filename(user_id);
    let ext = sanitize_filename(extension.trim_start_matches('.'));
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = random_suffix(&mut rand::rng());
    format!("{user}_{millis}_{suffix}.{ext}")
}
