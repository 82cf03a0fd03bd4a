//! Durable session identity.
//!
//! The backend keys conversation state on a client identifier embedded in
//! the channel path, so the identifier must survive restarts. It is
//! generated once from a cryptographically strong source and persisted as a
//! single file under the state directory.

use std::fs;
use std::path::Path;
use tracing::warn;

const IDENTITY_FILE: &str = "session_id";

/// Returns the persisted session identity, creating and persisting a new
/// one on first use.
///
/// If the state directory cannot be read or written, a fresh identity is
/// returned instead. The session then does not survive a restart, which
/// is logged loudly rather than silently corrupting anything.
pub fn get_or_create(state_dir: &Path) -> String {
    let path = state_dir.join(IDENTITY_FILE);

    if let Ok(existing) = fs::read_to_string(&path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return existing.to_string();
        }
    }

    let identity = generate();
    if let Err(err) = fs::create_dir_all(state_dir)
        .and_then(|_| fs::write(&path, &identity))
    {
        warn!(
            path = %path.display(),
            %err,
            "could not persist session identity; it will not survive restarts"
        );
    }
    identity
}

/// Generates a fresh identity: 128 random bits rendered as a canonical
/// UUID-shaped string with a fixed `4` version nibble and a fixed `a`
/// variant nibble.
pub fn generate() -> String {
    format_identity(rand::random::<[u8; 16]>())
}

fn format_identity(bytes: [u8; 16]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    let hex: Vec<char> = hex.chars().collect();
    let seg = |range: std::ops::Range<usize>| hex[range].iter().collect::<String>();
    format!(
        "{}-{}-4{}-a{}-{}",
        seg(0..8),
        seg(8..12),
        seg(13..16),
        seg(17..20),
        seg(20..32),
    )
}
