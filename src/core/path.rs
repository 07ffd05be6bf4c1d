use sha2::{Digest, Sha256};

/// Second-to-last `/`-separated segment of a path.
///
/// CardDAV collection URLs end in a trailing slash, so this is the
/// collection name: `/dav/user@x.com/mybook/` → `mybook`. Returns `None`
/// when the path has fewer than two segments; callers tolerate that.
pub fn path_token(path: &str) -> Option<&str> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts[parts.len() - 2])
}

/// Third-to-last segment of a path — the account that owns the collection.
pub fn path_user(path: &str) -> Option<&str> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 3 {
        return None;
    }
    Some(parts[parts.len() - 3])
}

/// Strip the `"{email}."` prefix servers put on collection names.
///
/// Tokens that don't carry the prefix come back unchanged rather than
/// being blindly truncated.
pub fn token_book<'a>(email: &str, token: &'a str) -> &'a str {
    match token
        .strip_prefix(email)
        .and_then(|rest| rest.strip_prefix('.'))
    {
        Some(book) => book,
        None => {
            log::warn!("token {token:?} is not prefixed by {email:?}");
            token
        }
    }
}

/// Discovery base URL for an account: `https://` + the domain part of the
/// email address. No validation of the address itself.
pub fn hostname(username: &str) -> String {
    let domain = username.split('@').nth(1).unwrap_or_default();
    format!("https://{domain}")
}

/// Deterministic pseudo-identifier for an unconnected listing.
///
/// SHA-256 of the input, hex-encoded and grouped 8-4-4-4-12 so it reads
/// like a directory UID. Not security-sensitive; it only has to be stable
/// so repeated listings of the same book compare equal.
pub fn hash_uuid(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
