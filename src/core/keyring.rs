const SERVICE: &str = "carddav-books";

fn entry_for(username: &str, hostname: &str) -> Result<keyring::Entry, String> {
    let key = format!("{username}@{hostname}");
    log::debug!("keyring: service={SERVICE:?} key={key:?}");
    keyring::Entry::new(SERVICE, &key).map_err(|e| {
        log::error!("keyring Entry::new failed for key={key:?}: {e}");
        format!("keyring error: {e}")
    })
}

/// Stored password for a CardDAV account, keyed by email + discovery host.
pub fn get_password(username: &str, hostname: &str) -> Result<String, String> {
    entry_for(username, hostname)?.get_password().map_err(|e| {
        log::warn!("keyring get_password failed for {username}: {e}");
        format!("keyring get: {e}")
    })
}

pub fn set_password(username: &str, hostname: &str, password: &str) -> Result<(), String> {
    entry_for(username, hostname)?.set_password(password).map_err(|e| {
        log::error!("keyring set_password failed for {username}: {e}");
        format!("keyring set: {e}")
    })
}
