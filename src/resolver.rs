use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::core::keyring;
use crate::core::models::{
    BookRecord, ConnectionDetail, ListingDetail, RecordDetail, RecordKind,
};
use crate::core::path;
use crate::host::{DirectoryHandle, DirectoryKind, DirectoryStore, Discovery, RemoteBook};

/// Outcome of processing one discovery response.
enum DetectStep {
    /// Every candidate belonged to the requesting account.
    Complete,
    /// A foreign candidate showed up; the rest of the response was abandoned.
    Mismatch,
}

/// Matches remote CardDAV books against a mail account and drives the host
/// directory manager to mirror them locally.
///
/// Holds no state of its own beyond its configuration; every operation reads
/// the host services fresh. Safe to share across accounts. Two calls racing
/// over the *same* account's directories are not guarded against.
pub struct Resolver<D, S> {
    discovery: D,
    store: S,
    config: Config,
}

impl<D: Discovery, S: DirectoryStore> Resolver<D, S> {
    pub fn new(discovery: D, store: S, config: Config) -> Self {
        Resolver {
            discovery,
            store,
            config,
        }
    }

    /// All locally mirrored CardDAV directories, as connection records, in
    /// host enumeration order.
    pub fn connected(&self) -> Vec<BookRecord> {
        self.store
            .directories()
            .into_iter()
            .filter(|dir| dir.kind == DirectoryKind::CardDav)
            .map(|dir| Self::connection_record(&dir))
            .collect()
    }

    /// Discover the address books the server offers for `username`.
    ///
    /// Discovery responses sometimes carry books belonging to another
    /// account (shared collections, stale caches). A response like that is
    /// abandoned and discovery re-run; `retry_limit` such responses across
    /// the whole call is a hard failure. A response whose candidates all
    /// belong to the account ends the loop.
    ///
    /// With no `password` the keyring is consulted for the account, falling
    /// back to an empty string (some servers accept discovery unauthenticated).
    pub async fn list(
        &self,
        username: &str,
        password: Option<&str>,
    ) -> Result<Vec<BookRecord>, String> {
        let hostname = path::hostname(username);
        let password = match password {
            Some(p) => p.to_string(),
            None => keyring::get_password(username, &hostname).unwrap_or_else(|e| {
                log::debug!("no stored password for {username}: {e}");
                String::new()
            }),
        };
        log::debug!("list: {username} via {hostname}");

        let mut books: Vec<BookRecord> = Vec::new();
        let mut tries = 0u32;
        loop {
            match self
                .detect_once(username, &password, &hostname, &mut books)
                .await?
            {
                DetectStep::Complete => break,
                DetectStep::Mismatch => {
                    tries += 1;
                    if tries >= self.config.retry_limit {
                        return Err("retries exceeded".to_string());
                    }
                }
            }
        }

        books.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!("list returning {} books", books.len());
        Ok(books)
    }

    /// One discovery pass. Accepted candidates are appended to `books`,
    /// skipping any already accumulated on an earlier pass.
    async fn detect_once(
        &self,
        username: &str,
        password: &str,
        hostname: &str,
        books: &mut Vec<BookRecord>,
    ) -> Result<DetectStep, String> {
        let detected = self
            .discovery
            .detect_address_books(username, password, hostname, self.config.secure)
            .await?;
        log::debug!("detected {} candidate books", detected.len());

        for candidate in &detected {
            let url = candidate.url();
            let owner = path::path_user(url.path()).unwrap_or_default();
            if owner != username {
                log::error!("username mismatch: {username} vs {owner} at {url}");
                return Ok(DetectStep::Mismatch);
            }
            let uuid = path::hash_uuid(&format!("{}{}", url.as_str(), username));
            if books.iter().any(|b| b.uuid == uuid) {
                continue;
            }
            books.push(Self::listing_record(username, candidate, uuid));
        }
        Ok(DetectStep::Complete)
    }

    /// Materialize the discovered book whose token matches `token` as a
    /// local directory named after the token.
    ///
    /// A token absent from discovery or a directory that comes back
    /// half-initialized is reported inside the returned record, not as an
    /// `Err`; only host-service failures propagate.
    pub async fn connect(
        &self,
        username: &str,
        password: &str,
        token: &str,
    ) -> Result<BookRecord, String> {
        log::debug!("connect: {username} {token}");
        let hostname = path::hostname(username);
        let detected = self
            .discovery
            .detect_address_books(username, password, &hostname, self.config.secure)
            .await?;

        let Some(server_book) = detected
            .iter()
            .find(|b| path::path_token(b.url().path()) == Some(token))
        else {
            log::warn!("connect: no detected book matches token {token:?}");
            return Ok(BookRecord::connect_failure(username, token, "token not found"));
        };

        let created = server_book.create().await?;
        if !created.initialized
            || created.uid.len() != 36
            || Uuid::parse_str(&created.uid).is_err()
        {
            log::warn!(
                "connect: directory for {token:?} uninitialized or bad uid {:?}",
                created.uid
            );
            return Ok(BookRecord::connect_failure(username, token, "connection failed"));
        }

        self.store.rename_directory(&created.uid, token)?;
        let dir = self
            .store
            .directory_from_uid(&created.uid)
            .ok_or_else(|| format!("no directory with uid {}", created.uid))?;
        Ok(Self::connection_record(&dir))
    }

    /// Delete the mirrored directory behind `uuid`. The store's verbatim
    /// result is passed through.
    pub fn disconnect(&self, uuid: &str) -> Result<bool, String> {
        let dir = self
            .store
            .directory_from_uid(uuid)
            .ok_or_else(|| format!("no directory with uuid {uuid}"))?;
        let ret = self.store.delete_address_book(&dir.uri)?;
        log::debug!("disconnect {uuid}: {ret}");
        Ok(ret)
    }

    /// Connection record for the directory behind `uuid`, or an error record
    /// when the identifier resolves to something that is not CardDAV.
    pub fn get(&self, uuid: &str) -> Result<BookRecord, String> {
        log::debug!("get: {uuid}");
        let dir = self
            .store
            .directory_from_uid(uuid)
            .ok_or_else(|| format!("no directory with uuid {uuid}"))?;
        if dir.kind != DirectoryKind::CardDav {
            return Ok(BookRecord::error_for_uuid(uuid, "not a cardDAV directory"));
        }
        Ok(Self::connection_record(&dir))
    }

    fn connection_record(dir: &DirectoryHandle) -> BookRecord {
        let token = path::path_token(&dir.server_url).unwrap_or_default();
        let book = path::token_book(&dir.username, token);
        BookRecord {
            name: dir.name.clone(),
            token: token.to_string(),
            book: book.to_string(),
            username: dir.username.clone(),
            url: dir.server_url.clone(),
            uuid: dir.uid.clone(),
            connected: true,
            kind: RecordKind::Connection,
            detail: Some(RecordDetail::Connection(ConnectionDetail {
                uri: dir.uri.clone(),
                file_name: dir.file_name.clone(),
                description: dir.description.clone(),
                child_card_count: dir.child_card_count,
                pref_id: dir.pref_id.clone(),
                kind: dir.kind,
                is_mail_list: dir.is_mail_list,
                is_remote: dir.is_remote,
                is_secure: dir.is_secure,
                read_only: dir.read_only,
                supports_mailing_lists: dir.supports_mailing_lists,
            })),
            error: None,
        }
    }

    fn listing_record(username: &str, candidate: &D::Book, uuid: String) -> BookRecord {
        let url = candidate.url();
        let token = path::path_token(url.path()).unwrap_or_default();
        BookRecord {
            name: candidate.name().to_string(),
            token: token.to_string(),
            book: path::token_book(username, token).to_string(),
            username: username.to_string(),
            url: url.to_string(),
            uuid,
            connected: false,
            kind: RecordKind::Listing,
            detail: Some(RecordDetail::Listing(ListingDetail {
                hostname: url_host(url),
                href: url.to_string(),
                origin: url.origin().ascii_serialization(),
                pathname: url.path().to_string(),
            })),
            error: None,
        }
    }
}

/// Host (plus port when present) of a URL.
fn url_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
