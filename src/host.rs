use serde::{Deserialize, Serialize};
use url::Url;

/// What kind of local directory the host says this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    CardDav,
    Ldap,
    Local,
}

/// Snapshot of a host-managed local directory.
///
/// The host owns these; the resolver only reads them and asks the
/// [`DirectoryStore`] to mutate them.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryHandle {
    pub uid: String,
    pub name: String,
    pub kind: DirectoryKind,
    /// Stored `carddav.username` value.
    pub username: String,
    /// Stored `carddav.url` value (full server URL).
    pub server_url: String,
    pub uri: String,
    pub file_name: String,
    pub description: String,
    pub child_card_count: u32,
    pub pref_id: String,
    pub read_only: bool,
    pub is_mail_list: bool,
    pub is_remote: bool,
    pub is_secure: bool,
    pub supports_mailing_lists: bool,
}

/// What the host hands back after materializing a remote book locally.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDirectory {
    pub initialized: bool,
    /// 36-character directory UID when the host set the directory up.
    pub uid: String,
}

/// One address book a discovery pass found on the server.
#[allow(async_fn_in_trait)]
pub trait RemoteBook {
    fn name(&self) -> &str;
    fn url(&self) -> &Url;
    /// Materialize a local mirror directory for this book.
    async fn create(&self) -> Result<NewDirectory, String>;
}

/// Host-provided CardDAV discovery service.
#[allow(async_fn_in_trait)]
pub trait Discovery {
    type Book: RemoteBook;

    async fn detect_address_books(
        &self,
        username: &str,
        password: &str,
        hostname: &str,
        secure: bool,
    ) -> Result<Vec<Self::Book>, String>;
}

/// Host-provided directory manager.
pub trait DirectoryStore {
    fn directories(&self) -> Vec<DirectoryHandle>;
    fn directory_from_uid(&self, uid: &str) -> Option<DirectoryHandle>;
    /// Delete by directory URI; the host's verbatim result is passed through.
    fn delete_address_book(&self, uri: &str) -> Result<bool, String>;
    fn rename_directory(&self, uid: &str, name: &str) -> Result<(), String>;
}
