use serde::{Deserialize, Serialize};

use crate::host::DirectoryKind;

/// Which of the three record shapes this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Connection,
    Listing,
    Error,
}

/// Uniform description of an address book, whether it is already mirrored
/// locally (`connection`), only known from discovery (`listing`), or could
/// not be resolved (`error`).
///
/// Built fresh on every call; never cached here. Connected records carry the
/// host-assigned directory UID, listings a stable hash-derived one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub book: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    pub connected: bool,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<RecordDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-kind metadata block under `detail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDetail {
    Connection(ConnectionDetail),
    Listing(ListingDetail),
}

/// Directory metadata the host keeps for a connected book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetail {
    pub uri: String,
    pub file_name: String,
    pub description: String,
    pub child_card_count: u32,
    pub pref_id: String,
    #[serde(rename = "type")]
    pub kind: DirectoryKind,
    pub is_mail_list: bool,
    pub is_remote: bool,
    pub is_secure: bool,
    pub read_only: bool,
    pub supports_mailing_lists: bool,
}

/// URL breakdown for a book that is only known from discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetail {
    pub hostname: String,
    pub href: String,
    pub origin: String,
    pub pathname: String,
}

impl BookRecord {
    /// Error record for an identifier that resolved to the wrong thing.
    pub(crate) fn error_for_uuid(uuid: &str, error: &str) -> Self {
        BookRecord {
            name: String::new(),
            token: String::new(),
            book: String::new(),
            username: String::new(),
            url: String::new(),
            uuid: uuid.to_string(),
            connected: false,
            kind: RecordKind::Error,
            detail: None,
            error: Some(error.to_string()),
        }
    }

    /// Soft failure from a connect attempt. Keeps the username and token the
    /// caller asked for so it can retry or report.
    pub(crate) fn connect_failure(username: &str, token: &str, error: &str) -> Self {
        BookRecord {
            name: String::new(),
            token: token.to_string(),
            book: String::new(),
            username: username.to_string(),
            url: String::new(),
            uuid: String::new(),
            connected: false,
            kind: RecordKind::Error,
            detail: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_serializes_as_type() {
        let record = BookRecord::error_for_uuid("abc-123", "not a cardDAV directory");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["uuid"], "abc-123");
        assert_eq!(json["connected"], false);
        assert_eq!(json["error"], "not a cardDAV directory");
    }

    #[test]
    fn error_record_skips_empty_fields() {
        let record = BookRecord::error_for_uuid("abc-123", "not a cardDAV directory");
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("url"));
        assert!(!obj.contains_key("detail"));
    }

    #[test]
    fn connect_failure_keeps_request_fields() {
        let record =
            BookRecord::connect_failure("user@x.com", "user@x.com.books", "token not found");
        assert_eq!(record.username, "user@x.com");
        assert_eq!(record.token, "user@x.com.books");
        assert!(!record.connected);
        assert_eq!(record.error.as_deref(), Some("token not found"));
    }

    #[test]
    fn connection_detail_carries_directory_kind_as_type() {
        let detail = ConnectionDetail {
            uri: "moz-abdirectory://uid".into(),
            file_name: "uid.sqlite".into(),
            description: String::new(),
            child_card_count: 2,
            pref_id: "ldap_2.servers.mine".into(),
            kind: DirectoryKind::CardDav,
            is_mail_list: false,
            is_remote: true,
            is_secure: true,
            read_only: false,
            supports_mailing_lists: false,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["type"], "carddav");
        assert_eq!(json["childCardCount"], 2);
    }

    #[test]
    fn listing_detail_round_trips() {
        let record = BookRecord {
            name: "default".into(),
            token: "user@x.com.default".into(),
            book: "default".into(),
            username: "user@x.com".into(),
            url: "https://x.com/dav/user@x.com/user@x.com.default/".into(),
            uuid: "0b0b0b0b-0b0b-0b0b-0b0b-0b0b0b0b0b0b".into(),
            connected: false,
            kind: RecordKind::Listing,
            detail: Some(RecordDetail::Listing(ListingDetail {
                hostname: "x.com".into(),
                href: "https://x.com/dav/user@x.com/user@x.com.default/".into(),
                origin: "https://x.com".into(),
                pathname: "/dav/user@x.com/user@x.com.default/".into(),
            })),
            error: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: BookRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
