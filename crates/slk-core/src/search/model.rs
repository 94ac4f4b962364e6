//! Search result types.
//!
//! Field names follow the Slack Web API so that JSON output mirrors what the
//! service returned. Any field the service omits (or sends as `null`) falls
//! back to its default.

use serde::{Deserialize, Deserializer, Serialize};

use super::invoke::SearchKind;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Position of the returned page within the full result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingInfo {
    /// Requested page size.
    pub count: u32,
    /// Total number of matches.
    pub total: u32,
    /// One-based index of this page.
    pub page: u32,
    /// Number of pages available.
    pub pages: u32,
}

/// Channel a message was posted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRef {
    /// Channel ID.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Channel name without the leading `#`.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// A message returned by `search.messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMatch {
    /// Channel the message belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub channel: ChannelRef,
    /// Display name of the author.
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    /// User ID of the author.
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    /// Provider timestamp, `"<seconds>.<micros>"`.
    #[serde(deserialize_with = "null_as_default")]
    pub ts: String,
    /// Message body.
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Link to the message in the Slack client.
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
}

/// A file returned by `search.files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMatch {
    /// File ID.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// File name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Human-readable title.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Short file type (`pdf`, `png`, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub filetype: String,
    /// User ID of the uploader.
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    /// Upload time in Unix seconds; `0` when unknown.
    #[serde(deserialize_with = "null_as_default")]
    pub created: i64,
    /// Size in bytes.
    #[serde(deserialize_with = "null_as_default")]
    pub size: u64,
    /// Link to the file in the Slack client.
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
}

/// One page of matches plus its paging envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSet<T> {
    /// Total number of matches across all pages.
    pub total: u32,
    /// Matches on this page, in ranking order.
    pub matches: Vec<T>,
    /// Paging envelope.
    pub paging: PagingInfo,
}

impl<T> Default for MatchSet<T> {
    fn default() -> Self {
        Self {
            total: 0,
            matches: Vec::new(),
            paging: PagingInfo::default(),
        }
    }
}

/// Result of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    /// Matches from `search.messages`.
    Messages(MatchSet<MessageMatch>),
    /// Matches from `search.files`.
    Files(MatchSet<FileMatch>),
}

impl SearchResult {
    /// Which endpoint produced this result.
    #[must_use]
    pub const fn kind(&self) -> SearchKind {
        match self {
            Self::Messages(_) => SearchKind::Messages,
            Self::Files(_) => SearchKind::Files,
        }
    }

    /// Number of matches present on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Messages(set) => set.matches.len(),
            Self::Files(set) => set.matches.len(),
        }
    }

    /// Whether this page holds no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total matches across all pages.
    #[must_use]
    pub const fn total(&self) -> u32 {
        match self {
            Self::Messages(set) => set.total,
            Self::Files(set) => set.total,
        }
    }

    /// Paging envelope for this page.
    #[must_use]
    pub const fn paging(&self) -> &PagingInfo {
        match self {
            Self::Messages(set) => &set.paging,
            Self::Files(set) => &set.paging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_match_reads_slack_shape() {
        let raw = r#"{
            "iid": "abc",
            "channel": {"id": "C123", "name": "general", "is_private": false},
            "username": "alice",
            "user": "U1",
            "ts": "1700000000.123456",
            "text": "quarterly report is up",
            "permalink": "https://example.slack.com/archives/C123/p1700000000123456"
        }"#;
        let m: MessageMatch = serde_json::from_str(raw).expect("parse");
        assert_eq!(m.channel.name, "general");
        assert_eq!(m.username, "alice");
        assert_eq!(m.ts, "1700000000.123456");
    }

    #[test]
    fn missing_and_null_fields_default() {
        let m: MessageMatch =
            serde_json::from_str(r#"{"username": null, "text": "hi"}"#).expect("parse");
        assert_eq!(m.username, "");
        assert_eq!(m.channel, ChannelRef::default());

        let f: FileMatch = serde_json::from_str(r#"{"name": "a.pdf", "created": null}"#)
            .expect("parse");
        assert_eq!(f.created, 0);
        assert_eq!(f.name, "a.pdf");
    }

    #[test]
    fn result_is_tagged_by_kind() {
        let result = SearchResult::Files(MatchSet {
            total: 1,
            matches: vec![FileMatch {
                name: "budget.xlsx".into(),
                ..FileMatch::default()
            }],
            paging: PagingInfo {
                count: 20,
                total: 1,
                page: 1,
                pages: 1,
            },
        });
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["type"], "files");
        assert_eq!(value["matches"][0]["name"], "budget.xlsx");
        assert_eq!(value["paging"]["pages"], 1);
    }

    #[test]
    fn json_round_trip_keeps_every_field() {
        let result = SearchResult::Messages(MatchSet {
            total: 2,
            matches: vec![MessageMatch {
                channel: ChannelRef {
                    id: "C1".into(),
                    name: "eng".into(),
                },
                username: "bob".into(),
                user: "U2".into(),
                ts: "1700000000.000100".into(),
                text: "line one\nline two".into(),
                permalink: "https://example.slack.com/p1".into(),
            }],
            paging: PagingInfo {
                count: 1,
                total: 2,
                page: 1,
                pages: 2,
            },
        });
        let json = serde_json::to_string(&result).expect("serialize");
        let back: SearchResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, result);
    }

    #[test]
    fn accessors_follow_variant() {
        let empty = SearchResult::Messages(MatchSet::default());
        assert!(empty.is_empty());
        assert_eq!(empty.kind(), SearchKind::Messages);
        assert_eq!(empty.total(), 0);
        assert_eq!(empty.paging(), &PagingInfo::default());
    }
}
