//! Core domain types for fraudlens
//!
//! These types mirror the payloads served by the analyst backend. All of them
//! are read-only snapshots: the console never writes anything back.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Video** | A piece of content whose engagement is being reviewed |
//! | **Archetype** | Server-assigned category label for a video (opaque here) |
//! | **Likes series** | Hourly like counts for one video, paired label/count sequences |
//! | **Hour bucket** | `"YYYY-MM-DD HH"`, one hour of activity for a video |
//! | **Risk user** | An account row in the risk-ranked list |
//! | **Risk score** | Server-computed anomaly signal, treated as an opaque number |
//! | **Alert reason / risk label** | Why an account was flagged; `"Normal"` means nothing was |

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel used by the backend for "no anomaly".
pub const NORMAL_LABEL: &str = "Normal";

/// Risk score above which an account is highlighted in lists.
pub const ELEVATED_RISK_THRESHOLD: f64 = 40.0;

/// Accept a flag that the backend may encode as a JSON bool or a 0/1 integer.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

// ============================================
// Videos
// ============================================

/// A video under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Stable identifier for the whole session
    pub id: i64,
    /// Display title
    pub title: String,
    /// Server-assigned category ("viral", "flop", ...)
    #[serde(default)]
    pub archetype: String,
    /// Upload date as sent by the backend
    #[serde(default)]
    pub upload_date: Option<String>,
}

/// Hourly like counts for one video.
///
/// `labels[i]` and `data[i]` describe the same hour. That pairing is the only
/// contract between the chart and the drill-down, so a series with mismatched
/// lengths is rejected by [`LikesSeries::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikesSeries {
    /// Hour labels, `"YYYY-MM-DD HH:00"`
    pub labels: Vec<String>,
    /// Like count per hour
    pub data: Vec<i64>,
}

impl LikesSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check that labels and counts pair up one-to-one.
    pub fn validate(&self) -> crate::Result<()> {
        if self.labels.len() != self.data.len() {
            return Err(crate::Error::Protocol(format!(
                "likes series has {} labels but {} counts",
                self.labels.len(),
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Largest hourly count, 0 for an empty series.
    pub fn peak(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

/// One hour of activity for a video, `"YYYY-MM-DD HH"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourBucket(String);

impl HourBucket {
    /// Length of the bucket prefix taken from a series label.
    pub const LEN: usize = 13;

    /// Derive the bucket from a chart label.
    ///
    /// This is a fixed truncation to the first 13 characters, not a parse:
    /// `"2025-12-06 14:00"` becomes `"2025-12-06 14"`.
    pub fn from_label(label: &str) -> Self {
        Self(label.chars().take(Self::LEN).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HourBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================
// Accounts
// ============================================

/// A row of the risk-ranked account list.
///
/// Ordering is decided by the server; the client never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskUser {
    pub id: i64,
    pub username: String,
    pub risk_score: f64,
    /// `"Normal"` when no anomaly was found
    pub alert_reason: String,
    #[serde(default)]
    pub total_likes: i64,
    /// ISO timestamp
    #[serde(default)]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_bot: bool,
}

impl RiskUser {
    /// Whether the alert reason carries an actual anomaly.
    pub fn is_flagged(&self) -> bool {
        self.alert_reason != NORMAL_LABEL
    }

    /// Whether the score crosses the highlight threshold.
    pub fn is_elevated(&self) -> bool {
        self.risk_score > ELEVATED_RISK_THRESHOLD
    }
}

/// Optional profile attributes of an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: Option<i64>,
    #[serde(default)]
    pub following: Option<i64>,
    #[serde(default)]
    pub posts: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Profile {
    /// Bio, or a generic description when the account has none.
    pub fn bio_or_default(&self) -> &str {
        self.bio.as_deref().unwrap_or("Social Media User")
    }

    pub fn location_or_default(&self) -> &str {
        self.location.as_deref().unwrap_or("Unknown")
    }

    pub fn followers_or_zero(&self) -> i64 {
        self.followers.unwrap_or(0)
    }

    pub fn following_or_zero(&self) -> i64 {
        self.following.unwrap_or(0)
    }
}

/// A recent like performed by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Title of the liked video
    pub title: String,
    /// ISO timestamp
    pub timestamp: String,
}

/// Full profile of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub risk_narrative: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub total_likes: i64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_bot: bool,
    #[serde(default)]
    pub last_active: Option<String>,
    /// Server order, assumed newest first
    #[serde(default)]
    pub recent_activity: Vec<ActivityEntry>,
}

impl UserDetail {
    /// Server narrative, or the no-findings text when there is none.
    pub fn narrative_or_default(&self) -> &str {
        self.risk_narrative
            .as_deref()
            .unwrap_or("No specific anomalies detected.")
    }
}

/// One account event inside a drilled-down hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourActivityRecord {
    pub username: String,
    /// `"Normal"`, `"Fresh Account"`, `"Sleeper Pattern"`, ...
    pub risk_label: String,
    /// ISO timestamp of the like
    pub timestamp: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_bot: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl HourActivityRecord {
    pub fn is_flagged(&self) -> bool {
        self.risk_label != NORMAL_LABEL
    }
}

// ============================================
// Chat
// ============================================

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The analyst at the console
    User,
    /// The backend assistant
    Agent,
}

/// A transcript entry. No id or timestamp is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Agent,
            text: text.into(),
        }
    }
}
