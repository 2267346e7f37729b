use chrono::{DateTime, SecondsFormat, Utc};

/// Lifecycle state of an access code. The only legal transition is
/// Pending → Used, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Pending,
    Used,
    /// A stored row whose status column holds something else. Never written
    /// by this service; treated as unredeemable.
    Invalid,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Used => "USED",
            Self::Invalid => "INVALID",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "USED" => Self::Used,
            _ => Self::Invalid,
        }
    }
}

/// One issued access code. Created Pending at issuance, flipped to Used at
/// most once at redemption, never deleted.
///
/// Timestamps stay RFC 3339 strings end to end: the stored row shape is the
/// stability contract, and a corrupt `expires_at` must come back from
/// redemption as the BAD_EXPIRY outcome rather than failing the scan.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub code: String,
    pub technician_name: String,
    pub site_id: String,
    pub purpose: String,
    pub requester_id: String,
    pub status: TokenStatus,
    pub issued_at: String,
    pub expires_at: String,
    pub used_at: Option<String>,
}

impl TokenRecord {
    /// Parsed expiry, or `None` when the stored value is not a timestamp.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Append-only audit event. Never updated or deleted.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub time: String,
    pub actor: String,
    pub action: String,
    pub detail: String,
}

pub const ACTION_ISSUE_TOKEN: &str = "ISSUE_TOKEN";
pub const ACTION_CONSUME_TOKEN: &str = "CONSUME_TOKEN";

/// Actor recorded for redemptions coming from the cabinet device.
pub const DEVICE_ACTOR: &str = "device";

/// Validity window applied when the requester does not ask for one.
pub const DEFAULT_TTL_MINUTES: i64 = 3;

/// Candidate codes sampled before giving up on collision avoidance. Past
/// this budget the last candidate is issued anyway, trading a small
/// residual collision probability for availability.
pub const MAX_CODE_ATTEMPTS: u32 = 25;

/// Render a timestamp the way it is persisted: RFC 3339, millisecond
/// precision, `Z` suffix.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
