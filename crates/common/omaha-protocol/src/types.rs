//! Typed model of the Omaha request and response documents.
//!
//! Attributes are serde fields prefixed with `@`; child elements are plain
//! fields. Optional attributes are omitted from the output when they hold
//! their type's default value. Status attributes, `protocol`, `server`,
//! `appid`, the event `source_url_index` and the package/action flags are
//! always written.

use serde::{Deserialize, Deserializer, Serialize};

use crate::codes::{CancelledState, EventResult, EventType};

/// Protocol version spoken by this crate.
pub const PROTOCOL_VERSION: &str = "3.0";

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Reads a repeatable child element and keeps its last occurrence.
fn last_element<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let mut elements = Vec::<T>::deserialize(deserializer)?;
    Ok(elements.pop())
}

// ============================================================================
// Status vocabularies
// ============================================================================

/// Application-level status attached to a response `<app>` (and `<ping>`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "restricted")]
    Restricted,
    #[serde(rename = "error-unknownApplication")]
    UnknownApplication,
    #[serde(rename = "error-invalidAppId")]
    InvalidAppId,
}

impl AppStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppStatus::Ok => "ok",
            AppStatus::Restricted => "restricted",
            AppStatus::UnknownApplication => "error-unknownApplication",
            AppStatus::InvalidAppId => "error-invalidAppId",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            AppStatus::UnknownApplication | AppStatus::InvalidAppId
        )
    }
}

impl std::fmt::Display for AppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an `<updatecheck>` in a response.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCheckStatus {
    #[serde(rename = "noupdate")]
    NoUpdate,
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "error-internal")]
    Internal,
    #[serde(rename = "error-hash")]
    Hash,
    #[serde(rename = "error-osnotsupported")]
    OsNotSupported,
    #[serde(rename = "error-hwnotsupported")]
    HwNotSupported,
    #[serde(rename = "error-unsupportedProtocol")]
    UnsupportedProtocol,
}

impl UpdateCheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateCheckStatus::NoUpdate => "noupdate",
            UpdateCheckStatus::Ok => "ok",
            UpdateCheckStatus::Internal => "error-internal",
            UpdateCheckStatus::Hash => "error-hash",
            UpdateCheckStatus::OsNotSupported => "error-osnotsupported",
            UpdateCheckStatus::HwNotSupported => "error-hwnotsupported",
            UpdateCheckStatus::UnsupportedProtocol => "error-unsupportedProtocol",
        }
    }
}

impl std::fmt::Display for UpdateCheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Request
// ============================================================================

/// `<request>` root element sent by the client.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename = "request")]
pub struct Request {
    #[serde(rename = "@protocol")]
    pub protocol: String,
    #[serde(rename = "@version", default, skip_serializing_if = "is_default")]
    pub version: String,
    #[serde(rename = "@requestid", default, skip_serializing_if = "is_default")]
    pub request_id: String,
    #[serde(rename = "@sessionid", default, skip_serializing_if = "is_default")]
    pub session_id: String,
    #[serde(rename = "@userid", default, skip_serializing_if = "is_default")]
    pub user_id: String,
    #[serde(rename = "@installsource", default, skip_serializing_if = "is_default")]
    pub install_source: String,
    #[serde(rename = "@testsource", default, skip_serializing_if = "is_default")]
    pub test_source: String,
    #[serde(rename = "@ismachine", default, skip_serializing_if = "is_default")]
    pub is_machine: String,
    #[serde(rename = "@dedup", default, skip_serializing_if = "is_default")]
    pub dedup: String,
    #[serde(rename = "@dlpref", default, skip_serializing_if = "is_default")]
    pub dl_pref: String,
    #[serde(rename = "@originurl", default, skip_serializing_if = "is_default")]
    pub origin_url: String,
    #[serde(rename = "@updaterchannel", default, skip_serializing_if = "is_default")]
    pub updater_channel: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Os>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw: Option<Hw>,
    #[serde(rename = "app", default, skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<App>,
}

/// `<os>` platform descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Os {
    #[serde(rename = "@platform", default, skip_serializing_if = "is_default")]
    pub platform: String,
    #[serde(rename = "@version", default, skip_serializing_if = "is_default")]
    pub version: String,
    #[serde(rename = "@sp", default, skip_serializing_if = "is_default")]
    pub sp: String,
    #[serde(rename = "@arch", default, skip_serializing_if = "is_default")]
    pub arch: String,
}

/// `<hw>` hardware capability descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Hw {
    #[serde(rename = "@sse", default, skip_serializing_if = "is_default")]
    pub sse: String,
    #[serde(rename = "@sse2", default, skip_serializing_if = "is_default")]
    pub sse2: String,
    #[serde(rename = "@sse3", default, skip_serializing_if = "is_default")]
    pub sse3: String,
    #[serde(rename = "@sse41", default, skip_serializing_if = "is_default")]
    pub sse41: String,
    #[serde(rename = "@sse42", default, skip_serializing_if = "is_default")]
    pub sse42: String,
    #[serde(rename = "@ssse3", default, skip_serializing_if = "is_default")]
    pub ssse3: String,
    #[serde(rename = "@avx", default, skip_serializing_if = "is_default")]
    pub avx: String,
    #[serde(rename = "@physmemory", default, skip_serializing_if = "is_default")]
    pub phys_memory: String,
}

// ============================================================================
// App and its children
// ============================================================================

/// One `<app>` per product, used in both requests and responses.
///
/// A request app carries either event reports or an update check; this type
/// does not enforce that, it only describes the wire shape.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct App {
    #[serde(rename = "@appid")]
    pub app_id: String,
    /// Installed version. Empty when the app is not yet installed.
    #[serde(rename = "@version", default, skip_serializing_if = "is_default")]
    pub version: String,
    #[serde(rename = "@lang", default, skip_serializing_if = "is_default")]
    pub lang: String,
    #[serde(rename = "@brand", default, skip_serializing_if = "is_default")]
    pub brand: String,
    #[serde(rename = "@client", default, skip_serializing_if = "is_default")]
    pub client: String,
    #[serde(rename = "@enabled", default, skip_serializing_if = "is_default")]
    pub enabled: String,
    #[serde(rename = "@experiments", default, skip_serializing_if = "is_default")]
    pub experiments: String,
    #[serde(rename = "@iid", default, skip_serializing_if = "is_default")]
    pub iid: String,
    #[serde(rename = "@installage", default, skip_serializing_if = "is_default")]
    pub install_age: String,
    #[serde(rename = "@installdate", default, skip_serializing_if = "is_default")]
    pub install_date: String,
    #[serde(rename = "@installsource", default, skip_serializing_if = "is_default")]
    pub install_source: String,
    #[serde(rename = "@ismachine", default, skip_serializing_if = "is_default")]
    pub is_machine: String,
    /// Release track, e.g. "stable".
    #[serde(rename = "@track", default, skip_serializing_if = "is_default")]
    pub track: String,
    #[serde(rename = "@fingerprint", default, skip_serializing_if = "is_default")]
    pub fingerprint: String,
    #[serde(rename = "@cohort", default, skip_serializing_if = "is_default")]
    pub cohort: String,
    #[serde(rename = "@cohorthint", default, skip_serializing_if = "is_default")]
    pub cohort_hint: String,
    #[serde(rename = "@cohortname", default, skip_serializing_if = "is_default")]
    pub cohort_name: String,
    #[serde(rename = "@status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppStatus>,

    #[serde(rename = "data", default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Data>,
    #[serde(rename = "disabled", default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<Disabled>,
    /// A repeated `<ping>` keeps the last one.
    #[serde(
        default,
        deserialize_with = "last_element",
        skip_serializing_if = "Option::is_none"
    )]
    pub ping: Option<Ping>,
    #[serde(rename = "event", default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    /// A repeated `<updatecheck>` keeps the last one.
    #[serde(
        rename = "updatecheck",
        default,
        deserialize_with = "last_element",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_check: Option<UpdateCheck>,
}

impl App {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Default::default()
        }
    }
}

/// `<data>` requests or supplies additional textual information.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Data {
    #[serde(rename = "@name", default, skip_serializing_if = "is_default")]
    pub name: String,
    #[serde(rename = "@index", default, skip_serializing_if = "is_default")]
    pub index: i32,
}

/// `<disabled>` carries an integral reason the app is disabled.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Disabled {
    #[serde(rename = "@reason", default, skip_serializing_if = "is_default")]
    pub reason: String,
}

/// `<ping>` counts active users and deduplicates requests.
///
/// The day counters use negative values as sentinels (`-1` for "first
/// ping", `-2` for "unknown").
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Ping {
    #[serde(rename = "@active", default, skip_serializing_if = "is_default")]
    pub active: String,
    #[serde(rename = "@a", default, skip_serializing_if = "is_default")]
    pub a: i32,
    #[serde(rename = "@r", default, skip_serializing_if = "is_default")]
    pub r: i32,
    #[serde(rename = "@ad", default, skip_serializing_if = "is_default")]
    pub ad: i32,
    #[serde(rename = "@rd", default, skip_serializing_if = "is_default")]
    pub rd: i32,
    #[serde(rename = "@ping_freshness", default, skip_serializing_if = "is_default")]
    pub ping_freshness: i64,
    #[serde(rename = "@status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppStatus>,
}

impl Ping {
    pub fn acknowledged() -> Self {
        Self {
            status: Some(AppStatus::Ok),
            ..Default::default()
        }
    }
}

/// `<event>` reports a step of the client's update flow.
/// Never sent in the same app as an `<updatecheck>`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Event {
    #[serde(rename = "@eventtype", default)]
    pub event_type: EventType,
    #[serde(rename = "@eventresult", default, skip_serializing_if = "is_default")]
    pub event_result: EventResult,
    #[serde(rename = "@errorcode", default, skip_serializing_if = "is_default")]
    pub error_code: i32,
    #[serde(rename = "@extracode1", default, skip_serializing_if = "is_default")]
    pub extra_code1: i32,
    #[serde(rename = "@errorcat", default, skip_serializing_if = "is_default")]
    pub error_cat: i32,
    #[serde(rename = "@download_time_ms", default, skip_serializing_if = "is_default")]
    pub download_time_ms: i64,
    #[serde(rename = "@downloaded", default, skip_serializing_if = "is_default")]
    pub downloaded: i64,
    #[serde(rename = "@total", default, skip_serializing_if = "is_default")]
    pub total: i64,
    #[serde(
        rename = "@update_check_time_ms",
        default,
        skip_serializing_if = "is_default"
    )]
    pub update_check_time_ms: i64,
    #[serde(rename = "@install_time_ms", default, skip_serializing_if = "is_default")]
    pub install_time_ms: i64,
    /// Always written, even when empty.
    #[serde(rename = "@source_url_index", default)]
    pub source_url_index: String,
    #[serde(rename = "@state_cancelled", default, skip_serializing_if = "is_default")]
    pub state_cancelled: CancelledState,
    #[serde(
        rename = "@time_since_update_available_ms",
        default,
        skip_serializing_if = "is_default"
    )]
    pub time_since_update_available_ms: i64,
    #[serde(rename = "@url", default, skip_serializing_if = "is_default")]
    pub url: String,
    #[serde(rename = "@nextversion", default, skip_serializing_if = "is_default")]
    pub next_version: String,
    #[serde(rename = "@previousversion", default, skip_serializing_if = "is_default")]
    pub previous_version: String,
    #[serde(rename = "@nextfp", default, skip_serializing_if = "is_default")]
    pub next_fp: String,
    #[serde(rename = "@previousfp", default, skip_serializing_if = "is_default")]
    pub previous_fp: String,
}

// ============================================================================
// Update check, manifest and download locations
// ============================================================================

/// `<updatecheck>` in both forms: the request form asks for an update
/// (status absent), the response form answers it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateCheck {
    #[serde(rename = "@status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UpdateCheckStatus>,
    #[serde(rename = "@tttoken", default, skip_serializing_if = "is_default")]
    pub tt_token: String,
    #[serde(rename = "@updatedisabled", default, skip_serializing_if = "is_default")]
    pub update_disabled: bool,
    #[serde(
        rename = "@targetversionprefix",
        default,
        skip_serializing_if = "is_default"
    )]
    pub target_version_prefix: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Urls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
}

impl UpdateCheck {
    pub fn no_update() -> Self {
        Self {
            status: Some(UpdateCheckStatus::NoUpdate),
            ..Default::default()
        }
    }

    pub fn available(manifest: Manifest, urls: Urls) -> Self {
        Self {
            status: Some(UpdateCheckStatus::Ok),
            urls: Some(urls),
            manifest: Some(manifest),
            ..Default::default()
        }
    }
}

/// `<urls>`: ordered list of codebase base URLs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Urls {
    #[serde(rename = "url", default)]
    pub urls: Vec<Url>,
}

impl Urls {
    /// Appends `codebase/version/` to the list.
    pub fn add_url(&mut self, codebase: &str, version: &str) {
        self.urls.push(Url {
            codebase: format!("{}/{}/", codebase, version),
        });
    }

    pub fn with_url(codebase: &str, version: &str) -> Self {
        let mut urls = Self::default();
        urls.add_url(codebase, version);
        urls
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Url {
    #[serde(rename = "@codebase", default)]
    pub codebase: String,
}

/// `<manifest>` describes the payload of an available update.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    #[serde(rename = "@version", default, skip_serializing_if = "is_default")]
    pub version: String,
    #[serde(default)]
    pub packages: Packages,
    #[serde(default)]
    pub actions: Actions,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Packages {
    #[serde(rename = "package", default)]
    pub packages: Vec<Package>,
}

impl Packages {
    pub fn add_package(&mut self, hash: &str, name: &str, size: u64, required: bool) {
        self.packages.push(Package {
            hash: hash.to_owned(),
            name: name.to_owned(),
            size,
            required,
        });
    }
}

/// `<package>`: a downloadable file of the update.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Package {
    #[serde(rename = "@hash", default)]
    pub hash: String,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@size", default)]
    pub size: u64,
    #[serde(rename = "@required", default)]
    pub required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Actions {
    #[serde(rename = "action", default)]
    pub actions: Vec<Action>,
}

impl Actions {
    pub fn add_action(
        &mut self,
        event: &str,
        sha256: &str,
        needs_admin: bool,
        is_delta: bool,
        disable_payload_backoff: bool,
    ) {
        self.actions.push(Action {
            event: event.to_owned(),
            sha256: sha256.to_owned(),
            needs_admin,
            is_delta,
            disable_payload_backoff,
            ..Default::default()
        });
    }
}

/// `<action>`: an install step the client runs once the payload is fetched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Action {
    #[serde(rename = "@event", default)]
    pub event: String,
    #[serde(rename = "@sha256", default)]
    pub sha256: String,
    #[serde(rename = "@needsadmin", default)]
    pub needs_admin: bool,
    #[serde(rename = "@IsDelta", default)]
    pub is_delta: bool,
    #[serde(
        rename = "@DisablePayloadBackoff",
        default,
        skip_serializing_if = "is_default"
    )]
    pub disable_payload_backoff: bool,
    #[serde(
        rename = "@MetadataSignatureRsa",
        default,
        skip_serializing_if = "is_default"
    )]
    pub metadata_signature_rsa: String,
    #[serde(rename = "@MetadataSize", default, skip_serializing_if = "is_default")]
    pub metadata_size: String,
    #[serde(rename = "@deadline", default, skip_serializing_if = "is_default")]
    pub deadline: String,
}

// ============================================================================
// Response
// ============================================================================

/// `<response>` root element returned by the server.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename = "response")]
pub struct Response {
    #[serde(rename = "@protocol")]
    pub protocol: String,
    #[serde(rename = "@server", default)]
    pub server: String,
    #[serde(default)]
    pub daystart: DayStart,
    #[serde(rename = "app", default, skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<App>,
}

/// `<daystart>`: server-side clock reference for client day counting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayStart {
    #[serde(rename = "@elapsed_seconds", default)]
    pub elapsed_seconds: i64,
    #[serde(rename = "@elapsed_days", default)]
    pub elapsed_days: i64,
}
