//! Numeric code vocabularies carried by `<event>` elements.
//!
//! Codes are kept as transparent integers so that values outside the known
//! tables survive a decode/encode cycle untouched. Each type exposes named
//! constants for the known codes and a `description()` lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle transition reported by an `<event eventtype="..">`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EventType(pub i32);

impl EventType {
    pub const UNKNOWN: Self = Self(0);
    pub const DOWNLOAD_COMPLETE: Self = Self(1);
    pub const INSTALL_COMPLETE: Self = Self(2);
    pub const UPDATE_COMPLETE: Self = Self(3);
    pub const UNINSTALL: Self = Self(4);
    pub const DOWNLOAD_STARTED: Self = Self(5);
    pub const INSTALL_STARTED: Self = Self(6);
    pub const NEW_APPLICATION_INSTALL_STARTED: Self = Self(9);
    pub const SETUP_STARTED: Self = Self(10);
    pub const SETUP_FINISHED: Self = Self(11);
    pub const UPDATE_APPLICATION_STARTED: Self = Self(12);
    pub const UPDATE_DOWNLOAD_STARTED: Self = Self(13);
    pub const UPDATE_DOWNLOAD_FINISHED: Self = Self(14);
    pub const UPDATE_INSTALLER_STARTED: Self = Self(15);
    pub const SETUP_UPDATE_BEGIN: Self = Self(16);
    pub const SETUP_UPDATE_COMPLETE: Self = Self(17);
    pub const REGISTER_PRODUCT_COMPLETE: Self = Self(20);
    pub const OEM_INSTALL_FIRST_CHECK: Self = Self(30);
    pub const APP_COMMAND_STARTED: Self = Self(40);
    pub const APP_COMMAND_ENDED: Self = Self(41);
    pub const UPDATE_CHECK_FAILURE: Self = Self(50);
    pub const SETUP_FAILURE: Self = Self(100);
    pub const COM_SERVER_FAILURE: Self = Self(102);
    pub const SETUP_UPDATE_FAILURE: Self = Self(103);

    pub fn description(&self) -> Option<&'static str> {
        let label = match self.0 {
            0 => "unknown",
            1 => "download complete",
            2 => "install complete",
            3 => "update complete",
            4 => "uninstall",
            5 => "download started",
            6 => "install started",
            9 => "new application install started",
            10 => "setup started",
            11 => "setup finished",
            12 => "update application started",
            13 => "update download started",
            14 => "update download finished",
            15 => "update installer started",
            16 => "setup update begin",
            17 => "setup update complete",
            20 => "register product complete",
            30 => "OEM install first check",
            40 => "app-specific command started",
            41 => "app-specific command ended",
            50 => "update-check failure",
            100 => "setup failure",
            102 => "COM server failure",
            103 => "setup update failure",
            _ => return None,
        };
        Some(label)
    }
}

/// Outcome of the transition reported in `<event eventresult="..">`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EventResult(pub i32);

impl EventResult {
    pub const ERROR: Self = Self(0);
    pub const SUCCESS: Self = Self(1);
    pub const SUCCESS_REBOOT: Self = Self(2);
    pub const SUCCESS_RESTART_BROWSER: Self = Self(3);
    pub const CANCELLED: Self = Self(4);
    pub const ERROR_INSTALLER_MSI: Self = Self(5);
    pub const ERROR_INSTALLER_OTHER: Self = Self(6);
    pub const NO_UPDATE: Self = Self(7);
    pub const ERROR_INSTALLER_SYSTEM: Self = Self(8);
    pub const UPDATE_DEFERRED: Self = Self(9);
    pub const HANDOFF_ERROR: Self = Self(10);

    pub fn description(&self) -> Option<&'static str> {
        let label = match self.0 {
            0 => "error",
            1 => "success",
            2 => "success reboot",
            3 => "success restart browser",
            4 => "cancelled",
            5 => "error installer MSI",
            6 => "error installer other",
            7 => "noupdate",
            8 => "error installer system",
            9 => "update deferred",
            10 => "handoff error",
            _ => return None,
        };
        Some(label)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.0, 1..=3)
    }
}

/// Client state at the moment an update flow was cancelled
/// (`<event state_cancelled="..">`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CancelledState(pub i32);

impl CancelledState {
    pub const NOT_CANCELLED: Self = Self(0);
    pub const INITIALIZING: Self = Self(1);
    pub const WAITING_TO_CHECK: Self = Self(2);
    pub const CHECKING: Self = Self(3);
    pub const UPDATE_AVAILABLE: Self = Self(4);
    pub const WAITING_TO_DOWNLOAD: Self = Self(5);
    pub const RETRYING_DOWNLOAD: Self = Self(6);
    pub const DOWNLOADING: Self = Self(7);
    pub const DOWNLOAD_COMPLETE: Self = Self(8);
    pub const EXTRACTING: Self = Self(9);
    pub const APPLYING_DIFFERENTIAL_PATCH: Self = Self(10);
    pub const READY_TO_INSTALL: Self = Self(11);
    pub const WAITING_TO_INSTALL: Self = Self(12);
    pub const INSTALLING: Self = Self(13);
    pub const INSTALL_COMPLETE: Self = Self(14);
    pub const PAUSED: Self = Self(15);
    pub const NO_UPDATE: Self = Self(16);
    pub const ERROR: Self = Self(17);

    pub fn description(&self) -> Option<&'static str> {
        let label = match self.0 {
            0 => "unknown or not-cancelled",
            1 => "initializing",
            2 => "waiting to check for update",
            3 => "checking for update",
            4 => "update available",
            5 => "waiting to download",
            6 => "retrying download",
            7 => "downloading",
            8 => "download complete",
            9 => "extracting",
            10 => "applying differential patch",
            11 => "ready to install",
            12 => "waiting to install",
            13 => "installing",
            14 => "install complete",
            15 => "paused",
            16 => "no update",
            17 => "error",
            _ => return None,
        };
        Some(label)
    }
}

macro_rules! impl_code_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match self.description() {
                        Some(label) => write!(f, "{} ({})", label, self.0),
                        None => write!(f, "code {}", self.0),
                    }
                }
            }

            impl From<i32> for $ty {
                fn from(code: i32) -> Self {
                    Self(code)
                }
            }
        )*
    };
}

impl_code_display!(EventType, EventResult, CancelledState);
