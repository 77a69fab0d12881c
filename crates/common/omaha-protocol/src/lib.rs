//! Omaha Protocol
//!
//! Typed schema for the Omaha update-check protocol (version 3.0) and a
//! bidirectional XML codec. The crate performs no business validation:
//! cross-field rules such as "one update check per app" belong to the
//! server deciding on the request.

pub mod codec;
pub mod codes;
pub mod error;
pub mod types;

pub use codec::{
    Document, Indent, decode, decode_request, decode_response, encode, encode_with,
};
pub use codes::{CancelledState, EventResult, EventType};
pub use error::{ProtocolError, Result};
pub use types::{
    Action, Actions, App, AppStatus, Data, DayStart, Disabled, Event, Hw, Manifest, Os, Package,
    Packages, Ping, PROTOCOL_VERSION, Request, Response, UpdateCheck, UpdateCheckStatus, Url,
    Urls,
};
