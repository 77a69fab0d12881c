use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use omaha_protocol::UpdateCheckStatus;
use tracing::{debug, instrument, warn};

use crate::{analytics, service::AppState};

const XML_CONTENT_TYPE: &str = "text/xml";

/// Answers an Omaha `<request>` body with a `<response>` document.
#[instrument(skip_all, fields(body_len = body.len()))]
pub async fn update_check_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.check_for_update(&body) {
        Ok((request, response, xml)) => {
            debug!("Answered update check for {} app(s)", response.apps.len());

            if state.analytics {
                for (asked, answered) in request.apps.iter().zip(&response.apps) {
                    let update_available = answered
                        .update_check
                        .as_ref()
                        .and_then(|check| check.status)
                        == Some(UpdateCheckStatus::Ok);
                    analytics::track_update_check(
                        &asked.app_id,
                        &asked.track,
                        &asked.version,
                        update_available,
                        update_available.then_some(state.release.version.as_str()),
                    );
                }
            }

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
                xml,
            )
                .into_response()
        }
        Err(e) => {
            warn!("Update check failed: {}", e);
            if state.analytics {
                analytics::track_update_check_failed(e.kind());
            }
            e.into_response()
        }
    }
}

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}
