//! Core update decision logic

use omaha_protocol::{
    Actions, App, AppStatus, DayStart, Indent, Manifest, PROTOCOL_VERSION, Packages, Ping,
    Request, Response, UpdateCheck, Urls, decode_request, encode_with,
};
use tracing::{debug, instrument};

use crate::{
    config::ServiceConfig,
    error::{DecisionError, UpdateServiceError},
    types::ReleaseDescriptor,
    utils::{app_id_matches, is_update_available},
};

/// Install step fired by the client once the payload is in place
const POSTINSTALL_EVENT: &str = "postinstall";

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub release: ReleaseDescriptor,
    pub indent: Indent,
    pub analytics: bool,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        debug!(
            "Serving release {} on channel {} from {}",
            config.release.version, config.release.channel, config.release.channel_base_url
        );
        Self {
            release: config.release,
            indent: config.indent,
            analytics: config.analytics,
        }
    }

    /// Runs one decode -> decide -> encode cycle over a raw request body
    #[instrument(skip_all, fields(release = %self.release.version, body_len = body.len()))]
    pub fn check_for_update(
        &self,
        body: &[u8],
    ) -> Result<(Request, Response, String), UpdateServiceError> {
        let request = decode_request(body)?;
        let response = decide(&request, &self.release)?;
        let xml = encode_with(&response, self.indent)?;
        Ok((request, response, xml))
    }
}

/// Build the response to `request` against the current release.
///
/// Every app is decided independently and answered in request order.
#[instrument(skip_all, fields(apps = request.apps.len(), release = %release.version))]
pub fn decide(request: &Request, release: &ReleaseDescriptor) -> Result<Response, DecisionError> {
    if request.apps.is_empty() {
        return Err(DecisionError::EmptyRequest);
    }

    let apps = request
        .apps
        .iter()
        .map(|app| decide_app(app, release))
        .collect();

    Ok(Response {
        protocol: PROTOCOL_VERSION.to_owned(),
        server: release.server_name.clone(),
        daystart: DayStart::default(),
        apps,
    })
}

fn decide_app(app: &App, release: &ReleaseDescriptor) -> App {
    let mut answer = App::new(app.app_id.clone());

    if let Some(status) = rejected_status(app, release) {
        debug!("App {:?} rejected with {}", app.app_id, status);
        answer.status = Some(status);
        return answer;
    }

    answer.status = Some(AppStatus::Ok);
    answer.ping = app.ping.as_ref().map(|_| Ping::acknowledged());

    let needs_update = is_update_available(&app.version, &release.version, release.comparison);
    answer.update_check = if needs_update {
        debug!(
            "Update available for {}: {:?} -> {}",
            app.app_id, app.version, release.version
        );
        Some(UpdateCheck::available(
            build_manifest(release),
            Urls::with_url(&release.channel_base_url, &release.version),
        ))
    } else {
        debug!("App {} is up to date at {}", app.app_id, app.version);
        Some(UpdateCheck::no_update())
    };

    answer
}

fn rejected_status(app: &App, release: &ReleaseDescriptor) -> Option<AppStatus> {
    if app.app_id.trim().is_empty() {
        return Some(AppStatus::InvalidAppId);
    }
    match &release.app_id {
        Some(known) if !app_id_matches(known, &app.app_id) => Some(AppStatus::UnknownApplication),
        _ => None,
    }
}

fn build_manifest(release: &ReleaseDescriptor) -> Manifest {
    let mut packages = Packages::default();
    packages.add_package(
        &release.package.hash,
        &release.package.name,
        release.package.size,
        false,
    );

    let mut actions = Actions::default();
    actions.add_action(POSTINSTALL_EVENT, &release.package.sha256, false, false, true);

    Manifest {
        version: release.version.clone(),
        packages,
        actions,
    }
}
