use posthog_rs::Event;

fn capture_async(event: Event) {
    tokio::spawn(async move {
        if let Err(e) = posthog_rs::capture(event).await {
            tracing::error!("Failed to capture posthog event: {}", e);
        }
    });
}

pub fn track_update_check(
    app_id: &str,
    track: &str,
    current_version: &str,
    update_available: bool,
    latest_version: Option<&str>,
) {
    let mut event = Event::new_anon("update_check");
    event.insert_prop("app_id", app_id).ok();
    if !track.is_empty() {
        event.insert_prop("track", track).ok();
    }
    event.insert_prop("current_version", current_version).ok();
    event.insert_prop("update_available", update_available).ok();
    if let Some(v) = latest_version {
        event.insert_prop("latest_version", v).ok();
    }
    capture_async(event);
}

pub fn track_update_check_failed(error_kind: &str) {
    let mut event = Event::new_anon("update_check_failed");
    event.insert_prop("error_kind", error_kind).ok();
    capture_async(event);
}
