use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::models::{AppState, ScanPhase, StateFilter};
use crate::services::run_scan_into_state;
use crate::templates::{DashboardTemplate, InstanceRow, StateOption};

#[derive(Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    state: String,
}

/// The dashboard page. The table is a pure filter of the last completed
/// scan; changing the selector re-renders, it never refetches.
pub async fn dashboard_get(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Response {
    let filter = StateFilter::from_query(&params.state);
    let (rows, status_message, loading, failed) = {
        let scan = state.scan.lock().unwrap();
        let rows: Vec<InstanceRow> = filter
            .apply(&scan.instances)
            .into_iter()
            .map(InstanceRow::from_instance)
            .collect();
        (
            rows,
            scan.phase.status_message(),
            scan.loading(),
            scan.phase == ScanPhase::Failed,
        )
    };
    let has_rows = !rows.is_empty();
    let has_status = !status_message.is_empty();
    render_template(DashboardTemplate {
        rows,
        has_rows,
        status_message,
        has_status,
        loading,
        failed,
        filter_value: filter.as_query().to_string(),
        state_options: StateOption::all(),
    })
}

/// Trigger a scan. A no-op while one is already in flight; otherwise the
/// previous result is cleared and the scan task is spawned.
pub async fn fetch_post(State(state): State<AppState>) -> Redirect {
    {
        let mut scan = state.scan.lock().unwrap();
        if scan.loading() {
            return Redirect::to("/");
        }
        scan.begin();
    }
    tokio::spawn(run_scan_into_state(
        state.provider.clone(),
        state.scan.clone(),
    ));
    Redirect::to("/")
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
