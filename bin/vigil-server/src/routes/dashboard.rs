//! Operator dashboard: source list plus the activity feed of one source.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Extension, Router};
use minijinja::context;

use crate::auth::session::SessionUser;
use crate::error::ServerError;
use crate::handlers::activity::{activity_feed, source_ids};
use crate::schemas::dashboard::{ActivityEntry, DashboardQuery};
use crate::state::AppState;

/// Routes behind the session middleware (installed by [`super::build`]).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard))
        .route("/dashboard", get(dashboard))
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(operator)): Extension<SessionUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, ServerError> {
    let employee_ids = source_ids(state.store.as_ref()).await?;
    let selected = query.employee_id.filter(|id| !id.is_empty());

    let activities: Vec<ActivityEntry> = match &selected {
        Some(id) => activity_feed(state.store.as_ref(), id)
            .await?
            .iter()
            .map(|record| record.to_entry())
            .collect(),
        None => Vec::new(),
    };

    let html = state.views.render(
        "dashboard.html",
        context! {
            operator,
            employee_ids,
            selected_employee_id => selected,
            activities,
        },
    )?;
    Ok(Html(html))
}
