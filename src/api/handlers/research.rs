use crate::{
    types::{PlanResponse, ResearchBundle, ResearchRequest, Result},
    AppState,
};
use axum::{extract::State, Json};

/// Run the full research pipeline on a query
pub async fn research(
    State(state): State<AppState>,
    Json(payload): Json<ResearchRequest>,
) -> Result<Json<ResearchBundle>> {
    let bundle = state.coordinator.research(&payload.query).await?;

    state.session.write().record(&bundle);

    Ok(Json(bundle))
}

/// Generate a research plan without executing it
pub async fn plan(
    State(state): State<AppState>,
    Json(payload): Json<ResearchRequest>,
) -> Result<Json<PlanResponse>> {
    let (plan, origin) = state.coordinator.plan(&payload.query).await?.into_parts();

    Ok(Json(PlanResponse { plan, origin }))
}
