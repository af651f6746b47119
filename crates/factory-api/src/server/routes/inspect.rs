async fn get_state(State(state): State<AppState>) -> Json<WorldSnapshot> {
    Json(state.runtime.snapshot_now().await)
}

async fn get_agent(
    Path(agent_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AgentState>, HttpApiError> {
    let snapshot = state.runtime.snapshot_now().await;

    snapshot
        .agents
        .into_iter()
        .find(|agent| agent.agent_id == agent_id)
        .map(Json)
        .ok_or_else(|| HttpApiError::agent_not_found(&agent_id))
}
