async fn start_factory(State(state): State<AppState>) -> Json<FactoryStatus> {
    state.runtime.start().await;
    Json(state.runtime.status().await)
}

async fn stop_factory(State(state): State<AppState>) -> Json<FactoryStatus> {
    state.runtime.stop().await;
    Json(state.runtime.status().await)
}

async fn get_status(State(state): State<AppState>) -> Json<FactoryStatus> {
    Json(state.runtime.status().await)
}
