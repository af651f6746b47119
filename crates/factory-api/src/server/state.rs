#[derive(Clone)]
struct AppState {
    runtime: Arc<FactoryRuntime>,
}
