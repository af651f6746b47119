use super::*;

impl FactoryWorld {
    /// Build a world from a catalog. Agents are seeded from their script's
    /// first task and phase-staggered by `i * stagger_stride_ticks` so the
    /// population does not transition in lockstep; the stagger is applied
    /// here and never again.
    pub fn new(config: SimConfig, rooms: Vec<Room>, scripts: Vec<AgentScript>, now_ms: i64) -> Self {
        let stride = config.stagger_stride_ticks;
        let agents = scripts
            .iter()
            .enumerate()
            .map(|(index, script)| FactoryAgent::from_script(script, index as u64 * stride, now_ms))
            .collect();

        Self {
            config,
            rooms,
            scripts,
            agents,
            tick_count: 0,
        }
    }

    /// World over the built-in catalog.
    pub fn with_default_catalog(config: SimConfig, now_ms: i64) -> Self {
        Self::new(
            config,
            crate::catalog::default_rooms(),
            crate::catalog::default_scripts(),
            now_ms,
        )
    }
}
