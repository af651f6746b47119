mod init;
mod snapshot;
mod step;

use contracts::{AgentScript, MemoryEvent, Room, SimConfig};

use crate::agent::FactoryAgent;

pub use step::TickOutcome;

/// The one mutable world model: a fixed agent population advanced in place
/// by `step`, with rooms and scripts immutable after construction.
///
/// Exclusively owned by its driver — all agent mutation goes through `step`,
/// and every other method is a read.
#[derive(Debug)]
pub struct FactoryWorld {
    config: SimConfig,
    rooms: Vec<Room>,
    scripts: Vec<AgentScript>,
    agents: Vec<FactoryAgent>,
    tick_count: u64,
}

impl FactoryWorld {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn agents(&self) -> &[FactoryAgent] {
        &self.agents
    }

    pub fn agent(&self, agent_id: &str) -> Option<&FactoryAgent> {
        self.agents.iter().find(|agent| agent.id == agent_id)
    }
}

#[cfg(test)]
mod tests;
