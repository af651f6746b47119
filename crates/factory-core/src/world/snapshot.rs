use contracts::{AgentState, WorldSnapshot};
use serde_json::Value;

use super::*;

impl FactoryWorld {
    /// Assemble the wire view of the world. Read-only; `memory` is the
    /// caller's cached tier statistics, echoed verbatim.
    pub fn snapshot(&self, now_ms: i64, memory: Option<Value>) -> WorldSnapshot {
        WorldSnapshot {
            rooms: self.rooms.clone(),
            agents: self.agents.iter().map(agent_state).collect(),
            tick_count: self.tick_count,
            timestamp: now_ms,
            memory,
        }
    }
}

fn agent_state(agent: &FactoryAgent) -> AgentState {
    AgentState {
        agent_id: agent.id.clone(),
        name: agent.name.clone(),
        role: agent.role.clone(),
        avatar: agent.avatar.clone(),
        status: agent.status,
        current_room_id: agent.current_room_id.clone(),
        previous_room_id: agent.previous_room_id.clone(),
        current_tool: agent.current_tool.clone(),
        progress: agent.progress,
        goal: agent.goal.clone(),
        current_thought: agent.current_thought.clone(),
        thought_history: agent.thought_history.clone(),
        task_description: agent.task_description.clone(),
        movement_log: agent.movement_log.clone(),
        sub_tick: agent.sub_tick,
        task_index: agent.task_index,
    }
}
