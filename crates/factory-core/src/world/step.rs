use contracts::{AgentStatus, MemorySource, MemoryVisibility};

use super::*;
use crate::agent::{cycle_position, progress_percent, thought_index};

/// Everything one tick produced: the new tick counter and the memory events
/// to hand to the bridge. Agent state itself is mutated in place.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub tick: u64,
    pub events: Vec<MemoryEvent>,
}

fn room_display_name<'a>(rooms: &'a [Room], room_id: &'a str) -> &'a str {
    rooms
        .iter()
        .find(|room| room.room_id == room_id)
        .map(|room| room.name.as_str())
        .unwrap_or(room_id)
}

impl FactoryWorld {
    /// Advance the world by exactly one tick. Ticks are strictly sequential:
    /// every agent is fully updated before this returns, so a snapshot taken
    /// afterwards is consistent.
    pub fn step(&mut self, now_ms: i64) -> TickOutcome {
        self.tick_count += 1;
        let mut events = Vec::new();
        for index in 0..self.agents.len() {
            self.step_agent(index, now_ms, &mut events);
        }
        TickOutcome {
            tick: self.tick_count,
            events,
        }
    }

    fn step_agent(&mut self, index: usize, now_ms: i64, events: &mut Vec<MemoryEvent>) {
        let move_duration = self.config.move_duration_ticks.max(1);
        let task_duration = self.config.task_duration_ticks.max(1);

        let rooms = &self.rooms;
        let script = &self.scripts[index];
        let agent = &mut self.agents[index];
        if script.tasks.is_empty() {
            return;
        }

        agent.sub_tick += 1;
        let position = cycle_position(agent.sub_tick, move_duration, task_duration);

        if position < move_duration {
            // Moving sub-phase.
            if position == 0 {
                // Departure: peek the next task purely to name the
                // destination; the index itself advances only at arrival.
                let next_task = &script.tasks[(agent.task_index + 1) % script.tasks.len()];
                let destination = room_display_name(rooms, &next_task.room_id).to_string();

                agent.status = AgentStatus::Moving;
                agent.previous_room_id = Some(agent.current_room_id.clone());
                agent.current_tool = None;
                agent.progress = 0;
                agent.push_thought(format!("Heading to {destination}"), now_ms);
            }

            agent.progress = progress_percent(position, move_duration);

            if position == move_duration - 1 {
                // Arrival: the single task-index advance of the cycle.
                agent.task_index = (agent.task_index + 1) % script.tasks.len();
                let task = &script.tasks[agent.task_index];

                agent.current_room_id = task.room_id.clone();
                agent.previous_room_id = None;
                agent.current_tool = None;
                agent.status = AgentStatus::Thinking;
                agent.progress = 0;
                agent.goal.current = task.description.clone();
                agent.goal.sub_goal = task.sub_goal.clone();
                agent.task_description = task.description.clone();
                agent.task_complete_emitted = false;
                agent.push_thought(format!("Arrived, starting {}", task.sub_goal), now_ms);
                agent.record_movement(task.room_id.clone(), now_ms);

                events.push(MemoryEvent {
                    agent_id: agent.id.clone(),
                    source: MemorySource::RoomTransition,
                    content: format!(
                        "{} moved to {} to work on {} ({}). Long-term goal: {}",
                        agent.name,
                        room_display_name(rooms, &task.room_id),
                        task.description,
                        task.sub_goal,
                        agent.goal.long_term
                    ),
                    visibility: MemoryVisibility::Shared,
                });
            }
        } else {
            // Working sub-phase. Task fields are refreshed every tick; the
            // writes are idempotent after the first.
            let work_position = position - move_duration;
            let task = &script.tasks[agent.task_index];

            agent.status = AgentStatus::Working;
            agent.current_room_id = task.room_id.clone();
            agent.current_tool = Some(task.tool.clone());
            agent.goal.current = task.description.clone();
            agent.goal.sub_goal = task.sub_goal.clone();
            agent.task_description = task.description.clone();
            agent.progress = progress_percent(work_position, task_duration);

            let slot = thought_index(work_position, task_duration, task.thoughts.len());
            if let Some(text) = task.thoughts.get(slot) {
                if agent.current_thought.text != *text {
                    agent.push_thought(text.clone(), now_ms);
                    if agent.last_indexed_thought.as_deref() != Some(text.as_str()) {
                        agent.last_indexed_thought = Some(text.clone());
                        events.push(MemoryEvent {
                            agent_id: agent.id.clone(),
                            source: MemorySource::Thought,
                            content: text.clone(),
                            visibility: MemoryVisibility::Private,
                        });
                    }
                }
            }

            if agent.progress >= 95 && !agent.task_complete_emitted {
                agent.task_complete_emitted = true;
                events.push(MemoryEvent {
                    agent_id: agent.id.clone(),
                    source: MemorySource::TaskComplete,
                    content: format!(
                        "{} completed {} ({}) using {} in {}. Thoughts: {}",
                        agent.name,
                        task.description,
                        task.sub_goal,
                        task.tool,
                        room_display_name(rooms, &task.room_id),
                        task.thoughts.join(" | ")
                    ),
                    visibility: MemoryVisibility::Shared,
                });
            }

            // Midpoint pause for flavor; affects status only.
            if work_position == task_duration / 2 {
                agent.status = AgentStatus::Thinking;
            }
        }
    }
}
