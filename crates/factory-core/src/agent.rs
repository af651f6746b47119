//! Per-agent factory state: the mutable record owned by the world, its
//! bounded history rings, and the pure cycle arithmetic that derives phase
//! and progress from a single per-agent tick counter.

use contracts::{AgentScript, AgentStatus, GoalState, MovementRecord, Thought};

pub const THOUGHT_HISTORY_CAP: usize = 10;
pub const MOVEMENT_LOG_CAP: usize = 20;

// ---------------------------------------------------------------------------
// Cycle arithmetic
// ---------------------------------------------------------------------------

/// Sub-phase of one moving+working cycle, derived from the cycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// In transit between rooms; `position` counts ticks since departure.
    Moving { position: u64 },
    /// At the task's room; `position` counts ticks since arrival.
    Working { position: u64 },
}

/// Position within the current cycle, always in
/// `[0, move_duration + task_duration)`.
pub fn cycle_position(sub_tick: u64, move_duration: u64, task_duration: u64) -> u64 {
    sub_tick % (move_duration.max(1) + task_duration.max(1))
}

/// Split a sub-tick counter into its moving or working sub-phase.
pub fn cycle_phase(sub_tick: u64, move_duration: u64, task_duration: u64) -> CyclePhase {
    let move_duration = move_duration.max(1);
    let position = cycle_position(sub_tick, move_duration, task_duration);
    if position < move_duration {
        CyclePhase::Moving { position }
    } else {
        CyclePhase::Working {
            position: position - move_duration,
        }
    }
}

/// Integer percentage `round(position / duration * 100)`, half rounded up,
/// clamped to [0, 100].
pub fn progress_percent(position: u64, duration: u64) -> u8 {
    let duration = duration.max(1);
    let percent = (position * 200 + duration) / (2 * duration);
    percent.min(100) as u8
}

/// Linear interpolation of the active thought:
/// `floor(position / duration * count)`, clamped to the last valid index.
pub fn thought_index(work_position: u64, task_duration: u64, thought_count: usize) -> usize {
    if thought_count == 0 {
        return 0;
    }
    let raw = (work_position * thought_count as u64) / task_duration.max(1);
    (raw as usize).min(thought_count - 1)
}

// ---------------------------------------------------------------------------
// FactoryAgent
// ---------------------------------------------------------------------------

/// One agent's mutable record, created once per identity and mutated in
/// place every tick for the lifetime of the process.
///
/// `last_indexed_thought` and `task_complete_emitted` are kernel-internal
/// dedupe state and never appear on the wire: the first suppresses repeat
/// indexing of an unchanged thought, the second guarantees exactly one
/// `task_complete` emission per task execution (reset at every arrival).
#[derive(Debug, Clone)]
pub struct FactoryAgent {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub sub_tick: u64,
    pub task_index: usize,
    pub status: AgentStatus,
    pub current_room_id: String,
    pub previous_room_id: Option<String>,
    pub current_tool: Option<String>,
    pub progress: u8,
    pub goal: GoalState,
    pub current_thought: Thought,
    pub thought_history: Vec<Thought>,
    pub task_description: String,
    pub movement_log: Vec<MovementRecord>,
    pub last_indexed_thought: Option<String>,
    pub task_complete_emitted: bool,
}

impl FactoryAgent {
    /// Seed an agent from its script: first task's room, tool, goal, and
    /// thought, with the stagger already folded into `sub_tick`.
    pub fn from_script(script: &AgentScript, initial_sub_tick: u64, now_ms: i64) -> Self {
        let first_task = script.tasks.first();
        let first_thought = first_task
            .and_then(|task| task.thoughts.first())
            .cloned()
            .unwrap_or_default();

        Self {
            id: script.agent_id.clone(),
            name: script.name.clone(),
            role: script.role.clone(),
            avatar: script.avatar.clone(),
            sub_tick: initial_sub_tick,
            task_index: 0,
            status: AgentStatus::Idle,
            current_room_id: first_task
                .map(|task| task.room_id.clone())
                .unwrap_or_default(),
            previous_room_id: None,
            current_tool: first_task.map(|task| task.tool.clone()),
            progress: 0,
            goal: GoalState {
                long_term: script.long_term_goal.clone(),
                current: first_task
                    .map(|task| task.description.clone())
                    .unwrap_or_default(),
                sub_goal: first_task
                    .map(|task| task.sub_goal.clone())
                    .unwrap_or_default(),
            },
            current_thought: Thought {
                text: first_thought,
                timestamp: now_ms,
            },
            thought_history: Vec::new(),
            task_description: first_task
                .map(|task| task.description.clone())
                .unwrap_or_default(),
            movement_log: Vec::new(),
            last_indexed_thought: None,
            task_complete_emitted: false,
        }
    }

    /// Make `text` the displayed thought and append it to the bounded
    /// history ring, evicting the oldest entry beyond the cap.
    pub fn push_thought(&mut self, text: String, now_ms: i64) {
        let thought = Thought {
            text,
            timestamp: now_ms,
        };
        self.current_thought = thought.clone();
        self.thought_history.push(thought);
        if self.thought_history.len() > THOUGHT_HISTORY_CAP {
            self.thought_history.remove(0);
        }
    }

    /// Append an arrival to the bounded movement ring.
    pub fn record_movement(&mut self, room_id: String, now_ms: i64) {
        self.movement_log.push(MovementRecord {
            room_id,
            timestamp: now_ms,
        });
        if self.movement_log.len() > MOVEMENT_LOG_CAP {
            self.movement_log.remove(0);
        }
    }
}
