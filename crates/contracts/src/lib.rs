//! v1 cross-boundary contracts for the factory kernel, runtime, and API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// Engine tuning knobs. Defaults reproduce the reference cadence: a 1.5s
/// tick, 5-tick moves, 40-tick tasks, and a 2-minute compression pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimConfig {
    pub schema_version: String,
    pub move_duration_ticks: u64,
    pub task_duration_ticks: u64,
    pub tick_interval_ms: u64,
    pub compression_interval_ms: u64,
    pub stagger_stride_ticks: u64,
    pub hot_threshold_ms: u64,
    pub warm_threshold_ms: u64,
}

impl SimConfig {
    /// Full moving+working cycle length in ticks, clamped so degenerate
    /// configs never divide by zero.
    pub fn cycle_length_ticks(&self) -> u64 {
        self.move_duration_ticks.max(1) + self.task_duration_ticks.max(1)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            move_duration_ticks: 5,
            task_duration_ticks: 40,
            tick_interval_ms: 1_500,
            compression_interval_ms: 120_000,
            stagger_stride_ticks: 8,
            hot_threshold_ms: 300_000,
            warm_threshold_ms: 1_800_000,
        }
    }
}

/// A named location with a tool set and nominal capacity. Immutable after
/// load; capacity is advisory and never enforced by the kernel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub room_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub tools: Vec<String>,
    pub grid_x: i64,
    pub grid_y: i64,
    pub capacity: u32,
}

/// One scripted unit of work: a room, a tool, a goal, and the ordered
/// thoughts an agent walks through while working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub room_id: String,
    pub tool: String,
    pub description: String,
    pub sub_goal: String,
    pub thoughts: Vec<String>,
}

/// Per-identity script: display attributes, a long-term goal, and a cyclic
/// task list the simulation reads forward through, wrapping at the end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentScript {
    pub agent_id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub long_term_goal: String,
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Working,
    Moving,
    Idle,
    Thinking,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Working => "working",
            Self::Moving => "moving",
            Self::Idle => "idle",
            Self::Thinking => "thinking",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalState {
    pub long_term: String,
    pub current: String,
    pub sub_goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecord {
    pub room_id: String,
    pub timestamp: i64,
}

/// Wire view of one agent as pushed to observers every tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentState {
    pub agent_id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
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
    pub sub_tick: u64,
    pub task_index: usize,
}

/// The complete point-in-time world view sent to every observer. `memory`
/// echoes the last cached tier statistics verbatim and is omitted until the
/// first stats refresh completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub rooms: Vec<Room>,
    pub agents: Vec<AgentState>,
    pub tick_count: u64,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    Thought,
    TaskComplete,
    RoomTransition,
    DiaryEntry,
}

impl fmt::Display for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Thought => "thought",
            Self::TaskComplete => "task_complete",
            Self::RoomTransition => "room_transition",
            Self::DiaryEntry => "diary_entry",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryVisibility {
    Private,
    Shared,
}

/// A semantically meaningful state-machine transition bound for the external
/// tiered-memory service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEvent {
    pub agent_id: String,
    pub source: MemorySource,
    pub content: String,
    pub visibility: MemoryVisibility,
}

/// Body of the memory service's `index` call. `layer` carries the event
/// visibility, matching the service's private/public tier split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexRequest {
    pub agent_id: String,
    pub source: MemorySource,
    pub content: String,
    pub layer: MemoryVisibility,
}

impl From<MemoryEvent> for IndexRequest {
    fn from(event: MemoryEvent) -> Self {
        Self {
            agent_id: event.agent_id,
            source: event.source,
            content: event.content,
            layer: event.visibility,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompressionThresholds {
    pub hot_threshold_ms: u64,
    pub warm_threshold_ms: u64,
}

impl CompressionThresholds {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            hot_threshold_ms: config.hot_threshold_ms,
            warm_threshold_ms: config.warm_threshold_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub hot_to_warm: i64,
    pub warm_to_cold: i64,
    pub tokens_reclaimed: i64,
}

/// Control-plane status of the running engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStatus {
    pub schema_version: String,
    pub running: bool,
    pub tick_count: u64,
    pub agent_count: usize,
    pub observer_count: usize,
}

impl fmt::Display for FactoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "running={} tick={} agents={} observers={}",
            self.running, self.tick_count, self.agent_count, self.observer_count
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    AgentNotFound,
    InvalidQuery,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            code,
            message: message.into(),
            details,
        }
    }
}
