use contracts::{AgentScript, AgentStatus, MemorySource, Room, SimConfig, TaskSpec};

use super::FactoryWorld;
use crate::agent::{MOVEMENT_LOG_CAP, THOUGHT_HISTORY_CAP};

fn test_room(room_id: &str) -> Room {
    Room {
        room_id: room_id.to_string(),
        name: format!("Room {room_id}"),
        icon: "🏭".to_string(),
        color: "#ffffff".to_string(),
        tools: vec!["bench".to_string()],
        grid_x: 0,
        grid_y: 0,
        capacity: 4,
    }
}

fn test_task(room_id: &str, label: &str, thoughts: &[&str]) -> TaskSpec {
    TaskSpec {
        room_id: room_id.to_string(),
        tool: "bench".to_string(),
        description: format!("do {label}"),
        sub_goal: format!("finish {label}"),
        thoughts: thoughts.iter().map(|thought| thought.to_string()).collect(),
    }
}

fn test_script(agent_id: &str, tasks: Vec<TaskSpec>) -> AgentScript {
    AgentScript {
        agent_id: agent_id.to_string(),
        name: agent_id.to_string(),
        role: "tester".to_string(),
        avatar: "🤖".to_string(),
        long_term_goal: "exercise the kernel".to_string(),
        tasks,
    }
}

fn fast_config(move_duration: u64, task_duration: u64) -> SimConfig {
    SimConfig {
        move_duration_ticks: move_duration,
        task_duration_ticks: task_duration,
        ..SimConfig::default()
    }
}

fn two_task_world(move_duration: u64, task_duration: u64, agent_count: usize) -> FactoryWorld {
    let rooms = vec![test_room("r1"), test_room("r2")];
    let scripts = (0..agent_count)
        .map(|index| {
            test_script(
                &format!("agent_{index}"),
                vec![
                    test_task("r1", "alpha", &["a0", "a1", "a2", "a3"]),
                    test_task("r2", "beta", &["b0", "b1", "b2", "b3"]),
                ],
            )
        })
        .collect();
    FactoryWorld::new(fast_config(move_duration, task_duration), rooms, scripts, 0)
}

#[test]
fn stagger_scenario_matches_exact_derivation() {
    // Two agents, two tasks each, taskDuration=4, moveDuration=1, stagger
    // stride 8 (so B starts at subTick 8 ≡ 3 mod 5).
    let mut world = two_task_world(1, 4, 2);
    for tick in 0..5 {
        world.step(tick);
    }

    let a = world.agent("agent_0").expect("agent_0 exists");
    // A's 5th tick is subTick 5 ≡ 0 mod 5: departure and arrival on the same
    // tick (move duration 1), leaving it freshly arrived on task 1.
    assert_eq!(a.sub_tick, 5);
    assert_eq!(a.task_index, 1);
    assert_eq!(a.status, AgentStatus::Thinking);
    assert_eq!(a.progress, 0);
    assert_eq!(a.previous_room_id, None);
    assert_eq!(a.movement_log.len(), 1);
    assert_eq!(a.current_room_id, "r2");

    let b = world.agent("agent_1").expect("agent_1 exists");
    // B arrived on its second tick (subTick 10 ≡ 0 mod 5) and has since
    // worked positions 0, 1, 2 of task 1; position 2 is the midpoint of a
    // 4-tick task, which forces the thinking flavor status.
    assert_eq!(b.sub_tick, 13);
    assert_eq!(b.task_index, 1);
    assert_eq!(b.progress, 50);
    assert_eq!(b.status, AgentStatus::Thinking);
    assert_eq!(b.movement_log.len(), 1);
}

#[test]
fn task_index_advances_exactly_once_per_cycle_at_default_durations() {
    let rooms = vec![test_room("r1"), test_room("r2")];
    let scripts = vec![test_script(
        "agent_0",
        vec![
            test_task("r1", "alpha", &["a0"]),
            test_task("r2", "beta", &["b0"]),
        ],
    )];
    let mut world = FactoryWorld::new(SimConfig::default(), rooms, scripts, 0);

    // Ticks 1..=4 are the moving sub-phase; tick 4 (cyclePosition 4) is the
    // arrival and the only index advance of the cycle.
    for tick in 0..3 {
        world.step(tick);
        assert_eq!(world.agent("agent_0").expect("exists").task_index, 0);
    }
    world.step(3);
    assert_eq!(world.agent("agent_0").expect("exists").task_index, 1);

    // No further advance until the next arrival, 45 ticks later.
    for tick in 4..48 {
        world.step(tick);
        assert_eq!(world.agent("agent_0").expect("exists").task_index, 1);
    }
    world.step(48);
    assert_eq!(world.agent("agent_0").expect("exists").task_index, 0);
}

#[test]
fn moving_sub_phase_clears_tool_and_tracks_previous_room() {
    let mut world = two_task_world(3, 4, 1);
    // subTick 7 ≡ 0 mod 7 is the next departure.
    for tick in 0..8 {
        world.step(tick);
    }

    let agent = world.agent("agent_0").expect("exists");
    assert_eq!(agent.status, AgentStatus::Moving);
    assert_eq!(agent.current_tool, None);
    assert!(agent.previous_room_id.is_some());
    assert!(agent
        .current_thought
        .text
        .starts_with("Heading to "));
}

#[test]
fn progress_bounded_and_non_decreasing_within_sub_phase() {
    let mut world = two_task_world(5, 40, 1);
    let mut last_progress = 0_u8;
    let mut last_phase_was_moving = false;

    for tick in 0..200 {
        world.step(tick);
        let agent = world.agent("agent_0").expect("exists");
        assert!(agent.progress <= 100);

        let moving = agent.status == AgentStatus::Moving;
        let arrival_or_phase_change = moving != last_phase_was_moving || agent.progress == 0;
        if !arrival_or_phase_change {
            assert!(
                agent.progress >= last_progress,
                "progress regressed {} -> {} at tick {}",
                last_progress,
                agent.progress,
                tick
            );
        }
        last_progress = agent.progress;
        last_phase_was_moving = moving;
    }
}

#[test]
fn task_complete_fires_exactly_once_per_execution() {
    let mut world = two_task_world(5, 40, 1);
    let mut completions = Vec::new();

    for tick in 0..90 {
        let outcome = world.step(tick);
        for event in outcome.events {
            if event.source == MemorySource::TaskComplete {
                completions.push(outcome.tick);
            }
        }
    }

    // Executions reach progress 95 at working position 38: subTick 43 for
    // the first cycle, subTick 88 for the second.
    assert_eq!(completions, vec![43, 88]);
}

#[test]
fn thought_events_deduplicate_across_task_boundaries() {
    // Second task begins with the same thought the first task ended on; the
    // per-agent last-indexed cache must suppress re-indexing it even though
    // the displayed thought changed via the arrival message in between.
    let rooms = vec![test_room("r1"), test_room("r2")];
    let scripts = vec![test_script(
        "agent_0",
        vec![
            test_task("r1", "alpha", &["draft", "review"]),
            test_task("r2", "beta", &["review", "publish"]),
        ],
    )];
    let mut world = FactoryWorld::new(fast_config(1, 4), rooms, scripts, 0);

    let mut indexed = Vec::new();
    for tick in 0..10 {
        let outcome = world.step(tick);
        for event in outcome.events {
            if event.source == MemorySource::Thought {
                indexed.push(event.content);
            }
        }
    }

    // Cycle 1 (task 0): slot 0 "draft" matches the seeded thought, slot 1
    // "review" is indexed. Cycle 2 (task 1): slot 0 "review" is displayed
    // again after the arrival message but must not be re-indexed; slot 1
    // "publish" is.
    assert_eq!(indexed, vec!["review".to_string(), "publish".to_string()]);
}

#[test]
fn ring_buffers_hold_their_caps_at_every_tick() {
    let mut world = two_task_world(1, 2, 3);
    for tick in 0..300 {
        world.step(tick);
        for agent in world.agents() {
            assert!(agent.thought_history.len() <= THOUGHT_HISTORY_CAP);
            assert!(agent.movement_log.len() <= MOVEMENT_LOG_CAP);
        }
    }
    // Long enough to have cycled many times; the rings must be full.
    let agent = world.agent("agent_0").expect("exists");
    assert_eq!(agent.thought_history.len(), THOUGHT_HISTORY_CAP);
    assert_eq!(agent.movement_log.len(), MOVEMENT_LOG_CAP);
}

#[test]
fn room_transition_event_summarizes_agent_and_goals() {
    let mut world = two_task_world(1, 4, 1);
    let mut transitions = Vec::new();
    for tick in 0..6 {
        let outcome = world.step(tick);
        transitions.extend(
            outcome
                .events
                .into_iter()
                .filter(|event| event.source == MemorySource::RoomTransition),
        );
    }

    assert_eq!(transitions.len(), 1);
    let event = &transitions[0];
    assert_eq!(event.agent_id, "agent_0");
    assert!(event.content.contains("agent_0"));
    assert!(event.content.contains("Room r2"));
    assert!(event.content.contains("do beta"));
    assert!(event.content.contains("finish beta"));
    assert!(event.content.contains("exercise the kernel"));
}

#[test]
fn snapshot_reflects_tick_and_echoes_memory_stats() {
    let mut world = two_task_world(1, 4, 2);
    for tick in 0..7 {
        world.step(tick);
    }

    let stats = serde_json::json!({"hot": 12, "warm": 3});
    let snapshot = world.snapshot(99, Some(stats.clone()));
    assert_eq!(snapshot.tick_count, 7);
    assert_eq!(snapshot.timestamp, 99);
    assert_eq!(snapshot.agents.len(), 2);
    assert_eq!(snapshot.rooms.len(), 2);
    assert_eq!(snapshot.memory, Some(stats));

    let agent = &snapshot.agents[0];
    let world_agent = world.agent("agent_0").expect("exists");
    assert_eq!(agent.sub_tick, world_agent.sub_tick);
    assert_eq!(agent.task_index, world_agent.task_index);
    assert_eq!(agent.progress, world_agent.progress);
}

#[test]
fn default_catalog_world_runs_and_emits() {
    let mut world = FactoryWorld::with_default_catalog(SimConfig::default(), 0);
    let mut saw_transition = false;
    for tick in 0..60 {
        let outcome = world.step(tick);
        saw_transition |= outcome
            .events
            .iter()
            .any(|event| event.source == MemorySource::RoomTransition);
    }
    assert!(saw_transition);
    assert_eq!(world.tick_count(), 60);
}
