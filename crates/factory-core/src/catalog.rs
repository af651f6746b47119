//! Built-in room and script catalog. Hand-authored, loaded once at process
//! start, and never mutated; callers with their own content construct worlds
//! from their own tables instead.

use contracts::{AgentScript, Room, TaskSpec};

fn room(
    room_id: &str,
    name: &str,
    icon: &str,
    color: &str,
    tools: &[&str],
    grid_x: i64,
    grid_y: i64,
    capacity: u32,
) -> Room {
    Room {
        room_id: room_id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        tools: tools.iter().map(|tool| tool.to_string()).collect(),
        grid_x,
        grid_y,
        capacity,
    }
}

fn task(room_id: &str, tool: &str, description: &str, sub_goal: &str, thoughts: &[&str]) -> TaskSpec {
    TaskSpec {
        room_id: room_id.to_string(),
        tool: tool.to_string(),
        description: description.to_string(),
        sub_goal: sub_goal.to_string(),
        thoughts: thoughts.iter().map(|thought| thought.to_string()).collect(),
    }
}

pub fn default_rooms() -> Vec<Room> {
    vec![
        room(
            "room_research_lab",
            "Research Lab",
            "🔬",
            "#4f8ef7",
            &["literature-scanner", "hypothesis-board", "notebook"],
            0,
            0,
            3,
        ),
        room(
            "room_workshop",
            "Workshop",
            "🛠️",
            "#f7a64f",
            &["code-editor", "test-rig", "profiler"],
            1,
            0,
            4,
        ),
        room(
            "room_data_vault",
            "Data Vault",
            "🗄️",
            "#8e6cf7",
            &["query-console", "pipeline-runner"],
            0,
            1,
            2,
        ),
        room(
            "room_commons",
            "Commons",
            "☕",
            "#5fc98e",
            &["whiteboard", "coffee-machine"],
            1,
            1,
            6,
        ),
        room(
            "room_observatory",
            "Observatory",
            "📡",
            "#e05c7a",
            &["dashboard-wall", "alert-console"],
            2,
            0,
            2,
        ),
    ]
}

pub fn default_scripts() -> Vec<AgentScript> {
    vec![
        AgentScript {
            agent_id: "agent_ada".to_string(),
            name: "Ada".to_string(),
            role: "Research Agent".to_string(),
            avatar: "🧠".to_string(),
            long_term_goal: "Map the open problems worth automating".to_string(),
            tasks: vec![
                task(
                    "room_research_lab",
                    "literature-scanner",
                    "Survey new papers",
                    "distill three candidate ideas",
                    &[
                        "Pulling the overnight publication feed",
                        "Most of these are incremental, skimming faster",
                        "This retrieval result contradicts last week's survey",
                        "Flagging two papers for a deep read",
                        "Three candidates distilled, writing the digest",
                    ],
                ),
                task(
                    "room_data_vault",
                    "query-console",
                    "Validate idea against corpus",
                    "ground the digest in real usage data",
                    &[
                        "Writing the cohort query",
                        "Sample size looks thin, widening the window",
                        "Usage curve matches the paper's claim",
                        "Exporting the evidence table",
                    ],
                ),
                task(
                    "room_commons",
                    "whiteboard",
                    "Brief the team",
                    "turn the digest into an agreed next step",
                    &[
                        "Sketching the argument on the board",
                        "Grace raised a fair objection about cost",
                        "Converging on a scoped experiment",
                    ],
                ),
            ],
        },
        AgentScript {
            agent_id: "agent_turing".to_string(),
            name: "Turing".to_string(),
            role: "Engineering Agent".to_string(),
            avatar: "⚙️".to_string(),
            long_term_goal: "Keep the build fast and the pipeline honest".to_string(),
            tasks: vec![
                task(
                    "room_workshop",
                    "code-editor",
                    "Implement the scoped experiment",
                    "a branch that compiles and runs end to end",
                    &[
                        "Reading Ada's digest before touching code",
                        "The old harness almost fits, extending it",
                        "Borrow checker disagrees with my first draft",
                        "Green build locally, wiring the feature flag",
                        "Pushing the branch for review",
                    ],
                ),
                task(
                    "room_workshop",
                    "test-rig",
                    "Harden the test suite",
                    "flake rate below one percent",
                    &[
                        "Replaying the three flakiest tests in a loop",
                        "Found a timer race, pinning the clock",
                        "Suite is quiet across fifty runs",
                    ],
                ),
                task(
                    "room_observatory",
                    "alert-console",
                    "Review production alerts",
                    "every alert owned or deleted",
                    &[
                        "Triaging the overnight alert queue",
                        "Half of these thresholds predate the migration",
                        "Rewrote four alerts, deleted six",
                        "Queue is empty, documenting the new thresholds",
                    ],
                ),
            ],
        },
        AgentScript {
            agent_id: "agent_grace".to_string(),
            name: "Grace".to_string(),
            role: "Operations Agent".to_string(),
            avatar: "🛰️".to_string(),
            long_term_goal: "Make every run reproducible and observable".to_string(),
            tasks: vec![
                task(
                    "room_observatory",
                    "dashboard-wall",
                    "Audit the run dashboards",
                    "one dashboard per pipeline, no orphans",
                    &[
                        "Walking the dashboard wall panel by panel",
                        "Two panels chart a pipeline we retired",
                        "Linking each panel to its runbook",
                        "Wall is clean, snapshotting the layout",
                    ],
                ),
                task(
                    "room_data_vault",
                    "pipeline-runner",
                    "Rehearse the recovery drill",
                    "cold restore inside twenty minutes",
                    &[
                        "Kicking off the restore from yesterday's archive",
                        "Restore is ahead of the clock so far",
                        "Checksums match, noting the timing",
                    ],
                ),
                task(
                    "room_commons",
                    "coffee-machine",
                    "Write the weekly ops notes",
                    "a summary the whole floor actually reads",
                    &[
                        "Collecting the week's incidents and saves",
                        "Trimming jargon out of the draft",
                        "Notes published to the board",
                    ],
                ),
            ],
        },
        AgentScript {
            agent_id: "agent_hopper".to_string(),
            name: "Hopper".to_string(),
            role: "Quality Agent".to_string(),
            avatar: "🔍".to_string(),
            long_term_goal: "Catch regressions before observers do".to_string(),
            tasks: vec![
                task(
                    "room_workshop",
                    "profiler",
                    "Profile the hot path",
                    "tick cost flat as agent count grows",
                    &[
                        "Recording a baseline flame graph",
                        "Allocation spike inside the snapshot path",
                        "Reusing buffers shaved a third off",
                        "New baseline recorded and archived",
                    ],
                ),
                task(
                    "room_research_lab",
                    "notebook",
                    "Reproduce the reported edge case",
                    "a failing test that captures the bug",
                    &[
                        "Reading the report twice before reproducing",
                        "The stagger arithmetic is the suspect",
                        "Minimal failing case found at two agents",
                        "Test committed, handing to Turing",
                    ],
                ),
                task(
                    "room_commons",
                    "whiteboard",
                    "Run the defect review",
                    "every open defect has an owner",
                    &[
                        "Listing defects by age on the board",
                        "Oldest one is actually fixed, closing it",
                        "Owners assigned, review done",
                    ],
                ),
            ],
        },
    ]
}
