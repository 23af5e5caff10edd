// src/signal/mood.rs — Mood inference engine
//
// Pure function of the heartbeat snapshot. The rules form a priority
// list and the first match wins; reordering them changes the contract.

use serde::Serialize;

use crate::parse::heartbeat::{HeartbeatState, Mode};

/// A heartbeat older than this means the agent is asleep, whatever the
/// snapshot claims it was doing.
pub const DORMANT_AFTER_MINUTES: i64 = 45;

const CALM_IDLE_BEATS: u32 = 3;
const PRODUCTIVE_INSIGHTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Dormant,
    Focused,
    Curious,
    Creative,
    Introspective,
    Calm,
    Productive,
    Attentive,
}

impl Mood {
    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Dormant => "🌙",
            Mood::Focused => "🔨",
            Mood::Curious => "🔬",
            Mood::Creative => "✨",
            Mood::Introspective => "💭",
            Mood::Calm => "😌",
            Mood::Productive => "💡",
            Mood::Attentive => "👁️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStats {
    pub idle_beats: u32,
    pub recent_insights: usize,
    pub heartbeat_age_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodResult {
    pub mood: Mood,
    pub emoji: String,
    pub description: String,
    /// Echo of the snapshot's mode.
    pub mode: Mode,
    pub last_insight: Option<String>,
    pub stats: MoodStats,
}

/// Classify the agent's current activity from one heartbeat snapshot.
pub fn infer_mood(state: &HeartbeatState, now_secs: i64) -> MoodResult {
    let age = state.heartbeat_age_minutes(now_secs);
    let insights = state.recent_insights.len();
    let task = state
        .current_task
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let (mood, description) = if age > DORMANT_AFTER_MINUTES {
        (
            Mood::Dormant,
            format!("No heartbeat for {age} minutes. The agent is asleep."),
        )
    } else if state.current_mode == Mode::Build && task.is_some() {
        (
            Mood::Focused,
            format!("Heads-down building: {}", task.unwrap_or_default()),
        )
    } else if state.current_mode == Mode::Research {
        (
            Mood::Curious,
            match task {
                Some(t) => format!("Digging into: {t}"),
                None => "Following a research thread.".to_string(),
            },
        )
    } else if state.current_mode == Mode::Create {
        (Mood::Creative, "Making something new.".to_string())
    } else if state.current_mode == Mode::Reflect {
        (
            Mood::Introspective,
            "Looking back over recent work.".to_string(),
        )
    } else if state.consecutive_idle_beats > CALM_IDLE_BEATS {
        (
            Mood::Calm,
            format!(
                "Idling quietly after {} consecutive calm beats.",
                state.consecutive_idle_beats
            ),
        )
    } else if insights > PRODUCTIVE_INSIGHTS {
        (
            Mood::Productive,
            format!("On a roll: {insights} insights recorded recently."),
        )
    } else {
        (Mood::Attentive, "Watching and ready.".to_string())
    };

    MoodResult {
        mood,
        emoji: mood.emoji().to_string(),
        description,
        mode: state.current_mode.clone(),
        last_insight: state
            .recent_insights
            .last()
            .map(|i| i.insight.trim().to_string())
            .filter(|s| !s.is_empty()),
        stats: MoodStats {
            idle_beats: state.consecutive_idle_beats,
            recent_insights: insights,
            heartbeat_age_minutes: age,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::heartbeat::Insight;

    const NOW: i64 = 1_700_000_000;

    fn fresh(mode: Mode) -> HeartbeatState {
        HeartbeatState {
            current_mode: mode,
            last_heartbeat: NOW,
            ..Default::default()
        }
    }

    fn insights(n: usize) -> Vec<Insight> {
        (0..n)
            .map(|i| Insight {
                timestamp: None,
                insight: format!("insight {i}"),
            })
            .collect()
    }

    #[test]
    fn test_dormant_dominates_everything() {
        let state = HeartbeatState {
            current_mode: Mode::Build,
            current_task: Some("shipping".into()),
            last_heartbeat: NOW - 46 * 60,
            consecutive_idle_beats: 10,
            ..Default::default()
        };
        let result = infer_mood(&state, NOW);
        assert_eq!(result.mood, Mood::Dormant);
        assert_eq!(result.stats.heartbeat_age_minutes, 46);
    }

    #[test]
    fn test_focused_beats_idle_count() {
        let state = HeartbeatState {
            current_task: Some("refactor parser".into()),
            consecutive_idle_beats: 99,
            ..fresh(Mode::Build)
        };
        let result = infer_mood(&state, NOW);
        assert_eq!(result.mood, Mood::Focused);
        assert!(result.description.contains("refactor parser"));
    }

    #[test]
    fn test_build_without_task_is_not_focused() {
        let result = infer_mood(&fresh(Mode::Build), NOW);
        assert_eq!(result.mood, Mood::Attentive);

        // Whitespace-only task counts as no task
        let state = HeartbeatState {
            current_task: Some("   ".into()),
            ..fresh(Mode::Build)
        };
        assert_eq!(infer_mood(&state, NOW).mood, Mood::Attentive);
    }

    #[test]
    fn test_research_is_curious() {
        assert_eq!(infer_mood(&fresh(Mode::Research), NOW).mood, Mood::Curious);
    }

    #[test]
    fn test_reflect_is_introspective_regardless_of_idle_beats() {
        let state = HeartbeatState {
            consecutive_idle_beats: 8,
            ..fresh(Mode::Reflect)
        };
        let result = infer_mood(&state, NOW);
        assert_eq!(result.mood, Mood::Introspective);
        assert_eq!(result.description, "Looking back over recent work.");
    }

    #[test]
    fn test_calm_needs_more_than_three_idle_beats() {
        let mut state = fresh(Mode::Monitor);
        state.consecutive_idle_beats = 3;
        assert_eq!(infer_mood(&state, NOW).mood, Mood::Attentive);
        state.consecutive_idle_beats = 4;
        assert_eq!(infer_mood(&state, NOW).mood, Mood::Calm);
    }

    #[test]
    fn test_productive_needs_more_than_five_insights() {
        let mut state = fresh(Mode::Monitor);
        state.recent_insights = insights(5);
        assert_eq!(infer_mood(&state, NOW).mood, Mood::Attentive);
        state.recent_insights = insights(6);
        assert_eq!(infer_mood(&state, NOW).mood, Mood::Productive);
    }

    #[test]
    fn test_last_insight_trimmed() {
        let mut state = fresh(Mode::Monitor);
        state.recent_insights = vec![Insight {
            timestamp: None,
            insight: "  trailing spaces  ".into(),
        }];
        let result = infer_mood(&state, NOW);
        assert_eq!(result.last_insight.as_deref(), Some("trailing spaces"));
    }

    #[test]
    fn test_mode_echoed() {
        let result = infer_mood(&fresh(Mode::Other("dreaming".into())), NOW);
        assert_eq!(result.mode, Mode::Other("dreaming".into()));
        assert_eq!(result.mood, Mood::Attentive);
    }
}
