//! Team record, per-phase sub-records, and the typed partial update applied by stores.

use serde::{Deserialize, Serialize};

/// Value of `current_phase` once all six phases are done.
pub const FINAL_PHASE: u8 = 7;

/// Registration themes. Serialized as their display names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    #[serde(rename = "AI in Healthcare")]
    Healthcare,
    #[serde(rename = "Generative AI & Creativity")]
    GenerativeCreativity,
    #[serde(rename = "Computer Science Fundamentals")]
    CsFundamentals,
    #[serde(rename = "AI in Education & Learning")]
    Education,
    #[serde(rename = "AI in Smart Cities")]
    SmartCities,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Healthcare,
        Theme::GenerativeCreativity,
        Theme::CsFundamentals,
        Theme::Education,
        Theme::SmartCities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Healthcare => "AI in Healthcare",
            Theme::GenerativeCreativity => "Generative AI & Creativity",
            Theme::CsFundamentals => "Computer Science Fundamentals",
            Theme::Education => "AI in Education & Learning",
            Theme::SmartCities => "AI in Smart Cities",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Theme::ALL.into_iter().find(|theme| theme.as_str() == s)
    }
}

/// The six hunt phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Prompt = 1,
    Quiz = 2,
    CodeReading = 3,
    Debugging = 4,
    Riddles = 5,
    Location = 6,
}

impl Phase {
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The `current_phase` value a team moves to after finishing this phase.
    pub fn next_number(self) -> u8 {
        self.number() + 1
    }
}

/// Phase 1: AI image prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptPhase {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_link: Option<String>,
}

/// Phases 2 to 5. `score` is the last score computed by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRecord {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

/// Phase 6: final location answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationPhase {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_answer: Option<String>,
}

/// A registered team and its progress through the hunt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    /// Trimmed, lower-cased. Unique across all teams.
    pub team_name: String,
    pub team_leader: String,
    pub team_members: Vec<String>,
    pub email: String,
    pub theme: Theme,
    pub phase1: PromptPhase,
    pub phase2: PhaseRecord,
    pub phase3: PhaseRecord,
    pub phase4: PhaseRecord,
    pub phase5: PhaseRecord,
    pub phase6: LocationPhase,
    pub current_phase: u8,
    pub created_at: String,
    pub updated_at: String,
}

impl Team {
    pub fn is_completed(&self, phase: Phase) -> bool {
        match phase {
            Phase::Prompt => self.phase1.completed,
            Phase::Quiz => self.phase2.completed,
            Phase::CodeReading => self.phase3.completed,
            Phase::Debugging => self.phase4.completed,
            Phase::Riddles => self.phase5.completed,
            Phase::Location => self.phase6.completed,
        }
    }

    pub fn finished_hunt(&self) -> bool {
        self.phase6.completed
    }

    /// Merge a partial update into this record.
    ///
    /// `current_phase` never decreases and a `completed` flag is never cleared.
    pub fn apply(&mut self, patch: &TeamPatch, updated_at: &str) {
        if let Some(phase) = patch.current_phase {
            self.current_phase = self.current_phase.max(phase);
        }

        let p1 = &patch.phase1;
        self.phase1.completed |= p1.completed.unwrap_or(false);
        if let Some(prompt) = &p1.ai_prompt {
            self.phase1.ai_prompt = Some(prompt.clone());
        }
        if let Some(link) = &p1.drive_link {
            self.phase1.drive_link = Some(link.clone());
        }

        self.phase2.merge(&patch.phase2);
        self.phase3.merge(&patch.phase3);
        self.phase4.merge(&patch.phase4);
        self.phase5.merge(&patch.phase5);

        let p6 = &patch.phase6;
        self.phase6.completed |= p6.completed.unwrap_or(false);
        if let Some(answer) = &p6.location_answer {
            self.phase6.location_answer = Some(answer.clone());
        }

        self.updated_at = updated_at.to_string();
    }
}

impl PhaseRecord {
    fn merge(&mut self, patch: &PhasePatch) {
        self.completed |= patch.completed.unwrap_or(false);
        if patch.score.is_some() {
            self.score = patch.score;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptPatch {
    pub completed: Option<bool>,
    pub ai_prompt: Option<String>,
    pub drive_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhasePatch {
    pub completed: Option<bool>,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPatch {
    pub completed: Option<bool>,
    pub location_answer: Option<String>,
}

/// Partial update of a team record. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPatch {
    pub current_phase: Option<u8>,
    pub phase1: PromptPatch,
    pub phase2: PhasePatch,
    pub phase3: PhasePatch,
    pub phase4: PhasePatch,
    pub phase5: PhasePatch,
    pub phase6: LocationPatch,
}

impl TeamPatch {
    /// Marks `phase` completed and moves the team on to the next phase.
    pub fn complete(phase: Phase) -> Self {
        let mut patch = TeamPatch {
            current_phase: Some(phase.next_number()),
            ..Default::default()
        };
        match phase {
            Phase::Prompt => patch.phase1.completed = Some(true),
            Phase::Quiz => patch.phase2.completed = Some(true),
            Phase::CodeReading => patch.phase3.completed = Some(true),
            Phase::Debugging => patch.phase4.completed = Some(true),
            Phase::Riddles => patch.phase5.completed = Some(true),
            Phase::Location => patch.phase6.completed = Some(true),
        }
        patch
    }

    pub fn with_score(mut self, phase: Phase, score: u32) -> Self {
        match phase {
            Phase::Quiz => self.phase2.score = Some(score),
            Phase::CodeReading => self.phase3.score = Some(score),
            Phase::Debugging => self.phase4.score = Some(score),
            Phase::Riddles => self.phase5.score = Some(score),
            Phase::Prompt | Phase::Location => {}
        }
        self
    }
}

/// Public projection of a finished team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub team_id: String,
    pub team_name: String,
    pub team_leader: String,
}

impl From<&Team> for LeaderboardEntry {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.team_id.clone(),
            team_name: team.team_name.clone(),
            team_leader: team.team_leader.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_round_trips_display_name() {
        for theme in Theme::ALL {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("AI in Space"), None);
        assert_eq!(
            serde_json::to_value(Theme::GenerativeCreativity).unwrap(),
            "Generative AI & Creativity"
        );
    }

    #[test]
    fn test_apply_keeps_sibling_fields() {
        let mut team = fixtures::team("TEAM_1", "owls");
        team.apply(
            &TeamPatch {
                phase1: PromptPatch {
                    ai_prompt: Some("a VU2050 skyline".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
            "t1",
        );
        team.apply(&TeamPatch::complete(Phase::Prompt), "t2");

        assert!(team.phase1.completed);
        assert_eq!(team.phase1.ai_prompt.as_deref(), Some("a VU2050 skyline"));
        assert_eq!(team.current_phase, 2);
        assert!(!team.phase2.completed);
        assert_eq!(team.updated_at, "t2");
    }

    #[test]
    fn test_apply_never_regresses() {
        let mut team = fixtures::team("TEAM_1", "owls");
        team.apply(&TeamPatch::complete(Phase::Quiz), "t1");
        team.apply(
            &TeamPatch {
                current_phase: Some(1),
                phase2: PhasePatch {
                    completed: Some(false),
                    score: Some(4),
                },
                ..Default::default()
            },
            "t2",
        );

        assert_eq!(team.current_phase, 3);
        assert!(team.phase2.completed);
        assert_eq!(team.phase2.score, Some(4));
    }

    #[test]
    fn test_serialized_layout_is_camel_case() {
        let mut team = fixtures::team("TEAM_1", "owls");
        team.phase6.location_answer = Some("under the plant".into());
        let json = serde_json::to_value(&team).unwrap();

        assert_eq!(json["teamId"], "TEAM_1");
        assert_eq!(json["currentPhase"], 1);
        assert_eq!(json["phase1"]["completed"], false);
        assert!(json["phase1"].get("aiPrompt").is_none());
        assert_eq!(json["phase6"]["locationAnswer"], "under the plant");
        assert_eq!(json["theme"], "AI in Healthcare");
    }
}
