//! Verdict Classifier
//!
//! Maps numeric scores to qualitative bands and a ten-step ramp. The
//! analyst's own ruling is a separate datum and is never derived from the
//! score.

use serde::{Deserialize, Serialize};

use crate::scoring::AggregateScore;

/// Number of steps in the visual ramp.
pub const RAMP_STEPS: usize = 10;

/// Qualitative strength band, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl Band {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Band::VeryStrong
        } else if score >= 7.0 {
            Band::Strong
        } else if score >= 5.0 {
            Band::Moderate
        } else if score >= 3.0 {
            Band::Weak
        } else {
            Band::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::VeryStrong => "very strong",
            Band::Strong => "strong",
            Band::Moderate => "moderate",
            Band::Weak => "weak",
            Band::VeryWeak => "very weak",
        }
    }

    /// Short Arabic label, used for individual paths.
    pub fn arabic_label(&self) -> &'static str {
        match self {
            Band::VeryStrong => "قوي جدًا",
            Band::Strong => "قوي",
            Band::Moderate => "متوسط",
            Band::Weak => "ضعيف",
            Band::VeryWeak => "ضعيف جدًا",
        }
    }

    /// Description of a whole unit falling in this band.
    pub fn description(&self) -> &'static str {
        match self {
            Band::VeryStrong => "حديث ثابت قوي جدًا",
            Band::Strong => "حديث صحيح قوي",
            Band::Moderate => "حديث حسن أو متوسط القوة",
            Band::Weak => "حديث ضعيف",
            Band::VeryWeak => "حديث ضعيف جدًا",
        }
    }
}

pub fn band(score: f64) -> Band {
    Band::from_score(score)
}

/// Ten on/off flags: position `clamp(round(score) - 1, 0, 9)` and every
/// lower position are on.
pub fn render_band(score: f64) -> [bool; RAMP_STEPS] {
    let top = (score.round() as i64 - 1).clamp(0, RAMP_STEPS as i64 - 1) as usize;
    let mut ramp = [false; RAMP_STEPS];
    ramp[..=top].fill(true);
    ramp
}

/// Analyst's categorical ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruling {
    DefinitivelyAuthentic,
    Authentic,
    Good,
    Disputed,
    Weak,
}

impl Ruling {
    pub const ALL: [Ruling; 5] = [
        Ruling::DefinitivelyAuthentic,
        Ruling::Authentic,
        Ruling::Good,
        Ruling::Disputed,
        Ruling::Weak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Ruling::DefinitivelyAuthentic => "definitively_authentic",
            Ruling::Authentic => "authentic",
            Ruling::Good => "good",
            Ruling::Disputed => "disputed",
            Ruling::Weak => "weak",
        }
    }

    pub fn arabic_label(&self) -> &'static str {
        match self {
            Ruling::DefinitivelyAuthentic => "صحيح قطعي",
            Ruling::Authentic => "صحيح",
            Ruling::Good => "حسن",
            Ruling::Disputed => "مختلف فيه",
            Ruling::Weak => "ضعيف",
        }
    }

    /// Parse either the snake_case name or the Arabic label.
    pub fn parse(input: &str) -> Option<Ruling> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|ruling| ruling.name() == input || ruling.arabic_label() == input)
    }
}

/// Ruling plus free-text justification, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystVerdict {
    pub ruling: Ruling,
    #[serde(default)]
    pub notes: String,
}

impl AnalystVerdict {
    pub fn new(ruling: Ruling, notes: impl Into<String>) -> Self {
        Self {
            ruling,
            notes: notes.into(),
        }
    }
}

/// What may be shown for a unit score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UnitAssessment {
    /// No scored paths: no number, band or ramp may be shown.
    InsufficientData,
    Scored {
        score: AggregateScore,
        band: Band,
        ramp: [bool; RAMP_STEPS],
    },
}

pub fn classify(score: Option<&AggregateScore>) -> UnitAssessment {
    match score {
        None => UnitAssessment::InsufficientData,
        Some(score) => UnitAssessment::Scored {
            score: *score,
            band: band(score.value),
            ramp: render_band(score.value),
        },
    }
}
