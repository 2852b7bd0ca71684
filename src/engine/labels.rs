use serde::Serialize;

use crate::models::{Outcomes, Prediction};

/// A two-outcome result label combining two of home win / draw / away win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DoubleChance {
    /// 1X
    HomeOrDraw,
    /// X2
    DrawOrAway,
    /// 12
    HomeOrAway,
}

impl DoubleChance {
    /// Map the model's single result pick to its double-chance label.
    ///
    /// Pick precedence is home, then draw, then away; no pick means no label.
    pub fn from_outcomes(outcomes: &Outcomes) -> Option<Self> {
        if outcomes.home_win_boolean {
            Some(DoubleChance::HomeOrDraw)
        } else if outcomes.draw_boolean {
            Some(DoubleChance::DrawOrAway)
        } else if outcomes.away_win_boolean {
            Some(DoubleChance::HomeOrAway)
        } else {
            None
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DoubleChance::HomeOrDraw => "1X",
            DoubleChance::DrawOrAway => "X2",
            DoubleChance::HomeOrAway => "12",
        }
    }

    /// Sum of the two covered result percentages, unknowns counted as 0
    pub fn percentage(&self, outcomes: &Outcomes) -> f64 {
        let home = outcomes.home_win.unwrap_or(0.0);
        let draw = outcomes.draw.unwrap_or(0.0);
        let away = outcomes.away_win.unwrap_or(0.0);

        match self {
            DoubleChance::HomeOrDraw => home + draw,
            DoubleChance::DrawOrAway => draw + away,
            DoubleChance::HomeOrAway => home + away,
        }
    }
}

/// What a label predicts; drives result evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LabelKind {
    DoubleChance(DoubleChance),
    Over25,
    Under25,
    Btts,
    /// Strictly more corners than the operator threshold
    OverCorners(f64),
}

/// One human-readable prediction chip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionLabel {
    pub kind: LabelKind,
    pub text: String,
    /// `None` for operator thresholds that carry no modelled probability
    pub percentage: Option<f64>,
}

impl PredictionLabel {
    fn new(kind: LabelKind, text: impl Into<String>, percentage: Option<f64>) -> Self {
        Self {
            kind,
            text: text.into(),
            percentage,
        }
    }

    /// Percentage with two decimals, e.g. "75.00"
    pub fn percentage_text(&self) -> Option<String> {
        self.percentage.map(|p| format!("{:.2}", p))
    }
}

/// Full label set for a prediction, in display order.
///
/// Each category is gated only by its show flag; an unknown percentage
/// renders as 0 instead of hiding the label.
pub fn derive_labels(prediction: &Prediction) -> Vec<PredictionLabel> {
    let outcomes = &prediction.outcomes;
    let flags = &prediction.show_flags;
    let mut labels = Vec::with_capacity(4);

    if flags.home_win_show {
        if let Some(pick) = DoubleChance::from_outcomes(outcomes) {
            labels.push(PredictionLabel::new(
                LabelKind::DoubleChance(pick),
                pick.code(),
                Some(pick.percentage(outcomes)),
            ));
        }
    }

    if flags.over25_show {
        let over = outcomes.over25.unwrap_or(0.0);
        if outcomes.over25_boolean {
            labels.push(PredictionLabel::new(LabelKind::Over25, "Over 2.5 goals", Some(over)));
        } else {
            labels.push(PredictionLabel::new(
                LabelKind::Under25,
                "Under 2.5 goals",
                Some(100.0 - over),
            ));
        }
    }

    if flags.btts_show {
        labels.push(PredictionLabel::new(
            LabelKind::Btts,
            "BTTS",
            Some(outcomes.btts.unwrap_or(0.0)),
        ));
    }

    if flags.over_corners_show {
        let threshold = prediction.manual_corners.over_corners.unwrap_or(0.0);
        labels.push(PredictionLabel::new(
            LabelKind::OverCorners(threshold),
            format!("Over {} Corners", threshold),
            None,
        ));
    }

    labels
}

/// Condensed chips for list views: result, goals, then BTTS.
///
/// Deliberately a different rule set from `derive_labels`: the result and
/// goals chips ignore the show flags; only BTTS is gated.
pub fn pick_summary(prediction: &Prediction) -> Vec<&'static str> {
    let outcomes = &prediction.outcomes;
    let mut chips = Vec::with_capacity(3);

    if let Some(pick) = DoubleChance::from_outcomes(outcomes) {
        chips.push(pick.code());
    }

    chips.push(if outcomes.over25_boolean {
        "Over 2.5"
    } else {
        "Under 2.5"
    });

    if prediction.show_flags.btts_show {
        chips.push("BTTS");
    }

    chips
}
