use ratatui::style::Color;

/// Visual severity of the time left on a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Urgency {
    #[strum(serialize = "calm")]
    Calm,
    #[strum(serialize = "warm")]
    Warm,
    #[strum(serialize = "caution")]
    Caution,
    #[strum(serialize = "mild-alert")]
    MildAlert,
    #[strum(serialize = "alert-1")]
    Alert1,
    #[strum(serialize = "alert-2")]
    Alert2,
    #[strum(serialize = "alert-3")]
    Alert3,
    #[strum(serialize = "alert-4")]
    Alert4,
    #[strum(serialize = "alert-5")]
    Alert5,
}

// Lower bounds (exclusive), checked from the top down.
const THRESHOLDS: [(i64, Urgency); 8] = [
    (45, Urgency::Calm),
    (30, Urgency::Warm),
    (10, Urgency::Caution),
    (5, Urgency::MildAlert),
    (4, Urgency::Alert1),
    (3, Urgency::Alert2),
    (2, Urgency::Alert3),
    (1, Urgency::Alert4),
];

impl Urgency {
    pub fn for_remaining(remaining: i64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(floor, _)| remaining > *floor)
            .map(|&(_, urgency)| urgency)
            .unwrap_or(Urgency::Alert5)
    }

    /// Background color for the countdown display
    pub fn color(self) -> Color {
        match self {
            Urgency::Calm => Color::Rgb(240, 253, 244),
            Urgency::Warm => Color::Rgb(254, 252, 232),
            Urgency::Caution => Color::Rgb(255, 247, 237),
            Urgency::MildAlert => Color::Rgb(254, 242, 242),
            Urgency::Alert1 => Color::Rgb(254, 226, 226),
            Urgency::Alert2 => Color::Rgb(254, 202, 202),
            Urgency::Alert3 => Color::Rgb(252, 165, 165),
            Urgency::Alert4 => Color::Rgb(248, 113, 113),
            Urgency::Alert5 => Color::Rgb(239, 68, 68),
        }
    }
}
