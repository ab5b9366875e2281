/// Where the learner is in the review flow for the displayed card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReviewState {
    /// A new card was just shown and has not been answered.
    #[default]
    Fresh,
    /// A choice or "mastered" was recorded for the card.
    Answered,
    /// The card was reached via "previous"; its answer is hidden.
    BackViewed,
    /// Fresh card right after a progress reset. The trainer holds no
    /// previous word yet, so "previous" stays off until the next answer.
    Restarted,
}

impl ReviewState {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewState::Fresh => "fresh",
            ReviewState::Answered => "answered",
            ReviewState::BackViewed => "back-viewed",
            ReviewState::Restarted => "fresh",
        }
    }

    /// Whether the card's definition is visible in this state.
    pub fn reveals_definition(self) -> bool {
        self == ReviewState::Answered
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
    Full,
    Dimmed,
}

impl Weight {
    fn of(enabled: bool) -> Self {
        if enabled { Weight::Full } else { Weight::Dimmed }
    }
}

/// Enablement of the four control groups. The "mastered" control always
/// follows the choice group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonState {
    pub choices_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl ButtonState {
    pub fn mastered_enabled(&self) -> bool {
        self.choices_enabled
    }

    pub fn choices_weight(&self) -> Weight {
        Weight::of(self.choices_enabled)
    }

    pub fn mastered_weight(&self) -> Weight {
        Weight::of(self.mastered_enabled())
    }

    pub fn prev_weight(&self) -> Weight {
        Weight::of(self.prev_enabled)
    }

    pub fn next_weight(&self) -> Weight {
        Weight::of(self.next_enabled)
    }
}

pub fn compute_button_state(state: ReviewState) -> ButtonState {
    match state {
        ReviewState::Fresh => ButtonState {
            choices_enabled: true,
            prev_enabled: true,
            next_enabled: false,
        },
        ReviewState::Answered => ButtonState {
            choices_enabled: false,
            prev_enabled: false,
            next_enabled: true,
        },
        ReviewState::BackViewed | ReviewState::Restarted => ButtonState {
            choices_enabled: true,
            prev_enabled: false,
            next_enabled: false,
        },
    }
}
