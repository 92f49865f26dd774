//! Per-theme lifecycle inside one redesign batch.

use hestia_core::models::DesignTheme;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeState {
    Queued,
    InFlight,
    Retrying,
    Succeeded,
    Failed,
}

impl ThemeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ThemeState::Succeeded | ThemeState::Failed)
    }

    /// `Queued -> InFlight -> {Succeeded | Retrying -> InFlight | Failed}`.
    /// A queued or re-queued theme may also fail directly when the batch is short-circuited.
    pub fn can_transition_to(self, next: ThemeState) -> bool {
        use ThemeState::*;
        matches!(
            (self, next),
            (Queued, InFlight)
                | (Queued, Failed)
                | (InFlight, Succeeded)
                | (InFlight, Retrying)
                | (InFlight, Failed)
                | (Retrying, InFlight)
                | (Retrying, Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeState::Queued => "queued",
            ThemeState::InFlight => "in_flight",
            ThemeState::Retrying => "retrying",
            ThemeState::Succeeded => "succeeded",
            ThemeState::Failed => "failed",
        }
    }
}

impl Display for ThemeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// State of every theme in a batch, in request order.
#[derive(Debug, Clone, Default)]
pub struct ThemeStates {
    states: Vec<(DesignTheme, ThemeState)>,
}

impl ThemeStates {
    pub fn queued(themes: &[DesignTheme]) -> Self {
        Self {
            states: themes.iter().map(|t| (*t, ThemeState::Queued)).collect(),
        }
    }

    pub fn get(&self, theme: DesignTheme) -> Option<ThemeState> {
        self.states
            .iter()
            .find(|(t, _)| *t == theme)
            .map(|(_, s)| *s)
    }

    /// Move `theme` to `next`. Illegal moves are logged and ignored.
    pub fn transition(&mut self, theme: DesignTheme, next: ThemeState) {
        let Some(entry) = self.states.iter_mut().find(|(t, _)| *t == theme) else {
            tracing::warn!(theme = %theme, "Transition for a theme outside the batch");
            return;
        };
        let current = entry.1;
        if !current.can_transition_to(next) {
            tracing::warn!(theme = %theme, from = %current, to = %next, "Illegal theme transition");
            return;
        }
        tracing::debug!(theme = %theme, from = %current, to = %next, "Theme transition");
        entry.1 = next;
    }

    pub fn all_terminal(&self) -> bool {
        self.states.iter().all(|(_, s)| s.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_cycle_is_legal() {
        let mut states = ThemeStates::queued(&[DesignTheme::Modern]);
        for next in [
            ThemeState::InFlight,
            ThemeState::Retrying,
            ThemeState::InFlight,
            ThemeState::Succeeded,
        ] {
            states.transition(DesignTheme::Modern, next);
            assert_eq!(states.get(DesignTheme::Modern), Some(next));
        }
        assert!(states.all_terminal());
    }

    #[test]
    fn test_illegal_transition_is_ignored() {
        let mut states = ThemeStates::queued(&[DesignTheme::Rustic, DesignTheme::Vintage]);
        states.transition(DesignTheme::Rustic, ThemeState::Succeeded);
        assert_eq!(states.get(DesignTheme::Rustic), Some(ThemeState::Queued));

        states.transition(DesignTheme::Vintage, ThemeState::Failed);
        states.transition(DesignTheme::Vintage, ThemeState::InFlight);
        assert_eq!(states.get(DesignTheme::Vintage), Some(ThemeState::Failed));
        assert!(!states.all_terminal());
    }
}
