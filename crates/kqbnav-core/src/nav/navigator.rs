//! Navigator - drives the menus from whatever is showing to a target screen
//!
//! One iteration is one classification plus at most one maneuver. Waiting,
//! backing out and failed advances sleep a poll interval and charge the whole
//! iteration (classification included) to the budget; a confirmed advance
//! moves on immediately so multi-hop navigation fits in one budget.

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::budget::NavigationBudget;
use super::plan::{plan, Step};
use crate::config::NavigationConfig;
use crate::error::{NavError, Result};
use crate::input::{InputDriver, Key, KeySink};
use crate::screen::{ScreenClassifier, TemplateId, TemplateMatcher};
use crate::types::LogicalScreen;

/// Result of a navigation run. Running out of budget is an expected outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NavOutcome {
    Reached {
        maneuvers: u32,
    },
    TimedOut {
        last_seen: LogicalScreen,
        maneuvers: u32,
    },
}

impl NavOutcome {
    pub fn is_reached(&self) -> bool {
        matches!(self, NavOutcome::Reached { .. })
    }

    pub fn maneuvers(&self) -> u32 {
        match self {
            NavOutcome::Reached { maneuvers } | NavOutcome::TimedOut { maneuvers, .. } => *maneuvers,
        }
    }
}

/// Screen-state navigator
pub struct Navigator<M: TemplateMatcher, K: KeySink> {
    classifier: ScreenClassifier<M>,
    input: InputDriver<K>,
    config: NavigationConfig,
}

impl<M: TemplateMatcher, K: KeySink> Navigator<M, K> {
    pub fn new(classifier: ScreenClassifier<M>, input: InputDriver<K>, config: NavigationConfig) -> Self {
        Self {
            classifier,
            input,
            config,
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ScreenClassifier<M> {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut ScreenClassifier<M> {
        &mut self.classifier
    }

    pub fn input(&self) -> &InputDriver<K> {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputDriver<K> {
        &mut self.input
    }

    /// Fresh budget from the configured total and poll interval
    pub fn budget(&self) -> NavigationBudget {
        NavigationBudget::new(self.config.budget(), self.config.poll_interval())
    }

    pub async fn classify(&mut self) -> Result<LogicalScreen> {
        self.classifier.classify().await
    }

    /// Navigate to `target` with the configured budget
    pub async fn run(&mut self, target: LogicalScreen) -> Result<NavOutcome> {
        let mut budget = self.budget();
        self.run_with_budget(target, &mut budget).await
    }

    /// Navigate to `target`, drawing on a caller-owned budget
    pub async fn run_with_budget(
        &mut self,
        target: LogicalScreen,
        budget: &mut NavigationBudget,
    ) -> Result<NavOutcome> {
        self.drive(None, target, budget).await
    }

    /// Like `run_with_budget`, but the first iteration trusts `current`
    /// instead of classifying again
    pub async fn run_from(
        &mut self,
        current: LogicalScreen,
        target: LogicalScreen,
        budget: &mut NavigationBudget,
    ) -> Result<NavOutcome> {
        self.drive(Some(current), target, budget).await
    }

    async fn drive(
        &mut self,
        mut seen: Option<LogicalScreen>,
        target: LogicalScreen,
        budget: &mut NavigationBudget,
    ) -> Result<NavOutcome> {
        if target == LogicalScreen::Unknown {
            return Err(NavError::InvalidTarget(target));
        }

        let mut maneuvers = 0u32;
        // Confirms since the budget was last charged
        let mut unpaid = 0u32;

        loop {
            let started = Instant::now();
            let current = match seen.take() {
                Some(screen) => screen,
                None => self.classifier.classify().await?,
            };
            let step = plan(current, target)?;

            match step {
                Step::Arrived => {
                    info!(screen = %target, maneuvers, remaining = ?budget.remaining(), "Target reached");
                    return Ok(NavOutcome::Reached { maneuvers });
                }
                _ if budget.is_exhausted() || unpaid >= self.config.max_maneuvers => {
                    return Ok(timed_out(target, current, maneuvers, budget));
                }
                _ => debug!(current = %current, target = %target, step = ?step, "Navigating"),
            }

            let paid = match step {
                Step::Arrived => false,
                Step::Wait => true,
                Step::BackOut => {
                    maneuvers += 1;
                    self.back_out().await?;
                    true
                }
                Step::Advance(focus) => {
                    maneuvers += 1;
                    if self.advance(focus).await? {
                        unpaid += 1;
                        false
                    } else {
                        self.fallback().await?;
                        true
                    }
                }
            };

            if paid {
                budget.backoff_since(started).await;
                unpaid = 0;
                if budget.is_exhausted() {
                    return Ok(timed_out(target, current, maneuvers, budget));
                }
            }
        }
    }

    /// Land focus on the next item and confirm it if `focus` shows up
    async fn advance(&mut self, focus: TemplateId) -> Result<bool> {
        let interval = self.config.burst_interval();
        self.input
            .reset_cursor(self.config.cursor_reset_presses, interval)
            .await?;
        self.input.press(Key::Up).await?;

        let found = self
            .classifier
            .locate(focus, self.config.focus_confidence)?
            .is_found();
        if found {
            self.input.press(self.config.confirm_key).await?;
        } else {
            debug!(template = ?focus, "Focus template not visible");
        }
        Ok(found)
    }

    /// Open and close the side panel, then clear whatever it left behind
    async fn fallback(&mut self) -> Result<()> {
        self.input.press(Key::Tab).await?;
        self.input.press(Key::Tab).await?;
        self.back_out().await
    }

    async fn back_out(&mut self) -> Result<()> {
        self.input
            .escape_burst(self.config.burst_presses, self.config.burst_interval())
            .await
    }
}

fn timed_out(
    target: LogicalScreen,
    last_seen: LogicalScreen,
    maneuvers: u32,
    budget: &NavigationBudget,
) -> NavOutcome {
    warn!(
        target = %target,
        last_seen = %last_seen,
        maneuvers,
        exhausted = budget.is_exhausted(),
        "Navigation timed out"
    );
    NavOutcome::TimedOut { last_seen, maneuvers }
}
