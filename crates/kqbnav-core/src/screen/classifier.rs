//! Screen classifier
//!
//! Maps the live screen to a [`LogicalScreen`] by scanning the template
//! registry at decreasing confidence.
//!
//! ## Detection Strategy
//!
//! - One scan walks the registry in order and stops at the first hit, so
//!   registry order decides between templates that overlap visually.
//! - A scan with no hit lowers the confidence by one step and, while the
//!   result is still above the floor, sleeps and scans again. Crisp frames
//!   match early at high confidence; animation or transition frames only
//!   match once the threshold has relaxed.
//! - Once the floor is reached the screen is `Unknown`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, trace};

use super::{MatchResult, TemplateId, TemplateMatcher, TemplateRegistry};
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::types::{LogicalScreen, ScreenPosition};

/// Slack for float error when counting confidence steps
const STEP_EPSILON: f64 = 1e-6;

/// One registry scan at a fixed confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationAttempt {
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

/// Full classification outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub screen: LogicalScreen,
    /// Template that matched, if any
    pub template: Option<TemplateId>,
    pub position: Option<ScreenPosition>,
    /// The scan that decided the result (the last one for `Unknown`)
    pub attempt: Option<ClassificationAttempt>,
    pub scans: usize,
}

/// Confidence levels tried by one `classify` call, highest first.
///
/// Level `i` is `start - i * step`; levels stop once they would reach `min`.
/// The first level is always tried. Levels are produced on demand.
pub fn confidence_levels(config: &ClassifierConfig) -> impl Iterator<Item = f32> {
    let start = config.start_confidence as f64;
    let min = config.min_confidence as f64;
    let step = config.confidence_step as f64;

    let scans = if step > 0.0 && start > min {
        // float -> int casts saturate
        ((start - min) / step - STEP_EPSILON).ceil().max(1.0) as u64
    } else {
        1
    };

    (0..scans).map(move |i| (start - i as f64 * step) as f32)
}

/// Screen classifier over a template matcher
pub struct ScreenClassifier<M: TemplateMatcher> {
    matcher: M,
    registry: Arc<TemplateRegistry>,
    config: ClassifierConfig,
}

impl<M: TemplateMatcher> ScreenClassifier<M> {
    pub fn new(matcher: M, registry: Arc<TemplateRegistry>, config: ClassifierConfig) -> Self {
        Self {
            matcher,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    pub fn matcher_mut(&mut self) -> &mut M {
        &mut self.matcher
    }

    /// Look up a single template, outside of classification
    pub fn locate(&mut self, template: TemplateId, confidence: f32) -> Result<MatchResult> {
        self.matcher.locate(template, confidence)
    }

    /// Classify the current screen
    pub async fn classify(&mut self) -> Result<LogicalScreen> {
        Ok(self.classify_detailed().await?.screen)
    }

    /// Classify the current screen, reporting which template decided it
    pub async fn classify_detailed(&mut self) -> Result<Classification> {
        let poll_interval = self.config.poll_interval();
        let mut last_attempt = None;
        let mut scans = 0;

        for (i, confidence) in confidence_levels(&self.config).enumerate() {
            scans = i + 1;
            if i > 0 {
                sleep(poll_interval).await;
            }
            let attempt = ClassificationAttempt {
                confidence,
                timestamp: Utc::now(),
            };
            last_attempt = Some(attempt);

            if let Some((template, screen, position)) = self.scan(confidence)? {
                debug!(
                    screen = %screen,
                    template = ?template,
                    confidence,
                    scans,
                    "Screen classified"
                );
                return Ok(Classification {
                    screen,
                    template: Some(template),
                    position: Some(position),
                    attempt: Some(attempt),
                    scans,
                });
            }
            trace!(confidence, "No template matched");
        }

        debug!(scans, "Screen unknown");
        Ok(Classification {
            screen: LogicalScreen::Unknown,
            template: None,
            position: None,
            attempt: last_attempt,
            scans,
        })
    }

    /// One pass over the registry; first hit wins
    fn scan(&mut self, confidence: f32) -> Result<Option<(TemplateId, LogicalScreen, ScreenPosition)>> {
        for &(template, screen) in self.registry.entries() {
            if let MatchResult::Found(position) = self.matcher.locate(template, confidence)? {
                return Ok(Some((template, screen, position)));
            }
        }
        Ok(None)
    }
}
