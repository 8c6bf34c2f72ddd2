//! Screen recognition - reference templates to logical screens
//!
//! Architecture: xcap (capture) + normalized cross-correlation (matching) + ordered registry (classification)
//!
//! # Components
//! - `TemplateId`: the fixed set of reference screenshots
//! - `TemplateRegistry`: ordered template → screen bindings
//! - `ScreenMatcher`: locates one template in a captured frame
//! - `ScreenClassifier`: decides which logical screen is showing

mod classifier;
mod correlate;
mod matcher;
mod registry;
mod template;

pub use classifier::{confidence_levels, Classification, ClassificationAttempt, ScreenClassifier};
pub use correlate::{best_match, Correlation};
pub use matcher::{FrameSource, MatchResult, ScreenMatcher, TemplateMatcher, TemplateStore};
pub use registry::TemplateRegistry;
pub use template::TemplateId;
