pub mod context;
pub mod engine;
pub mod handle;
pub mod intent;
pub mod query;
pub mod ranker;
pub mod routing;

pub use context::{format_context, Coverage, CoverageLevel};
pub use engine::{EngineStats, RetrievalEngine};
pub use handle::EngineHandle;
pub use intent::{IntentDetector, CONCENTRATION};
pub use query::{is_greeting_or_vague, strip_wake_word};
pub use ranker::Ranker;
pub use routing::{classify_intent_rules, BusinessCategory};
