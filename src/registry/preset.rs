//! Default backend roster.
//!
//! Free-tier OpenRouter model identifiers, ordered by preference: fast
//! and reliable first, the large slow model last. The order only matters
//! until the performance tracker has observations; after that the score
//! ordering takes over.

use super::{Backend, SizeClass};

/// The default backend roster with per-backend tuning.
pub fn default_backends() -> Vec<Backend> {
    vec![
        Backend::new("qwen/qwen2.5-vl-32b-instruct:free", SizeClass::Medium),
        Backend::new("mistralai/mistral-small-3.1-24b-instruct:free", SizeClass::Medium)
            .temperature(0.3),
        Backend::new("deepseek/deepseek-chat-v3-0324:free", SizeClass::Medium).temperature(0.35),
        Backend::new("deepseek/deepseek-r1-distill-qwen-32b:free", SizeClass::Medium)
            .temperature(0.35),
        Backend::new(
            "cognitivecomputations/dolphin3.0-r1-mistral-24b:free",
            SizeClass::Medium,
        )
        .temperature(0.35),
        Backend::new("qwen/qwq-32b-preview:free", SizeClass::Medium),
        Backend::new("qwen/qwen2.5-vl-72b-instruct:free", SizeClass::Large),
    ]
}
