pub mod conflict;
pub mod history;
pub mod scoring;
pub mod slots;
pub mod suggestions;

pub use conflict::{check_interval, ConflictService, DebouncedConflictChecker};
pub use history::analyze_preferences;
pub use scoring::score_and_rank;
pub use slots::generate_slots;
pub use suggestions::SuggestionService;
