pub mod models;
pub mod services;
pub mod store;

// Re-export the public surface for booking-form callers
pub use models::{
    parse_timezone, BusinessHours, ConflictCheckRequest, ConflictOutcome, DayHours,
    PreferenceProfile, SchedulingConfig, SchedulingError, SuggestionRequest, TimeSlot,
};
pub use services::{
    analyze_preferences, check_interval, generate_slots, score_and_rank, ConflictService,
    DebouncedConflictChecker, SuggestionService,
};
pub use store::{AppointmentStore, StoreError};
