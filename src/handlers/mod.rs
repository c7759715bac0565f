// Public: health. Everything else runs behind `middleware::require_user`.
pub mod health;
pub mod notes;
pub mod preferences;
pub mod profile;
