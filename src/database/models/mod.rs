pub mod note;
pub mod preference;
pub mod profile;

pub use note::{JobNote, NoteCreate, NotePatch, NoteRow, NoteStatus};
pub use preference::{JobPreference, PreferenceRow, PreferenceUpsert};
pub use profile::{Profile, ProfileRow, ProfileUpsert};
