pub mod preferences;

pub use preferences::{
    CaptionPreferences, EnumerationPreferences, OutputPreferences, Preferences, PreferencesError,
    PreferencesStore,
};
