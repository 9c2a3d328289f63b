mod catalog;
mod character;
mod ids;
mod progress;
mod session;
mod settings;
mod statistics;

pub use catalog::{Catalog, CatalogBuildError, CatalogFilter};
pub use character::{Character, CharacterGroup};
pub use ids::{CharacterId, ParseIdError, SessionId};
pub use progress::{MasteryState, ProgressRecord, ProgressRecordError};
pub use session::{
    ParseModeError, PracticeMode, PracticeResult, PracticeSession, SessionSummary,
};
pub use settings::{PracticeSettings, SettingsError};
pub use statistics::UserStatistics;
