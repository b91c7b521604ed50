pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{AriaError, AudioError, ConfigError, RigError};
pub use events::{Event, EventBus};
pub use id::{new_correlation_id, SessionId};
pub use types::{CharacterId, ChatTurn, Emotion, Role, Viewport};

pub type Result<T> = std::result::Result<T, AriaError>;
