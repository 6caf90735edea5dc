//! Random walk suggestions for a device-identified user.
//!
//! [`Sanpo`] draws "where" and "what" suggestions from shared and personal
//! task groups, records the pairs a user was shown, and exports or imports
//! task groups as text snapshots that also fit in a QR code.
//!
//! ```no_run
//! use sanpo::{Config, LocalState, Sanpo, SuggestionKind};
//!
//! # async fn example() -> sanpo::Result<()> {
//! let config = Config::from_env()?;
//! let mut state = LocalState::load(&config.state_path)?;
//! let client = Sanpo::connect(&config, state.device_id.clone()).await?;
//!
//! let draw = client.draw_into(&mut state, SuggestionKind::Where).await;
//! if let Some(place) = &draw.suggestion {
//!     println!("Go to: {}", place.content);
//! }
//! state.save(&config.state_path)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod local_state;
pub mod selection;
pub mod service;
pub mod share;

pub use config::{Config, ConfigError};
pub use database::{HistoryEntry, Suggestion, SuggestionKind, TaskGroup};
pub use error::{ImportError, Result, SanpoError};
pub use local_state::LocalState;
pub use selection::{Pairing, Selection};
pub use service::{Draw, ImportReport, Sanpo};
pub use share::{ExportData, ExportGroup, ExportTask, ShareError};
