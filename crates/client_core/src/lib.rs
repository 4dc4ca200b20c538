pub mod config;
pub mod controller;
pub mod error;
pub mod service;
pub mod session;

pub use config::{load_settings, ClientSettings};
pub use controller::SessionController;
pub use error::RecommendationError;
pub use service::{HttpRecommendationService, RecommendationService};
pub use session::{reduce, Phase, ServiceOutcome, Session, SessionCommand, SessionEvent};
