//! DUPR rating-service REST client.
//!
//! Authenticates against the service, persists the session, and walks the
//! paginated club-members and match-history endpoints, decoding every hit
//! into a typed record.
//!
//! # Example
//!
//! ```rust,ignore
//! use dupr_client::{ClientConfig, Credentials, DuprClient, PaginationLimits};
//!
//! let mut client = DuprClient::new(ClientConfig::default())?;
//! client.login(&Credentials::new("me@example.com", "secret")).await?;
//!
//! let members = client.club_members("8310950964", &PaginationLimits::default()).await?;
//! for member in &members.items {
//!     println!("{} {}", member.full_name, member.ratings.display());
//! }
//! if members.is_partial() {
//!     eprintln!("fetch stopped early");
//! }
//! ```
//!
//! # Modules
//!
//! - [`session`] - Session file persistence
//! - [`client`] - HTTP client and login flow
//! - [`pagination`] - Page request/envelope types and the page loop
//! - [`mapper`] - Tolerant decoding of hits into records
//! - [`fetch`] - Club-members and match-history fetches
//! - [`testing`] - Mock page source for tests

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod mapper;
pub mod pagination;
pub mod session;
pub mod testing;
pub mod types;

pub use client::DuprClient;
pub use config::{ClientConfig, PaginationLimits};
pub use credentials::{Credentials, SecretString};
pub use error::{DuprError, Result};
pub use mapper::{decode, decode_all, Record};
pub use pagination::{
    Completion, FilterKey, PageEnvelope, PageRequest, PageSource, Paged, Paginator, SortOrder,
    SortSpec,
};
pub use session::{LoginResponse, Session, SessionStore};
pub use types::{ApiResponse, ClubRole, Match, Member, Player, PlayerProfile, Ratings, ScoreFormat, Team};
