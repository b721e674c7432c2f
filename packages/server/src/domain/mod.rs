//! Domain layer.
//!
//! Pure state and rules of the fan-out network: who is connected, which
//! screens they claim, who holds seed authority and what content goes where.
//! Nothing here performs I/O; outbound effects are described as [`Notice`]s and
//! handed to a [`MessagePusher`].

pub mod entity;
pub mod error;
pub mod hub;
pub mod notice;
pub mod pusher;
pub mod registry;
pub mod repository;
pub mod screen_directory;
pub mod seed_arbitrator;
pub mod value_object;

pub use entity::{Catalog, Demo, Selection};
pub use error::{HubError, ValueObjectError};
pub use hub::{Delivery, Hub, Retracted, RoleChange};
pub use notice::Notice;
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::{Connection, ConnectionRegistry, TopologyCounts};
pub use repository::{CatalogRepository, RepositoryError};
pub use screen_directory::{ScreenDirectory, ScreenEntry, ScreenMember};
pub use seed_arbitrator::{SeedArbitrator, SeedSlot};
pub use value_object::{ConnectionId, Role, ScreenNumber, Timestamp};
