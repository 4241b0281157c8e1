//! Playback orchestration for the watch page: provider registry, selection state, frame
//! lifecycle, episode auto-advance and list membership. No UI types live here.

pub mod advancer;
pub mod lifecycle;
pub mod list_gate;
pub mod providers;
pub mod selection;
pub mod session;

pub use advancer::InboundMessage;
pub use lifecycle::{MountGeneration, Phase};
pub use list_gate::{ListEntry, ListError, ListMembershipGate, ListNotice, ListStore};
pub use providers::{ProviderId, ProviderRegistry};
pub use session::{MessageOutcome, PlaybackSession};
