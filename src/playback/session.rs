//! The watch page's playback orchestrator.
//!
//! Every input the page receives (user picks, frame callbacks, connectivity changes and
//! player messages) lands on one method here, so the selection, the frame lifecycle and
//! the advance guard always move together.

use serde_json::Value;

use crate::api::{Episode, MediaKind};
use crate::playback::advancer::{EpisodeAdvancer, EpisodeCatalog, InboundMessage, PlayerSignal};
use crate::playback::lifecycle::{MountGeneration, PlaybackLifecycle};
use crate::playback::providers::{Provider, ProviderId, ProviderRegistry};
use crate::playback::selection::SelectionState;

/// Outcome of an accepted player message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    Advanced { episode: u32, generation: MountGeneration },
    Progress(Value),
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    selection: SelectionState,
    lifecycle: PlaybackLifecycle,
    catalog: EpisodeCatalog,
    advancer: EpisodeAdvancer,
    auto_advance: bool,
}

impl PlaybackSession {
    pub fn new(kind: MediaKind, title_id: u64, provider: ProviderId, online: bool) -> Self {
        Self {
            selection: SelectionState::new(kind, title_id, provider),
            lifecycle: PlaybackLifecycle::new(online),
            catalog: EpisodeCatalog::default(),
            advancer: EpisodeAdvancer::default(),
            auto_advance: true,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn lifecycle(&self) -> &PlaybackLifecycle {
        &self.lifecycle
    }

    pub fn generation(&self) -> MountGeneration {
        self.lifecycle.generation()
    }

    pub fn active_provider(&self) -> &'static Provider {
        ProviderRegistry.get(self.selection.provider)
    }

    pub fn embed_url(&self) -> String {
        self.selection.embed_url()
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.auto_advance = enabled;
    }

    pub fn set_favorited(&mut self, favorited: bool) {
        self.selection.is_favorited = favorited;
    }

    /// Following episode in the loaded listing of the selected season, if any.
    pub fn next_episode(&self) -> Option<u32> {
        if !self.selection.is_series() || self.catalog.season() != self.selection.season {
            return None;
        }
        self.catalog.next_after(self.selection.episode)
    }

    /// Stores the listing for `season`. A listing for any other season arrived late and is
    /// dropped.
    pub fn set_catalog(&mut self, season: u32, episodes: &[Episode]) -> bool {
        if season != self.selection.season {
            tracing::debug!(season, current = self.selection.season, "dropping stale episode listing");
            return false;
        }
        self.catalog = EpisodeCatalog::new(season, episodes.iter().map(|ep| ep.episode_number));
        true
    }

    fn remount(&mut self, reason: &'static str) -> MountGeneration {
        let generation = self.lifecycle.remount();
        tracing::info!(
            %generation,
            provider = %self.selection.provider,
            season = self.selection.season,
            episode = self.selection.episode,
            reason,
            "remounting player frame"
        );
        generation
    }

    pub fn select_provider(&mut self, provider: ProviderId) -> Option<MountGeneration> {
        self.selection
            .set_provider(provider)
            .then(|| self.remount("provider"))
    }

    pub fn select_season(&mut self, season: u32) -> Option<MountGeneration> {
        self.selection
            .set_season(season)
            .then(|| self.remount("season"))
    }

    pub fn select_episode(&mut self, episode: u32) -> Option<MountGeneration> {
        self.selection
            .set_episode(episode)
            .then(|| self.remount("episode"))
    }

    pub fn retry(&mut self) -> MountGeneration {
        let generation = self.lifecycle.retry();
        tracing::info!(%generation, provider = %self.selection.provider, "retrying provider");
        generation
    }

    pub fn on_frame_loaded(&mut self, generation: MountGeneration) -> bool {
        self.lifecycle.frame_loaded(generation)
    }

    pub fn on_frame_error(&mut self, generation: MountGeneration) -> bool {
        let applied = self.lifecycle.frame_failed(generation);
        if applied {
            tracing::warn!(provider = %self.selection.provider, %generation, "provider frame failed to load");
        }
        applied
    }

    pub fn on_connectivity(&mut self, online: bool) {
        if online != self.lifecycle.is_online() {
            tracing::info!(online, "connectivity changed");
        }
        self.lifecycle.set_online(online);
    }

    pub fn on_network_failure(&mut self) {
        tracing::warn!("fetch-layer failure observed");
        self.lifecycle.network_failure();
    }

    /// Messages from another origin or from a frame that is no longer mounted are dropped
    /// before they are even parsed.
    pub fn on_player_message(&mut self, message: &InboundMessage) -> MessageOutcome {
        if message.origin != self.active_provider().origin() {
            tracing::debug!(origin = %message.origin, "ignoring message from foreign origin");
            return MessageOutcome::Ignored;
        }
        match message.generation {
            Some(generation) if self.lifecycle.is_current(generation) => {}
            _ => {
                tracing::debug!(origin = %message.origin, "ignoring message from stale frame");
                return MessageOutcome::Ignored;
            }
        }

        match PlayerSignal::parse(&message.payload) {
            Some(PlayerSignal::Ended) => self.advance(),
            Some(PlayerSignal::Progress(data)) => MessageOutcome::Progress(data),
            Some(PlayerSignal::Event { .. }) | None => MessageOutcome::Ignored,
        }
    }

    fn advance(&mut self) -> MessageOutcome {
        if !self.selection.is_series() || !self.auto_advance {
            return MessageOutcome::Ignored;
        }
        let Some(next) = self.advancer.on_ended(
            self.lifecycle.generation(),
            &self.catalog,
            self.selection.season,
            self.selection.episode,
        ) else {
            return MessageOutcome::Ignored;
        };
        match self.select_episode(next) {
            Some(generation) => MessageOutcome::Advanced {
                episode: next,
                generation,
            },
            None => MessageOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::lifecycle::Phase;
    use serde_json::json;

    fn episodes(numbers: &[u32]) -> Vec<Episode> {
        numbers
            .iter()
            .map(|&n| Episode {
                id: u64::from(n),
                episode_number: n,
                ..Default::default()
            })
            .collect()
    }

    fn series_session() -> PlaybackSession {
        let mut session = PlaybackSession::new(MediaKind::Series, 1399, ProviderId::VidLink, true);
        session.set_catalog(1, &episodes(&[1, 2, 3]));
        session
    }

    fn ended_from(session: &PlaybackSession) -> InboundMessage {
        InboundMessage {
            origin: session.active_provider().origin(),
            generation: Some(session.generation()),
            payload: json!("videoEnded"),
        }
    }

    #[test]
    fn provider_switch_remounts_from_every_phase() {
        let mut session = series_session();
        let gen = session.generation();
        assert!(session.on_frame_error(gen));
        assert_eq!(session.lifecycle().phase(), Phase::ProviderError);

        let next = session.select_provider(ProviderId::AutoEmbed).unwrap();
        assert_eq!(next, gen.next());
        assert!(session.lifecycle().is_loading());

        session.on_connectivity(false);
        let after = session.select_provider(ProviderId::Smashy).unwrap();
        assert_eq!(after, next.next());
        assert!(session.lifecycle().is_loading());
    }

    #[test]
    fn late_load_from_previous_provider_is_ignored() {
        let mut session = PlaybackSession::new(MediaKind::Movie, 550, ProviderId::VidLink, true);
        let a = session.generation();
        assert!(session.on_frame_loaded(a));

        let b = session.select_provider(ProviderId::VidPro).unwrap();
        assert!(!session.on_frame_loaded(a));
        assert!(session.lifecycle().is_loading());

        assert!(session.on_frame_error(b));
        assert!(session.lifecycle().has_provider_error());
        assert!(!session.on_frame_loaded(a));
        assert!(session.lifecycle().has_provider_error());
    }

    #[test]
    fn offline_while_loading_wins_over_provider_error() {
        let mut session = series_session();
        let gen = session.generation();
        session.on_connectivity(false);
        assert!(!session.on_frame_error(gen));
        assert!(session.lifecycle().has_network_error());
    }

    #[test]
    fn ended_advances_when_next_episode_exists() {
        let mut session = series_session();
        let outcome = session.on_player_message(&ended_from(&session));
        assert_eq!(
            outcome,
            MessageOutcome::Advanced {
                episode: 2,
                generation: MountGeneration(2)
            }
        );
        assert_eq!(session.selection().episode, 2);
        assert!(session.lifecycle().is_loading());
    }

    #[test]
    fn ended_without_next_episode_keeps_selection() {
        let mut session = series_session();
        session.select_episode(3);
        let before = session.generation();
        assert_eq!(
            session.on_player_message(&ended_from(&session)),
            MessageOutcome::Ignored
        );
        assert_eq!(session.selection().episode, 3);
        assert_eq!(session.generation(), before);
    }

    #[test]
    fn duplicate_signal_advances_only_once() {
        let mut session = series_session();
        let message = ended_from(&session);
        session.on_player_message(&message);
        session.on_player_message(&message);
        assert_eq!(session.selection().episode, 2);

        session.on_player_message(&ended_from(&session));
        assert_eq!(session.selection().episode, 3);
    }

    #[test]
    fn envelope_ended_is_treated_like_bare_signal() {
        let mut session = series_session();
        let message = InboundMessage {
            payload: json!({
                "type": "PLAYER_EVENT",
                "data": { "event": "ended", "currentTime": 3000.0, "duration": 3000.0 }
            }),
            ..ended_from(&session)
        };
        session.on_player_message(&message);
        assert_eq!(session.selection().episode, 2);
    }

    #[test]
    fn messages_from_other_origins_are_dropped() {
        let mut session = series_session();
        let message = InboundMessage {
            origin: "https://evil.example".into(),
            ..ended_from(&session)
        };
        assert_eq!(session.on_player_message(&message), MessageOutcome::Ignored);
        assert_eq!(session.selection().episode, 1);
    }

    #[test]
    fn same_origin_but_stale_mount_is_dropped() {
        let mut session = series_session();
        let stale = ended_from(&session);
        session.select_provider(ProviderId::AutoEmbed);
        session.select_provider(ProviderId::VidLink);
        assert_eq!(stale.origin, session.active_provider().origin());
        assert_eq!(session.on_player_message(&stale), MessageOutcome::Ignored);

        let untracked = InboundMessage {
            generation: None,
            ..ended_from(&session)
        };
        assert_eq!(session.on_player_message(&untracked), MessageOutcome::Ignored);
        assert_eq!(session.selection().episode, 1);
    }

    #[test]
    fn movies_never_advance() {
        let mut session = PlaybackSession::new(MediaKind::Movie, 550, ProviderId::VidLink, true);
        session.set_catalog(1, &episodes(&[1, 2]));
        assert_eq!(
            session.on_player_message(&ended_from(&session)),
            MessageOutcome::Ignored
        );
        assert_eq!(session.next_episode(), None);
    }

    #[test]
    fn auto_advance_can_be_disabled() {
        let mut session = series_session();
        session.set_auto_advance(false);
        session.on_player_message(&ended_from(&session));
        assert_eq!(session.selection().episode, 1);
    }

    #[test]
    fn progress_blob_is_surfaced() {
        let mut session = series_session();
        let message = InboundMessage {
            payload: json!({ "type": "MEDIA_DATA", "data": { "1399": { "last_episode": 1 } } }),
            ..ended_from(&session)
        };
        assert_eq!(
            session.on_player_message(&message),
            MessageOutcome::Progress(json!({ "1399": { "last_episode": 1 } }))
        );
    }

    #[test]
    fn stale_season_listing_is_dropped() {
        let mut session = series_session();
        session.select_season(2);
        assert!(!session.set_catalog(1, &episodes(&[1, 2, 3])));
        assert_eq!(session.next_episode(), None);
        assert!(session.set_catalog(2, &episodes(&[1, 2])));
        assert_eq!(session.next_episode(), Some(2));
    }

    #[test]
    fn next_episode_stops_at_end_of_listing() {
        let mut session = series_session();
        session.set_catalog(1, &episodes(&[1, 2]));
        assert_eq!(session.next_episode(), Some(2));
        session.select_episode(2);
        assert_eq!(session.next_episode(), None);
    }

    #[test]
    fn episode_and_season_changes_remount() {
        let mut session = series_session();
        let first = session.generation();
        assert_eq!(session.select_episode(2), Some(first.next()));
        assert_eq!(session.select_season(2), Some(first.next().next()));
        assert_eq!(session.select_season(2), None);
        assert_eq!(session.selection().episode, 1);
    }

    #[test]
    fn retry_re_resolves_same_url() {
        let mut session = series_session();
        let url = session.embed_url();
        let gen = session.generation();
        session.on_frame_error(gen);
        assert_eq!(session.retry(), gen.next());
        assert_eq!(session.embed_url(), url);
        assert!(session.lifecycle().is_loading());
    }
}
