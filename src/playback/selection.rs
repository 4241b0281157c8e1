use crate::api::MediaKind;
use crate::playback::providers::{resolve_embed_url, ProviderId};

/// What the watch page is currently asking a provider to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub kind: MediaKind,
    pub title_id: u64,
    pub provider: ProviderId,
    pub season: u32,
    pub episode: u32,
    pub is_favorited: bool,
}

impl SelectionState {
    pub fn new(kind: MediaKind, title_id: u64, provider: ProviderId) -> Self {
        Self {
            kind,
            title_id,
            provider,
            season: 1,
            episode: 1,
            is_favorited: false,
        }
    }

    pub fn is_series(&self) -> bool {
        self.kind == MediaKind::Series
    }

    pub fn embed_url(&self) -> String {
        resolve_embed_url(
            self.provider.key(),
            self.kind,
            self.title_id,
            self.season,
            self.episode,
        )
    }

    /// Returns whether the frame has to be remounted.
    pub fn set_provider(&mut self, provider: ProviderId) -> bool {
        if self.provider == provider {
            return false;
        }
        self.provider = provider;
        true
    }

    /// Switching season restarts at episode 1. Ignored for movies.
    pub fn set_season(&mut self, season: u32) -> bool {
        if !self.is_series() || season == 0 || season == self.season {
            return false;
        }
        self.season = season;
        self.episode = 1;
        true
    }

    /// Not checked against the episode list; the provider rejects numbers it does not have.
    pub fn set_episode(&mut self, episode: u32) -> bool {
        if !self.is_series() || episode == 0 || episode == self.episode {
            return false;
        }
        self.episode = episode;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_episode() {
        let state = SelectionState::new(MediaKind::Series, 1399, ProviderId::VidPro);
        assert_eq!((state.season, state.episode), (1, 1));
        assert!(!state.is_favorited);
    }

    #[test]
    fn movie_ignores_season_and_episode() {
        let mut state = SelectionState::new(MediaKind::Movie, 550, ProviderId::VidPro);
        assert!(!state.set_season(3));
        assert!(!state.set_episode(4));
        assert_eq!((state.season, state.episode), (1, 1));
        assert!(state.set_provider(ProviderId::Smashy));
    }

    #[test]
    fn season_switch_resets_episode() {
        let mut state = SelectionState::new(MediaKind::Series, 1399, ProviderId::VidPro);
        assert!(state.set_episode(6));
        assert!(state.set_season(2));
        assert_eq!((state.season, state.episode), (2, 1));
    }

    #[test]
    fn rejects_zero_and_unchanged_values() {
        let mut state = SelectionState::new(MediaKind::Series, 1399, ProviderId::VidPro);
        assert!(!state.set_episode(0));
        assert!(!state.set_season(0));
        assert!(!state.set_episode(1));
        assert!(!state.set_provider(ProviderId::VidPro));
    }

    #[test]
    fn out_of_range_episode_is_passed_through() {
        let mut state = SelectionState::new(MediaKind::Series, 1399, ProviderId::AutoEmbed);
        assert!(state.set_episode(999));
        assert!(state.embed_url().ends_with("/embed/tv/1399/1/999"));
    }
}
