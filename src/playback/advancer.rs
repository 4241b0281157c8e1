//! Best-effort messages posted by the embedded player.
//!
//! Nothing here is authenticated. A message is only trusted as far as its origin matches
//! the active provider and its generation matches the frame that is mounted right now.

use serde::Deserialize;
use serde_json::Value;

use crate::playback::lifecycle::MountGeneration;

const ENDED_SIGNAL: &str = "videoEnded";

/// A raw `message` event, tagged by the listener with the mount it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub origin: String,
    /// `None` when the sending window is not the frame of any tracked mount.
    pub generation: Option<MountGeneration>,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerSignal {
    Ended,
    /// Watch-progress blob some providers publish. Opaque to the app.
    Progress(Value),
    /// Any other player event (play, pause, seeked...). Parsed and ignored.
    Event {
        name: String,
        current_time: Option<f64>,
        duration: Option<f64>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data")]
enum Envelope {
    #[serde(rename = "PLAYER_EVENT")]
    PlayerEvent(PlayerEventData),
    #[serde(rename = "MEDIA_DATA")]
    MediaData(Value),
}

#[derive(Debug, Deserialize)]
struct PlayerEventData {
    event: String,
    #[serde(default, rename = "currentTime")]
    current_time: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
}

impl PlayerSignal {
    pub fn parse(payload: &Value) -> Option<Self> {
        if let Some(text) = payload.as_str() {
            return (text == ENDED_SIGNAL).then_some(PlayerSignal::Ended);
        }

        match Envelope::deserialize(payload).ok()? {
            Envelope::PlayerEvent(data) if data.event == "ended" => Some(PlayerSignal::Ended),
            Envelope::PlayerEvent(data) => Some(PlayerSignal::Event {
                name: data.event,
                current_time: data.current_time,
                duration: data.duration,
            }),
            Envelope::MediaData(data) => Some(PlayerSignal::Progress(data)),
        }
    }
}

/// Episode numbers of the season currently selected, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EpisodeCatalog {
    season: u32,
    numbers: Vec<u32>,
}

impl EpisodeCatalog {
    pub fn new(season: u32, numbers: impl IntoIterator<Item = u32>) -> Self {
        Self {
            season,
            numbers: numbers.into_iter().collect(),
        }
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn contains(&self, episode: u32) -> bool {
        self.numbers.contains(&episode)
    }

    /// Numbering is not assumed contiguous; only `episode + 1` itself counts.
    pub fn next_after(&self, episode: u32) -> Option<u32> {
        let next = episode.checked_add(1)?;
        self.contains(next).then_some(next)
    }
}

/// Remembers which mount has already produced an advance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeAdvancer {
    advanced_in: Option<MountGeneration>,
}

impl EpisodeAdvancer {
    /// Returns the episode to switch to, at most once per generation.
    pub fn on_ended(
        &mut self,
        generation: MountGeneration,
        catalog: &EpisodeCatalog,
        season: u32,
        episode: u32,
    ) -> Option<u32> {
        if self.advanced_in == Some(generation) {
            tracing::debug!(%generation, "ignoring duplicate end-of-content signal");
            return None;
        }
        if catalog.season() != season {
            return None;
        }
        let next = catalog.next_after(episode)?;
        self.advanced_in = Some(generation);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_ended_signal() {
        assert_eq!(
            PlayerSignal::parse(&json!("videoEnded")),
            Some(PlayerSignal::Ended)
        );
        assert_eq!(PlayerSignal::parse(&json!("videoStarted")), None);
    }

    #[test]
    fn parses_player_event_envelope() {
        let ended = json!({
            "type": "PLAYER_EVENT",
            "data": { "event": "ended", "currentTime": 2520.4, "duration": 2521.0 }
        });
        assert_eq!(PlayerSignal::parse(&ended), Some(PlayerSignal::Ended));

        let paused = json!({
            "type": "PLAYER_EVENT",
            "data": { "event": "pause", "currentTime": 12.0 }
        });
        assert_eq!(
            PlayerSignal::parse(&paused),
            Some(PlayerSignal::Event {
                name: "pause".into(),
                current_time: Some(12.0),
                duration: None,
            })
        );
    }

    #[test]
    fn parses_media_data_as_progress() {
        let blob = json!({ "type": "MEDIA_DATA", "data": { "1399": { "progress": 10 } } });
        assert_eq!(
            PlayerSignal::parse(&blob),
            Some(PlayerSignal::Progress(json!({ "1399": { "progress": 10 } })))
        );
    }

    #[test]
    fn ignores_unknown_shapes() {
        assert_eq!(PlayerSignal::parse(&json!({ "type": "OTHER" })), None);
        assert_eq!(PlayerSignal::parse(&json!(42)), None);
        assert_eq!(PlayerSignal::parse(&json!({ "event": "ended" })), None);
    }

    #[test]
    fn next_episode_requires_exact_successor() {
        let catalog = EpisodeCatalog::new(1, [1, 2, 4]);
        assert_eq!(catalog.next_after(1), Some(2));
        assert_eq!(catalog.next_after(2), None);
        assert_eq!(catalog.next_after(4), None);
    }

    #[test]
    fn advances_once_per_generation() {
        let catalog = EpisodeCatalog::new(1, 1..=10);
        let mut advancer = EpisodeAdvancer::default();
        let gen = MountGeneration(3);
        assert_eq!(advancer.on_ended(gen, &catalog, 1, 4), Some(5));
        assert_eq!(advancer.on_ended(gen, &catalog, 1, 4), None);
        assert_eq!(advancer.on_ended(gen.next(), &catalog, 1, 5), Some(6));
    }

    #[test]
    fn catalog_for_other_season_never_advances() {
        let catalog = EpisodeCatalog::new(2, 1..=10);
        let mut advancer = EpisodeAdvancer::default();
        assert_eq!(advancer.on_ended(MountGeneration(1), &catalog, 1, 1), None);
    }
}
