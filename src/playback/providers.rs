//! Static registry of embed providers and the per-provider URL grammars.
//!
//! Every provider disagrees on how a title, season and episode are addressed, so the
//! builder is a `match` over [`ProviderId`] rather than a shared template.

use std::fmt;

use crate::api::MediaKind;

/// Theme parameters sent to VidLink, in the order the player expects them.
const VIDLINK_THEME: &[(&str, &str)] = &[
    ("primaryColor", "63b8bc"),
    ("secondaryColor", "a2a2a2"),
    ("iconColor", "eefdec"),
    ("icons", "default"),
    ("player", "default"),
    ("title", "true"),
    ("poster", "true"),
    ("autoplay", "true"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    VidLink,
    VidPro,
    VidSrc,
    VidSrcCc,
    MoviesApi,
    AutoEmbed,
    SuperEmbed,
    Filmku,
    RgShows,
    OneMovies,
    Smashy,
    VidSrcPro,
}

impl ProviderId {
    pub const fn key(self) -> &'static str {
        match self {
            ProviderId::VidLink => "vidlink",
            ProviderId::VidPro => "vidpro",
            ProviderId::VidSrc => "vidsrc",
            ProviderId::VidSrcCc => "vidsrc_cc",
            ProviderId::MoviesApi => "moviesapi",
            ProviderId::AutoEmbed => "autoembed",
            ProviderId::SuperEmbed => "superembed",
            ProviderId::Filmku => "filmku",
            ProviderId::RgShows => "rgshows",
            ProviderId::OneMovies => "onemovies",
            ProviderId::Smashy => "smashy",
            ProviderId::VidSrcPro => "vidsrc_pro",
        }
    }

    /// Looks a key up in the registry. Unknown keys resolve to `None`; callers that need a
    /// provider regardless use [`ProviderRegistry::provider_or_default`].
    pub fn from_key(key: &str) -> Option<Self> {
        PROVIDERS
            .iter()
            .map(|provider| provider.id)
            .find(|id| id.key() == key.trim())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Picker badge derived from the provider's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderBadge {
    Premium,
    Hd,
}

impl ProviderBadge {
    pub fn label(self) -> &'static str {
        match self {
            ProviderBadge::Premium => "PREMIUM",
            ProviderBadge::Hd => "HD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub id: ProviderId,
    pub name: &'static str,
    /// Base address every embed URL is built on. May carry a path (VidSrc Pro does).
    pub base: &'static str,
    /// Lower is promoted. Presentation only.
    pub tier: u8,
    pub is_default: bool,
}

pub static PROVIDERS: &[Provider] = &[
    Provider { id: ProviderId::VidLink, name: "VidLink", base: "https://vidlink.pro", tier: 0, is_default: false },
    Provider { id: ProviderId::VidPro, name: "VidPro", base: "https://embed.su", tier: 0, is_default: true },
    Provider { id: ProviderId::VidSrc, name: "VidSrc", base: "https://vidsrc.xyz", tier: 3, is_default: false },
    Provider { id: ProviderId::VidSrcCc, name: "VidSrc CC", base: "https://vidsrc.cc", tier: 3, is_default: false },
    Provider { id: ProviderId::MoviesApi, name: "MoviesApi", base: "https://moviesapi.club", tier: 0, is_default: false },
    Provider { id: ProviderId::AutoEmbed, name: "AutoEmbed", base: "https://player.autoembed.cc", tier: 1, is_default: false },
    Provider { id: ProviderId::SuperEmbed, name: "SuperEmbed", base: "https://multiembed.mov", tier: 1, is_default: false },
    Provider { id: ProviderId::Filmku, name: "Filmku", base: "https://filmku.stream", tier: 3, is_default: false },
    Provider { id: ProviderId::RgShows, name: "RgShows (Multi-Lang)", base: "https://embed.rgshows.me", tier: 0, is_default: false },
    Provider { id: ProviderId::OneMovies, name: "OneMovies", base: "https://111movies.com", tier: 3, is_default: false },
    Provider { id: ProviderId::Smashy, name: "Smashy", base: "https://player.smashy.stream", tier: 2, is_default: false },
    Provider { id: ProviderId::VidSrcPro, name: "VidSrc Pro", base: "https://vidsrc.me/embed", tier: 3, is_default: false },
];

/// What a provider is asked to play. Season and episode are only read for series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedTarget {
    pub kind: MediaKind,
    pub title_id: u64,
    pub season: u32,
    pub episode: u32,
}

impl Provider {
    pub fn badge(&self) -> Option<ProviderBadge> {
        match self.tier {
            0 => Some(ProviderBadge::Premium),
            1 => Some(ProviderBadge::Hd),
            _ => None,
        }
    }

    /// Scheme, host and port of the base address, as a browser reports `MessageEvent.origin`.
    pub fn origin(&self) -> String {
        match url::Url::parse(self.base) {
            Ok(parsed) => parsed.origin().ascii_serialization(),
            Err(_) => self.base.trim_end_matches('/').to_string(),
        }
    }

    pub fn embed_url(&self, target: &EmbedTarget) -> String {
        let base = self.base;
        let id = target.title_id;
        let (s, e) = (target.season, target.episode);
        let series = target.kind == MediaKind::Series;

        match self.id {
            ProviderId::VidLink => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                query.extend_pairs(VIDLINK_THEME.iter().copied());
                query.append_pair("nextbutton", if series { "true" } else { "false" });
                let query = query.finish();
                if series {
                    format!("{base}/tv/{id}/{s}/{e}?{query}")
                } else {
                    format!("{base}/movie/{id}?{query}")
                }
            }
            ProviderId::MoviesApi => {
                if series {
                    format!("{base}/tv/{id}-{s}-{e}")
                } else {
                    format!("{base}/movie/{id}")
                }
            }
            ProviderId::VidSrcPro => {
                if series {
                    format!("{base}/tv?id={id}&s={s}&e={e}")
                } else {
                    format!("{base}/movie?id={id}")
                }
            }
            ProviderId::SuperEmbed => {
                if series {
                    format!("{base}/?video_id={id}&tmdb=1&s={s}&e={e}")
                } else {
                    format!("{base}/?video_id={id}&tmdb=1")
                }
            }
            ProviderId::Smashy => {
                if series {
                    format!("{base}/tv/{id}?s={s}&e={e}")
                } else {
                    format!("{base}/movie/{id}")
                }
            }
            ProviderId::RgShows => {
                if series {
                    format!("{base}/api/2/tv/?id={id}&s={s}&e={e}")
                } else {
                    format!("{base}/api/2/movie/?id={id}")
                }
            }
            ProviderId::OneMovies => {
                if series {
                    format!("{base}/tv/{id}/{s}/{e}")
                } else {
                    format!("{base}/movie/{id}")
                }
            }
            ProviderId::AutoEmbed
            | ProviderId::VidSrcCc
            | ProviderId::VidPro
            | ProviderId::VidSrc
            | ProviderId::Filmku => {
                if series {
                    format!("{base}/embed/tv/{id}/{s}/{e}")
                } else {
                    format!("{base}/embed/movie/{id}")
                }
            }
        }
    }
}

/// Read-only view over [`PROVIDERS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderRegistry;

impl ProviderRegistry {
    pub fn default_provider(&self) -> &'static Provider {
        PROVIDERS
            .iter()
            .find(|provider| provider.is_default)
            .unwrap_or(&PROVIDERS[0])
    }

    pub fn get(&self, id: ProviderId) -> &'static Provider {
        PROVIDERS
            .iter()
            .find(|provider| provider.id == id)
            .unwrap_or_else(|| self.default_provider())
    }

    pub fn provider_or_default(&self, key: &str) -> &'static Provider {
        ProviderId::from_key(key)
            .map(|id| self.get(id))
            .unwrap_or_else(|| self.default_provider())
    }

    /// Providers ordered by tier for the picker. Ties keep registry order.
    pub fn sorted_for_picker(&self) -> Vec<&'static Provider> {
        let mut sorted: Vec<&'static Provider> = PROVIDERS.iter().collect();
        sorted.sort_by_key(|provider| provider.tier);
        sorted
    }
}

/// Builds the embed URL for `provider_key`, falling back to the default provider's rule
/// when the key is not registered.
pub fn resolve_embed_url(
    provider_key: &str,
    kind: MediaKind,
    title_id: u64,
    season: u32,
    episode: u32,
) -> String {
    ProviderRegistry
        .provider_or_default(provider_key)
        .embed_url(&EmbedTarget {
            kind,
            title_id,
            season,
            episode,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<&'static str> {
        PROVIDERS.iter().map(|p| p.id.key()).collect()
    }

    #[test]
    fn registry_has_exactly_one_default() {
        assert_eq!(PROVIDERS.iter().filter(|p| p.is_default).count(), 1);
        assert_eq!(ProviderRegistry.default_provider().id, ProviderId::VidPro);
    }

    #[test]
    fn every_key_round_trips_through_lookup() {
        for key in keys() {
            let id = ProviderId::from_key(key).expect("registered key");
            assert_eq!(id.key(), key);
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        for key in keys() {
            for kind in [MediaKind::Movie, MediaKind::Series] {
                let first = resolve_embed_url(key, kind, 1399, 3, 7);
                let second = resolve_embed_url(key, kind, 1399, 3, 7);
                assert_eq!(first, second, "{key} {kind:?}");
            }
        }
    }

    #[test]
    fn movie_urls_never_carry_season_or_episode() {
        for key in keys() {
            let url = resolve_embed_url(key, MediaKind::Movie, 550, 987, 654);
            for marker in ["987", "654", "?s=", "&s=", "&e=", "/tv"] {
                assert!(!url.contains(marker), "{key}: {url}");
            }
        }
    }

    #[test]
    fn vidpro_movie_uses_embed_movie_path() {
        let url = resolve_embed_url("vidpro", MediaKind::Movie, 550, 1, 1);
        assert_eq!(url, "https://embed.su/embed/movie/550");
    }

    #[test]
    fn autoembed_series_uses_path_segments() {
        let url = resolve_embed_url("autoembed", MediaKind::Series, 1399, 2, 5);
        assert!(url.contains("/embed/tv/1399/2/5"), "{url}");
    }

    #[test]
    fn query_grammars_are_reproduced() {
        assert_eq!(
            resolve_embed_url("vidsrc_pro", MediaKind::Series, 1399, 2, 5),
            "https://vidsrc.me/embed/tv?id=1399&s=2&e=5"
        );
        assert_eq!(
            resolve_embed_url("superembed", MediaKind::Series, 1399, 2, 5),
            "https://multiembed.mov/?video_id=1399&tmdb=1&s=2&e=5"
        );
        assert_eq!(
            resolve_embed_url("rgshows", MediaKind::Movie, 550, 1, 1),
            "https://embed.rgshows.me/api/2/movie/?id=550"
        );
        assert_eq!(
            resolve_embed_url("smashy", MediaKind::Series, 1399, 2, 5),
            "https://player.smashy.stream/tv/1399?s=2&e=5"
        );
        assert_eq!(
            resolve_embed_url("moviesapi", MediaKind::Series, 1399, 2, 5),
            "https://moviesapi.club/tv/1399-2-5"
        );
    }

    #[test]
    fn vidlink_appends_theme_and_next_button() {
        let series = resolve_embed_url("vidlink", MediaKind::Series, 1399, 1, 2);
        assert!(series.starts_with("https://vidlink.pro/tv/1399/1/2?primaryColor=63b8bc&"));
        assert!(series.ends_with("autoplay=true&nextbutton=true"));

        let movie = resolve_embed_url("vidlink", MediaKind::Movie, 550, 1, 1);
        assert!(movie.starts_with("https://vidlink.pro/movie/550?"));
        assert!(movie.ends_with("nextbutton=false"));
    }

    #[test]
    fn unknown_key_falls_back_to_default_rule() {
        assert_eq!(
            resolve_embed_url("nope", MediaKind::Series, 10, 1, 2),
            resolve_embed_url("vidpro", MediaKind::Series, 10, 1, 2)
        );
    }

    #[test]
    fn picker_order_is_by_tier_and_stable() {
        let sorted = ProviderRegistry.sorted_for_picker();
        assert!(sorted.windows(2).all(|w| w[0].tier <= w[1].tier));
        let premium: Vec<_> = sorted
            .iter()
            .take_while(|p| p.tier == 0)
            .map(|p| p.id)
            .collect();
        assert_eq!(
            premium,
            vec![
                ProviderId::VidLink,
                ProviderId::VidPro,
                ProviderId::MoviesApi,
                ProviderId::RgShows
            ]
        );
    }

    #[test]
    fn origin_strips_path() {
        let pro = ProviderRegistry.get(ProviderId::VidSrcPro);
        assert_eq!(pro.origin(), "https://vidsrc.me");
        let link = ProviderRegistry.get(ProviderId::VidLink);
        assert_eq!(link.origin(), "https://vidlink.pro");
    }

    #[test]
    fn badges_follow_tier() {
        assert_eq!(
            ProviderRegistry.get(ProviderId::VidLink).badge(),
            Some(ProviderBadge::Premium)
        );
        assert_eq!(
            ProviderRegistry.get(ProviderId::AutoEmbed).badge(),
            Some(ProviderBadge::Hd)
        );
        assert_eq!(ProviderRegistry.get(ProviderId::Smashy).badge(), None);
    }
}
