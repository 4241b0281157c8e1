//! Load/error lifecycle of the embedded frame.
//!
//! Each mount of the frame gets a [`MountGeneration`]. Callbacks carry the generation of
//! the frame that produced them, and anything older than the current mount is dropped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MountGeneration(pub u64);

impl MountGeneration {
    pub fn next(self) -> Self {
        MountGeneration(self.0.wrapping_add(1))
    }
}

impl fmt::Display for MountGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    ProviderError,
    NetworkError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackLifecycle {
    phase: Phase,
    generation: MountGeneration,
    online: bool,
}

impl Default for PlaybackLifecycle {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PlaybackLifecycle {
    pub fn new(online: bool) -> Self {
        Self {
            phase: if online {
                Phase::Loading
            } else {
                Phase::NetworkError
            },
            generation: MountGeneration(1),
            online,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> MountGeneration {
        self.generation
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn has_provider_error(&self) -> bool {
        self.phase == Phase::ProviderError
    }

    pub fn has_network_error(&self) -> bool {
        self.phase == Phase::NetworkError
    }

    pub fn is_current(&self, generation: MountGeneration) -> bool {
        generation == self.generation
    }

    /// Tears the frame down and starts a fresh mount, whatever the previous phase was.
    pub fn remount(&mut self) -> MountGeneration {
        self.generation = self.generation.next();
        self.phase = Phase::Loading;
        self.generation
    }

    pub fn retry(&mut self) -> MountGeneration {
        self.remount()
    }

    /// Returns whether the callback was applied.
    pub fn frame_loaded(&mut self, generation: MountGeneration) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(%generation, current = %self.generation, "dropping stale load callback");
            return false;
        }
        match self.phase {
            Phase::Loading | Phase::ProviderError => {
                self.phase = Phase::Ready;
                true
            }
            Phase::Ready | Phase::NetworkError => false,
        }
    }

    pub fn frame_failed(&mut self, generation: MountGeneration) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(%generation, current = %self.generation, "dropping stale error callback");
            return false;
        }
        if self.phase == Phase::NetworkError {
            return false;
        }
        self.phase = if self.online {
            Phase::ProviderError
        } else {
            Phase::NetworkError
        };
        true
    }

    /// Going offline preempts every other phase. Coming back online is recorded but does not
    /// leave `NetworkError`; recovery is a user-initiated reload.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        if !online {
            self.phase = Phase::NetworkError;
        }
    }

    /// A fetch-layer failure observed while the browser still claims to be online.
    pub fn network_failure(&mut self) {
        self.phase = Phase::NetworkError;
    }
}
