//! Frame cursor for replaying a snapshot sequence.
//!
//! Transitions return a new state; the caller owns the timer and decides
//! when to call [`PlaybackState::advance`].

use serde::Serialize;

use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    frame_count: usize,
    index: usize,
    playing: bool,
}

impl PlaybackState {
    /// Starts paused on frame 0.
    pub fn new(frame_count: usize) -> Result<Self, ValidationError> {
        if frame_count == 0 {
            return Err(ValidationError::EmptyFrames);
        }
        Ok(Self {
            frame_count,
            index: 0,
            playing: false,
        })
    }

    pub const fn frame_count(self) -> usize {
        self.frame_count
    }

    pub const fn index(self) -> usize {
        self.index
    }

    pub const fn is_playing(self) -> bool {
        self.playing
    }

    /// Timer tick: next frame, wrapping to 0. No-op while paused.
    #[must_use]
    pub const fn advance(self) -> Self {
        if !self.playing {
            return self;
        }
        self.forward()
    }

    /// Manual step: pauses, then moves one frame forward.
    #[must_use]
    pub const fn step(self) -> Self {
        Self {
            playing: false,
            ..self
        }
        .forward()
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        Self {
            playing: !self.playing,
            ..self
        }
    }

    pub fn seek(self, index: usize) -> Result<Self, ValidationError> {
        if index >= self.frame_count {
            return Err(ValidationError::FrameOutOfRange {
                index,
                frame_count: self.frame_count,
            });
        }
        Ok(Self { index, ..self })
    }

    const fn forward(self) -> Self {
        Self {
            index: (self.index + 1) % self.frame_count,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_paused_and_advance_waits_for_play() {
        let state = PlaybackState::new(3).expect("frames");
        assert!(!state.is_playing());
        assert_eq!(state.advance().index(), 0);

        let playing = state.toggle();
        assert_eq!(playing.advance().index(), 1);
        assert_eq!(playing.advance().advance().advance().index(), 0);
    }

    #[test]
    fn step_pauses_and_moves_forward() {
        let state = PlaybackState::new(2).expect("frames").toggle();
        let stepped = state.step();
        assert!(!stepped.is_playing());
        assert_eq!(stepped.index(), 1);
        assert_eq!(stepped.step().index(), 0);
    }

    #[test]
    fn seek_checks_bounds() {
        let state = PlaybackState::new(4).expect("frames");
        assert_eq!(state.seek(3).expect("in range").index(), 3);
        assert_eq!(
            state.seek(4),
            Err(ValidationError::FrameOutOfRange {
                index: 4,
                frame_count: 4
            })
        );
    }

    #[test]
    fn zero_frames_is_an_error() {
        assert_eq!(PlaybackState::new(0), Err(ValidationError::EmptyFrames));
    }
}
