// Domain rules - Business logic and policies

use rand::seq::index;
use rand::Rng;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Picks random clip windows out of a source video
pub struct SegmentSampler;

impl SegmentSampler {
    /// Sample up to `requested` clip windows from a source of `total` seconds.
    ///
    /// The produced count is `min(requested, capacity, candidates)`. Selected
    /// windows are drawn independently from the 1-second grid and may overlap
    /// each other; `capacity` only caps how many are drawn. Requests come back
    /// sorted by start with ordinals continuing after `existing`.
    pub fn sample<R: Rng + ?Sized>(
        total: f64,
        clip: ClipLength,
        requested: u32,
        existing: u32,
        rng: &mut R,
    ) -> Result<Vec<ClipRequest>, DomainError> {
        if requested < 1 {
            return Err(DomainError::InvalidDuration(
                "requested clip count must be at least 1".to_string(),
            ));
        }
        Self::check_admission(total, clip)?;

        let window = TrimWindow::new(total, clip);
        let candidates = window.candidate_starts(clip);
        let count = Self::clip_count(requested, &window, clip, candidates.len());

        let mut chosen: Vec<f64> = index::sample(rng, candidates.len(), count)
            .into_iter()
            .map(|i| candidates[i])
            .collect();
        chosen.sort_by(f64::total_cmp);

        Ok(chosen
            .into_iter()
            .zip(existing + 1..)
            .map(|(start, index)| ClipRequest::new(index, start, clip))
            .collect())
    }

    /// Number of clips a run produces: the request, the back-to-back
    /// capacity and the candidate count all cap it.
    pub fn clip_count(
        requested: u32,
        window: &TrimWindow,
        clip: ClipLength,
        candidates: usize,
    ) -> usize {
        (requested as usize)
            .min(window.capacity(clip))
            .min(candidates)
    }

    /// Reject sources whose trimmed length cannot hold one clip.
    ///
    /// `TrimWindow` clamps its end, so the window itself always looks long
    /// enough; the real trimmed length is checked here.
    fn check_admission(total: f64, clip: ClipLength) -> Result<(), DomainError> {
        let window = TrimWindow::new(total, clip);
        let trimmed = total - 2.0 * TRIM_SECONDS;
        let usable = window.usable().min(trimmed);
        if !total.is_finite() || usable < clip.as_secs_f64() {
            return Err(DomainError::InsufficientDuration {
                usable: usable.max(0.0),
                needed: clip.seconds(),
            });
        }
        Ok(())
    }
}
