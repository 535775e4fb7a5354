//! Pairs images with runs of audio tracks.
//!
//! The planner walks the track pool front to back and closes a group as soon
//! as its running total reaches the target. Tracks are never reordered,
//! split or reused, and a group that cannot reach the target is dropped
//! together with every image after it.

use crate::error::PlanError;
use crate::media::{AudioTrack, ImageAsset};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub image: ImageAsset,
    pub tracks: Vec<AudioTrack>,
    pub total_duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    pub assignments: Vec<Assignment>,
    pub unassigned_images: Vec<ImageAsset>,
    pub leftover_tracks: Vec<AudioTrack>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlanSummary {
    pub fulfilled: usize,
    pub skipped_images: usize,
    pub leftover_tracks: usize,
    pub leftover_seconds: f64,
}

impl Plan {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            fulfilled: self.assignments.len(),
            skipped_images: self.unassigned_images.len(),
            leftover_tracks: self.leftover_tracks.len(),
            leftover_seconds: self.leftover_tracks.iter().map(AudioTrack::duration).sum(),
        }
    }

    /// True when some images got no audio because the supply ran out.
    pub fn is_short_of_audio(&self) -> bool {
        !self.unassigned_images.is_empty()
    }
}

pub fn plan(
    images: &[ImageAsset],
    tracks: &[AudioTrack],
    target_seconds: f64,
) -> Result<Plan, PlanError> {
    if !target_seconds.is_finite() || target_seconds <= 0.0 {
        return Err(PlanError::InvalidTarget(target_seconds));
    }

    let mut assignments = Vec::new();
    let mut unassigned_images = Vec::new();
    let mut cursor = 0;

    for (idx, image) in images.iter().enumerate() {
        let start = cursor;
        let mut total = 0.0;
        while cursor < tracks.len() && total < target_seconds {
            total += tracks[cursor].duration();
            cursor += 1;
        }

        if total < target_seconds {
            // partial group goes back to the leftovers
            cursor = start;
            unassigned_images.extend_from_slice(&images[idx..]);
            break;
        }

        assignments.push(Assignment {
            image: image.clone(),
            tracks: tracks[start..cursor].to_vec(),
            total_duration: total,
        });
    }

    Ok(Plan {
        assignments,
        unassigned_images,
        leftover_tracks: tracks[cursor..].to_vec(),
    })
}

/// Shortest prefix of `tracks` whose total reaches `limit_seconds`. Returns
/// every track when there is no limit or the supply falls short of it.
pub fn take_prefix(tracks: &[AudioTrack], limit_seconds: Option<f64>) -> &[AudioTrack] {
    let Some(limit) = limit_seconds.filter(|l| *l > 0.0) else {
        return tracks;
    };

    let mut total = 0.0;
    for (idx, track) in tracks.iter().enumerate() {
        total += track.duration();
        if total >= limit {
            return &tracks[..=idx];
        }
    }
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn tracks(specs: &[(&str, f64)]) -> Vec<AudioTrack> {
        specs
            .iter()
            .map(|(name, secs)| AudioTrack::new(*name, *secs).unwrap())
            .collect()
    }

    fn images(names: &[&str]) -> Vec<ImageAsset> {
        names.iter().map(|n| ImageAsset::new(*n)).collect()
    }

    fn names(tracks: &[AudioTrack]) -> Vec<String> {
        tracks.iter().map(AudioTrack::file_name).collect()
    }

    #[test]
    fn partial_final_group_is_dropped() {
        let pool = tracks(&[("t1", 50.0), ("t2", 40.0), ("t3", 35.0), ("t4", 10.0)]);
        let plan = plan(&images(&["A", "B"]), &pool, 90.0).unwrap();

        assert_eq!(plan.assignments.len(), 1);
        let first = &plan.assignments[0];
        assert_eq!(first.image.file_name(), "A");
        assert_eq!(names(&first.tracks), vec!["t1", "t2"]);
        assert_eq!(first.total_duration, 90.0);

        assert_eq!(plan.unassigned_images, images(&["B"]));
        assert_eq!(names(&plan.leftover_tracks), vec!["t3", "t4"]);
        assert!(plan.is_short_of_audio());

        let summary = plan.summary();
        assert_eq!(summary.fulfilled, 1);
        assert_eq!(summary.skipped_images, 1);
        assert_eq!(summary.leftover_tracks, 2);
        assert_eq!(summary.leftover_seconds, 45.0);
    }

    #[test]
    fn long_single_track_forms_a_group() {
        let pool = tracks(&[("t1", 200.0)]);
        let plan = plan(&images(&["A"]), &pool, 90.0).unwrap();
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].total_duration, 200.0);
        assert!(plan.leftover_tracks.is_empty());
        assert!(!plan.is_short_of_audio());
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        let pool = tracks(&[("t1", 50.0)]);
        let plan_a = plan(&[], &pool, 90.0).unwrap();
        assert!(plan_a.assignments.is_empty());
        assert_eq!(names(&plan_a.leftover_tracks), vec!["t1"]);

        let plan_b = plan(&images(&["A", "B"]), &[], 90.0).unwrap();
        assert!(plan_b.assignments.is_empty());
        assert_eq!(plan_b.unassigned_images.len(), 2);
        assert!(plan_b.leftover_tracks.is_empty());
    }

    #[test]
    fn landing_exactly_on_target_closes_the_group() {
        let pool = tracks(&[("t1", 30.0), ("t2", 30.0), ("t3", 30.0), ("t4", 1.0)]);
        let plan = plan(&images(&["A", "B"]), &pool, 60.0).unwrap();
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(names(&plan.assignments[0].tracks), vec!["t1", "t2"]);
        assert_eq!(names(&plan.leftover_tracks), vec!["t3", "t4"]);
    }

    #[test]
    fn surplus_tracks_are_leftover_when_images_run_out() {
        let pool = tracks(&[("t1", 100.0), ("t2", 100.0), ("t3", 100.0)]);
        let plan = plan(&images(&["A", "B"]), &pool, 90.0).unwrap();
        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(names(&plan.assignments[1].tracks), vec!["t2"]);
        assert!(plan.unassigned_images.is_empty());
        assert_eq!(names(&plan.leftover_tracks), vec!["t3"]);
    }

    #[test]
    fn rejects_non_positive_targets() {
        let pool = tracks(&[("t1", 10.0)]);
        let imgs = images(&["A"]);
        assert_eq!(plan(&imgs, &pool, 0.0), Err(PlanError::InvalidTarget(0.0)));
        assert_eq!(plan(&imgs, &pool, -1.0), Err(PlanError::InvalidTarget(-1.0)));
        assert!(plan(&imgs, &pool, f64::NAN).is_err());
        assert!(plan(&imgs, &pool, f64::INFINITY).is_err());
    }

    fn seeded_pool(seed: u64, len: usize) -> Vec<AudioTrack> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len)
            .map(|i| AudioTrack::new(format!("track_{i:03}.mp3"), rng.gen_range(20.0..300.0)).unwrap())
            .collect()
    }

    #[test]
    fn groups_are_disjoint_reach_target_and_come_from_the_pool() {
        let imgs: Vec<_> = (0..12).map(|i| ImageAsset::new(format!("img_{i}.png"))).collect();
        for seed in 1..40u64 {
            let pool = seeded_pool(seed, 60);
            for target in [60.0, 300.0, 900.0, 1800.0] {
                let plan = plan(&imgs, &pool, target).unwrap();
                let mut seen = HashSet::new();
                for a in &plan.assignments {
                    assert!(a.total_duration >= target);
                    let sum: f64 = a.tracks.iter().map(AudioTrack::duration).sum();
                    assert!((sum - a.total_duration).abs() < 1e-9);
                    for t in &a.tracks {
                        assert!(pool.contains(t));
                        assert!(seen.insert(PathBuf::from(t.path())));
                    }
                }
                for t in &plan.leftover_tracks {
                    assert!(seen.insert(PathBuf::from(t.path())));
                }
                assert_eq!(seen.len(), pool.len());
                assert_eq!(
                    plan.assignments.len() + plan.unassigned_images.len(),
                    imgs.len()
                );
            }
        }
    }

    #[test]
    fn planning_is_deterministic() {
        let imgs = images(&["A", "B", "C"]);
        let pool = seeded_pool(7, 30);
        let first = plan(&imgs, &pool, 600.0).unwrap();
        for _ in 0..5 {
            assert_eq!(plan(&imgs, &pool, 600.0).unwrap(), first);
        }
    }

    #[test]
    fn larger_targets_never_produce_more_groups() {
        let imgs: Vec<_> = (0..20).map(|i| ImageAsset::new(format!("img_{i}.png"))).collect();
        for seed in 1..25u64 {
            let pool = seeded_pool(seed, 50);
            let mut previous = usize::MAX;
            for step in 1..40 {
                let count = plan(&imgs, &pool, step as f64 * 45.0).unwrap().assignments.len();
                assert!(count <= previous);
                previous = count;
            }
        }
    }

    #[test]
    fn prefix_stops_once_limit_is_reached() {
        let pool = tracks(&[("t1", 60.0), ("t2", 60.0), ("t3", 60.0)]);
        assert_eq!(take_prefix(&pool, Some(100.0)).len(), 2);
        assert_eq!(take_prefix(&pool, Some(120.0)).len(), 2);
        assert_eq!(take_prefix(&pool, Some(1000.0)).len(), 3);
        assert_eq!(take_prefix(&pool, None).len(), 3);
        assert_eq!(take_prefix(&pool, Some(0.0)).len(), 3);
        assert!(take_prefix(&[], Some(10.0)).is_empty());
    }
}
