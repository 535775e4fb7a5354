use lofi_batch::error::PlanError;
use lofi_batch::media::{AudioTrack, ImageAsset};
use lofi_batch::planner::plan;

fn track(name: &str, secs: f64) -> AudioTrack {
    AudioTrack::new(name, secs).unwrap()
}

#[test]
fn second_image_goes_unassigned_when_supply_runs_short() {
    let images = vec![ImageAsset::new("A.png"), ImageAsset::new("B.png")];
    let tracks = vec![
        track("t1.mp3", 50.0),
        track("t2.mp3", 40.0),
        track("t3.mp3", 35.0),
        track("t4.mp3", 10.0),
    ];

    let result = plan(&images, &tracks, 90.0).unwrap();

    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].image, images[0]);
    assert_eq!(result.assignments[0].tracks, tracks[..2].to_vec());
    assert_eq!(result.assignments[0].total_duration, 90.0);
    assert_eq!(result.unassigned_images, vec![images[1].clone()]);
    assert_eq!(result.leftover_tracks, tracks[2..].to_vec());
}

#[test]
fn one_long_track_is_enough() {
    let images = vec![ImageAsset::new("A.png")];
    let tracks = vec![track("t1.mp3", 200.0)];
    let result = plan(&images, &tracks, 90.0).unwrap();
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].total_duration, 200.0);
}

#[test]
fn no_images_means_no_assignments() {
    let tracks = vec![track("t1.mp3", 50.0)];
    let result = plan(&[], &tracks, 90.0).unwrap();
    assert!(result.assignments.is_empty());
    assert_eq!(result.summary().leftover_tracks, 1);
}

#[test]
fn exact_total_on_last_track_closes_the_group() {
    let images = vec![ImageAsset::new("A.png")];
    let tracks = vec![track("t1.mp3", 45.0), track("t2.mp3", 45.0)];
    let result = plan(&images, &tracks, 90.0).unwrap();
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].tracks.len(), 2);
    assert!(result.leftover_tracks.is_empty());
}

#[test]
fn plan_serializes_for_json_output() {
    let images = vec![ImageAsset::new("A.png")];
    let tracks = vec![track("t1.mp3", 120.0)];
    let result = plan(&images, &tracks, 90.0).unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["assignments"][0]["image"]["path"], "A.png");
    assert_eq!(value["assignments"][0]["tracks"][0]["duration_seconds"], 120.0);
    assert_eq!(value["assignments"][0]["total_duration"], 120.0);
}

#[test]
fn negative_target_is_rejected() {
    let images = vec![ImageAsset::new("A.png")];
    let tracks = vec![track("t1.mp3", 120.0)];
    assert_eq!(plan(&images, &tracks, -90.0), Err(PlanError::InvalidTarget(-90.0)));
}
