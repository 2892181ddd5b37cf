use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use jamify::sync::{BeatSyncPlayer, Clock, ManualClock, PlaybackRange, PlayerConfig, SystemClock};
use jamify::sync_api::{FrameSet, PlayerState};

fn frames(n: u32) -> FrameSet<u32> {
    FrameSet::new((100..100 + n).collect())
}

// background thread parked on a long sleep; the test drives tick_now()
fn manual_player(loop_ms: f64) -> (Arc<ManualClock>, BeatSyncPlayer<u32>) {
    let clock = Arc::new(ManualClock::new());
    let config = PlayerConfig {
        render_delay: Duration::from_secs(30),
        default_loop_duration_ms: loop_ms,
        max_tap_samples: None,
    };
    let player = BeatSyncPlayer::new(config, Arc::clone(&clock) as Arc<dyn Clock>);
    (clock, player)
}

fn index(player: &BeatSyncPlayer<u32>) -> usize {
    player.tick_now().unwrap().unwrap().index()
}

#[test]
fn taps_average_into_loop_duration_and_clear_restores_default() {
    let (clock, mut player) = manual_player(500.0);
    player.start(frames(4)).unwrap();

    player.beat();
    for gap in [410.0, 390.0, 455.0, 345.0] {
        clock.advance_ms(gap);
        player.beat();
    }
    assert_relative_eq!(player.loop_duration_ms(), 400.0, epsilon = 1e-6);
    assert_eq!(player.status().sample_count, 4);

    player.clear();
    assert_relative_eq!(player.loop_duration_ms(), 500.0);
    assert_eq!(player.status().sample_count, 0);
}

#[test]
fn single_frame_range_never_moves() {
    let (clock, mut player) = manual_player(500.0);
    player.start(frames(6)).unwrap();
    player.set_start_frame(3).unwrap();
    player.set_end_frame(3).unwrap();
    player.set_reverse(true);
    player.set_offset(4);
    player.beat();
    for _ in 0..20 {
        clock.advance_ms(37.0);
        assert_eq!(index(&player), 3);
    }
}

#[test]
fn forward_playback_wraps_within_range() {
    let (clock, mut player) = manual_player(400.0);
    player.start(frames(8)).unwrap();
    player.set_start_frame(2).unwrap();
    player.set_end_frame(5).unwrap();

    player.beat();
    clock.advance_ms(50.0);
    let mut seen = Vec::new();
    for _ in 0..9 {
        seen.push(index(&player));
        clock.advance_ms(100.0);
    }
    assert_eq!(seen, vec![2, 3, 4, 5, 2, 3, 4, 5, 2]);
}

#[test]
fn reversed_range_ping_pongs() {
    let (clock, mut player) = manual_player(600.0);
    player.start(frames(4)).unwrap();
    assert!(player.toggle_reverse());
    assert_eq!(player.range().cycle_frame_count(), 6);

    player.beat();
    clock.advance_ms(50.0);
    let mut seen = Vec::new();
    for _ in 0..7 {
        seen.push(index(&player));
        clock.advance_ms(100.0);
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 2, 1, 0]);
}

#[test]
fn offset_shifts_the_ramp() {
    let (clock, mut player) = manual_player(400.0);
    player.start(frames(4)).unwrap();
    player.beat();
    clock.advance_ms(250.0); // ramp position 2
    let plain = index(&player);

    player.clear();
    player.beat();
    player.set_offset(2);
    assert_eq!(index(&player), plain);
    assert_eq!(plain, 2);
}

#[test]
fn start_clears_everything() {
    let (clock, mut player) = manual_player(500.0);
    player.start(frames(5)).unwrap();
    player.set_end_frame(3).unwrap();
    player.set_start_frame(1).unwrap();
    player.toggle_reverse();
    player.nudge_offset(2);
    player.beat();
    clock.advance_ms(300.0);
    player.beat();

    player.start(frames(7)).unwrap();
    assert_eq!(player.range(), PlaybackRange::full(7));
    assert!(!player.range().reverse());
    assert_eq!(player.offset(), 0);
    assert_eq!(player.status().sample_count, 0);
    assert_eq!(player.frame_count(), 7);

    let update = player.tick_now().unwrap().unwrap();
    assert!(update.frame_changed());
    assert_eq!(*update.current(), 100);
}

#[test]
fn range_edits_apply_on_the_next_tick() {
    let (clock, mut player) = manual_player(800.0);
    player.start(frames(8)).unwrap();
    player.beat();
    clock.advance_ms(650.0);
    assert_eq!(index(&player), 6);

    player.set_end_frame(3).unwrap();
    assert_eq!(player.range().cycle_frame_count(), 4);
    let next = index(&player);
    assert!((0..=3).contains(&next), "stale index {next}");

    player.toggle_reverse();
    assert_eq!(player.range().cycle_frame_count(), 6);
    assert!(player.range().contains(index(&player)));
}

#[test]
fn repeated_ticks_on_one_frame_are_not_changes() {
    let (clock, mut player) = manual_player(400.0);
    player.start(frames(4)).unwrap();
    player.beat();
    assert!(player.tick_now().unwrap().unwrap().frame_changed());
    clock.advance_ms(10.0);
    assert!(!player.tick_now().unwrap().unwrap().frame_changed());
    clock.advance_ms(100.0);
    let update = player.tick_now().unwrap().unwrap();
    assert!(update.frame_changed());
    assert_eq!(*update.current(), 101);
}

#[test]
fn background_ticks_follow_the_beat() {
    let config = PlayerConfig {
        render_delay: Duration::from_millis(2),
        default_loop_duration_ms: 40.0,
        max_tap_samples: None,
    };
    let mut player = BeatSyncPlayer::new(config, Arc::new(SystemClock) as Arc<dyn Clock>);
    let updates = player.updates();
    player.start(frames(4)).unwrap();
    player.beat();

    let mut seen = HashSet::new();
    let deadline = Instant::now() + Duration::from_secs(2);
    while seen.len() < 2 && Instant::now() < deadline {
        if let Ok(update) = updates.recv_timeout(Duration::from_millis(100)) {
            seen.insert(update.index());
        }
    }
    assert!(seen.len() >= 2, "frames never advanced: {seen:?}");
    player.stop();
}

#[test]
fn stop_is_idempotent_and_silences_updates() {
    let config = PlayerConfig {
        render_delay: Duration::from_millis(1),
        ..PlayerConfig::default()
    };
    let mut player = BeatSyncPlayer::new(config, Arc::new(SystemClock) as Arc<dyn Clock>);
    let updates = player.updates();
    player.stop(); // nothing running yet

    player.start(frames(3)).unwrap();
    assert!(updates.recv_timeout(Duration::from_secs(2)).is_ok());

    player.stop();
    player.stop();
    assert_eq!(player.state(), PlayerState::Loaded);
    assert!(updates.try_recv().is_err());
    std::thread::sleep(Duration::from_millis(30));
    assert!(updates.try_recv().is_err());
    assert!(player.poll_frame_update().is_none());

    player.beat(); // ignored while stopped
    assert!(!player.status().tapping);
}

#[test]
fn dispose_twice_then_drop() {
    let (_clock, mut player) = manual_player(500.0);
    player.start(frames(2)).unwrap();
    player.dispose();
    player.dispose();
    assert_eq!(player.state(), PlayerState::Disposed);
    drop(player);
}
