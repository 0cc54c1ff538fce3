use flappy_term::compute::*;
use flappy_term::config::GameConfig;
use flappy_term::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A state already in a session, started at t = 0 with the bird at rest.
fn playing_state(config: &GameConfig) -> GameState {
    let mut s = start_session(&init_state(config, 0), config, 0);
    s.bird.velocity = 0.0;
    s
}

fn pipe_at(x: f32, config: &GameConfig) -> PipePair {
    PipePair {
        top: Rect::new(x, -20.0, config.pipe_width, config.pipe_height),
        bottom: Rect::new(x, 500.0, config.pipe_width, config.pipe_height),
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_starts_ready() {
    let config = GameConfig::default();
    let s = init_state(&config, 7);
    assert_eq!(s.phase, Phase::Ready);
    assert_eq!(s.bird.x, 100.0);
    assert_eq!(s.bird.y, 300.0);
    assert_eq!(s.bird.velocity, 0.0);
    assert!(s.pipes.is_empty());
    assert_eq!(s.score, 0.0);
    assert_eq!(s.high_score, 7);
    assert!(!s.power_up.active);
    assert_eq!(s.floor_x, 0.0);
}

// ── flap / start_session ──────────────────────────────────────────────────────

#[test]
fn flap_while_inactive_starts_session_with_impulse() {
    let config = GameConfig::default();
    let s = init_state(&config, 0);
    let s2 = flap(&s, &config, 0);
    assert_eq!(s2.phase, Phase::Playing);
    assert_eq!(s2.bird.velocity, -10.0);
}

#[test]
fn flap_after_game_over_resets_session() {
    let config = GameConfig::default();
    let mut s = playing_state(&config);
    s.phase = Phase::GameOver;
    s.score = 12.5;
    s.high_score = 12;
    s.new_best = true;
    s.bird.y = 540.0;
    s.pipes.push(pipe_at(200.0, &config));

    let s2 = flap(&s, &config, 5_000);
    assert_eq!(s2.phase, Phase::Playing);
    assert!(s2.pipes.is_empty());
    assert_eq!(s2.score, 0.0);
    assert_eq!(s2.bird.y, 300.0);
    assert_eq!(s2.high_score, 12);
    assert!(!s2.new_best);
    assert_eq!(s2.next_spawn_ms, 5_000 + config.spawn_interval_ms);
}

#[test]
fn flap_while_playing_only_sets_velocity() {
    let config = GameConfig::default();
    let mut s = playing_state(&config);
    s.score = 3.0;
    s.bird.y = 250.0;
    s.bird.velocity = 4.0;
    s.pipes.push(pipe_at(300.0, &config));

    let s2 = flap(&s, &config, 100);
    assert_eq!(s2.bird.velocity, -10.0);
    assert_eq!(s2.bird.y, 250.0);
    assert_eq!(s2.score, 3.0);
    assert_eq!(s2.pipes.len(), 1);
}

#[test]
fn flap_does_not_mutate_original() {
    let config = GameConfig::default();
    let s = init_state(&config, 0);
    let _ = flap(&s, &config, 0);
    assert_eq!(s.phase, Phase::Ready);
    assert_eq!(s.bird.velocity, 0.0);
}

// ── physics ───────────────────────────────────────────────────────────────────

#[test]
fn gravity_accumulates_over_ten_frames_from_rest() {
    let config = GameConfig::default();
    let mut s = playing_state(&config);
    let mut rng = seeded_rng();
    for _ in 0..10 {
        s = tick(&s, &config, 0, &mut rng);
    }
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.bird.velocity, 5.0);
    // 0.5 + 1.0 + ... + 5.0
    assert_eq!(s.bird.y, 327.5);
}

#[test]
fn gravity_accumulates_after_flap() {
    let config = GameConfig::default();
    let mut s = flap(&init_state(&config, 0), &config, 0);
    let mut rng = seeded_rng();
    for _ in 0..10 {
        s = tick(&s, &config, 0, &mut rng);
    }
    assert_eq!(s.bird.velocity, -5.0);
}

#[test]
fn bird_x_never_changes() {
    let config = GameConfig::default();
    let mut s = flap(&init_state(&config, 0), &config, 0);
    let mut rng = seeded_rng();
    for frame in 0..60u64 {
        if frame % 12 == 0 {
            s = flap(&s, &config, frame * 16);
        }
        s = tick(&s, &config, frame * 16, &mut rng);
        assert_eq!(s.bird.x, config.bird_x);
    }
}

// ── pipes ─────────────────────────────────────────────────────────────────────

#[test]
fn create_pipe_has_fixed_gap_and_known_offset() {
    let config = GameConfig::default();
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let pair = create_pipe(&config, &mut rng);
        assert_eq!(pair.gap(), 200.0);
        assert!(config.pipe_offsets.contains(&pair.bottom.top()));
        assert_eq!(pair.bottom.center().0, 500.0);
        assert_eq!(pair.top.center().0, 500.0);
        assert_eq!(pair.top.w, config.pipe_width);
    }
}

#[test]
fn move_pipes_shifts_left_by_speed() {
    let config = GameConfig::default();
    let pipes = vec![pipe_at(200.0, &config)];
    let moved = move_pipes(&pipes, 5.0);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].left(), 195.0);
    assert_eq!(moved[0].top.left(), 195.0);
    assert!(moved[0].left() < pipes[0].left());
}

#[test]
fn move_pipes_drops_only_pipes_past_left_edge() {
    let config = GameConfig::default();
    let w = config.pipe_width;
    // Right edges before the move: 3.0 and 5.0.
    let pipes = vec![pipe_at(3.0 - w, &config), pipe_at(5.0 - w, &config)];
    let moved = move_pipes(&pipes, 5.0);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].right(), 0.0);
}

#[test]
fn pipe_positions_strictly_decrease_until_removed() {
    let config = GameConfig::default();
    let mut pipes = vec![pipe_at(100.0, &config)];
    let mut last_x = pipes[0].left();
    let mut frames = 0;
    while !pipes.is_empty() {
        pipes = move_pipes(&pipes, config.pipe_speed);
        if let Some(p) = pipes.first() {
            assert!(p.left() < last_x);
            assert!(p.right() >= 0.0);
            last_x = p.left();
        }
        frames += 1;
        assert!(frames < 1_000, "pipe never left the screen");
    }
    assert!(last_x + config.pipe_width - config.pipe_speed < 0.0);
}

// ── spawner ───────────────────────────────────────────────────────────────────

#[test]
fn spawn_timer_fires_one_pair() {
    let config = GameConfig::default();
    let s = playing_state(&config);
    assert_eq!(s.next_spawn_ms, 1200);

    let s2 = tick(&s, &config, 1200, &mut seeded_rng());
    assert_eq!(s2.pipes.len(), 1);
    assert_eq!(s2.pipes[0].gap(), 200.0);
    assert_eq!(s2.next_spawn_ms, 2400);
    // Spawned at x = 500 and moved once this frame.
    assert_eq!(s2.pipes[0].bottom.center().0, 495.0);
}

#[test]
fn spawn_timer_idle_before_due() {
    let config = GameConfig::default();
    let s = playing_state(&config);
    let s2 = tick(&s, &config, 1199, &mut seeded_rng());
    assert!(s2.pipes.is_empty());
    assert_eq!(s2.next_spawn_ms, 1200);
}

#[test]
fn spawn_timer_not_serviced_while_inactive() {
    let config = GameConfig::default();
    let s = init_state(&config, 0);
    let s2 = tick(&s, &config, 10_000, &mut seeded_rng());
    assert!(s2.pipes.is_empty());
}

// ── collision ─────────────────────────────────────────────────────────────────

#[test]
fn collision_clear_sky_is_true() {
    let config = GameConfig::default();
    let s = playing_state(&config);
    assert!(check_collision(&s.bird, &[], &config));
}

#[test]
fn collision_overlapping_pipe_is_false() {
    let config = GameConfig::default();
    let s = playing_state(&config);
    // Bottom segment whose top edge cuts through the bird.
    let pipe = PipePair {
        top: Rect::new(90.0, -400.0, config.pipe_width, config.pipe_height),
        bottom: Rect::new(90.0, 310.0, config.pipe_width, config.pipe_height),
    };
    assert!(!check_collision(&s.bird, &[pipe], &config));
}

#[test]
fn collision_touching_edge_is_not_overlap() {
    let config = GameConfig::default();
    let s = playing_state(&config);
    // Bird spans x 80..120; this pipe starts exactly at 120.
    let pipe = PipePair {
        top: Rect::new(120.0, 0.0, config.pipe_width, config.pipe_height),
        bottom: Rect::new(120.0, 320.0, config.pipe_width, config.pipe_height),
    };
    assert!(check_collision(&s.bird, &[pipe], &config));
}

#[test]
fn collision_bounds() {
    let config = GameConfig::default();
    let mut bird = playing_state(&config).bird;

    bird.y = 535.0; // bottom = 550
    assert!(!check_collision(&bird, &[], &config));
    bird.y = 534.9;
    assert!(check_collision(&bird, &[], &config));

    bird.y = -85.0; // top = -100
    assert!(!check_collision(&bird, &[], &config));
    bird.y = -84.9;
    assert!(check_collision(&bird, &[], &config));
}

#[test]
fn reaching_floor_ends_session_that_frame() {
    let config = GameConfig::default();
    let mut s = playing_state(&config);
    s.bird.y = 534.0; // bottom 549 -> 549.5 after one frame
    let s1 = tick(&s, &config, 0, &mut seeded_rng());
    assert_eq!(s1.phase, Phase::Playing);

    let s2 = tick(&s1, &config, 0, &mut seeded_rng());
    // velocity 1.0, y 535.5, bottom 550.5
    assert_eq!(s2.phase, Phase::GameOver);
    assert!(session_ended(&s1, &s2));
}

#[test]
fn session_ended_only_on_active_to_inactive() {
    let config = GameConfig::default();
    let ready = init_state(&config, 0);
    let playing = playing_state(&config);
    let over = GameState {
        phase: Phase::GameOver,
        ..playing.clone()
    };
    assert!(session_ended(&playing, &over));
    assert!(!session_ended(&ready, &ready));
    assert!(!session_ended(&over, &over));
    assert!(!session_ended(&playing, &playing));
    assert!(!session_ended(&ready, &playing));
}

#[test]
fn reaching_ceiling_ends_session() {
    let config = GameConfig::default();
    let mut s = playing_state(&config);
    s.bird.y = -84.0;
    s.bird.velocity = -1.5;
    let s2 = tick(&s, &config, 0, &mut seeded_rng());
    assert_eq!(s2.bird.y, -85.0);
    assert_eq!(s2.phase, Phase::GameOver);
}

#[test]
fn hitting_pipe_ends_session() {
    let config = GameConfig::default();
    let mut s = playing_state(&config);
    s.pipes.push(PipePair {
        top: Rect::new(110.0, -100.0, config.pipe_width, config.pipe_height),
        bottom: Rect::new(110.0, 305.0, config.pipe_width, config.pipe_height),
    });
    let s2 = tick(&s, &config, 0, &mut seeded_rng());
    assert_eq!(s2.phase, Phase::GameOver);
}

// ── score ─────────────────────────────────────────────────────────────────────

#[test]
fn score_increments_each_active_frame() {
    let config = GameConfig::default();
    let s = playing_state(&config);
    let s2 = tick(&s, &config, 0, &mut seeded_rng());
    assert_eq!(s2.score, config.score_per_frame);
}

#[test]
fn score_never_decreases_during_session() {
    let config = GameConfig::default();
    let mut s = flap(&init_state(&config, 0), &config, 0);
    let mut rng = seeded_rng();
    let mut frame = 0u64;
    while s.phase == Phase::Playing && frame < 2_000 {
        let now = frame * 16;
        if frame % 14 == 0 {
            s = flap(&s, &config, now);
        }
        let next = tick(&s, &config, now, &mut rng);
        assert!(next.score >= s.score);
        s = next;
        frame += 1;
    }
}

#[test]
fn inactive_tick_only_scrolls_floor() {
    let config = GameConfig::default();
    let s = init_state(&config, 0);
    let s2 = tick(&s, &config, 0, &mut seeded_rng());
    assert_eq!(s2.frame, 1);
    assert_eq!(s2.floor_x, -1.0);
    assert_eq!(s2.bird, s.bird);
    assert_eq!(s2.score, 0.0);
    assert!(!session_ended(&s, &s2));
}

// ── power-up ──────────────────────────────────────────────────────────────────

#[test]
fn power_up_activates_when_draw_succeeds() {
    let config = GameConfig {
        power_up_chance: 1,
        ..GameConfig::default()
    };
    let p = update_power_up(&PowerUp::default(), &config, 700, &mut seeded_rng());
    assert!(p.active);
    assert_eq!(p.activated_at_ms, 700);
}

#[test]
fn power_up_expires_after_duration() {
    let config = GameConfig {
        power_up_chance: u32::MAX,
        ..GameConfig::default()
    };
    let engaged = PowerUp {
        active: true,
        activated_at_ms: 1_000,
    };
    let still = update_power_up(&engaged, &config, 5_999, &mut seeded_rng());
    assert!(still.active);
    assert_eq!(still.activated_at_ms, 1_000);

    let expired = update_power_up(&engaged, &config, 6_000, &mut seeded_rng());
    assert!(!expired.active);
}

#[test]
fn power_up_not_rerolled_while_engaged() {
    let config = GameConfig {
        power_up_chance: 1,
        ..GameConfig::default()
    };
    let engaged = PowerUp {
        active: true,
        activated_at_ms: 1_000,
    };
    let p = update_power_up(&engaged, &config, 2_000, &mut seeded_rng());
    assert_eq!(p.activated_at_ms, 1_000);
}

#[test]
fn power_up_remaining() {
    let config = GameConfig::default();
    let p = PowerUp {
        active: true,
        activated_at_ms: 1_000,
    };
    assert_eq!(power_up_remaining_ms(&p, &config, 1_000), Some(5_000));
    assert_eq!(power_up_remaining_ms(&p, &config, 4_500), Some(1_500));
    assert_eq!(power_up_remaining_ms(&p, &config, 6_000), None);
    assert_eq!(power_up_remaining_ms(&PowerUp::default(), &config, 0), None);
}

// ── floor ─────────────────────────────────────────────────────────────────────

#[test]
fn floor_scrolls_and_wraps() {
    let config = GameConfig::default();
    assert_eq!(scroll_floor(0.0, &config), -1.0);
    assert_eq!(scroll_floor(-398.0, &config), -399.0);
    assert_eq!(scroll_floor(-399.0, &config), 0.0);
}
