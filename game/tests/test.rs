use collisions::{Image, ImageId, SpritePose};
use common::arena::Arena;
use common::shapes::Rectangle;
use game::entities::{
    Asteroid, Explosion, Laser, PowerUp, PowerUpEffect, PowerUpKind, Projectile, SteeringMode, TrackingMissile,
};
use game::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scheduler::TickSource;
use std::collections::HashSet;

const CENTER_X: f32 = 400.0;
const CENTER_Y: f32 = 300.0;

fn quiet_config() -> GameConfig {
    GameConfig {
        asteroid_spawn_chance: 0,
        powerup_drop_chance: 0.0,
        seed: Some(7),
        ..Default::default()
    }
}

fn started_with(config: GameConfig, store: Box<dyn HighScoreStore>) -> Simulation {
    let mut sim = Simulation::new(config, ResourceRegistry::placeholder(), store).unwrap();
    sim.handle_event(InputEvent::Start);
    sim.drain_events();
    sim
}

fn started(config: GameConfig) -> Simulation {
    started_with(config, Box::new(MemoryHighScoreStore::default()))
}

/// Pointer straight above the ship, so it keeps facing up and stays put.
fn idle() -> InputState {
    InputState::pointing_at(CENTER_X, 600.0)
}

fn firing() -> InputState {
    InputState {
        firing: true,
        ..idle()
    }
}

fn asteroid_at(sim: &Simulation, x: f32, y: f32, tier: u8) -> Asteroid {
    let image = sim.resources().sprite(SpriteKey::Asteroid).id();
    Asteroid::new(
        image,
        SpritePose::new(x, y).with_scale(0.35),
        0.0,
        0.0,
        0.0,
        tier,
    )
}

#[test]
fn test_explode_fragment_counts_and_tiers() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let mut asteroid = Asteroid::new(
            ImageId(2),
            SpritePose::new(100.0, 120.0).with_scale(0.35),
            30.0,
            -40.0,
            12.0,
            3,
        );
        let fragments = asteroid.explode(&mut rng);
        assert!(!asteroid.active);
        assert!((2..=4).contains(&fragments.len()), "{}", fragments.len());
        for fragment in &fragments {
            assert_eq!(fragment.tier, 2);
            assert!(fragment.active);
            assert!((fragment.pose.scale_x - 0.21).abs() < 1e-4);
            assert_eq!((fragment.pose.x, fragment.pose.y), (100.0, 120.0));
            let speed = fragment.speed();
            assert!((50.0 - 1e-3..=100.0 + 1e-3).contains(&speed), "{}", speed);
            assert!((2.0..=22.0).contains(&fragment.rotation_speed));
        }
    }

    let mut smallest = Asteroid::new(ImageId(2), SpritePose::default(), 1.0, 1.0, 0.0, 1);
    assert!(smallest.explode(&mut rng).is_empty());
    assert!(!smallest.active);
}

#[test]
fn test_tier_three_splits_twice() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut first = Asteroid::new(ImageId(2), SpritePose::default(), 10.0, 0.0, 0.0, 3);
    let second_generation = first.explode(&mut rng);
    assert!((2..=4).contains(&second_generation.len()));

    let mut third_generation = Vec::new();
    for mut child in second_generation {
        let grandchildren = child.explode(&mut rng);
        assert!((2..=4).contains(&grandchildren.len()));
        third_generation.extend(grandchildren);
    }
    assert!(third_generation.len() >= 4 && third_generation.len() <= 16);
    for mut grandchild in third_generation {
        assert_eq!(grandchild.tier, 1);
        assert!(grandchild.explode(&mut rng).is_empty());
    }
}

#[test]
fn test_asteroid_dropped_past_window_margin() {
    let window = Rectangle::new(0.0, 0.0, 800.0, 600.0);

    let mut on_margin = Asteroid::new(ImageId(2), SpritePose::new(400.0, -50.0), 0.0, 0.0, 0.0, 3);
    on_margin.update(0.0, &window);
    assert!(on_margin.active);

    let mut past_margin =
        Asteroid::new(ImageId(2), SpritePose::new(400.0, -50.1), 0.0, 0.0, 0.0, 3);
    past_margin.update(0.0, &window);
    assert!(!past_margin.active);

    let mut drifting = Asteroid::new(ImageId(2), SpritePose::new(830.0, 300.0), 100.0, 0.0, 0.0, 3);
    drifting.update(0.1, &window);
    assert!(drifting.active);
    drifting.update(0.2, &window);
    assert!(!drifting.active);
}

#[test]
fn test_laser_leaves_window() {
    let window = Rectangle::new(0.0, 0.0, 800.0, 600.0);
    let mut laser = Laser::new(ImageId(1), 400.0, 300.0, 90.0);
    laser.update(0.5, &window);
    assert!(laser.active);
    assert!((laser.pose.x - 700.0).abs() < 1e-3);
    laser.update(0.5, &window);
    assert!(!laser.active);

    let mut downward = Laser::new(ImageId(1), 400.0, 20.0, 180.0);
    downward.update(0.01, &window);
    assert!(downward.active);
    downward.update(0.05, &window);
    assert!(!downward.active);
}

#[test]
fn test_explosion_expires_after_lifetime() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut explosion = Explosion::new(ImageId(3), 10.0, 10.0, &mut rng);
    assert!(explosion.update(0.05));
    assert!(!explosion.update(0.06));

    let mut exact = Explosion::new(ImageId(3), 10.0, 10.0, &mut rng);
    assert!(!exact.update(0.1));
}

#[test]
fn test_powerup_applies_once() {
    let mut powerup = PowerUp::new(ImageId(4), 10.0, 10.0, PowerUpKind::Score);
    assert_eq!(powerup.apply(), Some(PowerUpEffect::Score { points: 500 }));
    assert!(!powerup.active);
    assert!(powerup.is_consumed());
    assert_eq!(powerup.apply(), None);
}

#[test]
fn test_powerup_falls_off_screen() {
    let mut powerup = PowerUp::new(ImageId(4), 10.0, -49.0, PowerUpKind::Life);
    powerup.update(0.005);
    assert!(powerup.active);
    powerup.update(0.1);
    assert!(!powerup.active);
}

#[test]
fn test_powerup_weights_cover_every_kind() {
    let mut rng = StdRng::seed_from_u64(5);
    let seen: HashSet<PowerUpKind> = (0..2000).map(|_| PowerUpKind::random(&mut rng)).collect();
    assert_eq!(seen.len(), PowerUpKind::ALL.len());
}

#[test]
fn test_state_transitions() {
    let mut sim = Simulation::new(
        quiet_config(),
        ResourceRegistry::placeholder(),
        Box::new(MemoryHighScoreStore::default()),
    )
    .unwrap();
    assert_eq!(sim.state(), GameState::Menu);
    sim.tick(&idle());
    assert_eq!(sim.ticks(), 0);

    sim.handle_event(InputEvent::TogglePause);
    assert_eq!(sim.state(), GameState::Menu);

    sim.handle_event(InputEvent::Start);
    assert_eq!(sim.state(), GameState::Playing);
    sim.tick(&idle());
    assert_eq!(sim.ticks(), 1);

    sim.handle_event(InputEvent::TogglePause);
    assert_eq!(sim.state(), GameState::Paused);
    sim.tick(&idle());
    assert_eq!(sim.ticks(), 1);

    // Start while paused resumes without resetting.
    sim.handle_event(InputEvent::Start);
    assert_eq!(sim.state(), GameState::Playing);
    assert_eq!(sim.ticks(), 1);

    assert_eq!(
        sim.drain_events(),
        vec![
            GameEvent::StateChanged(GameState::Playing),
            GameEvent::StateChanged(GameState::Paused),
            GameEvent::StateChanged(GameState::Playing),
        ]
    );
}

#[test]
fn test_laser_splits_asteroid() {
    let mut sim = started(quiet_config());
    let target = asteroid_at(&sim, CENTER_X, 400.0, 3);
    let expected_points = target.score_value();
    sim.spawn_asteroid(target);

    sim.tick(&firing());
    assert_eq!(sim.projectiles().len(), 1);

    let mut destroyed = None;
    for _ in 0..60 {
        sim.tick(&idle());
        destroyed = sim.drain_events().into_iter().find_map(|event| match event {
            GameEvent::AsteroidDestroyed {
                tier, fragments, ..
            } => Some((tier, fragments)),
            _ => None,
        });
        if destroyed.is_some() {
            break;
        }
    }

    let (tier, fragments) = destroyed.expect("laser never hit");
    assert_eq!(tier, 3);
    assert!((2..=4).contains(&fragments));
    assert_eq!(sim.score(), expected_points);
    assert!(sim.projectiles().is_empty());
    assert_eq!(sim.asteroids().len(), fragments);
    assert!(sim.asteroids().iter().all(|(_, rock)| rock.tier == 2));
    assert_eq!(sim.explosions().len(), 1);
    assert_eq!(sim.lives(), 3);
}

#[test]
fn test_missile_weapon() {
    let mut sim = started(quiet_config());
    sim.handle_event(InputEvent::SelectWeapon(WeaponKind::TrackingMissile));
    sim.tick(&firing());
    assert!(matches!(sim.projectiles(), [Projectile::Missile(_)]));
    assert!(sim
        .drain_events()
        .contains(&GameEvent::Sound(SoundKey::Missile)));
}

#[test]
fn test_missile_retargets_after_target_dies() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut asteroids = Arena::new();
    let first = asteroids.insert(Asteroid::new(
        ImageId(2),
        SpritePose::new(0.0, 200.0),
        0.0,
        0.0,
        0.0,
        1,
    ));
    let second = asteroids.insert(Asteroid::new(
        ImageId(2),
        SpritePose::new(20.0, 200.0),
        0.0,
        0.0,
        0.0,
        1,
    ));
    // Behind the missile, outside its view cone.
    asteroids.insert(Asteroid::new(
        ImageId(2),
        SpritePose::new(0.0, -200.0),
        0.0,
        0.0,
        0.0,
        1,
    ));

    let mut missile = TrackingMissile::new(ImageId(6), 0.0, 0.0, 0.0, &asteroids, &mut rng);
    let picked = missile.target.expect("both asteroids are in view");
    assert!(picked == first || picked == second);
    let other = if picked == first { second } else { first };

    asteroids.remove(picked);
    missile.track_target(1.0 / 60.0, &asteroids, &mut rng);
    assert_eq!(missile.target, Some(other));

    if let Some(rock) = asteroids.get_mut(other) {
        rock.active = false;
    }
    missile.track_target(1.0 / 60.0, &asteroids, &mut rng);
    assert_eq!(missile.target, None);
}

#[test]
fn test_missile_without_target_flies_straight() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut asteroids = Arena::new();
    asteroids.insert(Asteroid::new(
        ImageId(2),
        SpritePose::new(300.0, 300.0),
        0.0,
        0.0,
        0.0,
        1,
    ));
    let window = common::shapes::Rectangle::new(0.0, 0.0, 800.0, 600.0);
    let mut missile = TrackingMissile::new(ImageId(6), 300.0, 100.0, 90.0, &asteroids, &mut rng);
    assert_eq!(missile.target, None);
    missile.update(0.1, &window, &asteroids, &mut rng);
    assert_eq!(missile.pose.rotation, 90.0);
    assert!((missile.pose.x - 340.0).abs() < 1e-3);
    assert!(missile.active);
}

#[test]
fn test_shield_pickup() {
    let mut sim = started(quiet_config());
    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::Shield);
    sim.tick(&idle());

    assert!(sim.player().shielded);
    assert!(sim.powerups().is_empty());
    assert_eq!(
        sim.scheduler()
            .remaining(TickSource::Update, &GameTask::EndShield),
        Some(299)
    );
    assert_eq!(sim.banner(), Some(Banner::PowerUp(PowerUpKind::Shield)));
    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Shield)));
    assert!(events.contains(&GameEvent::Sound(SoundKey::PowerUp)));

    // A shielded ship shrugs off a crash.
    let rock = asteroid_at(&sim, CENTER_X, CENTER_Y, 1);
    sim.spawn_asteroid(rock);
    sim.tick(&idle());
    assert_eq!(sim.lives(), 3);
    assert!(sim.asteroids().is_empty());
}

#[test]
fn test_recollecting_extends_expiry() {
    let mut sim = started(quiet_config());
    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::Speed);
    sim.tick(&idle());
    assert_eq!(sim.player().speed_multiplier, 1.5);
    for _ in 0..9 {
        sim.tick(&idle());
    }
    assert_eq!(
        sim.scheduler()
            .remaining(TickSource::Update, &GameTask::RestoreSpeed),
        Some(290)
    );

    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::Speed);
    sim.tick(&idle());
    assert_eq!(
        sim.scheduler()
            .remaining(TickSource::Update, &GameTask::RestoreSpeed),
        Some(589)
    );
    assert_eq!(sim.scheduler().queue(TickSource::Update).len(), 1);

    for _ in 0..588 {
        sim.tick(&idle());
    }
    assert_eq!(sim.player().speed_multiplier, 1.5);
    sim.tick(&idle());
    assert_eq!(sim.player().speed_multiplier, 1.0);
}

#[test]
fn test_fast_fire_restores_interval() {
    let mut sim = started(quiet_config());
    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::FastFire);
    sim.tick(&idle());
    assert_eq!(sim.fire_interval(), 0.05);
    for _ in 0..599 {
        sim.tick(&idle());
    }
    assert_eq!(sim.fire_interval(), 0.15);
}

#[test]
fn test_triple_shot_fires_three() {
    let mut sim = started(quiet_config());
    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::TripleShot);
    sim.tick(&idle());
    assert_eq!(sim.triple_shot_spread(), Some(15.0));

    sim.tick(&firing());
    let mut headings: Vec<f32> = sim
        .projectiles()
        .iter()
        .map(|projectile| projectile.pose().rotation)
        .collect();
    headings.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(headings, vec![0.0, 15.0, 345.0]);
}

#[test]
fn test_invulnerability_window() {
    let mut sim = started(quiet_config());
    let rock = asteroid_at(&sim, CENTER_X, CENTER_Y, 1);
    sim.spawn_asteroid(rock);
    sim.tick(&idle());

    assert_eq!(sim.lives(), 2);
    assert!(!sim.player().is_vulnerable);
    assert_eq!(
        sim.scheduler()
            .remaining(TickSource::Update, &GameTask::RestoreVulnerability),
        Some(119)
    );
    assert!(sim
        .drain_events()
        .contains(&GameEvent::PlayerHit { lives_left: 2 }));
    assert_eq!(sim.banner(), Some(Banner::LifeLost));

    let rock = asteroid_at(&sim, CENTER_X, CENTER_Y, 1);
    sim.spawn_asteroid(rock);
    sim.tick(&idle());
    assert_eq!(sim.lives(), 2);
    assert!(sim.asteroids().is_empty());

    for _ in 0..117 {
        sim.tick(&idle());
    }
    assert!(!sim.player().is_vulnerable);
    sim.tick(&idle());
    assert!(sim.player().is_vulnerable);
}

#[test]
fn test_banner_hides_after_frames() {
    let config = GameConfig {
        banner_frames: 3,
        ..quiet_config()
    };
    let mut sim = started(config);
    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::Score);
    sim.tick(&idle());
    assert_eq!(sim.score(), 500);

    // Frames keep counting while paused.
    sim.handle_event(InputEvent::TogglePause);
    sim.frame();
    sim.frame();
    assert!(sim.banner().is_some());
    sim.frame();
    assert_eq!(sim.banner(), None);
}

#[test]
fn test_game_over_and_restart() {
    let config = GameConfig {
        starting_lives: 1,
        ..quiet_config()
    };
    let mut sim = started(config);
    let rock = asteroid_at(&sim, CENTER_X, CENTER_Y, 1);
    sim.spawn_asteroid(rock);
    sim.tick(&idle());

    assert_eq!(sim.lives(), 0);
    assert_eq!(sim.state(), GameState::GameOver);
    assert!(sim.drain_events().contains(&GameEvent::GameOver {
        score: 0,
        new_high_score: false
    }));

    let ticks = sim.ticks();
    sim.tick(&idle());
    assert_eq!(sim.ticks(), ticks);

    sim.handle_event(InputEvent::Start);
    assert_eq!(sim.state(), GameState::Playing);
    assert_eq!(sim.lives(), 1);
    assert_eq!(sim.ticks(), 0);
    assert!(sim.player().is_vulnerable);
    assert!(sim.scheduler().queue(TickSource::Update).is_empty());
}

#[test]
fn test_high_score_saved_on_game_over() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("highscore.txt");
    let config = GameConfig {
        starting_lives: 1,
        ..quiet_config()
    };

    let mut sim = started_with(config.clone(), Box::new(FileHighScoreStore::new(&path)));
    assert_eq!(sim.high_score(), 0);
    sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::Score);
    sim.tick(&idle());
    let rock = asteroid_at(&sim, CENTER_X, CENTER_Y, 1);
    sim.spawn_asteroid(rock);
    sim.tick(&idle());

    assert_eq!(sim.state(), GameState::GameOver);
    assert!(sim.drain_events().contains(&GameEvent::GameOver {
        score: 500,
        new_high_score: true
    }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "500");

    let reloaded = Simulation::new(
        config,
        ResourceRegistry::placeholder(),
        Box::new(FileHighScoreStore::new(&path)),
    )
    .unwrap();
    assert_eq!(reloaded.high_score(), 500);
}

#[test]
fn test_high_score_file_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    let mut store = FileHighScoreStore::new(&path);
    assert_eq!(store.load(), 0);

    std::fs::write(&path, "not a number").unwrap();
    assert_eq!(store.load(), 0);

    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(store.load(), 0);

    store.save(1234).unwrap();
    assert_eq!(store.load(), 1234);

    let mut memory = MemoryHighScoreStore::new(10);
    assert_eq!(memory.load(), 10);
    memory.save(20).unwrap();
    assert_eq!(memory.load(), 20);
    assert_eq!(memory.saves(), 1);
}

#[test]
fn test_difficulty_rises_with_score() {
    let mut sim = started(quiet_config());
    for _ in 0..11 {
        sim.spawn_powerup(CENTER_X, CENTER_Y, PowerUpKind::Score);
        sim.tick(&idle());
    }
    assert_eq!(sim.score(), 5500);
    assert_eq!(sim.spawn_chance(), 3);
}

#[test]
fn test_sprites_lists_every_entity() {
    let mut sim = started(quiet_config());
    let rock = asteroid_at(&sim, 100.0, 500.0, 2);
    sim.spawn_asteroid(rock);
    sim.spawn_powerup(700.0, 500.0, PowerUpKind::Life);
    sim.tick(&firing());

    let keys: Vec<SpriteKey> = sim.sprites().iter().map(|view| view.key).collect();
    assert_eq!(
        keys,
        vec![
            SpriteKey::Player,
            SpriteKey::Laser,
            SpriteKey::Asteroid,
            SpriteKey::PowerUp
        ]
    );
}

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    std::fs::write(&path, r#"{ "width": 1024, "steering": "snap", "seed": 3 }"#).unwrap();
    let config = GameConfig::from_json_file(&path).unwrap();
    assert_eq!(config.width, 1024.0);
    assert_eq!(config.height, 600.0);
    assert_eq!(config.steering, SteeringMode::Snap);
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.starting_lives, 3);

    std::fs::write(&path, "{ width: }").unwrap();
    assert!(matches!(
        GameConfig::from_json_file(&path),
        Err(ConfigError::Parse { .. })
    ));

    std::fs::write(&path, r#"{ "powerup_drop_chance": 2.0 }"#).unwrap();
    assert!(matches!(
        GameConfig::from_json_file(&path),
        Err(ConfigError::Invalid(_))
    ));

    assert!(matches!(
        GameConfig::from_json_file(dir.path().join("missing.json")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_loader_reads_assets_bottom_up() {
    let dir = tempfile::tempdir().unwrap();
    let sprites = dir.path().join("sprites");
    let sounds = dir.path().join("sounds");
    std::fs::create_dir_all(&sprites).unwrap();
    std::fs::create_dir_all(&sounds).unwrap();

    // Opaque only along the top row of the file.
    let png = image::RgbaImage::from_fn(4, 2, |_, y| {
        if y == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });
    for key in SpriteKey::ALL {
        png.save(sprites.join(key.file_name())).unwrap();
    }
    let loader = ResourceLoader::new(dir.path());
    assert!(matches!(
        loader.load(),
        Err(ResourceError::Missing { .. })
    ));

    for key in SoundKey::ALL {
        std::fs::write(sounds.join(key.file_name()), [1u8, 2, 3]).unwrap();
    }
    let registry = loader.load().unwrap();
    let player = registry.sprite(SpriteKey::Player);
    assert_eq!((player.width(), player.height()), (4, 2));
    assert_eq!(player.alpha_at(0, 1), Some(255));
    assert_eq!(player.alpha_at(0, 0), Some(0));
    assert_eq!((player.anchor_x(), player.anchor_y()), (2.0, 1.0));
    assert_eq!(registry.sprite(SpriteKey::Cursor).anchor_x(), 0.0);
    assert_eq!(registry.sound(SoundKey::Laser).unwrap().bytes, vec![1, 2, 3]);
    assert!(registry.sound(SoundKey::Music).unwrap().is_streaming());
}

#[test]
fn test_registry_requires_every_sprite() {
    let parts = vec![(SpriteKey::Player, Image::solid(ImageId(99), 2, 2))];
    assert!(matches!(
        ResourceRegistry::from_parts(parts, Vec::<Sound>::new()),
        Err(ResourceError::MissingSprite(SpriteKey::Laser))
    ));

    let all = SpriteKey::ALL
        .iter()
        .map(|key| (*key, Image::solid(ImageId(99), 2, 2)));
    let registry =
        ResourceRegistry::from_parts(all, SoundKey::ALL.iter().map(|key| Sound::silent(*key)))
            .unwrap();
    assert_eq!(
        registry.sprite(SpriteKey::Missile).id(),
        SpriteKey::Missile.image_id()
    );
}
