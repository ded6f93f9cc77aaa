use crate::config::GameConfig;
use crate::entities::{
    Asteroid, AsteroidHandle, Explosion, Laser, Player, PowerUp, PowerUpEffect, PowerUpKind,
    Projectile, TrackingMissile,
};
use crate::error::GameError;
use crate::events::{Banner, GameEvent};
use crate::highscore::HighScoreStore;
use crate::input::{InputEvent, InputState, WeaponKind};
use crate::resources::{ResourceRegistry, SoundKey, SpriteKey};
use crate::state::GameState;
use collisions::{BroadPhase, CollisionEngine, ImageId, SpriteBody, SpritePose};
use common::angles::wrap_degrees;
use common::arena::Arena;
use common::shapes::Rectangle;
use quadtree::quadtree::QuadTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scheduler::{Scheduler, TickSource};
use tracing::{debug, info, trace, warn};

pub const LASER_FIRE_INTERVAL: f32 = 0.15;
pub const MISSILE_FIRE_INTERVAL: f32 = 0.5;

// (score above which, spawn chance at least)
const DIFFICULTY_STEPS: [(u32, u32); 2] = [(5000, 3), (15000, 5)];

// Wider than the asteroid off-screen margin so every live asteroid is indexed.
const INDEX_MARGIN: f32 = 64.0;

/// Deferred work the simulation schedules for itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameTask {
    RestoreVulnerability,
    RestoreSpeed,
    RestoreFireInterval,
    EndTripleShot,
    EndShield,
    HideBanner,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TaskArgs {
    None,
    /// Value to put back when a timed boost runs out.
    Restore(f32),
}

/// One thing to draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteView {
    pub key: SpriteKey,
    pub pose: SpritePose,
    pub image: ImageId,
}

/// The whole game: entities, score, timers and the collision machinery.
///
/// The host calls [`Simulation::tick`] at the fixed rate, [`Simulation::frame`]
/// once per rendered frame, and drains [`Simulation::drain_events`] for sounds
/// and HUD updates.
pub struct Simulation {
    config: GameConfig,
    resources: ResourceRegistry,
    engine: CollisionEngine,
    index: QuadTree<AsteroidHandle>,
    scheduler: Scheduler<GameTask, TaskArgs>,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,
    state: GameState,
    player: Player,
    projectiles: Vec<Projectile>,
    asteroids: Arena<Asteroid>,
    powerups: Vec<PowerUp>,
    explosions: Vec<Explosion>,
    weapon: WeaponKind,
    score: u32,
    lives: u32,
    high_score: u32,
    fire_cooldown: f32,
    fire_interval: f32,
    triple_shot_spread: Option<f32>,
    spawn_chance: u32,
    // largest bounding radius among indexed asteroids
    asteroid_reach: f32,
    banner: Option<Banner>,
    events: Vec<GameEvent>,
    ticks: u64,
}

impl Simulation {
    pub fn new(
        config: GameConfig,
        resources: ResourceRegistry,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let window = config.window();
        let index =
            QuadTree::new_with_config(window.expanded(INDEX_MARGIN), config.quadtree_config())?;
        let engine = CollisionEngine::new(config.broad_phase());
        engine.masks().warm(resources.images());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let high_score = store.load();
        let player = new_player(&config, &resources);
        info!(high_score, seed = ?config.seed, "simulation ready");

        Ok(Simulation {
            lives: config.starting_lives,
            spawn_chance: config.asteroid_spawn_chance,
            config,
            resources,
            engine,
            index,
            scheduler: Scheduler::new(),
            rng,
            store,
            state: GameState::Menu,
            player,
            projectiles: Vec::new(),
            asteroids: Arena::new(),
            powerups: Vec::new(),
            explosions: Vec::new(),
            weapon: WeaponKind::Laser,
            score: 0,
            high_score,
            fire_cooldown: 0.0,
            fire_interval: LASER_FIRE_INTERVAL,
            triple_shot_spread: None,
            asteroid_reach: 0.0,
            banner: None,
            events: Vec::new(),
            ticks: 0,
        })
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Start => match self.state {
                GameState::Menu | GameState::GameOver => {
                    self.reset();
                    self.set_state(GameState::Playing);
                    info!(lives = self.lives, high_score = self.high_score, "game started");
                }
                GameState::Paused => self.set_state(GameState::Playing),
                GameState::Playing => {}
            },
            InputEvent::TogglePause => match self.state {
                GameState::Playing => self.set_state(GameState::Paused),
                GameState::Paused => self.set_state(GameState::Playing),
                GameState::Menu | GameState::GameOver => {}
            },
            InputEvent::SelectWeapon(weapon) => {
                debug!(?weapon, "weapon selected");
                self.weapon = weapon;
            }
        }
    }

    /// Advance the game by one fixed step. Does nothing unless playing.
    pub fn tick(&mut self, input: &InputState) {
        if !self.state.is_running() {
            return;
        }
        self.ticks += 1;
        let dt = self.config.fixed_dt;
        let window = self.config.window();

        self.player.update(dt, input, &window);
        self.fire(input.firing, dt);

        for projectile in &mut self.projectiles {
            projectile.update(dt, &window, &self.asteroids, &mut self.rng);
        }

        if self.rng.gen_range(0..=100) < self.spawn_chance {
            let image = self.resources.sprite(SpriteKey::Asteroid).id();
            let asteroid = Asteroid::spawn_at_edge(image, &window, &mut self.rng);
            self.spawn_asteroid(asteroid);
        }
        for (_, asteroid) in self.asteroids.iter_mut() {
            asteroid.update(dt, &window);
        }
        self.explosions.retain_mut(|explosion| explosion.update(dt));
        for powerup in &mut self.powerups {
            powerup.update(dt);
        }

        self.rebuild_index();
        self.resolve_projectile_hits();
        self.resolve_player_hits();
        if !self.state.is_running() {
            self.remove_inactive();
            return;
        }
        self.resolve_pickups();
        self.remove_inactive();
        self.update_difficulty();

        for (task, args) in self.scheduler.tick(TickSource::Update) {
            self.run_task(task, args);
        }
    }

    /// Advance frame-paced timers. Runs in every state, so overlays still
    /// time out while paused.
    pub fn frame(&mut self) {
        for (task, args) in self.scheduler.tick(TickSource::Frame) {
            self.run_task(task, args);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn sprites(&self) -> Vec<SpriteView> {
        let mut views = Vec::with_capacity(
            1 + self.projectiles.len()
                + self.asteroids.len()
                + self.powerups.len()
                + self.explosions.len(),
        );
        views.push(SpriteView {
            key: SpriteKey::Player,
            pose: self.player.pose,
            image: self.player.image,
        });
        views.extend(self.projectiles.iter().map(|projectile| SpriteView {
            key: match projectile {
                Projectile::Laser(_) => SpriteKey::Laser,
                Projectile::Missile(_) => SpriteKey::Missile,
            },
            pose: projectile.pose(),
            image: projectile.image(),
        }));
        views.extend(self.asteroids.iter().map(|(_, asteroid)| SpriteView {
            key: SpriteKey::Asteroid,
            pose: asteroid.pose,
            image: asteroid.image,
        }));
        views.extend(self.powerups.iter().map(|powerup| SpriteView {
            key: SpriteKey::PowerUp,
            pose: powerup.pose,
            image: powerup.image,
        }));
        views.extend(self.explosions.iter().map(|explosion| SpriteView {
            key: SpriteKey::Explosion,
            pose: explosion.pose,
            image: explosion.image,
        }));
        views
    }

    pub fn spawn_asteroid(&mut self, asteroid: Asteroid) -> AsteroidHandle {
        trace!(x = asteroid.pose.x, y = asteroid.pose.y, tier = asteroid.tier, "asteroid spawned");
        self.asteroids.insert(asteroid)
    }

    pub fn spawn_powerup(&mut self, x: f32, y: f32, kind: PowerUpKind) {
        let image = self.resources.sprite(SpriteKey::PowerUp).id();
        debug!(?kind, x, y, "power-up dropped");
        self.powerups.push(PowerUp::new(image, x, y, kind));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn engine(&self) -> &CollisionEngine {
        &self.engine
    }

    pub fn index(&self) -> &QuadTree<AsteroidHandle> {
        &self.index
    }

    pub fn scheduler(&self) -> &Scheduler<GameTask, TaskArgs> {
        &self.scheduler
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn asteroids(&self) -> &Arena<Asteroid> {
        &self.asteroids
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn weapon(&self) -> WeaponKind {
        self.weapon
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn fire_interval(&self) -> f32 {
        self.fire_interval
    }

    pub fn triple_shot_spread(&self) -> Option<f32> {
        self.triple_shot_spread
    }

    pub fn spawn_chance(&self) -> u32 {
        self.spawn_chance
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    /// Simulation ticks since the current game started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn set_state(&mut self, state: GameState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "state changed");
            self.state = state;
            self.events.push(GameEvent::StateChanged(state));
        }
    }

    fn reset(&mut self) {
        self.player = new_player(&self.config, &self.resources);
        self.projectiles.clear();
        self.asteroids.clear();
        self.powerups.clear();
        self.explosions.clear();
        self.index.clear();
        self.scheduler.clear();
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.fire_cooldown = 0.0;
        self.fire_interval = LASER_FIRE_INTERVAL;
        self.triple_shot_spread = None;
        self.spawn_chance = self.config.asteroid_spawn_chance;
        self.asteroid_reach = 0.0;
        self.banner = None;
        self.ticks = 0;
    }

    fn fire(&mut self, firing: bool, dt: f32) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        if !firing || self.fire_cooldown > 0.0 {
            return;
        }

        let (interval, sound, key) = match self.weapon {
            WeaponKind::Laser => (self.fire_interval, SoundKey::Laser, SpriteKey::Laser),
            WeaponKind::TrackingMissile => {
                (MISSILE_FIRE_INTERVAL, SoundKey::Missile, SpriteKey::Missile)
            }
        };
        self.fire_cooldown = interval;

        let offsets = match self.triple_shot_spread {
            Some(spread) => vec![-spread, 0.0, spread],
            None => vec![0.0],
        };
        let image = self.resources.sprite(key).id();
        let (x, y) = (self.player.pose.x, self.player.pose.y);
        for offset in offsets {
            let heading = wrap_degrees(self.player.pose.rotation + offset);
            let projectile = match self.weapon {
                WeaponKind::Laser => Projectile::Laser(Laser::new(image, x, y, heading)),
                WeaponKind::TrackingMissile => Projectile::Missile(TrackingMissile::new(
                    image,
                    x,
                    y,
                    heading,
                    &self.asteroids,
                    &mut self.rng,
                )),
            };
            self.projectiles.push(projectile);
        }
        self.events.push(GameEvent::Sound(sound));
    }

    fn rebuild_index(&mut self) {
        let resources = &self.resources;
        let mut reach: f32 = 0.0;
        let live = self
            .asteroids
            .iter()
            .filter(|(_, asteroid)| asteroid.active)
            .map(|(handle, asteroid)| {
                if let Some(rock) = body(resources, asteroid.pose, asteroid.image) {
                    reach = reach.max(rock.bounding_radius());
                }
                (handle, asteroid.pose.x, asteroid.pose.y)
            });
        let rejected = self.index.rebuild(live);
        if rejected > 0 {
            trace!(rejected, "asteroids outside the spatial index");
        }
        self.asteroid_reach = reach;
    }

    /// Half-size of a query square around a body of `radius` that covers every
    /// asteroid the broad phase could accept.
    fn query_reach(&self, radius: f32) -> f32 {
        let reach = radius + self.asteroid_reach;
        match self.engine.broad_phase() {
            BroadPhase::BoundingCircle => reach + 1.0,
            BroadPhase::FixedDistance(distance) => reach.max(distance) + 1.0,
        }
    }

    fn resolve_projectile_hits(&mut self) {
        let mut hits: Vec<(usize, AsteroidHandle)> = Vec::new();
        let mut candidates = Vec::new();
        for (slot, projectile) in self.projectiles.iter().enumerate() {
            if !projectile.is_active() {
                continue;
            }
            let Some(shot) = body(&self.resources, projectile.pose(), projectile.image()) else {
                continue;
            };
            let reach = self.query_reach(shot.bounding_radius());
            candidates.clear();
            self.index.query_range_into(
                &Rectangle::around(shot.pose.x, shot.pose.y, reach),
                &mut candidates,
            );
            let hit = candidates.iter().copied().find(|handle| {
                !hits.iter().any(|(_, taken)| taken == handle)
                    && self
                        .asteroids
                        .get(*handle)
                        .filter(|asteroid| asteroid.active)
                        .and_then(|asteroid| body(&self.resources, asteroid.pose, asteroid.image))
                        .map_or(false, |rock| self.engine.collide(&shot, &rock))
            });
            if let Some(handle) = hit {
                hits.push((slot, handle));
            }
        }

        for (slot, handle) in hits {
            if let Some(projectile) = self.projectiles.get_mut(slot) {
                projectile.deactivate();
            }
            self.destroy_asteroid(handle);
        }
    }

    fn destroy_asteroid(&mut self, handle: AsteroidHandle) {
        let Some(asteroid) = self.asteroids.get_mut(handle) else {
            return;
        };
        if !asteroid.active {
            return;
        }
        let fragments = asteroid.explode(&mut self.rng);
        let (x, y, tier) = (asteroid.pose.x, asteroid.pose.y, asteroid.tier);
        let points = asteroid.score_value();

        self.score = self.score.saturating_add(points);
        debug!(tier, points, fragments = fragments.len(), "asteroid destroyed");
        self.add_explosion(x, y);
        self.events.push(GameEvent::AsteroidDestroyed {
            x,
            y,
            tier,
            fragments: fragments.len(),
        });
        for fragment in fragments {
            self.spawn_asteroid(fragment);
        }

        if self.rng.gen_bool(self.config.powerup_drop_chance) {
            let kind = PowerUpKind::random(&mut self.rng);
            self.spawn_powerup(x, y, kind);
        }
    }

    fn add_explosion(&mut self, x: f32, y: f32) {
        let image = self.resources.sprite(SpriteKey::Explosion).id();
        self.explosions
            .push(Explosion::new(image, x, y, &mut self.rng));
        self.events.push(GameEvent::Sound(SoundKey::Explosion));
    }

    fn resolve_player_hits(&mut self) {
        let Some(ship) = body(&self.resources, self.player.pose, self.player.image) else {
            return;
        };
        let reach = self.query_reach(ship.bounding_radius());
        let hits: Vec<AsteroidHandle> = self
            .index
            .query_range(&Rectangle::around(ship.pose.x, ship.pose.y, reach))
            .into_iter()
            .filter(|handle| {
                self.asteroids
                    .get(*handle)
                    .filter(|asteroid| asteroid.active)
                    .and_then(|asteroid| body(&self.resources, asteroid.pose, asteroid.image))
                    .map_or(false, |rock| self.engine.collide(&ship, &rock))
            })
            .collect();

        for handle in hits {
            self.crash_into(handle);
            if !self.state.is_running() {
                break;
            }
        }
    }

    /// The asteroid breaks up without fragments or score; the player loses a
    /// life unless protected.
    fn crash_into(&mut self, handle: AsteroidHandle) {
        let Some(asteroid) = self.asteroids.get_mut(handle) else {
            return;
        };
        asteroid.active = false;
        let (x, y) = (asteroid.pose.x, asteroid.pose.y);
        self.add_explosion(x, y);

        if !self.player.can_be_hurt() {
            trace!("hit absorbed");
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerHit {
            lives_left: self.lives,
        });
        info!(lives = self.lives, "player hit");
        if self.lives == 0 {
            self.game_over();
            return;
        }

        self.player.is_vulnerable = false;
        self.scheduler
            .cancel(TickSource::Update, &GameTask::RestoreVulnerability);
        self.scheduler.schedule(
            TickSource::Update,
            GameTask::RestoreVulnerability,
            self.config.invulnerability_ticks,
            TaskArgs::None,
        );
        self.show_banner(Banner::LifeLost);
    }

    fn resolve_pickups(&mut self) {
        let Some(ship) = body(&self.resources, self.player.pose, self.player.image) else {
            return;
        };
        let mut collected = Vec::new();
        for powerup in &mut self.powerups {
            if !powerup.active {
                continue;
            }
            let Some(pickup) = body(&self.resources, powerup.pose, powerup.image) else {
                continue;
            };
            if !self.engine.collide(&pickup, &ship) {
                continue;
            }
            if let Some(effect) = powerup.apply() {
                collected.push((powerup.kind, effect));
            }
        }

        for (kind, effect) in collected {
            self.apply_effect(effect);
            self.events.push(GameEvent::Sound(SoundKey::PowerUp));
            self.events.push(GameEvent::PowerUpCollected(kind));
            self.show_banner(Banner::PowerUp(kind));
        }
    }

    fn apply_effect(&mut self, effect: PowerUpEffect) {
        debug!(?effect, "applying power-up");
        match effect {
            PowerUpEffect::ExtraLife { lives } => {
                self.lives = self.lives.saturating_add(lives);
            }
            PowerUpEffect::Score { points } => {
                self.score = self.score.saturating_add(points);
            }
            PowerUpEffect::SpeedBoost {
                multiplier,
                duration_ticks,
            } => {
                let restore = TaskArgs::Restore(self.player.speed_multiplier);
                self.extend_timed(GameTask::RestoreSpeed, duration_ticks, restore);
                self.player.speed_multiplier = multiplier;
            }
            PowerUpEffect::FastFire {
                fire_interval,
                duration_ticks,
            } => {
                let restore = TaskArgs::Restore(self.fire_interval);
                self.extend_timed(GameTask::RestoreFireInterval, duration_ticks, restore);
                self.fire_interval = fire_interval;
                self.fire_cooldown = self.fire_cooldown.min(fire_interval);
            }
            PowerUpEffect::TripleShot {
                spread_degrees,
                duration_ticks,
            } => {
                self.extend_timed(GameTask::EndTripleShot, duration_ticks, TaskArgs::None);
                self.triple_shot_spread = Some(spread_degrees);
            }
            PowerUpEffect::Shield { duration_ticks } => {
                self.extend_timed(GameTask::EndShield, duration_ticks, TaskArgs::None);
                self.player.shielded = true;
            }
        }
    }

    /// Schedule `task` to end an effect after `duration` ticks. An expiry that
    /// is already pending is replaced: the new one waits for the time it had
    /// left plus `duration`, and restores the value it was first scheduled with.
    fn extend_timed(&mut self, task: GameTask, duration: u32, restore: TaskArgs) {
        let (args, remaining) = match self.scheduler.cancel(TickSource::Update, &task) {
            Some(pending) => (pending.args, pending.remaining),
            None => (restore, 0),
        };
        self.scheduler.schedule(
            TickSource::Update,
            task,
            remaining.saturating_add(duration),
            args,
        );
    }

    fn show_banner(&mut self, banner: Banner) {
        self.scheduler
            .cancel(TickSource::Frame, &GameTask::HideBanner);
        self.banner = Some(banner);
        self.scheduler.schedule(
            TickSource::Frame,
            GameTask::HideBanner,
            self.config.banner_frames,
            TaskArgs::None,
        );
    }

    fn run_task(&mut self, task: GameTask, args: TaskArgs) {
        trace!(?task, ?args, "running scheduled task");
        match (task, args) {
            (GameTask::RestoreVulnerability, _) => self.player.is_vulnerable = true,
            (GameTask::RestoreSpeed, TaskArgs::Restore(multiplier)) => {
                self.player.speed_multiplier = multiplier;
            }
            (GameTask::RestoreSpeed, TaskArgs::None) => self.player.speed_multiplier = 1.0,
            (GameTask::RestoreFireInterval, TaskArgs::Restore(interval)) => {
                self.fire_interval = interval;
            }
            (GameTask::RestoreFireInterval, TaskArgs::None) => {
                self.fire_interval = LASER_FIRE_INTERVAL;
            }
            (GameTask::EndTripleShot, _) => self.triple_shot_spread = None,
            (GameTask::EndShield, _) => self.player.shielded = false,
            (GameTask::HideBanner, _) => self.banner = None,
        }
    }

    fn remove_inactive(&mut self) {
        self.projectiles.retain(Projectile::is_active);
        self.asteroids.retain(|_, asteroid| asteroid.active);
        self.powerups.retain(|powerup| powerup.active);
    }

    fn update_difficulty(&mut self) {
        for (threshold, chance) in DIFFICULTY_STEPS {
            if self.score > threshold && self.spawn_chance < chance {
                debug!(score = self.score, chance, "difficulty raised");
                self.spawn_chance = chance;
            }
        }
    }

    fn game_over(&mut self) {
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
            match self.store.save(self.score) {
                Ok(()) => info!(score = self.score, "new high score saved"),
                Err(err) => warn!(error = %err, "failed to save high score"),
            }
        }
        info!(score = self.score, new_high_score, "game over");
        self.set_state(GameState::GameOver);
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_high_score,
        });
    }
}

fn new_player(config: &GameConfig, resources: &ResourceRegistry) -> Player {
    let window = config.window();
    Player::new(
        resources.sprite(SpriteKey::Player).id(),
        window.center_x(),
        window.center_y(),
        config.steering,
        config.turn_speed,
    )
}

fn body(resources: &ResourceRegistry, pose: SpritePose, image: ImageId) -> Option<SpriteBody<'_>> {
    resources
        .image(image)
        .map(|image| SpriteBody::new(pose, image))
}
