//! Authoritative game simulation: one session, one player, fixed ticks.
//!
//! A tick applies control commands, spawns, moves everything, resolves
//! projectile hits and player contacts, culls dead objects and then checks
//! the state invariants. Any violation is returned as a `SimulationError`
//! and the caller must stop driving the simulation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::control::ControlCommand;
use crate::render::{self, RenderFrame};
use crate::util::time::secs_to_ticks;

use super::combat::{CombatSystem, WeaponKind, WeaponStats, WeaponTable};
use super::flight::FlightRules;
use super::physics::{PhysicsSystem, PlayField, Vec2};
use super::shooter::ShooterRules;
use super::spawn::{level_for, DifficultyRamp, SpawnSchedule, Spawner};
use super::{
    Ammo, EffectKind, GameEvent, GameKind, GameObject, GameState, HandMode, ObjectKind,
    PickupKind, Player, ProjectileData, SessionPhase, SimulationError,
};

/// One projectile of a volley, relative to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub offset: Vec2,
    pub vel: Vec2,
}

/// Per-game content: field, spawns, volleys and enemy behaviour
pub trait Ruleset: std::fmt::Debug + Send {
    fn kind(&self) -> GameKind;

    fn field(&self) -> PlayField;

    fn player_radius(&self) -> f32;

    fn starting_ammo(&self) -> Option<Ammo> {
        None
    }

    fn starting_throttle(&self) -> f32 {
        0.0
    }

    fn spawn_schedule(&self) -> SpawnSchedule;

    fn spawn_enemy(&self, rng: &mut ChaCha8Rng, field: &PlayField, level: u32) -> GameObject;

    fn spawn_obstacle(&self, rng: &mut ChaCha8Rng, field: &PlayField) -> GameObject;

    fn spawn_pickup(&self, _rng: &mut ChaCha8Rng, _field: &PlayField) -> Option<GameObject> {
        None
    }

    /// Projectiles one `Fire(weapon)` launches
    fn volley(&self, weapon: WeaponKind, stats: &WeaponStats, player: &Player) -> Vec<Launch>;

    /// Per-tick enemy course changes
    fn steer_enemy(&self, _rng: &mut ChaCha8Rng, _vel: &mut Vec2, _dt: f32) {}

    /// Extra downward drift applied to enemies and obstacles (px/s)
    fn scroll_speed(&self, _player: &Player) -> f32 {
        0.0
    }
}

/// Radius-burst ability stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstStats {
    pub radius: f32,
    pub damage: f32,
    pub invulnerable_ticks: u32,
    pub cooldown_ticks: u32,
}

/// Shield, burst and dash tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityStats {
    pub special: BurstStats,
    pub barrel_roll: BurstStats,
    pub shield_ticks: u32,
    pub shield_charges: u32,
    pub shield_recharge_ticks: u32,
    pub dash_distance: f32,
    pub dash_cooldown_ticks: u32,
}

impl Default for AbilityStats {
    fn default() -> Self {
        Self {
            special: BurstStats {
                radius: 100.0,
                damage: 10.0,
                invulnerable_ticks: 15,
                cooldown_ticks: secs_to_ticks(3.0),
            },
            barrel_roll: BurstStats {
                radius: 120.0,
                damage: 10.0,
                invulnerable_ticks: 30,
                cooldown_ticks: secs_to_ticks(3.0),
            },
            shield_ticks: secs_to_ticks(5.0),
            shield_charges: 3,
            shield_recharge_ticks: secs_to_ticks(20.0),
            dash_distance: 120.0,
            dash_cooldown_ticks: 10,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub mode: HandMode,
    pub starting_lives: u32,
    pub max_lives: u32,
    pub max_objects: usize,
    pub difficulty_ramp: f32,
    /// Off only for scripted tests and demos
    pub spawns_enabled: bool,
    pub seed: u64,
    pub abilities: AbilityStats,
    /// Replaces the game's default weapon table
    pub weapons: Option<WeaponTable>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: HandMode::Single,
            starting_lives: 3,
            max_lives: 5,
            max_objects: 1024,
            difficulty_ramp: 1.0,
            spawns_enabled: true,
            seed: 0,
            abilities: AbilityStats::default(),
            weapons: None,
        }
    }
}

impl SimConfig {
    /// Lives must start in `1..=max_lives`
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(SimulationError::LivesOutOfBounds {
                lives: self.starting_lives,
                max: self.max_lives,
            });
        }
        Ok(())
    }
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub frame: RenderFrame,
    pub events: Vec<GameEvent>,
}

/// The authoritative game simulation
#[derive(Debug)]
pub struct Simulation {
    rules: Box<dyn Ruleset>,
    config: SimConfig,
    weapons: WeaponTable,
    spawner: Spawner,
    rng: ChaCha8Rng,
    state: GameState,
    next_id: u64,
    events: Vec<GameEvent>,
}

impl Simulation {
    pub fn new(game: GameKind, config: SimConfig) -> Self {
        let rules: Box<dyn Ruleset> = match game {
            GameKind::Shooter => Box::new(ShooterRules),
            GameKind::Flight => Box::new(FlightRules),
        };
        Self::with_rules(rules, config)
    }

    /// Like `new`, but rejects an out-of-range config
    pub fn try_new(game: GameKind, config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self::new(game, config))
    }

    pub fn with_rules(rules: Box<dyn Ruleset>, config: SimConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid SimConfig: {:?}", config);
        let field = rules.field();
        let weapons = config
            .weapons
            .clone()
            .unwrap_or_else(|| WeaponTable::for_game(rules.kind()));
        let player = Player {
            pos: Vec2::new(field.width / 2.0, field.height - 80.0),
            radius: rules.player_radius(),
            banking: 0.0,
            throttle: rules.starting_throttle(),
            shield_ticks: 0,
            shield_charges: config.abilities.shield_charges,
            shield_recharge_ticks: 0,
            invulnerable_ticks: 0,
            special_cooldown: 0,
            dash_cooldown: 0,
            cooldowns: Default::default(),
            ammo: rules.starting_ammo(),
        };
        let state = GameState {
            game: rules.kind(),
            mode: config.mode,
            phase: SessionPhase::Playing,
            field,
            tick: 0,
            elapsed: 0.0,
            score: 0,
            lives: config.starting_lives,
            max_lives: config.max_lives,
            level: 1,
            player,
            objects: Vec::new(),
        };
        let spawner = Spawner::new(
            rules.spawn_schedule(),
            DifficultyRamp {
                rate: config.difficulty_ramp,
            },
        );

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            rules,
            config,
            weapons,
            spawner,
            state,
            next_id: 0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Frame of the current state without advancing
    pub fn frame(&self) -> RenderFrame {
        render::build(&self.state)
    }

    /// Returns true if the phase changed
    pub fn pause(&mut self) -> bool {
        if self.state.phase == SessionPhase::Playing {
            self.state.phase = SessionPhase::Paused;
            return true;
        }
        false
    }

    /// Returns true if the phase changed
    pub fn resume(&mut self) -> bool {
        if self.state.phase == SessionPhase::Paused {
            self.state.phase = SessionPhase::Playing;
            return true;
        }
        false
    }

    /// Add an object, assigning its id
    pub fn insert_object(&mut self, mut object: GameObject) -> Result<u64, SimulationError> {
        let count = self.state.objects.len() + 1;
        if count > self.config.max_objects {
            return Err(SimulationError::ObjectOverflow {
                count,
                max: self.config.max_objects,
            });
        }
        self.next_id += 1;
        object.id = self.next_id;
        self.state.objects.push(object);
        Ok(self.next_id)
    }

    /// Advance one tick of `dt` seconds
    pub fn tick(
        &mut self,
        commands: &[ControlCommand],
        dt: f32,
    ) -> Result<TickOutput, SimulationError> {
        self.events.clear();
        match self.state.phase {
            SessionPhase::Playing => self.run_playing_tick(commands, dt)?,
            SessionPhase::Paused => {}
            SessionPhase::GameOver => self.animate_effects(dt),
        }
        Ok(TickOutput {
            frame: render::build(&self.state),
            events: std::mem::take(&mut self.events),
        })
    }

    fn run_playing_tick(
        &mut self,
        commands: &[ControlCommand],
        dt: f32,
    ) -> Result<(), SimulationError> {
        let score_before = self.state.score;
        let level_before = self.state.level;
        self.state.tick += 1;
        self.state.elapsed += dt;

        for command in commands {
            self.apply_command(*command)?;
        }
        if self.config.spawns_enabled {
            self.run_spawns(dt)?;
        }
        self.advance_objects(dt)?;
        self.resolve_projectile_hits(dt)?;
        self.age_projectiles(dt);
        self.resolve_player_contacts()?;
        self.collect_pickups();
        self.cull();
        self.update_timers();

        self.state.level = level_for(self.state.score);
        if self.state.level > level_before {
            info!(level = self.state.level, score = self.state.score, "Level up");
            self.events.push(GameEvent::LevelUp {
                level: self.state.level,
            });
        }

        self.check_invariants(score_before)?;

        if self.state.lives == 0 {
            self.state.phase = SessionPhase::GameOver;
            info!(
                game = self.state.game.as_str(),
                final_score = self.state.score,
                level = self.state.level,
                ticks = self.state.tick,
                "Game over"
            );
            self.events.push(GameEvent::GameOver {
                final_score: self.state.score,
            });
        }
        Ok(())
    }

    fn apply_command(&mut self, command: ControlCommand) -> Result<(), SimulationError> {
        match command {
            ControlCommand::MoveTo { x, y } => {
                if !(x.is_finite() && y.is_finite()) {
                    return Ok(());
                }
                let field = self.state.field;
                let target = field.map_normalized(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
                let player = &mut self.state.player;
                player.pos = field.clamp_inside(target, player.radius);
            }
            ControlCommand::Fire(weapon) => self.fire(weapon)?,
            ControlCommand::ActivateShield => self.activate_shield(),
            ControlCommand::SpecialAttack => self.burst(self.config.abilities.special)?,
            ControlCommand::BarrelRoll => self.burst(self.config.abilities.barrel_roll)?,
            ControlCommand::SetThrottle(delta) => {
                if delta.is_finite() {
                    let player = &mut self.state.player;
                    player.throttle = (player.throttle + delta).clamp(0.0, 1.0);
                }
            }
            ControlCommand::Bank(degrees) => {
                if degrees.is_finite() {
                    self.state.player.banking = degrees.clamp(-45.0, 45.0);
                }
            }
            ControlCommand::Dash(direction) => self.dash(direction),
        }
        Ok(())
    }

    fn fire(&mut self, weapon: WeaponKind) -> Result<(), SimulationError> {
        let stats = *self.weapons.get(weapon);
        {
            let player = &mut self.state.player;
            if !player.cooldowns.ready(weapon) {
                return Ok(());
            }
            if let Some(ammo) = player.ammo.as_mut() {
                if !ammo.take(weapon) {
                    debug!(weapon = weapon.as_str(), "Out of ammo");
                    return Ok(());
                }
            }
            player.cooldowns.trigger(weapon, stats.cooldown_ticks);
        }

        let origin = self.state.player.pos;
        let launches = self.rules.volley(weapon, &stats, &self.state.player);
        let count = launches.len() as u32;
        for launch in launches {
            let data = ProjectileData {
                weapon,
                damage: stats.damage,
                homing_fuel: stats.homing_fuel.unwrap_or(0.0),
                turn_rate: stats.turn_rate,
                blast_radius: stats.blast_radius,
                fuse: stats.fuse,
                gravity: stats.gravity,
            };
            let projectile = GameObject::new(
                ObjectKind::Projectile(data),
                origin + launch.offset,
                launch.vel,
                stats.projectile_radius,
                1.0,
            )
            .with_ttl(stats.projectile_lifetime);
            self.insert_object(projectile)?;
        }
        self.events.push(GameEvent::Fired {
            weapon,
            projectiles: count,
        });
        Ok(())
    }

    fn activate_shield(&mut self) {
        let duration = self.config.abilities.shield_ticks;
        let player = &mut self.state.player;
        if player.shield_active() || player.shield_charges == 0 {
            return;
        }
        player.shield_charges -= 1;
        player.shield_ticks = duration;
        self.events.push(GameEvent::ShieldActivated {
            charges_left: player.shield_charges,
        });
    }

    /// Radius attack centred on the player with brief invulnerability
    fn burst(&mut self, stats: BurstStats) -> Result<(), SimulationError> {
        let center = {
            let player = &mut self.state.player;
            if player.special_cooldown > 0 {
                return Ok(());
            }
            player.special_cooldown = stats.cooldown_ticks;
            player.invulnerable_ticks = player.invulnerable_ticks.max(stats.invulnerable_ticks);
            player.pos
        };
        self.events.push(GameEvent::Burst {
            radius: stats.radius,
        });
        self.area_damage(center, stats.radius, stats.damage, false)?;
        let ring = GameObject::effect(
            EffectKind::Shockwave,
            center,
            10.0,
            (stats.radius - 10.0) / 0.4,
            0.4,
        );
        self.insert_object(ring)?;
        Ok(())
    }

    fn dash(&mut self, direction: f32) {
        let distance = self.config.abilities.dash_distance;
        let cooldown = self.config.abilities.dash_cooldown_ticks;
        let field = self.state.field;
        let player = &mut self.state.player;
        if player.dash_cooldown > 0 || !direction.is_finite() || direction == 0.0 {
            return;
        }
        let target = player.pos + Vec2::new(direction.signum() * distance, 0.0);
        player.pos = field.clamp_inside(target, player.radius);
        player.dash_cooldown = cooldown;
        self.events.push(GameEvent::Dashed { x: player.pos.x });
    }

    fn run_spawns(&mut self, dt: f32) -> Result<(), SimulationError> {
        let due = self
            .spawner
            .advance(dt, self.state.score, self.state.elapsed);
        let field = self.state.field;

        if due.enemy {
            let enemy = self
                .rules
                .spawn_enemy(&mut self.rng, &field, self.state.level);
            self.insert_object(enemy)?;
            debug!(
                interval = self.spawner.enemy_interval(self.state.score, self.state.elapsed),
                "Enemy spawned"
            );
        }
        if due.obstacle {
            let obstacle = self.rules.spawn_obstacle(&mut self.rng, &field);
            self.insert_object(obstacle)?;
        }
        if due.pickup {
            if let Some(pickup) = self.rules.spawn_pickup(&mut self.rng, &field) {
                self.insert_object(pickup)?;
            }
        }
        Ok(())
    }

    fn advance_objects(&mut self, dt: f32) -> Result<(), SimulationError> {
        let scroll = Vec2::new(0.0, self.rules.scroll_speed(&self.state.player));
        let enemies: Vec<(u64, Vec2)> = self
            .state
            .objects
            .iter()
            .filter(|o| matches!(o.kind, ObjectKind::Enemy { .. }) && o.health > 0.0)
            .map(|o| (o.id, o.pos))
            .collect();

        let rules = &self.rules;
        let rng = &mut self.rng;
        let mut detonations = Vec::new();

        for obj in self.state.objects.iter_mut() {
            match &mut obj.kind {
                ObjectKind::Projectile(data) => {
                    if data.homing_fuel > 0.0 {
                        if let Some((_, target)) =
                            PhysicsSystem::nearest(obj.pos, enemies.iter().copied())
                        {
                            obj.vel = PhysicsSystem::steer_toward(
                                obj.pos,
                                obj.vel,
                                target,
                                data.turn_rate,
                                dt,
                            );
                        }
                        data.homing_fuel = (data.homing_fuel - dt).max(0.0);
                    }
                    obj.vel.y += data.gravity * dt;
                    obj.pos = PhysicsSystem::integrate(obj.pos, obj.vel, dt);
                    if let Some(fuse) = data.fuse.as_mut() {
                        *fuse -= dt;
                        if *fuse <= 0.0 {
                            let radius = data.blast_radius.unwrap_or(obj.radius);
                            detonations.push((obj.pos, radius, data.damage));
                            obj.ttl = Some(0.0);
                        }
                    }
                }
                ObjectKind::Enemy { .. } => {
                    rules.steer_enemy(rng, &mut obj.vel, dt);
                    obj.pos = PhysicsSystem::integrate(obj.pos, obj.vel + scroll, dt);
                }
                ObjectKind::Obstacle { .. } => {
                    obj.pos = PhysicsSystem::integrate(obj.pos, obj.vel + scroll, dt);
                }
                ObjectKind::Pickup(_) => {
                    obj.pos = PhysicsSystem::integrate(obj.pos, obj.vel, dt);
                }
                ObjectKind::Effect { growth, .. } => {
                    obj.radius = (obj.radius + *growth * dt).max(0.0);
                }
            }
            // Projectiles age in `age_projectiles`, after the hit pass
            if matches!(obj.kind, ObjectKind::Projectile(_)) {
                continue;
            }
            if let Some(ttl) = obj.ttl.as_mut() {
                *ttl -= dt;
            }
        }

        for (pos, radius, damage) in detonations {
            self.detonate(pos, radius, damage)?;
        }
        Ok(())
    }

    /// Each live projectile hits at most one live target per tick.
    /// Killed targets stop absorbing hits immediately.
    fn resolve_projectile_hits(&mut self, dt: f32) -> Result<(), SimulationError> {
        let count = self.state.objects.len();
        for pi in 0..count {
            let (end, start, radius, data) = {
                let p = &self.state.objects[pi];
                match p.kind {
                    ObjectKind::Projectile(data) if !is_expired(p) => {
                        (p.pos, p.pos - p.vel * dt, p.radius, data)
                    }
                    _ => continue,
                }
            };

            let Some(ti) = self.state.objects.iter().position(|t| {
                t.is_alive_target()
                    && PhysicsSystem::swept_overlap(start, end, radius, t.pos, t.radius)
            }) else {
                continue;
            };
            self.state.objects[pi].ttl = Some(0.0);

            if let Some(blast) = data.blast_radius {
                self.detonate(end, blast, data.damage)?;
                continue;
            }

            let target = &mut self.state.objects[ti];
            let (health, killed) = CombatSystem::apply_damage(target.health, data.damage);
            target.health = health;
            let (id, pos, points) = (target.id, target.pos, target.kind.points());
            self.events.push(GameEvent::Hit {
                target_id: id,
                damage: data.damage,
            });
            if killed {
                self.destroyed(id, pos, points)?;
            }
        }
        Ok(())
    }

    fn age_projectiles(&mut self, dt: f32) {
        for obj in self.state.objects.iter_mut() {
            if let (ObjectKind::Projectile(_), Some(ttl)) = (&obj.kind, obj.ttl.as_mut()) {
                *ttl -= dt;
            }
        }
    }

    fn detonate(&mut self, pos: Vec2, radius: f32, damage: f32) -> Result<(), SimulationError> {
        self.events.push(GameEvent::Detonated {
            x: pos.x,
            y: pos.y,
            radius,
        });
        self.area_damage(pos, radius, damage, true)?;
        self.insert_object(GameObject::effect(
            EffectKind::Blast,
            pos,
            radius * 0.3,
            radius * 1.4,
            0.5,
        ))?;
        Ok(())
    }

    fn area_damage(
        &mut self,
        center: Vec2,
        radius: f32,
        damage: f32,
        falloff: bool,
    ) -> Result<(), SimulationError> {
        let mut kills = Vec::new();
        for obj in self.state.objects.iter_mut() {
            if !obj.is_alive_target() {
                continue;
            }
            let distance = center.distance(obj.pos);
            if distance > radius + obj.radius {
                continue;
            }
            let dealt = if falloff {
                CombatSystem::blast_damage(damage, distance, radius)
            } else {
                damage
            };
            let (health, killed) = CombatSystem::apply_damage(obj.health, dealt);
            obj.health = health;
            self.events.push(GameEvent::Hit {
                target_id: obj.id,
                damage: dealt,
            });
            if killed {
                kills.push((obj.id, obj.pos, obj.kind.points()));
            }
        }
        for (id, pos, points) in kills {
            self.destroyed(id, pos, points)?;
        }
        Ok(())
    }

    /// Score a kill and leave an explosion behind
    fn destroyed(&mut self, id: u64, pos: Vec2, points: u64) -> Result<(), SimulationError> {
        self.state.score = self.state.score.saturating_add(points);
        self.events.push(GameEvent::Destroyed {
            target_id: id,
            points,
        });
        self.insert_object(GameObject::effect(
            EffectKind::Explosion,
            pos,
            8.0,
            60.0,
            0.6,
        ))?;
        Ok(())
    }

    /// At most one life is lost per tick
    fn resolve_player_contacts(&mut self) -> Result<(), SimulationError> {
        let player = &self.state.player;
        let (pos, radius) = (player.pos, player.radius);
        let (shielded, invulnerable) = (player.shield_active(), player.invulnerable());

        let touching: Vec<usize> = self
            .state
            .objects
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                o.is_alive_target()
                    && PhysicsSystem::circles_overlap(pos, radius, o.pos, o.radius)
            })
            .map(|(i, _)| i)
            .collect();

        for i in touching {
            let target = &mut self.state.objects[i];
            target.health = 0.0;
            let (id, target_pos, points) = (target.id, target.pos, target.kind.points());

            if invulnerable {
                self.destroyed(id, target_pos, points)?;
                continue;
            }

            self.insert_object(GameObject::effect(
                EffectKind::Explosion,
                target_pos,
                8.0,
                60.0,
                0.6,
            ))?;

            if shielded {
                self.events.push(GameEvent::ShieldAbsorbed { target_id: id });
                continue;
            }

            self.state.lives = self
                .state
                .lives
                .checked_sub(1)
                .ok_or(SimulationError::LivesUnderflow)?;
            info!(lives = self.state.lives, "Player hit");
            self.events.push(GameEvent::PlayerHit {
                lives_left: self.state.lives,
            });
            break;
        }
        Ok(())
    }

    fn collect_pickups(&mut self) {
        let player = &self.state.player;
        let (pos, radius) = (player.pos, player.radius);
        for obj in self.state.objects.iter_mut() {
            let ObjectKind::Pickup(kind) = obj.kind else {
                continue;
            };
            if is_expired(obj) || !PhysicsSystem::circles_overlap(pos, radius, obj.pos, obj.radius)
            {
                continue;
            }
            obj.ttl = Some(0.0);
            match kind {
                PickupKind::Heart => {
                    self.state.lives = (self.state.lives + 1).min(self.state.max_lives);
                }
                _ => {
                    self.state.score = self.state.score.saturating_add(kind.points());
                }
            }
            self.events.push(GameEvent::PickupCollected { pickup: kind });
        }
    }

    fn cull(&mut self) {
        let field = self.state.field;
        self.state.objects.retain(|o| {
            !is_expired(o) && !(o.kind.is_target() && o.health <= 0.0) && !field.is_outside(o.pos)
        });
    }

    fn update_timers(&mut self) {
        let abilities = self.config.abilities;
        let player = &mut self.state.player;
        player.cooldowns.tick_down();
        player.shield_ticks = player.shield_ticks.saturating_sub(1);
        player.invulnerable_ticks = player.invulnerable_ticks.saturating_sub(1);
        player.special_cooldown = player.special_cooldown.saturating_sub(1);
        player.dash_cooldown = player.dash_cooldown.saturating_sub(1);

        if player.shield_charges < abilities.shield_charges {
            if player.shield_recharge_ticks == 0 {
                player.shield_recharge_ticks = abilities.shield_recharge_ticks.max(1);
            }
            player.shield_recharge_ticks -= 1;
            if player.shield_recharge_ticks == 0 {
                player.shield_charges += 1;
            }
        }
    }

    /// After game over only effects keep animating
    fn animate_effects(&mut self, dt: f32) {
        for obj in self.state.objects.iter_mut() {
            if let ObjectKind::Effect { growth, .. } = obj.kind {
                obj.radius = (obj.radius + growth * dt).max(0.0);
                if let Some(ttl) = obj.ttl.as_mut() {
                    *ttl -= dt;
                }
            }
        }
        self.state
            .objects
            .retain(|o| !(matches!(o.kind, ObjectKind::Effect { .. }) && is_expired(o)));
    }

    fn check_invariants(&self, score_before: u64) -> Result<(), SimulationError> {
        let count = self.state.objects.len();
        if count > self.config.max_objects {
            return Err(SimulationError::ObjectOverflow {
                count,
                max: self.config.max_objects,
            });
        }
        if self.state.lives > self.state.max_lives {
            return Err(SimulationError::LivesOutOfBounds {
                lives: self.state.lives,
                max: self.state.max_lives,
            });
        }
        if self.state.score < score_before {
            return Err(SimulationError::ScoreRegression {
                before: score_before,
                after: self.state.score,
            });
        }
        Ok(())
    }
}

fn is_expired(obj: &GameObject) -> bool {
    obj.ttl.is_some_and(|t| t <= 0.0)
}
