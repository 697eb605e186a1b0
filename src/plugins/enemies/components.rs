use std::time::Duration;

use bevy::prelude::*;

use crate::plugins::pool::{PoolHandle, SPAWNS_POOL, SpawnPools, TemplateId};

#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Enemy;

/// Authored enemy configuration. Never mutated at runtime.
#[derive(Component, Debug, Clone)]
pub struct EnemyProfile {
    pub max_health: i32,
    /// Authored only. The debris sweep draws its impulse from `Tunables`.
    pub explosion_force: f32,
    pub score_points: u32,
    /// Name of the debris template to leave behind. `None` means the enemy dies
    /// without a visible replacement (barriers, crates).
    pub explode_template: Option<String>,
    pub debris_pool: String,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            max_health: 1,
            explosion_force: 15.0,
            score_points: 8,
            explode_template: None,
            debris_pool: SPAWNS_POOL.to_owned(),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub normal: Color,
    pub hit: Color,
    pub blink: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            normal: Color::srgb(0.9, 0.25, 0.25),
            hit: Color::srgb(1.0, 0.85, 0.85),
            blink: Color::srgb(0.35, 0.65, 1.0),
        }
    }
}

/// Enemy life cycle within one activation.
///
/// The exploding step runs start to finish inside `Exploder::explode`, so other
/// systems only ever observe these two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyLifeState {
    #[default]
    Alive,
    Exploded,
}

/// Mutable per-activation state. `reset` is the single source of "fresh enemy".
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EnemyStatus {
    current_health: i32,
    life: EnemyLifeState,
    active_in_pool: bool,
}

impl EnemyStatus {
    pub fn new(max_health: i32) -> Self {
        Self {
            current_health: max_health,
            life: EnemyLifeState::Alive,
            active_in_pool: false,
        }
    }

    pub fn reset(&mut self, max_health: i32) {
        *self = Self::new(max_health);
    }

    #[inline]
    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    #[inline]
    pub fn life(&self) -> EnemyLifeState {
        self.life
    }

    #[inline]
    pub fn has_exploded(&self) -> bool {
        self.life == EnemyLifeState::Exploded
    }

    #[inline]
    pub fn is_active_in_pool(&self) -> bool {
        self.active_in_pool
    }

    /// Subtract damage. Returns `true` when health is depleted.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current_health = self.current_health.saturating_sub(amount);
        self.current_health <= 0
    }

    pub(crate) fn mark_exploded(&mut self) {
        self.life = EnemyLifeState::Exploded;
    }

    /// Returns `false` if this activation was already handled.
    pub(crate) fn activate(&mut self) -> bool {
        if self.active_in_pool {
            return false;
        }
        self.active_in_pool = true;
        true
    }
}

/// Local translation at authoring time.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HomePosition(pub Vec3);

/// Non-owning references resolved once at initialization.
#[derive(Component, Debug, Default, Clone)]
pub struct EnemyLinks {
    pub feedback: Vec<Entity>,
    pub restorables: Vec<Entity>,
    pub debris: Option<DebrisSource>,
}

/// Pool and template the enemy's debris comes from, resolved from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebrisSource {
    pub pool: PoolHandle,
    pub template: Option<TemplateId>,
}

impl DebrisSource {
    /// Resolve profile names against the pools. Unknown names are authoring errors.
    pub fn resolve(pools: &SpawnPools, profile: &EnemyProfile) -> Self {
        let pool = pools
            .lookup_by_name(&profile.debris_pool)
            .unwrap_or_else(|| panic!("no spawn pool named {:?}", profile.debris_pool));
        let template = profile.explode_template.as_deref().map(|name| {
            pools
                .pool(pool)
                .template_by_name(name)
                .unwrap_or_else(|| panic!("pool {:?} has no template {name:?}", profile.debris_pool))
        });
        Self { pool, template }
    }
}

/// Which colour the blink cycle is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Blink,
    Normal,
}

impl BlinkPhase {
    #[inline]
    fn flipped(self) -> Self {
        match self {
            Self::Blink => Self::Normal,
            Self::Normal => Self::Blink,
        }
    }

    pub fn color(self, scheme: &ColorScheme) -> Color {
        match self {
            Self::Blink => scheme.blink,
            Self::Normal => scheme.normal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlinkTask {
    timer: Timer,
    phase: BlinkPhase,
}

/// Periodic blink cycle, at most one per enemy.
///
/// The task is polled by `tick_blink`; cancelling just drops it, the poller
/// observes that on its next pass.
#[derive(Component, Debug, Default, Clone)]
pub struct Blink {
    task: Option<BlinkTask>,
}

impl Blink {
    /// Cancel-then-start. Returns the phase to show right away.
    pub fn start(&mut self, interval_secs: f32) -> BlinkPhase {
        self.task = Some(BlinkTask {
            timer: Timer::from_seconds(interval_secs, TimerMode::Repeating),
            phase: BlinkPhase::Blink,
        });
        BlinkPhase::Blink
    }

    /// Returns `true` if a task was running.
    pub fn cancel(&mut self) -> bool {
        self.task.take().is_some()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn phase(&self) -> Option<BlinkPhase> {
        self.task.as_ref().map(|t| t.phase)
    }

    /// Advance the cycle and return every phase entered during this tick, in order.
    pub fn tick(&mut self, delta: Duration) -> Vec<BlinkPhase> {
        let Some(task) = self.task.as_mut() else {
            return Vec::new();
        };
        task.timer.tick(delta);
        (0..task.timer.times_finished_this_tick())
            .map(|_| {
                task.phase = task.phase.flipped();
                task.phase
            })
            .collect()
    }
}
