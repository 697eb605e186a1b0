//! Named spawn pools for prefab-like entity templates.
//!
//! # Contract
//! - `SpawnPools::lookup_by_name` resolves a pool once; callers keep the `PoolHandle`.
//! - `SpawnPool::spawn` returns a usable `Entity` immediately. The instance is either
//!   popped from the free list or built fresh from its template.
//! - `SpawnPool::despawn` hides the instance and pushes it back on the free list.
//!   Nothing is ever despawned from the world during play.
//! - Both directions queue a `PoolNotice` that `broadcast_pool_notices` publishes as a
//!   message at the start of the next frame. Instances react to their own notices
//!   (enemies reset, debris parks itself).
//!
//! Pools are data-driven: a template is a name plus a builder function, so the pool
//! never needs to know what it is storing.

use bevy::prelude::*;

/// Name of the pool that holds gameplay spawns (enemies and their debris).
pub const SPAWNS_POOL: &str = "Spawns";

/// Builds one fresh, hidden instance of a template.
pub type BuildFn = fn(&mut Commands) -> Entity;

#[derive(Clone, Debug)]
pub struct EntityTemplate {
    pub name: &'static str,
    pub build: BuildFn,
    pub prewarm: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemplateId(u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle(u16);

/// Marks an entity as owned by a pool.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pooled {
    pub pool: PoolHandle,
    pub template: TemplateId,
}

/// Activation broadcast from a pool to one of its instances.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolNotice {
    Spawned(Entity),
    Despawned(Entity),
}

/// Parent frame for a spawn: the entity and its current global transform.
#[derive(Clone, Copy, Debug)]
pub struct SpawnParent {
    pub entity: Entity,
    pub frame: GlobalTransform,
}

#[derive(Debug)]
struct TemplateSlot {
    template: EntityTemplate,
    free: Vec<Entity>,
    live: usize,
}

#[derive(Debug)]
pub struct SpawnPool {
    name: String,
    handle: PoolHandle,
    slots: Vec<TemplateSlot>,
    pending: Vec<PoolNotice>,
}

impl SpawnPool {
    fn new(name: &str, handle: PoolHandle) -> Self {
        Self {
            name: name.to_owned(),
            handle,
            slots: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> PoolHandle {
        self.handle
    }

    pub fn register(&mut self, template: EntityTemplate) -> TemplateId {
        let id = TemplateId(self.slots.len() as u16);
        self.slots.push(TemplateSlot { template, free: Vec::new(), live: 0 });
        id
    }

    pub fn template_by_name(&self, name: &str) -> Option<TemplateId> {
        self.slots
            .iter()
            .position(|s| s.template.name == name)
            .map(|i| TemplateId(i as u16))
    }

    fn slot_mut(&mut self, template: TemplateId) -> &mut TemplateSlot {
        let pool = &self.name;
        self.slots
            .get_mut(template.0 as usize)
            .unwrap_or_else(|| panic!("unknown template {template:?} in pool {pool}"))
    }

    pub fn free_count(&self, template: TemplateId) -> usize {
        self.slots.get(template.0 as usize).map_or(0, |s| s.free.len())
    }

    pub fn live_count(&self, template: TemplateId) -> usize {
        self.slots.get(template.0 as usize).map_or(0, |s| s.live)
    }

    fn build(&mut self, commands: &mut Commands, template: TemplateId) -> Entity {
        let handle = self.handle;
        let slot = self.slot_mut(template);
        let e = (slot.template.build)(commands);
        commands
            .entity(e)
            .insert((Pooled { pool: handle, template }, Visibility::Hidden));
        e
    }

    /// Build instances until each template has its prewarm count on the free list.
    pub fn prewarm(&mut self, commands: &mut Commands) {
        for i in 0..self.slots.len() {
            let template = TemplateId(i as u16);
            while self.slots[i].free.len() < self.slots[i].template.prewarm {
                let e = self.build(commands, template);
                self.slots[i].free.push(e);
            }
        }
    }

    /// Place an instance at a world pose, optionally under a parent.
    pub fn spawn(
        &mut self,
        commands: &mut Commands,
        template: TemplateId,
        position: Vec3,
        rotation: Quat,
        parent: Option<SpawnParent>,
    ) -> Entity {
        let e = match self.slot_mut(template).free.pop() {
            Some(e) => e,
            None => {
                debug!("pool {} grows template {:?}", self.name, template);
                self.build(commands, template)
            }
        };
        self.slot_mut(template).live += 1;

        let world = Transform::from_translation(position).with_rotation(rotation);
        let mut ec = commands.entity(e);
        match parent {
            Some(p) => {
                let local = GlobalTransform::from(world).reparented_to(&p.frame);
                ec.insert((local, ChildOf(p.entity)));
            }
            None => {
                ec.insert(world).remove::<ChildOf>();
            }
        }
        ec.insert(Visibility::Visible);

        self.pending.push(PoolNotice::Spawned(e));
        e
    }

    /// Return an instance. Returns `false` if it is not a live instance of this pool.
    pub fn despawn(&mut self, commands: &mut Commands, instance: Entity, pooled: Pooled) -> bool {
        if pooled.pool != self.handle {
            return false;
        }
        let slot = self.slot_mut(pooled.template);
        if slot.free.contains(&instance) {
            debug!("pool {}: {instance:?} is already free", self.name);
            return false;
        }
        slot.live = slot.live.saturating_sub(1);
        slot.free.push(instance);

        commands
            .entity(instance)
            .insert(Visibility::Hidden)
            .remove::<ChildOf>();

        self.pending.push(PoolNotice::Despawned(instance));
        true
    }

    fn drain_pending(&mut self) -> std::vec::Drain<'_, PoolNotice> {
        self.pending.drain(..)
    }
}

#[derive(Resource, Debug, Default)]
pub struct SpawnPools {
    pools: Vec<SpawnPool>,
}

impl SpawnPools {
    /// Create a pool, or return the existing one with that name.
    pub fn create(&mut self, name: &str) -> PoolHandle {
        if let Some(handle) = self.lookup_by_name(name) {
            return handle;
        }
        let handle = PoolHandle(self.pools.len() as u16);
        self.pools.push(SpawnPool::new(name, handle));
        handle
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<PoolHandle> {
        self.pools.iter().find(|p| p.name == name).map(|p| p.handle)
    }

    pub fn pool(&self, handle: PoolHandle) -> &SpawnPool {
        &self.pools[handle.0 as usize]
    }

    pub fn pool_mut(&mut self, handle: PoolHandle) -> &mut SpawnPool {
        &mut self.pools[handle.0 as usize]
    }

    /// Return an instance to whichever pool owns it.
    pub fn despawn(&mut self, commands: &mut Commands, instance: Entity, pooled: Pooled) -> bool {
        match self.pools.get_mut(pooled.pool.0 as usize) {
            Some(pool) => pool.despawn(commands, instance, pooled),
            None => false,
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<PoolNotice>();
    app.init_resource::<SpawnPools>();
    app.add_systems(Startup, prewarm_pools);
    app.add_systems(PreUpdate, broadcast_pool_notices);
}

/// Register a template in a named pool unless a template with that name exists.
///
/// Feature plugins call this while the app is being built, so every template is
/// known before the first state transition spawns anything.
pub fn register_template(pools: &mut SpawnPools, pool_name: &str, template: EntityTemplate) -> TemplateId {
    let handle = pools.create(pool_name);
    let pool = pools.pool_mut(handle);
    match pool.template_by_name(template.name) {
        Some(id) => id,
        None => pool.register(template),
    }
}

pub fn prewarm_pools(mut commands: Commands, mut pools: ResMut<SpawnPools>) {
    for pool in &mut pools.pools {
        pool.prewarm(&mut commands);
        info!("pool {} prewarmed with {} templates", pool.name, pool.slots.len());
    }
}

/// Publish queued spawn/despawn notices.
pub fn broadcast_pool_notices(
    mut pools: ResMut<SpawnPools>,
    mut writer: MessageWriter<PoolNotice>,
) {
    for pool in &mut pools.pools {
        for notice in pool.drain_pending() {
            writer.write(notice);
        }
    }
}
