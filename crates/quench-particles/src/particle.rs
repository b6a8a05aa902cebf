//! Particle records and the fixed-capacity pool that holds them

use quench_core::{QuenchError, Result, Rgb, Vec3};

/// Simulation state shared by every particle kind
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining time to live in seconds
    pub life: f32,
    /// Time to live at spawn
    pub max_life: f32,
    /// Base size rolled at spawn
    pub size: f32,
    /// Size after curves, as written to the render buffers
    pub current_size: f32,
    pub color: Rgb,
    pub alpha: f32,
    /// Billboard angle in radians
    pub rotation: f32,
    pub rotation_rate: f32,
    pub alive: bool,
}

impl Particle {
    pub fn dead() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: 0.0,
            max_life: 0.0,
            size: 0.0,
            current_size: 0.0,
            color: Rgb::BLACK,
            alpha: 0.0,
            rotation: 0.0,
            rotation_rate: 0.0,
            alive: false,
        }
    }

    /// Elapsed fraction of life, `1 - life/max_life`, in [0, 1]
    pub fn age(&self) -> f32 {
        if self.max_life <= 0.0 {
            1.0
        } else {
            (1.0 - self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    pub fn is_expired(&self) -> bool {
        !self.alive || self.life <= 0.0
    }
}

/// Foam droplet: a particle plus its airborne/grounded phase
#[derive(Clone, Debug)]
pub struct FoamParticle {
    pub particle: Particle,
    /// Set once on floor contact, never cleared
    pub grounded: bool,
    /// Seconds spent on the floor
    pub ground_time: f32,
}

/// Anything that can live in a [`ParticlePool`]
pub trait Pooled {
    fn dead() -> Self;
    fn particle(&self) -> &Particle;
    fn particle_mut(&mut self) -> &mut Particle;
}

impl Pooled for Particle {
    fn dead() -> Self {
        Particle::dead()
    }

    fn particle(&self) -> &Particle {
        self
    }

    fn particle_mut(&mut self) -> &mut Particle {
        self
    }
}

impl Pooled for FoamParticle {
    fn dead() -> Self {
        Self {
            particle: Particle::dead(),
            grounded: false,
            ground_time: 0.0,
        }
    }

    fn particle(&self) -> &Particle {
        &self.particle
    }

    fn particle_mut(&mut self) -> &mut Particle {
        &mut self.particle
    }
}

/// Largest pool any single system may allocate
pub const MAX_POOL_SLOTS: usize = 1 << 20;

/// Pool size for a steady emitter: `ceil(rate * max_life * headroom)`, or the explicit cap.
///
/// Fails with `ValueOutOfRange` on `<system>.rate` or `<system>.max_particles`
/// when the size exceeds [`MAX_POOL_SLOTS`].
pub fn pool_capacity(
    system: &str,
    rate: f32,
    max_life: f32,
    headroom: f32,
    explicit: Option<usize>,
) -> Result<usize> {
    let slots = match explicit {
        Some(cap) => cap as f64,
        None => (rate * max_life * headroom).ceil() as f64,
    };
    if slots.is_nan() || slots > MAX_POOL_SLOTS as f64 {
        let key = if explicit.is_some() { "max_particles" } else { "rate" };
        return Err(QuenchError::ValueOutOfRange {
            field: format!("{system}.{key}"),
            min: 0.0,
            max: MAX_POOL_SLOTS as f64,
            value: slots,
        });
    }
    Ok(slots.max(0.0) as usize)
}

/// Fixed-capacity storage that keeps live particles packed at the front.
///
/// Slots are allocated up front. Expired particles are swap-removed so the
/// live range stays contiguous for iteration and buffer writes.
pub struct ParticlePool<P: Pooled> {
    slots: Vec<P>,
    live: usize,
}

impl<P: Pooled> ParticlePool<P> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| P::dead()).collect(),
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn alive_count(&self) -> usize {
        self.live
    }

    pub fn free_slots(&self) -> usize {
        self.capacity() - self.live
    }

    /// Claim the next free slot, reset and marked alive. `None` when full.
    pub fn spawn(&mut self) -> Option<&mut P> {
        let slot = self.slots.get_mut(self.live)?;
        *slot = P::dead();
        slot.particle_mut().alive = true;
        self.live += 1;
        Some(slot)
    }

    /// Drop expired particles, moving the last live one into each gap
    pub fn compact(&mut self) {
        let mut i = 0;
        while i < self.live {
            if !self.slots[i].particle().is_expired() {
                i += 1;
                continue;
            }
            self.slots[i].particle_mut().alive = false;
            self.live -= 1;
            // Slot i is re-examined next pass with the particle moved in from the end
            self.slots.swap(i, self.live);
        }
    }

    pub fn alive_slice(&self) -> &[P] {
        &self.slots[..self.live]
    }

    pub fn alive_slice_mut(&mut self) -> &mut [P] {
        &mut self.slots[..self.live]
    }

    /// Free slot storage; capacity is zero afterwards. Repeat calls are no-ops.
    pub fn release(&mut self) {
        self.slots = Vec::new();
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(pool: &mut ParticlePool<Particle>, life: f32) -> bool {
        pool.spawn()
            .map(|p| {
                p.life = life;
                p.max_life = life;
            })
            .is_some()
    }

    #[test]
    fn expired_particles_leave_a_packed_range() {
        let mut pool = ParticlePool::<Particle>::new(5);
        for tag in 0..4 {
            assert!(fill(&mut pool, 1.0));
            pool.alive_slice_mut()[tag].position.y = tag as f32;
        }
        pool.alive_slice_mut()[0].life = 0.0;
        pool.alive_slice_mut()[2].life = -0.5;
        pool.compact();

        let mut heights: Vec<f32> = pool.alive_slice().iter().map(|p| p.position.y).collect();
        heights.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(heights, vec![1.0, 3.0]);
        assert!(pool.alive_slice().iter().all(|p| p.alive));
        assert_eq!(pool.free_slots(), 3);
    }

    #[test]
    fn requests_beyond_capacity_are_dropped() {
        let mut pool = ParticlePool::<Particle>::new(10);
        for _ in 0..7 {
            fill(&mut pool, 2.0);
        }
        let granted = (0..20).filter(|_| fill(&mut pool, 2.0)).count();
        assert_eq!(granted, 3);
        assert_eq!(pool.alive_count(), pool.capacity());
        assert!(pool.spawn().is_none());
    }

    #[test]
    fn reused_foam_slot_starts_airborne() {
        let mut pool = ParticlePool::<FoamParticle>::new(1);
        if let Some(f) = pool.spawn() {
            f.grounded = true;
            f.ground_time = 3.0;
        }
        // life is still zero, so the droplet expires immediately
        pool.compact();
        let f = pool.spawn().unwrap();
        assert!(!f.grounded);
        assert_eq!(f.ground_time, 0.0);
        assert!(f.particle.alive);
    }

    #[test]
    fn age_runs_from_birth_to_death() {
        let mut p = Particle::dead();
        p.max_life = 4.0;
        p.life = 4.0;
        assert_eq!(p.age(), 0.0);
        p.life = 1.0;
        assert_eq!(p.age(), 0.75);
        p.life = -2.0;
        assert_eq!(p.age(), 1.0);
        p.max_life = 0.0;
        assert_eq!(p.age(), 1.0);
    }

    #[test]
    fn capacity_estimate_or_override() {
        assert_eq!(pool_capacity("smoke", 25.0, 4.0, 1.5, None).unwrap(), 150);
        assert_eq!(pool_capacity("smoke", 25.0, 4.0, 1.5, Some(32)).unwrap(), 32);
        assert_eq!(pool_capacity("smoke", 0.0, 4.0, 1.5, None).unwrap(), 0);
    }

    #[test]
    fn oversized_pools_are_refused() {
        let err = pool_capacity("flame", 1e30, 1.0, 1.2, None).unwrap_err();
        assert!(matches!(err, QuenchError::ValueOutOfRange { ref field, .. } if field == "flame.rate"));
        let err = pool_capacity("foam", 1.0, 1.0, 1.0, Some(MAX_POOL_SLOTS + 1)).unwrap_err();
        assert!(
            matches!(err, QuenchError::ValueOutOfRange { ref field, .. } if field == "foam.max_particles")
        );
        assert!(pool_capacity("foam", f32::NAN, 1.0, 1.0, None).is_err());
        assert_eq!(
            pool_capacity("foam", 1.0, 1.0, 1.0, Some(MAX_POOL_SLOTS)).unwrap(),
            MAX_POOL_SLOTS
        );
    }

    #[test]
    fn released_pool_spawns_nothing() {
        let mut pool = ParticlePool::<Particle>::new(8);
        fill(&mut pool, 1.0);
        pool.release();
        pool.release();
        assert_eq!(pool.capacity(), 0);
        assert_eq!(pool.alive_count(), 0);
        assert!(pool.spawn().is_none());
    }
}
