//! Flat per-particle render buffers
//!
//! One `GeometryBuffers` per particle system. The renderer draws the first
//! `draw_count` entries; anything past that is left over from an earlier
//! frame.

use crate::particle::Particle;

pub struct GeometryBuffers {
    capacity: usize,
    positions: Vec<f32>,
    sizes: Vec<f32>,
    colors: Vec<f32>,
    alphas: Vec<f32>,
    angles: Vec<f32>,
    draw_count: usize,
}

impl GeometryBuffers {
    /// Allocate storage for `capacity` particles up front
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            positions: vec![0.0; capacity * 3],
            sizes: vec![0.0; capacity],
            colors: vec![0.0; capacity * 3],
            alphas: vec![0.0; capacity],
            angles: vec![0.0; capacity],
            draw_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy render attributes of `particles`, up to capacity, and set the draw range
    pub fn write<'a, I>(&mut self, particles: I)
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        let mut count = 0;
        for p in particles.into_iter().take(self.capacity) {
            let i3 = count * 3;
            self.positions[i3] = p.position.x;
            self.positions[i3 + 1] = p.position.y;
            self.positions[i3 + 2] = p.position.z;
            self.colors[i3] = p.color.r;
            self.colors[i3 + 1] = p.color.g;
            self.colors[i3 + 2] = p.color.b;
            self.sizes[count] = p.current_size;
            self.alphas[count] = p.alpha;
            self.angles[count] = p.rotation;
            count += 1;
        }
        self.draw_count = count;
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Particle index range to draw
    pub fn draw_range(&self) -> std::ops::Range<usize> {
        0..self.draw_count
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions[..self.draw_count * 3]
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes[..self.draw_count]
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors[..self.draw_count * 3]
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas[..self.draw_count]
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles[..self.draw_count]
    }

    /// Drawn positions as raw bytes for vertex upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions())
    }

    pub fn size_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.sizes())
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colors())
    }

    pub fn alpha_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.alphas())
    }

    pub fn angle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.angles())
    }

    /// Drop all storage. Safe to call more than once.
    pub fn release(&mut self) {
        self.capacity = 0;
        self.positions = Vec::new();
        self.sizes = Vec::new();
        self.colors = Vec::new();
        self.alphas = Vec::new();
        self.angles = Vec::new();
        self.draw_count = 0;
    }
}
