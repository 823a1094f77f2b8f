use crate::body::RigidBody;
use crate::config::WorldConfig;
use crate::integrate::{apply_damping, integrate_body, IntegrationMethod};
use crate::narrow_phase::{self, Contact};
use crate::response;
use crate::vector::{clamp, Vector3};
use log::{debug, trace, warn};

/// Maximum number of bodies a world can hold at once.
pub const MAX_BODIES: usize = 1000;
/// Maximum number of contacts resolved in a single sub-step.
pub const MAX_COLLISIONS: usize = 2000;

const WAKE_RADIUS: f32 = 5.0;
const WAKE_SPEED_SQ: f32 = 0.1;

/// Owns the bodies and contact buffer and sequences the step pipeline:
/// wake -> forces -> integrate -> detect -> resolve -> damp, per sub-step.
pub struct World {
    bodies: Vec<RigidBody>,
    next_id: u64,
    contacts: Vec<Contact>,
    config: WorldConfig,
    is_paused: bool,
    collision_checks_performed: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::from_config(&WorldConfig::default())
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
            contacts: Vec::new(),
            config: *config,
            is_paused: false,
            collision_checks_performed: 0,
        }
    }

    fn next_body(&mut self) -> RigidBody {
        let body = RigidBody::new(self.next_id);
        self.next_id += 1;
        body
    }

    fn insert(&mut self, body: RigidBody) -> i64 {
        if self.bodies.len() >= MAX_BODIES {
            warn!("world at capacity ({} bodies); dropping body id {}", MAX_BODIES, body.id());
            return -1;
        }
        let id = body.id() as i64;
        self.bodies.push(body);
        id
    }

    pub fn add_sphere(&mut self, position: Vector3, radius: f32, mass: f32) -> i64 {
        let mut body = self.next_body();
        body.init_sphere(position, radius, mass);
        self.insert(body)
    }

    pub fn add_aabb(&mut self, position: Vector3, half_extents: Vector3, mass: f32) -> i64 {
        let mut body = self.next_body();
        body.init_aabb(position, half_extents, mass);
        self.insert(body)
    }

    pub fn add_plane(&mut self, normal: Vector3, distance: f32) -> i64 {
        let mut body = self.next_body();
        body.init_plane(normal, distance);
        self.insert(body)
    }

    pub fn remove_body(&mut self, id: u64) -> bool {
        if let Some(index) = self.bodies.iter().position(|b| b.id() == id) {
            self.bodies.remove(index);
            true
        } else {
            false
        }
    }

    pub fn get_body(&self, id: u64) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn get_body_mut(&mut self, id: u64) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collision_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn collision_checks_performed(&self) -> u32 {
        self.collision_checks_performed
    }

    pub fn total_kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(RigidBody::kinetic_energy).sum()
    }

    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.config.gravity = gravity;
    }

    pub fn set_timestep(&mut self, timestep: f32) {
        if timestep > 0.0 {
            self.config.timestep = timestep;
        }
    }

    pub fn set_integration_method(&mut self, method: IntegrationMethod) {
        self.config.integration_method = method;
    }

    pub fn set_damping(&mut self, linear: f32, angular: f32) {
        self.config.linear_damping = clamp(linear, 0.0, 1.0);
        self.config.angular_damping = clamp(angular, 0.0, 1.0);
    }

    pub fn set_sub_iterations(&mut self, count: u32) {
        if count > 0 {
            self.config.sub_iterations = count;
        }
    }

    pub fn pause(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        if scale >= 0.0 {
            self.config.time_scale = scale;
        }
    }

    pub fn step(&mut self) {
        self.step_with_dt(self.config.timestep);
    }

    pub fn step_with_dt(&mut self, dt: f32) {
        if self.is_paused || dt <= 0.0 {
            return;
        }

        let scaled_dt = dt * self.config.time_scale;
        let sub_dt = scaled_dt / self.config.sub_iterations as f32;

        for _ in 0..self.config.sub_iterations {
            self.wake_sleeping_bodies();
            self.apply_forces();
            self.integrate_bodies(sub_dt);
            self.detect_collisions();
            self.resolve_collisions();
            self.damp_bodies();
        }

        trace!("stepped {} bodies, {} contacts resolved", self.bodies.len(), self.contacts.len());
    }

    fn wake_sleeping_bodies(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            if self.bodies[i].is_static() || self.bodies[i].is_sleeping() {
                continue;
            }
            if self.bodies[i].velocity.length_squared() < WAKE_SPEED_SQ {
                continue;
            }
            let moving_position = self.bodies[i].position;
            for j in 0..n {
                if i == j || !self.bodies[j].is_sleeping() {
                    continue;
                }
                if moving_position.distance(&self.bodies[j].position) < WAKE_RADIUS {
                    self.bodies[j].is_sleeping = false;
                    debug!("woke body {} near moving body {}", self.bodies[j].id(), self.bodies[i].id());
                }
            }
        }
    }

    fn apply_forces(&mut self) {
        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut() {
            if body.is_static() || body.is_sleeping() {
                continue;
            }
            let weight = gravity * body.mass();
            body.add_force(weight);
        }
    }

    fn integrate_bodies(&mut self, dt: f32) {
        let method = self.config.integration_method;
        for body in self.bodies.iter_mut() {
            if body.is_static() {
                continue;
            }
            integrate_body(body, dt, method);
        }
    }

    fn detect_collisions(&mut self) {
        self.contacts.clear();
        self.collision_checks_performed = 0;

        let n = self.bodies.len();
        let mut dropped = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if a.is_static() && b.is_static() {
                    continue;
                }
                if a.is_sleeping() && b.is_sleeping() {
                    continue;
                }
                self.collision_checks_performed += 1;

                if self.contacts.len() >= MAX_COLLISIONS {
                    dropped = true;
                    continue;
                }
                if let Some(contact) = narrow_phase::detect(i, a, j, b) {
                    self.contacts.push(contact);
                }
            }
        }
        if dropped {
            warn!("contact buffer full at {} contacts; dropping further contacts this sub-step", MAX_COLLISIONS);
        }

        for contact in &self.contacts {
            self.bodies[contact.body_a].is_sleeping = false;
            self.bodies[contact.body_b].is_sleeping = false;
        }
    }

    fn resolve_collisions(&mut self) {
        let contacts = self.contacts.clone();
        for contact in contacts {
            let (left, right) = self.bodies.split_at_mut(contact.body_b);
            response::resolve(&contact, &mut left[contact.body_a], &mut right[0]);
        }
    }

    fn damp_bodies(&mut self) {
        let (linear, angular) = (self.config.linear_damping, self.config.angular_damping);
        for body in self.bodies.iter_mut() {
            apply_damping(body, linear, angular);
        }
    }
}
