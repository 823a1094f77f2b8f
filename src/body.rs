use crate::shape::Shape;
use crate::vector::{clamp, Quaternion, Vector3};

/// A rigid body. Static-ness is not a separate flag: a body is static iff
/// `inverse_mass == 0`.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) id: u64,

    pub position: Vector3,
    pub velocity: Vector3,
    pub acceleration: Vector3,

    pub rotation: Quaternion,
    pub angular_velocity: Vector3,
    pub angular_acceleration: Vector3,

    mass: f32,
    inverse_mass: f32,

    pub restitution: f32,
    pub friction: f32,

    pub shape: Shape,

    pub(crate) is_sleeping: bool,

    force_accum: Vector3,
    torque_accum: Vector3,
}

impl RigidBody {
    /// Constructs a body with default properties (unit mass sphere,
    /// restitution 0.5, friction 0.3) tagged with the given id. Bodies
    /// created through a [`crate::world::World`] get a world-local
    /// sequential id automatically; this constructor is for standalone
    /// use outside a world.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            position: Vector3::zero(),
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            rotation: Quaternion::identity(),
            angular_velocity: Vector3::zero(),
            angular_acceleration: Vector3::zero(),
            mass: 1.0,
            inverse_mass: 1.0,
            restitution: 0.5,
            friction: 0.3,
            shape: Shape::Sphere { radius: 1.0 },
            is_sleeping: false,
            force_accum: Vector3::zero(),
            torque_accum: Vector3::zero(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn is_sleeping(&self) -> bool {
        self.is_sleeping
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn init_sphere(&mut self, position: Vector3, radius: f32, mass: f32) {
        self.position = position;
        self.shape = Shape::Sphere { radius };
        self.set_mass(mass);
    }

    pub fn init_aabb(&mut self, position: Vector3, half_extents: Vector3, mass: f32) {
        self.position = position;
        self.shape = Shape::Aabb { half_extents };
        self.set_mass(mass);
    }

    /// Planes are always static, infinite mass, and live at the origin —
    /// their placement in space is entirely described by normal/distance.
    pub fn init_plane(&mut self, normal: Vector3, distance: f32) {
        self.position = Vector3::zero();
        self.shape = Shape::Plane { normal: normal.normalize(), distance };
        self.mass = f32::INFINITY;
        self.inverse_mass = 0.0;
    }

    pub fn set_position(&mut self, position: Vector3) {
        if !self.is_static() {
            self.position = position;
        }
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        if !self.is_static() {
            self.velocity = velocity;
        }
    }

    pub fn set_mass(&mut self, mass: f32) {
        if mass <= 0.0 || matches!(self.shape, Shape::Plane { .. }) {
            self.mass = f32::INFINITY;
            self.inverse_mass = 0.0;
        } else {
            self.mass = mass;
            self.inverse_mass = 1.0 / mass;
        }
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = clamp(restitution, 0.0, 1.0);
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction.max(0.0);
    }

    /// Setting static zeros velocities and collapses mass to infinite.
    /// Clearing static re-derives inverse mass from the currently stored
    /// mass value (which, if it was just forced to infinity, stays there —
    /// callers that want a body to become dynamic again must call
    /// `set_mass` with a finite value afterward).
    pub fn set_static(&mut self, is_static: bool) {
        if is_static {
            self.velocity = Vector3::zero();
            self.angular_velocity = Vector3::zero();
            self.mass = f32::INFINITY;
            self.inverse_mass = 0.0;
        } else {
            let mass = self.mass;
            self.inverse_mass = 0.0;
            self.set_mass(mass);
        }
    }

    pub fn add_force(&mut self, force: Vector3) {
        if !self.is_static() {
            self.force_accum += force;
        }
    }

    pub fn add_force_at_point(&mut self, force: Vector3, point: Vector3) {
        if self.is_static() {
            return;
        }
        self.add_force(force);
        let offset = point - self.position;
        self.add_torque(offset.cross(&force));
    }

    pub fn add_torque(&mut self, torque: Vector3) {
        if !self.is_static() {
            self.torque_accum += torque;
        }
    }

    pub fn add_impulse(&mut self, impulse: Vector3) {
        if !self.is_static() {
            self.velocity += impulse * self.inverse_mass;
        }
    }

    pub fn clear_forces(&mut self) {
        self.force_accum = Vector3::zero();
        self.torque_accum = Vector3::zero();
    }

    pub(crate) fn force_accum(&self) -> Vector3 {
        self.force_accum
    }

    pub(crate) fn torque_accum(&self) -> Vector3 {
        self.torque_accum
    }

    pub fn point_velocity(&self, point: Vector3) -> Vector3 {
        let offset = point - self.position;
        self.velocity + self.angular_velocity.cross(&offset)
    }

    /// Linear kinetic energy only; angular contribution is omitted since
    /// this body model has no inertia tensor.
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
