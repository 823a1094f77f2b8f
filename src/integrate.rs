use crate::body::RigidBody;
use crate::vector::{clamp, integrate_orientation};

/// Time-stepping scheme. An unrecognized value falls back to Verlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationMethod {
    Euler,
    #[default]
    Verlet,
    Rk4,
}

const SLEEP_THRESHOLD: f32 = 0.01;

/// `a = F * inverse_mass`, `alpha = torque * inverse_mass` — a scalar
/// inverse-mass proxy stands in for a proper inertia tensor (see
/// `DESIGN.md`, "angular dynamics approximation").
fn update_acceleration(body: &mut RigidBody) {
    body.acceleration = body.force_accum() * body.inverse_mass();
    body.angular_acceleration = body.torque_accum() * body.inverse_mass();
}

fn integrate_euler(body: &mut RigidBody, dt: f32) {
    update_acceleration(body);

    body.velocity += body.acceleration * dt;
    body.angular_velocity += body.angular_acceleration * dt;

    body.position += body.velocity * dt;
    body.rotation = integrate_orientation(body.rotation, body.angular_velocity, dt);

    body.clear_forces();
}

fn integrate_verlet(body: &mut RigidBody, dt: f32) {
    let prev_accel = body.acceleration;
    let prev_angular_accel = body.angular_acceleration;

    update_acceleration(body);

    body.position += body.velocity * dt + body.acceleration * (0.5 * dt * dt);
    body.rotation = integrate_orientation(body.rotation, body.angular_velocity, dt);

    let avg_accel = (prev_accel + body.acceleration) * 0.5;
    body.velocity += avg_accel * dt;

    let avg_angular_accel = (prev_angular_accel + body.angular_acceleration) * 0.5;
    body.angular_velocity += avg_angular_accel * dt;

    body.clear_forces();
}

fn integrate_rk4(body: &mut RigidBody, dt: f32) {
    let initial_pos = body.position;
    let initial_vel = body.velocity;
    let initial_rot = body.rotation;
    let initial_ang_vel = body.angular_velocity;

    update_acceleration(body);
    let k1_vel = body.acceleration;
    let k1_pos = body.velocity;
    let k1_ang_vel = body.angular_acceleration;

    body.velocity = initial_vel + k1_vel * (dt * 0.5);
    body.angular_velocity = initial_ang_vel + k1_ang_vel * (dt * 0.5);
    update_acceleration(body);
    let k2_vel = body.acceleration;
    let k2_pos = body.velocity;
    let k2_ang_vel = body.angular_acceleration;

    body.velocity = initial_vel + k2_vel * (dt * 0.5);
    body.angular_velocity = initial_ang_vel + k2_ang_vel * (dt * 0.5);
    update_acceleration(body);
    let k3_vel = body.acceleration;
    let k3_pos = body.velocity;
    let k3_ang_vel = body.angular_acceleration;

    body.velocity = initial_vel + k3_vel * dt;
    body.angular_velocity = initial_ang_vel + k3_ang_vel * dt;
    update_acceleration(body);
    let k4_vel = body.acceleration;
    let k4_pos = body.velocity;
    let k4_ang_vel = body.angular_acceleration;

    let vel_change = (k1_vel + k2_vel * 2.0 + k3_vel * 2.0 + k4_vel) * (dt / 6.0);
    let pos_change = (k1_pos + k2_pos * 2.0 + k3_pos * 2.0 + k4_pos) * (dt / 6.0);
    let ang_vel_change = (k1_ang_vel + k2_ang_vel * 2.0 + k3_ang_vel * 2.0 + k4_ang_vel) * (dt / 6.0);

    body.position = initial_pos + pos_change;
    body.velocity = initial_vel + vel_change;
    body.angular_velocity = initial_ang_vel + ang_vel_change;
    body.rotation = integrate_orientation(initial_rot, body.angular_velocity, dt);

    body.clear_forces();
}

/// Advances `body` by `dt` using `method`. No-op for static or sleeping
/// bodies.
pub fn integrate_body(body: &mut RigidBody, dt: f32, method: IntegrationMethod) {
    if body.is_static() || body.is_sleeping() {
        return;
    }
    match method {
        IntegrationMethod::Euler => integrate_euler(body, dt),
        IntegrationMethod::Verlet => integrate_verlet(body, dt),
        IntegrationMethod::Rk4 => integrate_rk4(body, dt),
    }
}

/// Scales velocities toward zero and puts the body to sleep once both
/// linear and angular speed-squared drop below the sleep threshold.
pub fn apply_damping(body: &mut RigidBody, linear_damping: f32, angular_damping: f32) {
    if body.is_static() {
        return;
    }
    let linear_damping = clamp(linear_damping, 0.0, 1.0);
    let angular_damping = clamp(angular_damping, 0.0, 1.0);

    body.velocity *= 1.0 - linear_damping;
    body.angular_velocity *= 1.0 - angular_damping;

    let linear_speed_sq = body.velocity.length_squared();
    let angular_speed_sq = body.angular_velocity.length_squared();

    if linear_speed_sq < SLEEP_THRESHOLD && angular_speed_sq < SLEEP_THRESHOLD {
        body.is_sleeping = true;
        body.velocity = crate::vector::Vector3::zero();
        body.angular_velocity = crate::vector::Vector3::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;
    use approx::assert_relative_eq;

    #[test]
    fn euler_projectile_motion() {
        let mut body = RigidBody::new(1);
        body.set_mass(1.0);
        body.add_force(Vector3::new(0.0, -9.8, 0.0));
        integrate_body(&mut body, 1.0, IntegrationMethod::Euler);
        // semi-implicit: v updates first, position uses the updated v
        assert_relative_eq!(body.velocity.y, -9.8, epsilon = 1e-5);
        assert_relative_eq!(body.position.y, -9.8, epsilon = 1e-5);
    }

    #[test]
    fn forces_clear_after_integration() {
        let mut body = RigidBody::new(1);
        body.set_mass(1.0);
        body.add_force(Vector3::new(10.0, 0.0, 0.0));
        integrate_body(&mut body, 1.0, IntegrationMethod::Verlet);
        assert_eq!(body.force_accum(), Vector3::zero());
    }

    #[test]
    fn static_body_never_integrates() {
        let mut body = RigidBody::new(1);
        body.set_mass(0.0);
        body.add_force(Vector3::new(10.0, 0.0, 0.0));
        integrate_body(&mut body, 1.0, IntegrationMethod::Verlet);
        assert_eq!(body.position, Vector3::zero());
    }

    #[test]
    fn damping_below_threshold_sleeps() {
        let mut body = RigidBody::new(1);
        body.set_mass(1.0);
        body.velocity = Vector3::new(0.05, 0.0, 0.0);
        apply_damping(&mut body, 0.0, 0.0);
        assert!(body.is_sleeping());
        assert_eq!(body.velocity, Vector3::zero());
    }

    #[test]
    fn damping_above_threshold_stays_awake() {
        let mut body = RigidBody::new(1);
        body.set_mass(1.0);
        body.velocity = Vector3::new(5.0, 0.0, 0.0);
        apply_damping(&mut body, 0.01, 0.0);
        assert!(!body.is_sleeping());
    }
}
