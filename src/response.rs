use crate::body::RigidBody;
use crate::narrow_phase::Contact;
use crate::vector::VECTOR_EPSILON;

const BAUMGARTE_PERCENT: f32 = 0.8;
const BAUMGARTE_SLOP: f32 = 0.01;

/// Runs the four-step resolver against one contact: separate, apply
/// normal impulse, apply friction, then position-correct residual
/// penetration.
pub fn resolve(contact: &Contact, a: &mut RigidBody, b: &mut RigidBody) {
    separate_bodies(contact, a, b);
    apply_impulse_response(contact, a, b);
    apply_friction(contact, a, b);
    position_correction(contact, a, b, BAUMGARTE_PERCENT, BAUMGARTE_SLOP);
}

fn total_inverse_mass(a: &RigidBody, b: &RigidBody) -> f32 {
    a.inverse_mass() + b.inverse_mass()
}

fn relative_velocity(contact: &Contact, a: &RigidBody, b: &RigidBody) -> f32 {
    (b.velocity - a.velocity).dot(&contact.normal)
}

fn impulse_magnitude(contact: &Contact, a: &RigidBody, b: &RigidBody, restitution: f32) -> f32 {
    let w = total_inverse_mass(a, b);
    if w <= 0.0 {
        return 0.0;
    }
    -(1.0 + restitution) * relative_velocity(contact, a, b) / w
}

fn separate_bodies(contact: &Contact, a: &mut RigidBody, b: &mut RigidBody) {
    let w = total_inverse_mass(a, b);
    if w <= 0.0 {
        return;
    }
    let share_a = a.inverse_mass() / w;
    let share_b = b.inverse_mass() / w;
    let separation = contact.normal * contact.penetration;

    if !a.is_static() {
        a.position -= separation * share_a;
    }
    if !b.is_static() {
        b.position += separation * share_b;
    }
}

fn apply_impulse_response(contact: &Contact, a: &mut RigidBody, b: &mut RigidBody) {
    let v_rel = relative_velocity(contact, a, b);
    if v_rel > 0.0 {
        return;
    }

    let restitution = a.restitution.min(b.restitution);
    let j = impulse_magnitude(contact, a, b, restitution);
    let impulse = contact.normal * j;

    if !a.is_static() {
        a.velocity -= impulse * a.inverse_mass();
    }
    if !b.is_static() {
        b.velocity += impulse * b.inverse_mass();
    }
}

fn apply_friction(contact: &Contact, a: &mut RigidBody, b: &mut RigidBody) {
    let rel_vel = b.velocity - a.velocity;
    let normal = contact.normal;
    let rel_vel_normal = rel_vel.dot(&normal);
    let tangent_raw = rel_vel - normal * rel_vel_normal;

    let tangent_length = tangent_raw.length();
    if tangent_length < VECTOR_EPSILON {
        return;
    }
    let tangent = tangent_raw.normalize();

    let friction_coefficient = (a.friction * b.friction).sqrt();

    let w = total_inverse_mass(a, b);
    if w <= 0.0 {
        return;
    }

    let mut j_t = -rel_vel.dot(&tangent) / w;

    // Coulomb clamp, referenced against an e=0 normal impulse.
    let normal_impulse = impulse_magnitude(contact, a, b, 0.0).abs();
    let max_friction = friction_coefficient * normal_impulse;
    if j_t.abs() > max_friction {
        j_t = max_friction.copysign(j_t);
    }

    let friction_impulse = tangent * j_t;
    if !a.is_static() {
        a.velocity -= friction_impulse * a.inverse_mass();
    }
    if !b.is_static() {
        b.velocity += friction_impulse * b.inverse_mass();
    }
}

fn position_correction(contact: &Contact, a: &mut RigidBody, b: &mut RigidBody, percent: f32, slop: f32) {
    let w = total_inverse_mass(a, b);
    if w <= 0.0 {
        return;
    }
    let penetration = contact.penetration - slop;
    if penetration <= 0.0 {
        return;
    }

    let magnitude = penetration * percent / w;
    let correction = contact.normal * magnitude;

    if !a.is_static() {
        a.position -= correction * a.inverse_mass();
    }
    if !b.is_static() {
        b.position += correction * b.inverse_mass();
    }
}
