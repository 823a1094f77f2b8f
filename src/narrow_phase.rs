use crate::body::RigidBody;
use crate::shape::{world_aabb, Shape, ShapeKind};
use crate::vector::{Vector3, VECTOR_EPSILON};

/// A single point of contact between two bodies. `normal` points from A
/// toward B.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub body_a: usize,
    pub body_b: usize,
    pub normal: Vector3,
    pub penetration: f32,
    pub point: Vector3,
}

/// Runs the broad-phase AABB gate, then dispatches to one of the five live
/// narrow-phase tests (plane-plane never collides). `a`/`b` are indices
/// into the caller's body array, used only to stamp the resulting contact.
pub fn detect(a_idx: usize, a: &RigidBody, b_idx: usize, b: &RigidBody) -> Option<Contact> {
    let aabb_a = world_aabb(a.position, &a.shape);
    let aabb_b = world_aabb(b.position, &b.shape);
    if !aabb_a.overlaps(&aabb_b) {
        return None;
    }

    use ShapeKind::*;
    let contact = match (a.shape.kind(), b.shape.kind()) {
        (Sphere, Sphere) => sphere_sphere(a, b),
        (Sphere, Aabb) => sphere_aabb(a, b),
        (Aabb, Sphere) => sphere_aabb(b, a).map(flip),
        (Aabb, Aabb) => aabb_aabb(a, b),
        (Sphere, Plane) => sphere_plane(a, b),
        (Plane, Sphere) => sphere_plane(b, a).map(flip),
        (Aabb, Plane) => aabb_plane(a, b),
        (Plane, Aabb) => aabb_plane(b, a).map(flip),
        (Plane, Plane) => None,
    }?;

    Some(Contact { body_a: a_idx, body_b: b_idx, ..contact })
}

fn flip(mut c: Contact) -> Contact {
    c.normal = -c.normal;
    c
}

fn sphere_radius(shape: &Shape) -> f32 {
    match shape {
        Shape::Sphere { radius } => *radius,
        _ => 0.0,
    }
}

fn sphere_sphere(sphere_a: &RigidBody, sphere_b: &RigidBody) -> Option<Contact> {
    let radius_a = sphere_radius(&sphere_a.shape);
    let radius_b = sphere_radius(&sphere_b.shape);

    let center_to_center = sphere_b.position - sphere_a.position;
    let distance = center_to_center.length();
    let combined_radius = radius_a + radius_b;

    if distance >= combined_radius {
        return None;
    }

    let penetration = combined_radius - distance;
    let normal = if distance > VECTOR_EPSILON {
        center_to_center.normalize()
    } else {
        Vector3::new(1.0, 0.0, 0.0)
    };
    let point = sphere_a.position + normal * (radius_a - penetration * 0.5);

    Some(Contact { body_a: 0, body_b: 0, normal, penetration, point })
}

fn closest_point_on_aabb(point: Vector3, center: Vector3, half_extents: Vector3) -> Vector3 {
    let min = center - half_extents;
    let max = center + half_extents;
    Vector3::new(
        point.x.max(min.x).min(max.x),
        point.y.max(min.y).min(max.y),
        point.z.max(min.z).min(max.z),
    )
}

fn sphere_aabb(sphere: &RigidBody, aabb: &RigidBody) -> Option<Contact> {
    let radius = sphere_radius(&sphere.shape);
    let half_extents = match aabb.shape {
        Shape::Aabb { half_extents } => half_extents,
        _ => return None,
    };

    let closest = closest_point_on_aabb(sphere.position, aabb.position, half_extents);
    let sphere_to_closest = closest - sphere.position;
    let distance = sphere_to_closest.length();

    if distance >= radius {
        return None;
    }

    let penetration = radius - distance;

    let normal = if distance > VECTOR_EPSILON {
        (-sphere_to_closest).normalize()
    } else {
        // Sphere center is inside the box; pick the face of minimum
        // penetration as the contact axis.
        let to_sphere = sphere.position - aabb.position;
        let candidates = [
            (half_extents.x - to_sphere.x.abs(), Vector3::new(if to_sphere.x > 0.0 { 1.0 } else { -1.0 }, 0.0, 0.0)),
            (half_extents.y - to_sphere.y.abs(), Vector3::new(0.0, if to_sphere.y > 0.0 { 1.0 } else { -1.0 }, 0.0)),
            (half_extents.z - to_sphere.z.abs(), Vector3::new(0.0, 0.0, if to_sphere.z > 0.0 { 1.0 } else { -1.0 })),
        ];
        candidates
            .into_iter()
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap())
            .map(|(_, n)| n)
            .unwrap()
    };

    Some(Contact { body_a: 0, body_b: 0, normal, penetration, point: closest })
}

fn aabb_aabb(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    let a_aabb = world_aabb(a.position, &a.shape);
    let b_aabb = world_aabb(b.position, &b.shape);

    let overlap_x = a_aabb.min.x <= b_aabb.max.x && a_aabb.max.x >= b_aabb.min.x;
    let overlap_y = a_aabb.min.y <= b_aabb.max.y && a_aabb.max.y >= b_aabb.min.y;
    let overlap_z = a_aabb.min.z <= b_aabb.max.z && a_aabb.max.z >= b_aabb.min.z;
    if !(overlap_x && overlap_y && overlap_z) {
        return None;
    }

    let x_pen = (a_aabb.max.x - b_aabb.min.x).min(b_aabb.max.x - a_aabb.min.x);
    let y_pen = (a_aabb.max.y - b_aabb.min.y).min(b_aabb.max.y - a_aabb.min.y);
    let z_pen = (a_aabb.max.z - b_aabb.min.z).min(b_aabb.max.z - a_aabb.min.z);

    // Normal points from A toward B: a.pos_k < b.pos_k => +1 on that axis.
    let (penetration, normal) = if x_pen < y_pen && x_pen < z_pen {
        (x_pen, Vector3::new(if a.position.x < b.position.x { 1.0 } else { -1.0 }, 0.0, 0.0))
    } else if y_pen < z_pen {
        (y_pen, Vector3::new(0.0, if a.position.y < b.position.y { 1.0 } else { -1.0 }, 0.0))
    } else {
        (z_pen, Vector3::new(0.0, 0.0, if a.position.z < b.position.z { 1.0 } else { -1.0 }))
    };

    let overlap_min = Vector3::new(
        a_aabb.min.x.max(b_aabb.min.x),
        a_aabb.min.y.max(b_aabb.min.y),
        a_aabb.min.z.max(b_aabb.min.z),
    );
    let overlap_max = Vector3::new(
        a_aabb.max.x.min(b_aabb.max.x),
        a_aabb.max.y.min(b_aabb.max.y),
        a_aabb.max.z.min(b_aabb.max.z),
    );
    let point = (overlap_min + overlap_max) * 0.5;

    Some(Contact { body_a: 0, body_b: 0, normal, penetration, point })
}

fn distance_to_plane(point: Vector3, normal: Vector3, distance: f32) -> f32 {
    point.dot(&normal) - distance
}

fn sphere_plane(sphere: &RigidBody, plane: &RigidBody) -> Option<Contact> {
    let (normal, distance) = match plane.shape {
        Shape::Plane { normal, distance } => (normal, distance),
        _ => return None,
    };
    let radius = sphere_radius(&sphere.shape);

    let s = distance_to_plane(sphere.position, normal, distance);
    if s >= radius {
        return None;
    }

    let penetration = radius - s;
    let point = sphere.position - normal * radius;
    Some(Contact { body_a: 0, body_b: 0, normal, penetration, point })
}

fn aabb_plane(aabb: &RigidBody, plane: &RigidBody) -> Option<Contact> {
    let (normal, distance) = match plane.shape {
        Shape::Plane { normal, distance } => (normal, distance),
        _ => return None,
    };
    let half_extents = match aabb.shape {
        Shape::Aabb { half_extents } => half_extents,
        _ => return None,
    };

    let extent = (half_extents.x * normal.x).abs() + (half_extents.y * normal.y).abs() + (half_extents.z * normal.z).abs();
    let s = distance_to_plane(aabb.position, normal, distance);
    if s >= extent {
        return None;
    }

    let penetration = extent - s;
    let point = aabb.position - normal * s;
    Some(Contact { body_a: 0, body_b: 0, normal, penetration, point })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    fn sphere_at(pos: Vector3, radius: f32) -> RigidBody {
        let mut b = RigidBody::new(0);
        b.init_sphere(pos, radius, 1.0);
        b
    }

    fn aabb_at(pos: Vector3, half_extents: Vector3) -> RigidBody {
        let mut b = RigidBody::new(0);
        b.init_aabb(pos, half_extents, 1.0);
        b
    }

    #[test]
    fn touching_spheres_do_not_collide() {
        let a = sphere_at(Vector3::zero(), 1.0);
        let b = sphere_at(Vector3::new(2.0, 0.0, 0.0), 1.0);
        assert!(detect(0, &a, 1, &b).is_none());
    }

    #[test]
    fn overlapping_spheres_collide() {
        let a = sphere_at(Vector3::zero(), 1.0);
        let b = sphere_at(Vector3::new(1.5, 0.0, 0.0), 1.0);
        let c = detect(0, &a, 1, &b).unwrap();
        assert!((c.penetration - 0.5).abs() < 1e-5);
    }

    #[test]
    fn sphere_center_inside_box_uses_axis_fallback() {
        let sphere = sphere_at(Vector3::zero(), 0.5);
        let aabb = aabb_at(Vector3::zero(), Vector3::new(2.0, 2.0, 2.0));
        let c = detect(0, &sphere, 1, &aabb).unwrap();
        assert!((c.penetration - 2.5).abs() < 1e-5);
        assert!(c.normal.x.abs() == 1.0 || c.normal.y.abs() == 1.0 || c.normal.z.abs() == 1.0);
    }

    #[test]
    fn aabb_plane_exact_touch_does_not_collide() {
        let mut plane = RigidBody::new(0);
        plane.init_plane(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let aabb = aabb_at(Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        assert!(detect(0, &aabb, 1, &plane).is_none());
    }

    #[test]
    fn plane_plane_never_collides() {
        let mut a = RigidBody::new(0);
        a.init_plane(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let mut b = RigidBody::new(0);
        b.init_plane(Vector3::new(1.0, 0.0, 0.0), 0.0);
        assert!(detect(0, &a, 1, &b).is_none());
    }

    #[test]
    fn dispatch_is_symmetric_regardless_of_argument_order() {
        let sphere = sphere_at(Vector3::new(0.0, 0.5, 0.0), 1.0);
        let aabb = aabb_at(Vector3::zero(), Vector3::new(1.0, 1.0, 1.0));
        let forward = detect(0, &sphere, 1, &aabb).unwrap();
        let backward = detect(0, &aabb, 1, &sphere).unwrap();
        assert!((forward.penetration - backward.penetration).abs() < 1e-5);
        assert!(forward.normal.approx_eq(&-backward.normal, 1e-5));
    }
}
