use rigid_core::vector::Vector3;
use rigid_core::{IntegrationMethod, World};

const DT: f32 = 1.0 / 60.0;

#[test]
fn scenario_ball_comes_to_rest_on_ground() {
    let mut world = World::new();
    world.set_timestep(DT);
    world.add_plane(Vector3::new(0.0, 1.0, 0.0), 0.0);
    let ball = world.add_sphere(Vector3::new(0.0, 2.0, 0.0), 1.0, 1.0);
    world.get_body_mut(ball as u64).unwrap().set_restitution(0.0);
    world.get_body_mut(ball as u64).unwrap().set_friction(0.0);

    for _ in 0..600 {
        world.step();
    }

    let body = world.get_body(ball as u64).unwrap();
    assert!((body.position.y - 1.0).abs() < 0.05, "y = {}", body.position.y);
    assert!(body.velocity.length() < 0.05, "v = {:?}", body.velocity);
}

#[test]
fn scenario_elastic_bounce_preserves_most_energy() {
    let mut world = World::new();
    world.set_timestep(DT);
    world.set_damping(0.0, 0.0);
    let plane_id = world.add_plane(Vector3::new(0.0, 1.0, 0.0), 0.0);
    world.get_body_mut(plane_id as u64).unwrap().set_restitution(1.0);
    let ball = world.add_sphere(Vector3::new(0.0, 5.0, 0.0), 1.0, 1.0);
    world.get_body_mut(ball as u64).unwrap().set_restitution(1.0);
    world.get_body_mut(ball as u64).unwrap().set_friction(0.0);

    let mut peak_after_bounce: f32 = 0.0;
    let mut has_bounced = false;
    let mut last_velocity_y = 0.0;
    for _ in 0..600 {
        world.step();
        let body = world.get_body(ball as u64).unwrap();
        if last_velocity_y < 0.0 && body.velocity.y > 0.0 {
            has_bounced = true;
        }
        if has_bounced {
            peak_after_bounce = peak_after_bounce.max(body.position.y);
        }
        last_velocity_y = body.velocity.y;
    }

    assert!(has_bounced);
    assert!(peak_after_bounce >= 4.9, "peak = {}", peak_after_bounce);
}

#[test]
fn scenario_horizontal_projectile_matches_kinematics() {
    let mut world = World::new();
    world.set_timestep(DT);
    world.set_integration_method(IntegrationMethod::Euler);

    let id = world.add_sphere(Vector3::zero(), 0.5, 1.0);
    world.get_body_mut(id as u64).unwrap().velocity = Vector3::new(10.0, 0.0, 0.0);

    for _ in 0..60 {
        world.step();
    }

    let body = world.get_body(id as u64).unwrap();
    let expected = Vector3::new(10.0, -4.905, 0.0);
    assert!(body.position.distance(&expected) < 0.5, "pos = {:?}", body.position);
}

#[test]
fn scenario_equal_mass_head_on_collision_swaps_velocities() {
    let mut world = World::new();
    world.set_timestep(DT);
    world.set_gravity(Vector3::zero());

    let a = world.add_sphere(Vector3::new(-5.0, 0.0, 0.0), 1.0, 1.0);
    let b = world.add_sphere(Vector3::new(5.0, 0.0, 0.0), 1.0, 1.0);
    world.get_body_mut(a as u64).unwrap().set_restitution(1.0);
    world.get_body_mut(a as u64).unwrap().set_friction(0.0);
    world.get_body_mut(a as u64).unwrap().velocity = Vector3::new(5.0, 0.0, 0.0);
    world.get_body_mut(b as u64).unwrap().set_restitution(1.0);
    world.get_body_mut(b as u64).unwrap().set_friction(0.0);
    world.get_body_mut(b as u64).unwrap().velocity = Vector3::new(-5.0, 0.0, 0.0);

    for _ in 0..120 {
        world.step();
    }

    let a = world.get_body(a as u64).unwrap();
    let b = world.get_body(b as u64).unwrap();
    assert!((a.velocity.x + 5.0).abs() / 5.0 < 0.05, "a.vx = {}", a.velocity.x);
    assert!((b.velocity.x - 5.0).abs() / 5.0 < 0.05, "b.vx = {}", b.velocity.x);
}

#[test]
fn scenario_sphere_centered_in_box_reports_degenerate_contact() {
    let sphere_in_box_penetration = {
        let mut a = rigid_core::RigidBody::new(1);
        a.init_sphere(Vector3::zero(), 0.5, 1.0);
        let mut b = rigid_core::RigidBody::new(2);
        b.init_aabb(Vector3::zero(), Vector3::new(2.0, 2.0, 2.0), 1.0);
        rigid_core::narrow_phase::detect(0, &a, 1, &b).unwrap()
    };
    assert!((sphere_in_box_penetration.penetration - 2.5).abs() < 1e-5);
    let n = sphere_in_box_penetration.normal;
    assert!(n.x.abs() == 1.0 || n.y.abs() == 1.0 || n.z.abs() == 1.0);
}

#[test]
fn scenario_capacity_overflow_is_silent() {
    let mut world = World::new();
    world.set_gravity(Vector3::zero());
    for i in 0..rigid_core::world::MAX_BODIES {
        let id = world.add_sphere(Vector3::new(i as f32 * 0.001, 0.0, 0.0), 0.01, 1.0);
        assert!(id > 0);
    }
    let rejected = world.add_sphere(Vector3::zero(), 0.01, 1.0);
    assert_eq!(rejected, -1);
    assert_eq!(world.body_count(), rigid_core::world::MAX_BODIES);
}
