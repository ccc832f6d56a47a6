use glam::Vec2;
use nobonk_motor::*;

fn main() {
    let mut layer = CollisionLayer::new(LayerConfig { cell_size: 1.0 });
    let ground = LayerMask::simple(1, 0);
    layer.insert_aabb(Vec2::new(0.0, -0.5), Vec2::new(8.0, 0.5), ground, Some(1));
    layer.insert_aabb(Vec2::new(4.5, 2.0), Vec2::new(0.5, 2.0), ground, Some(2));

    let params = PhysicsParams {
        deceleration: 1.5,
        collision_mask: LayerMask::query(1),
        ..PhysicsParams::default()
    };
    let body = BoxBody::standing_at(0.0, 1.0, Vec2::splat(0.25));
    let mut motor = match KinematicMotor::new(body, params) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("bad motor setup: {e}");
            return;
        }
    };
    motor.launch(Vec2::new(5.0, 3.0));

    let dt = 1.0 / 60.0;
    for frame in 0..240 {
        let report = motor.tick_with_observer(dt, &layer, &mut |b: Bounce| {
            println!("frame {frame:3}: {:?} bounce {:.2} -> {:.2}", b.axis, b.incoming, b.outgoing);
        });
        if frame % 30 == 0 {
            let c = motor.collisions();
            println!(
                "frame {frame:3}: pos=({:.3},{:.3}) vel=({:.2},{:.2}) below={} wall={} moved={:.3}",
                motor.body().center.x,
                motor.body().center.y,
                motor.velocity().x,
                motor.velocity().y,
                c.below,
                c.touching_wall(),
                report.displacement.length(),
            );
        }
    }
}
