use crate::core::body::ArcadeBody;
use crate::level::geometry::Platform;

/// Resolve the body against every static platform.
///
/// Each overlap is separated along its minimal-penetration axis; velocity on
/// that axis is reflected through the body's bounce coefficient (zero bounce
/// simply stops it) and the matching `touching`/`blocked` flags are set.
/// Call after `begin_step` + `integrate` so the flags describe this frame.
pub fn resolve_platforms(body: &mut ArcadeBody, platforms: &[Platform]) {
    for platform in platforms {
        resolve_one(body, platform);
    }
}

fn resolve_one(body: &mut ArcadeBody, platform: &Platform) {
    let b = body.aabb();
    let p = platform.bounds;
    if !b.overlaps(&p) {
        return;
    }

    let pen_x = (b.max.x.min(p.max.x)) - (b.min.x.max(p.min.x));
    let pen_y = (b.max.y.min(p.max.y)) - (b.min.y.max(p.min.y));

    if pen_y <= pen_x {
        if body.pos.y < p.center().y {
            // Landing on top.
            body.pos.y -= pen_y;
            if body.vel.y > 0.0 {
                body.vel.y = -body.vel.y * body.bounce;
            }
            body.touching.down = true;
            body.blocked.down = true;
        } else {
            // Bumping the underside.
            body.pos.y += pen_y;
            if body.vel.y < 0.0 {
                body.vel.y = -body.vel.y * body.bounce;
            }
            body.touching.up = true;
            body.blocked.up = true;
        }
    } else if body.pos.x < p.center().x {
        body.pos.x -= pen_x;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
        body.touching.right = true;
        body.blocked.right = true;
    } else {
        body.pos.x += pen_x;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
        body.touching.left = true;
        body.blocked.left = true;
    }
}
