//! Axis-aligned collision detection and response
//!
//! Moving entities are resolved one axis at a time against static platforms:
//! move horizontally and resolve, then move vertically and resolve against the
//! already-corrected position. No spatial partitioning; levels are small.

use super::state::{Body, Platform};

/// Which axis a resolution pass corrects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// What a resolution pass ran into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Came down onto a platform top
    pub landed: bool,
    /// Number of platforms overlapped during a horizontal pass
    pub side_hits: u32,
}

/// Half-open AABB overlap on both axes
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Push `body` out of every overlapping platform along `axis`.
///
/// Platforms are visited in slice order and each overlap corrects the position
/// immediately, so with overlapping platforms the last correction wins.
/// A horizontal overlap counts as a side hit even when the body has no
/// horizontal velocity.
pub fn resolve_axis(body: &mut Body, platforms: &[Platform], axis: Axis) -> Contact {
    let mut contact = Contact::default();

    for platform in platforms {
        let obstacle = &platform.body;
        if !overlaps(body, obstacle) {
            continue;
        }

        match axis {
            Axis::Vertical => {
                if body.vel.y > 0.0 {
                    body.pos.y = obstacle.top() - body.size.y;
                    body.vel.y = 0.0;
                    contact.landed = true;
                } else if body.vel.y < 0.0 {
                    body.pos.y = obstacle.bottom();
                    body.vel.y = 0.0;
                }
            }
            Axis::Horizontal => {
                if body.vel.x > 0.0 {
                    body.pos.x = obstacle.left() - body.size.x;
                } else if body.vel.x < 0.0 {
                    body.pos.x = obstacle.right();
                }
                contact.side_hits += 1;
            }
        }
    }

    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE_SIZE;
    use crate::sim::state::EntityId;
    use glam::Vec2;
    use proptest::prelude::*;

    fn platform(col: usize, row: usize) -> Platform {
        Platform::new(
            EntityId::tile(row, col),
            Vec2::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE),
        )
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        let mut b = Body::new(Vec2::new(x, y), Vec2::new(38.4, 45.6));
        b.vel = Vec2::new(vx, vy);
        b
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Body::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Body::new(Vec2::new(9.9, 9.9), Vec2::splat(10.0));
        let diagonal = Body::new(Vec2::new(5.0, 10.0), Vec2::splat(10.0));

        assert!(!overlaps(&a, &touching));
        assert!(overlaps(&a, &inside));
        assert!(!overlaps(&a, &diagonal));
    }

    #[test]
    fn test_falling_lands_on_top() {
        let ground = [platform(0, 2)];
        let mut b = body(4.0, 60.0, 0.0, 6.0);

        let contact = resolve_axis(&mut b, &ground, Axis::Vertical);
        assert!(contact.landed);
        assert!(approx(b.bottom(), 96.0));
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_rising_bumps_underside() {
        let ceiling = [platform(0, 0)];
        let mut b = body(4.0, 40.0, 0.0, -8.0);

        let contact = resolve_axis(&mut b, &ceiling, Axis::Vertical);
        assert!(!contact.landed);
        assert_eq!(b.top(), TILE_SIZE);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_horizontal_snaps_and_counts_hits() {
        let wall = [platform(1, 0)];

        let mut moving_right = body(20.0, 0.0, 5.0, 0.0);
        let contact = resolve_axis(&mut moving_right, &wall, Axis::Horizontal);
        assert_eq!(contact.side_hits, 1);
        assert!(approx(moving_right.right(), TILE_SIZE));

        let mut moving_left = body(80.0, 0.0, -5.0, 0.0);
        resolve_axis(&mut moving_left, &wall, Axis::Horizontal);
        assert_eq!(moving_left.left(), TILE_SIZE * 2.0);

        // Stationary overlap still reports the hit without moving
        let mut still = body(20.0, 0.0, 0.0, 0.0);
        let contact = resolve_axis(&mut still, &wall, Axis::Horizontal);
        assert_eq!(contact.side_hits, 1);
        assert_eq!(still.pos.x, 20.0);
    }

    #[test]
    fn test_overlapping_platforms_last_correction_wins() {
        let near = Platform::new(EntityId::tile(0, 1), Vec2::new(TILE_SIZE, 0.0));
        let nearer = Platform::new(EntityId::tile(0, 2), Vec2::new(TILE_SIZE - 4.0, 0.0));

        // Still inside `nearer` after snapping to `near`, so both count
        let mut b = body(TILE_SIZE - 37.0, 0.0, 5.0, 0.0);
        let contact = resolve_axis(&mut b, &[near, nearer], Axis::Horizontal);
        assert_eq!(contact.side_hits, 2);
        assert!(approx(b.right(), TILE_SIZE - 4.0));

        // Reversed order: the first snap clears the second platform
        let mut b = body(TILE_SIZE - 37.0, 0.0, 5.0, 0.0);
        let contact = resolve_axis(&mut b, &[nearer, near], Axis::Horizontal);
        assert_eq!(contact.side_hits, 1);
        assert!(approx(b.right(), TILE_SIZE - 4.0));
    }

    #[test]
    fn test_no_overlap_no_contact() {
        let ground = [platform(5, 5)];
        let mut b = body(0.0, 0.0, 3.0, 3.0);
        let before = b;
        assert_eq!(resolve_axis(&mut b, &ground, Axis::Vertical), Contact::default());
        assert_eq!(resolve_axis(&mut b, &ground, Axis::Horizontal), Contact::default());
        assert_eq!(b, before);
    }

    proptest! {
        #[test]
        fn prop_vertical_resolution_rests_on_platform_top(
            col in 0usize..10,
            row in 1usize..10,
            dx in -30.0f32..40.0,
            depth in 0.5f32..40.0,
            vy in 0.1f32..15.0,
        ) {
            let p = platform(col, row);
            let x = p.body.pos.x + dx;
            let y = p.body.top() - 45.6 + depth;
            let mut b = body(x, y, 0.0, vy);
            prop_assume!(overlaps(&b, &p.body));

            let contact = resolve_axis(&mut b, &[p], Axis::Vertical);
            prop_assert!(contact.landed);
            prop_assert!(approx(b.bottom(), p.body.top()));
            prop_assert_eq!(b.vel.y, 0.0);
        }
    }
}
