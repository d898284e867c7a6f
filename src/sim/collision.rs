//! Collision detection and response
//!
//! Overlap tests for the two shapes the game needs (axis-aligned boxes and
//! circles) plus the pair rules: ground contact, the bomb landing bounce,
//! and bomb-bomb repulsion.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Body, Bomb, Player, Star};
use crate::consts::REST_SPEED;
use crate::settings::Tuning;

/// Collision shape, centred on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { half: Vec2 },
    Circle { radius: f32 },
}

impl Shape {
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Rect { half } => half,
            Shape::Circle { radius } => Vec2::splat(radius),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Closest point inside the box to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Circle vs box overlap (touching does not count)
pub fn circle_overlaps_aabb(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    center.distance_squared(rect.closest_point(center)) < radius * radius
}

/// Circle vs circle overlap (touching does not count)
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Shape-aware overlap between two enabled bodies
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    if !a.enabled || !b.enabled {
        return false;
    }
    match (a.shape, b.shape) {
        (Shape::Rect { .. }, Shape::Rect { .. }) => a.bounds().overlaps(&b.bounds()),
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            circle_overlaps_aabb(b.pos, radius, &a.bounds())
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_overlaps_aabb(a.pos, radius, &b.bounds())
        }
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circles_overlap(a.pos, ra, b.pos, rb)
        }
    }
}

/// Solid contact with the ground band
///
/// A body whose bottom edge reached the surface while not moving upward is
/// pushed back onto it, bounces by its coefficient, and is marked
/// `touching_down`. Slow rebounds come to rest. Returns whether contact
/// happened this tick.
pub fn ground_contact(body: &mut Body, ground: &Aabb) -> bool {
    if !body.enabled || body.vel.y < 0.0 {
        return false;
    }
    if !body.bounds().overlaps(ground) && body.bottom() < ground.min.y {
        return false;
    }
    let half = body.half_extents();
    if body.pos.x + half.x <= ground.min.x || body.pos.x - half.x >= ground.max.x {
        return false;
    }

    body.pos.y = ground.min.y - half.y;
    body.vel.y = -body.vel.y * body.bounce;
    if body.vel.y.abs() < REST_SPEED {
        body.vel.y = 0.0;
    }
    body.touching_down = true;
    true
}

/// Landing rule that keeps bombs airborne
///
/// Vertical velocity becomes the fixed ground impulse. The heading is only
/// re-rolled when the bomb is barely moving sideways, so an in-progress
/// bomb-bomb push is left alone.
pub fn bomb_ground_bounce(bomb: &mut Bomb, tuning: &Tuning, rng: &mut impl Rng) {
    if !bomb.body.touching_down {
        return;
    }
    bomb.body.vel.y = tuning.bomb_ground_impulse;
    if bomb.body.vel.x.abs() < tuning.bomb_reheading_threshold {
        let range = tuning.bomb_ground_vx;
        bomb.body.vel.x = rng.random_range(-range..=range) as f32;
        log::debug!("Bomb {} re-headed to vx={}", bomb.id, bomb.body.vel.x);
    }
}

/// Velocity delta for `b` pushing it away from `a`
///
/// `a` receives the negated delta. Coincident centres give `None`.
pub fn separation_impulse(a: Vec2, b: Vec2, magnitude: f32) -> Option<Vec2> {
    let delta = b - a;
    let distance = delta.length();
    if distance > 0.0 {
        Some(delta / distance * magnitude)
    } else {
        None
    }
}

/// Push every overlapping pair of bombs apart
///
/// Each unordered pair is visited once, lower index first.
pub fn resolve_bomb_pairs(bombs: &mut [Bomb], magnitude: f32) {
    for i in 0..bombs.len() {
        let (head, tail) = bombs.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !bodies_overlap(&a.body, &b.body) {
                continue;
            }
            if let Some(push) = separation_impulse(a.body.pos, b.body.pos, magnitude) {
                a.body.vel -= push;
                b.body.vel += push;
            }
        }
    }
}

/// Indices of active stars the player overlaps, in wave order
pub fn overlapping_stars(player: &Player, stars: &[Star]) -> Vec<usize> {
    stars
        .iter()
        .enumerate()
        .filter(|(_, star)| star.active && bodies_overlap(&player.body, &star.body))
        .map(|(i, _)| i)
        .collect()
}

/// First bomb (by order) touching the player
pub fn first_bomb_contact<'a>(player: &Player, bombs: &'a [Bomb]) -> Option<&'a Bomb> {
    bombs.iter().find(|bomb| bodies_overlap(&player.body, &bomb.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Ground;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn landing_bomb(vel: Vec2) -> Bomb {
        let ground = Ground::default();
        let mut bomb = Bomb::new(1, Vec2::new(400.0, ground.surface() - BOMB_RADIUS + 2.0), vel);
        assert!(ground_contact(&mut bomb.body, &ground.rect));
        bomb
    }

    #[test]
    fn test_circle_aabb_overlap() {
        let rect = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(circle_overlaps_aabb(Vec2::new(5.0, 5.0), 1.0, &rect));
        assert!(circle_overlaps_aabb(Vec2::new(12.0, 5.0), 3.0, &rect));
        assert!(!circle_overlaps_aabb(Vec2::new(14.0, 14.0), 3.0, &rect));
        // Touching exactly is not an overlap
        assert!(!circle_overlaps_aabb(Vec2::new(13.0, 5.0), 3.0, &rect));
    }

    #[test]
    fn test_ground_contact_clamps_and_flags() {
        let ground = Ground::default();
        let mut star = Star::new(1, Vec2::new(200.0, ground.surface() - 5.0), 0.5);
        star.body.vel = Vec2::new(0.0, 200.0);

        assert!(ground_contact(&mut star.body, &ground.rect));
        assert_eq!(star.body.bottom(), ground.surface());
        assert_eq!(star.body.vel.y, -100.0);
        assert!(star.body.touching_down);
    }

    #[test]
    fn test_ground_contact_rests_slow_bodies() {
        let ground = Ground::default();
        let mut player = Player::new(Vec2::new(100.0, ground.surface() - 15.0));
        player.body.vel.y = 10.0;
        assert!(ground_contact(&mut player.body, &ground.rect));
        assert_eq!(player.body.vel.y, 0.0);
        assert!(player.grounded());
    }

    #[test]
    fn test_ground_contact_ignores_rising_and_disabled() {
        let ground = Ground::default();
        let mut body = Player::new(Vec2::new(100.0, ground.surface())).body;
        body.vel.y = -50.0;
        assert!(!ground_contact(&mut body, &ground.rect));

        body.vel.y = 50.0;
        body.enabled = false;
        assert!(!ground_contact(&mut body, &ground.rect));

        let mut airborne = Player::new(Vec2::new(100.0, 300.0)).body;
        airborne.vel.y = 50.0;
        assert!(!ground_contact(&mut airborne, &ground.rect));
    }

    #[test]
    fn test_bomb_bounce_reheads_slow_bomb() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bomb = landing_bomb(Vec2::new(30.0, 300.0));

        bomb_ground_bounce(&mut bomb, &tuning, &mut rng);
        assert_eq!(bomb.body.vel.y, -700.0);
        assert!((-150.0..=150.0).contains(&bomb.body.vel.x));
        assert_eq!(bomb.body.vel.x.fract(), 0.0);
    }

    #[test]
    fn test_bomb_bounce_keeps_fast_heading() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bomb = landing_bomb(Vec2::new(120.0, 300.0));

        bomb_ground_bounce(&mut bomb, &tuning, &mut rng);
        assert_eq!(bomb.body.vel, Vec2::new(120.0, -700.0));
    }

    #[test]
    fn test_bomb_bounce_requires_touch_down() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bomb = Bomb::new(1, Vec2::new(400.0, 200.0), Vec2::new(10.0, 300.0));

        bomb_ground_bounce(&mut bomb, &tuning, &mut rng);
        assert_eq!(bomb.body.vel, Vec2::new(10.0, 300.0));
    }

    #[test]
    fn test_separation_coincident_is_noop() {
        assert!(separation_impulse(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 100.0).is_none());

        let mut bombs = vec![
            Bomb::new(1, Vec2::new(300.0, 300.0), Vec2::new(10.0, 0.0)),
            Bomb::new(2, Vec2::new(300.0, 300.0), Vec2::new(-10.0, 0.0)),
        ];
        resolve_bomb_pairs(&mut bombs, BOMB_SEPARATION_IMPULSE);
        assert_eq!(bombs[0].body.vel, Vec2::new(10.0, 0.0));
        assert_eq!(bombs[1].body.vel, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_resolve_bomb_pairs_pushes_apart() {
        let mut bombs = vec![
            Bomb::new(1, Vec2::new(300.0, 300.0), Vec2::ZERO),
            Bomb::new(2, Vec2::new(320.0, 300.0), Vec2::ZERO),
            Bomb::new(3, Vec2::new(700.0, 100.0), Vec2::ZERO),
        ];
        resolve_bomb_pairs(&mut bombs, 100.0);
        assert_eq!(bombs[0].body.vel, Vec2::new(-100.0, 0.0));
        assert_eq!(bombs[1].body.vel, Vec2::new(100.0, 0.0));
        assert_eq!(bombs[2].body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_overlapping_stars_skips_inactive() {
        let player = Player::new(Vec2::new(100.0, 400.0));
        let mut stars = vec![
            Star::new(1, Vec2::new(100.0, 400.0), 0.5),
            Star::new(2, Vec2::new(105.0, 410.0), 0.5),
            Star::new(3, Vec2::new(500.0, 400.0), 0.5),
        ];
        stars[1].deactivate();
        assert_eq!(overlapping_stars(&player, &stars), vec![0]);
    }

    #[test]
    fn test_first_bomb_contact() {
        let player = Player::new(Vec2::new(100.0, 400.0));
        let bombs = vec![
            Bomb::new(4, Vec2::new(300.0, 400.0), Vec2::ZERO),
            Bomb::new(5, Vec2::new(100.0, 380.0), Vec2::ZERO),
        ];
        assert_eq!(first_bomb_contact(&player, &bombs).map(|b| b.id), Some(5));
    }

    proptest! {
        #[test]
        fn prop_separation_is_antisymmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let forward = separation_impulse(a, b, 100.0);
            let backward = separation_impulse(b, a, 100.0);
            match (forward, backward) {
                (Some(f), Some(r)) => prop_assert_eq!(f, -r),
                (None, None) => {}
                _ => prop_assert!(false, "asymmetric coincidence check"),
            }
        }

        #[test]
        fn prop_bomb_landing_is_always_exact(vx in -400.0f32..400.0, vy in 0.0f32..900.0, seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut bomb = landing_bomb(Vec2::new(vx, vy));
            let vx_before = bomb.body.vel.x;

            bomb_ground_bounce(&mut bomb, &tuning, &mut rng);
            prop_assert_eq!(bomb.body.vel.y, -700.0);
            if vx_before.abs() < 50.0 {
                prop_assert!((-150.0..=150.0).contains(&bomb.body.vel.x));
            } else {
                prop_assert_eq!(bomb.body.vel.x, vx_before);
            }
        }
    }
}
