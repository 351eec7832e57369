//! Layout Seeder: deterministic starting coordinates.
//!
//! Primary concepts are pinned to the vertices of a regular polygon centered
//! in the viewport. Each primary also gets a "focus" on a larger concentric
//! polygon; that focus is where its secondary concepts start (plus sub-pixel
//! jitter so no two nodes coincide exactly, which would blow up the force
//! math) and what the per-axis centering forces later pull them toward.

use rand::Rng;
use std::collections::HashMap;

use super::{ConceptNode, GraphConfig, Point, PrimaryConcept};

/// K vertices evenly spaced on a circle, starting at 12 o'clock and going
/// clockwise: `x = cx + R*sin(theta)`, `y = cy - R*cos(theta)`.
/// A single vertex degenerates to the exact center.
pub fn polygon_vertices(k: usize, center: Point, radius: f64) -> Vec<Point> {
    if k == 1 {
        return vec![center];
    }
    (0..k)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / k as f64;
            Point {
                x: center.x + radius * theta.sin(),
                y: center.y - radius * theta.cos(),
            }
        })
        .collect()
}

/// Compute each primary concept's pinned vertex (inner polygon, radius R1)
/// and focus (outer polygon, R2 = R1 + link distance + margin).
pub fn primary_concepts(primary_cids: &[String], cfg: &GraphConfig) -> Vec<PrimaryConcept> {
    let center = cfg.center();
    let inner = polygon_vertices(primary_cids.len().max(1), center, cfg.polygon_radius);
    let outer_radius = cfg.polygon_radius + cfg.link_distance + cfg.focus_margin;
    let outer = polygon_vertices(primary_cids.len().max(1), center, outer_radius);

    primary_cids
        .iter()
        .zip(inner.iter().zip(outer.iter()))
        .map(|(c_id, (&vertex, &focus))| PrimaryConcept {
            c_id: c_id.clone(),
            vertex,
            focus,
        })
        .collect()
}

/// Assign starting positions. Primaries are set to and pinned at their
/// polygon vertex; secondaries start at their owner's focus plus jitter in
/// (-0.5, 0.5) px per axis and stay unpinned so the simulation can relax
/// them.
pub fn seed_positions<R: Rng>(
    nodes: &mut [ConceptNode],
    primaries: &[PrimaryConcept],
    cfg: &GraphConfig,
    rng: &mut R,
) {
    let by_cid: HashMap<&str, &PrimaryConcept> =
        primaries.iter().map(|p| (p.c_id.as_str(), p)).collect();
    let center = cfg.center();

    for node in nodes.iter_mut() {
        if let Some(primary) = by_cid.get(node.c_id.as_str()) {
            node.x = primary.vertex.x;
            node.y = primary.vertex.y;
            node.fx = Some(primary.vertex.x);
            node.fy = Some(primary.vertex.y);
            continue;
        }

        // Malformed owner tags fall back to the viewport center.
        let focus = by_cid
            .get(node.primary_concept_cid.as_str())
            .map(|p| p.focus)
            .unwrap_or(center);
        node.x = focus.x + rng.gen_range(-0.5..0.5);
        node.y = focus.y + rng.gen_range(-0.5..0.5);
        node.fx = None;
        node.fy = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> GraphConfig {
        GraphConfig {
            width: 1000.0,
            height: 600.0,
            ..GraphConfig::default()
        }
    }

    #[test]
    fn test_single_vertex_degenerates_to_center() {
        let center = Point { x: 500.0, y: 300.0 };
        let vertices = polygon_vertices(1, center, 200.0);
        assert_eq!(vertices.len(), 1);
        assert_relative_eq!(vertices[0].x, 500.0);
        assert_relative_eq!(vertices[0].y, 300.0);

        // Both polygons collapse for a single primary.
        let primaries = primary_concepts(&["only".to_string()], &config());
        assert_relative_eq!(primaries[0].vertex.x, 500.0);
        assert_relative_eq!(primaries[0].focus.x, 500.0);
        assert_relative_eq!(primaries[0].focus.y, 300.0);
    }

    #[test]
    fn test_four_vertices_form_an_inscribed_square() {
        let center = Point { x: 0.0, y: 0.0 };
        let r = 100.0;
        let vertices = polygon_vertices(4, center, r);
        assert_eq!(vertices.len(), 4);

        // 12 o'clock, then clockwise in 90-degree steps.
        let expected = [(0.0, -r), (r, 0.0), (0.0, r), (-r, 0.0)];
        for (v, (ex, ey)) in vertices.iter().zip(expected) {
            assert_relative_eq!(v.x, ex, epsilon = 1e-9);
            assert_relative_eq!(v.y, ey, epsilon = 1e-9);
        }

        // Exactly 90 degrees between consecutive vertices.
        for pair in vertices.windows(2) {
            let a = (pair[0].y - center.y).atan2(pair[0].x - center.x);
            let b = (pair[1].y - center.y).atan2(pair[1].x - center.x);
            let mut delta = (b - a).rem_euclid(std::f64::consts::TAU);
            if delta > std::f64::consts::PI {
                delta = std::f64::consts::TAU - delta;
            }
            assert_relative_eq!(delta, std::f64::consts::FRAC_PI_2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_vertex_count_matches_primary_count() {
        for k in [2, 3, 5, 8] {
            let cids: Vec<String> = (0..k).map(|i| format!("p{i}")).collect();
            let primaries = primary_concepts(&cids, &config());
            assert_eq!(primaries.len(), k);
        }
    }

    #[test]
    fn test_focus_polygon_radius() {
        let cfg = config();
        let center = cfg.center();
        let primaries = primary_concepts(&["a".to_string(), "b".to_string()], &cfg);
        let expected = cfg.polygon_radius + cfg.link_distance + cfg.focus_margin;
        for p in &primaries {
            let d = ((p.focus.x - center.x).powi(2) + (p.focus.y - center.y).powi(2)).sqrt();
            assert_relative_eq!(d, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_primaries_pinned_secondaries_jittered() {
        let cfg = config();
        let primaries = primary_concepts(&["p".to_string()], &cfg);
        let mut nodes = vec![
            ConceptNode::new("p".into(), "P".into(), "p".into(), true),
            ConceptNode::new("s".into(), "S".into(), "p".into(), false),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        seed_positions(&mut nodes, &primaries, &cfg, &mut rng);

        assert_eq!(nodes[0].fx, Some(primaries[0].vertex.x));
        assert_eq!(nodes[0].fy, Some(primaries[0].vertex.y));

        assert!(nodes[1].fx.is_none());
        let focus = primaries[0].focus;
        assert!((nodes[1].x - focus.x).abs() < 0.5);
        assert!((nodes[1].y - focus.y).abs() < 0.5);
        // Jittered, not exactly on the focus.
        assert!(nodes[1].x != focus.x || nodes[1].y != focus.y);
    }

    #[test]
    fn test_seeding_is_reproducible() {
        let cfg = config();
        let primaries = primary_concepts(&["p".to_string()], &cfg);
        let mut a = vec![ConceptNode::new("s".into(), "".into(), "p".into(), false)];
        let mut b = a.clone();
        seed_positions(&mut a, &primaries, &cfg, &mut ChaCha8Rng::seed_from_u64(42));
        seed_positions(&mut b, &primaries, &cfg, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a[0].x, b[0].x);
        assert_eq!(a[0].y, b[0].y);
    }
}
