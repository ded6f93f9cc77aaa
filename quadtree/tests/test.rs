use quadtree::quadtree::{Config, QuadTree};
use quadtree::shapes::Rectangle;
use quadtree::QuadtreeError;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

#[test]
fn test_single_point() {
    let mut qt = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert!(qt.insert(0, 15.0, 20.0));
    let found = qt.query_range(&Rectangle::new(0.0, 0.0, 20.0, 30.0));
    assert_eq!(found, vec![0]);
}

#[test]
fn test_no_results() {
    let mut qt = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    qt.insert(0, 10.0, 10.0);
    qt.insert(1, 50.0, 50.0);
    let found = qt.query_range(&Rectangle::new(80.0, 80.0, 10.0, 10.0));
    assert!(found.is_empty());
}

#[test]
fn test_upper_corner_is_rejected() {
    let mut qt = QuadTree::new(Rectangle::new(10.0, 20.0, 100.0, 50.0)).unwrap();
    assert!(!qt.insert(0, 110.0, 70.0));
    assert!(!qt.insert(1, 110.0, 30.0));
    assert!(!qt.insert(2, 50.0, 70.0));
    assert!(qt.insert(3, 10.0, 20.0));
    assert!(!qt.insert(4, 9.9, 30.0));
    assert_eq!(qt.len(), 1);
}

#[test]
fn test_query_outside_boundary_is_empty() {
    let mut qt = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    for i in 0..10 {
        qt.insert(i, i as f32 * 10.0, 50.0);
    }
    assert!(qt
        .query_range(&Rectangle::new(500.0, 500.0, 10.0, 10.0))
        .is_empty());
}

#[test]
fn test_query_uses_half_open_points() {
    let mut qt = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    qt.insert(0, 10.0, 10.0);
    qt.insert(1, 20.0, 20.0);
    // The range's max corner is (20, 20), so point 1 sits on the excluded edge.
    let found = qt.query_range(&Rectangle::new(10.0, 10.0, 10.0, 10.0));
    assert_eq!(found, vec![0]);
}

#[test]
fn test_subdivides_after_capacity() {
    let config = Config {
        node_capacity: 2,
        max_depth: 5,
    };
    let mut qt = QuadTree::new_with_config(Rectangle::new(0.0, 0.0, 100.0, 100.0), config).unwrap();
    qt.insert(0, 10.0, 10.0);
    qt.insert(1, 90.0, 90.0);
    assert_eq!(qt.node_count(), 1);
    qt.insert(2, 60.0, 60.0);
    assert_eq!(qt.node_count(), 5);

    let mut boundaries = Vec::new();
    qt.all_node_boundaries(&mut boundaries);
    assert_eq!(boundaries[1], Rectangle::new(50.0, 50.0, 50.0, 50.0));
}

#[test]
fn test_max_depth_overflows_capacity() {
    let config = Config {
        node_capacity: 1,
        max_depth: 2,
    };
    let mut qt = QuadTree::new_with_config(Rectangle::new(0.0, 0.0, 64.0, 64.0), config).unwrap();
    for i in 0..50 {
        assert!(qt.insert(i, 1.0, 1.0));
    }
    assert_eq!(qt.len(), 50);
    assert_eq!(qt.max_node_depth(), 2);
    assert_eq!(qt.query_range(&Rectangle::new(0.0, 0.0, 2.0, 2.0)).len(), 50);
}

#[test]
fn test_full_boundary_query_returns_everything() {
    let boundary = Rectangle::new(-50.0, -50.0, 900.0, 700.0);
    let configs = [
        Config::default(),
        Config {
            node_capacity: 1,
            max_depth: 1,
        },
        Config {
            node_capacity: 1,
            max_depth: 12,
        },
        Config {
            node_capacity: 16,
            max_depth: 3,
        },
    ];

    let mut rng: StdRng = SeedableRng::seed_from_u64(7);
    for config in configs {
        let mut qt = QuadTree::new_with_config(boundary, config).unwrap();
        let mut inserted = HashSet::new();
        for i in 0..1_000u32 {
            let (x, y) = boundary.get_random_point_inside(&mut rng);
            assert!(qt.insert(i, x, y));
            inserted.insert(i);
        }

        let found = qt.query_range(&boundary);
        assert_eq!(found.len(), inserted.len(), "no duplicates or losses");
        let found_set: HashSet<_> = found.into_iter().collect();
        assert_eq!(found_set, inserted);
    }
}

#[test]
fn test_range_query_matches_brute_force() {
    let boundary = Rectangle::new(0.0, 0.0, 1000.0, 1000.0);
    let mut qt = QuadTree::new(boundary).unwrap();
    let mut rng: StdRng = SeedableRng::seed_from_u64(42);
    let mut points = Vec::new();
    for i in 0..500u32 {
        let x = rng.gen_range(0.0..1000.0);
        let y = rng.gen_range(0.0..1000.0);
        qt.insert(i, x, y);
        points.push((i, x, y));
    }

    for _ in 0..100 {
        let range = Rectangle::new(
            rng.gen_range(-100.0..1000.0),
            rng.gen_range(-100.0..1000.0),
            rng.gen_range(1.0..300.0),
            rng.gen_range(1.0..300.0),
        );
        let expected: HashSet<u32> = points
            .iter()
            .filter(|(_, x, y)| range.contains_point(*x, *y))
            .map(|(i, _, _)| *i)
            .collect();
        let found: HashSet<u32> = qt.query_range(&range).into_iter().collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn test_rebuild_discards_previous_tick() {
    let mut qt = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    for i in 0..20 {
        qt.insert(i, i as f32 * 4.0, 50.0);
    }
    assert!(qt.node_count() > 1);

    let rejected = qt.rebuild(vec![(100, 5.0, 5.0), (101, 150.0, 5.0)]);
    assert_eq!(rejected, 1);
    assert_eq!(qt.len(), 1);
    assert_eq!(qt.node_count(), 1);
    assert_eq!(qt.query_range(&Rectangle::new(0.0, 0.0, 100.0, 100.0)), vec![100]);
}

#[test]
fn test_invalid_construction() {
    let err = QuadTree::<u32>::new(Rectangle::new(0.0, 0.0, -1.0, 10.0)).err();
    assert_eq!(
        err,
        Some(QuadtreeError::InvalidRectangleDims {
            width: -1.0,
            height: 10.0
        })
    );

    let err = QuadTree::<u32>::new_with_config(
        Rectangle::new(0.0, 0.0, 10.0, 10.0),
        Config {
            node_capacity: 0,
            max_depth: 5,
        },
    )
    .err();
    assert_eq!(err, Some(QuadtreeError::InvalidNodeCapacity { node_capacity: 0 }));

    let err = QuadTree::<u32>::new(Rectangle::new(f32::NAN, 0.0, 10.0, 10.0)).err();
    assert!(matches!(
        err,
        Some(QuadtreeError::InvalidRectanglePosition { .. })
    ));
}
