use common::angles::*;
use common::arena::Arena;
use common::shapes::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_getters() {
    let rect = Rectangle::new(2.0, 3.0, 4.0, 6.0);
    assert_eq!(rect.width(), 4.0);
    assert_eq!(rect.height(), 6.0);
    assert_eq!(rect.max_x(), 6.0);
    assert_eq!(rect.max_y(), 9.0);
    assert_eq!(rect.center_x(), 4.0);
    assert_eq!(rect.center_y(), 6.0);
}

#[test]
fn test_contains_point_is_half_open() {
    let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    assert!(rect.contains_point(0.0, 0.0));
    assert!(rect.contains_point(9.99, 9.99));
    assert!(!rect.contains_point(10.0, 5.0));
    assert!(!rect.contains_point(5.0, 10.0));
    assert!(rect.contains_point_inclusive(10.0, 10.0));
}

#[test]
fn test_intersects_counts_touching_edges() {
    let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    assert!(rect.intersects(&Rectangle::new(10.0, 0.0, 5.0, 5.0)));
    assert!(rect.intersects(&Rectangle::new(2.0, 2.0, 1.0, 1.0)));
    assert!(!rect.intersects(&Rectangle::new(10.5, 0.0, 5.0, 5.0)));
    assert!(!rect.intersects(&Rectangle::new(0.0, -6.0, 5.0, 5.0)));
}

#[test]
fn test_quadrants() {
    let [ne, nw, se, sw] = Rectangle::new(0.0, 0.0, 100.0, 50.0).quadrants();
    assert_eq!(ne, Rectangle::new(50.0, 25.0, 50.0, 25.0));
    assert_eq!(nw, Rectangle::new(0.0, 25.0, 50.0, 25.0));
    assert_eq!(se, Rectangle::new(50.0, 0.0, 50.0, 25.0));
    assert_eq!(sw, Rectangle::new(0.0, 0.0, 50.0, 25.0));
}

#[test]
fn test_expanded_and_around() {
    let rect = Rectangle::new(0.0, 0.0, 800.0, 600.0).expanded(50.0);
    assert_eq!(rect, Rectangle::new(-50.0, -50.0, 900.0, 700.0));
    assert_eq!(
        Rectangle::around(10.0, 20.0, 5.0),
        Rectangle::new(5.0, 15.0, 10.0, 10.0)
    );
}

#[test]
fn test_get_random_point_inside() {
    let rect = Rectangle::new(2.0, 3.0, 6.0, 8.0);

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..50 {
        let (x, y) = rect.get_random_point_inside(&mut rng);
        assert!(rect.contains_point(x, y));
    }
}

#[test]
fn test_wrap_degrees() {
    assert_eq!(wrap_degrees(370.0), 10.0);
    assert_eq!(wrap_degrees(-90.0), 270.0);
    assert_eq!(wrap_degrees(360.0), 0.0);
    assert!(wrap_degrees(-1e-9) < 360.0);
}

#[test]
fn test_shortest_difference() {
    assert_eq!(shortest_difference(350.0, 10.0), 20.0);
    assert_eq!(shortest_difference(10.0, 350.0), -20.0);
    assert_eq!(shortest_difference(0.0, 90.0), 90.0);
}

#[test]
fn test_heading_convention() {
    assert!((heading_towards(0.0, 0.0, 0.0, 10.0) - 0.0).abs() < 1e-4);
    assert!((heading_towards(0.0, 0.0, 10.0, 0.0) - 90.0).abs() < 1e-4);
    let (dx, dy) = direction(90.0);
    assert!((dx - 1.0).abs() < 1e-6);
    assert!(dy.abs() < 1e-6);
}

#[test]
fn test_ease_towards_takes_shorter_arc() {
    // From 350 toward 10 the short way is +20 degrees, so we must cross 0.
    let eased = ease_towards(350.0, 10.0, 7.0, 1.0 / 60.0);
    assert!(eased > 350.0);
    let halfway = ease_towards(350.0, 10.0, 0.5, 1.0);
    assert!(halfway.abs() < 1e-4 || (halfway - 360.0).abs() < 1e-4);
}

#[test]
fn test_arena_handles_go_stale() {
    let mut arena = Arena::new();
    let a = arena.insert("a");
    let b = arena.insert("b");
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.remove(a), Some("a"));
    assert_eq!(arena.get(a), None);

    // The freed slot is reused with a new generation.
    let c = arena.insert("c");
    assert_eq!(c.index(), a.index());
    assert_ne!(c.generation(), a.generation());
    assert_eq!(arena.get(a), None);
    assert_eq!(arena.get(c), Some(&"c"));
    assert_eq!(arena.get(b), Some(&"b"));
}

#[test]
fn test_arena_retain() {
    let mut arena = Arena::new();
    let handles: Vec<_> = (0..10).map(|i| arena.insert(i)).collect();
    arena.retain(|_, value| *value % 2 == 0);
    assert_eq!(arena.len(), 5);
    assert!(arena.contains(handles[0]));
    assert!(!arena.contains(handles[1]));
    let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![0, 2, 4, 6, 8]);
}
