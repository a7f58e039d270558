use tvariant::{Alternative, Indirect, Variant, match_variant};

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Clone, Debug, PartialEq)]
struct Line {
    from: Point,
    to: Point,
}

#[derive(Alternative, Clone, Debug, PartialEq)]
#[alternative(nothrow_clone)]
struct Meters(f64);

type Shape = Variant![u8, String, Indirect<Point>];

fn describe(shape: Shape) -> String {
    match_variant!(shape {
        0u8 => "zero".to_string(),
        n @ u8 => format!("byte {n}"),
        s @ String => s,
        Point { x: 0, y } => format!("on axis at {y}"),
        Point { x, y } => format!("({x}, {y})"),
    })
}

#[test]
fn exhaustive_arms() {
    assert_eq!(describe(Shape::new(0u8)), "zero");
    assert_eq!(describe(Shape::new(7u8)), "byte 7");
    assert_eq!(describe(Shape::new(String::from("hi"))), "hi");
    assert_eq!(describe(Shape::new(Point { x: 0, y: 5 })), "on axis at 5");
    assert_eq!(describe(Shape::new(Point { x: 1, y: 2 })), "(1, 2)");
}

fn classify(v: Variant![i32, String]) -> &'static str {
    match_variant!(v {
        n @ i32 if n < 0 => "negative",
        i32 => "non-negative",
        s @ String if s.is_empty() => "empty",
        String => "text",
    })
}

#[test]
fn guards_fall_through() {
    assert_eq!(classify(Variant::new(-3i32)), "negative");
    assert_eq!(classify(Variant::new(3i32)), "non-negative");
    assert_eq!(classify(Variant::new(String::new())), "empty");
    assert_eq!(classify(Variant::new(String::from("a"))), "text");
}

type Mixed = Variant![u8, u16, String, char];

#[test]
fn or_patterns_and_wildcards() {
    let is_number = |v: Mixed| {
        match_variant!(v {
            u8 | u16 => true,
            _ => false,
        })
    };
    assert!(is_number(Mixed::new(1u8)));
    assert!(is_number(Mixed::new(1u16)));
    assert!(!is_number(Mixed::new('c')));
    assert!(!is_number(Mixed::new(String::new())));
}

#[test]
fn binding_catch_all_sees_the_rest() {
    let remaining = |v: Mixed| {
        match_variant!(v {
            String => None,
            rest => Some(rest.which()),
        })
    };
    assert_eq!(remaining(Mixed::new(String::from("s"))), None);
    assert_eq!(remaining(Mixed::new(2u16)), Some(1));
    assert_eq!(remaining(Mixed::new('c')), Some(2));
}

#[test]
fn char_and_bool_literals() {
    let v: Variant![char, bool] = Variant::new('x');
    let picked = match_variant!(v {
        'x' => 1,
        char => 2,
        true => 3,
        bool => 4,
    });
    assert_eq!(picked, 1);
}

#[test]
fn nested_structs_and_tuple_structs() {
    type Drawing = Variant![Indirect<Line>, Meters];

    let classify = |v: Drawing| {
        match_variant!(v {
            Line { from: Point { x: 0, y: 0 }, .. } => "from origin".to_string(),
            Line { to, .. } => format!("to {}, {}", to.x, to.y),
            Meters(m) => format!("{m} m"),
        })
    };

    let origin = Point { x: 0, y: 0 };
    let elsewhere = Point { x: 4, y: 2 };
    let line = |from: &Point, to: &Point| Line {
        from: from.clone(),
        to: to.clone(),
    };

    assert_eq!(classify(Drawing::new(line(&origin, &elsewhere))), "from origin");
    assert_eq!(classify(Drawing::new(line(&elsewhere, &elsewhere))), "to 4, 2");
    assert_eq!(classify(Drawing::new(Meters(1.5))), "1.5 m");
}

#[test]
fn bound_value_is_owned() {
    let v: Variant![u8, Indirect<Point>] = Variant::new(Point { x: 3, y: 4 });
    let mut point = match_variant!(v {
        u8 => Point { x: 0, y: 0 },
        p @ Point { .. } => p,
    });
    point.x += 1;
    assert_eq!(point, Point { x: 4, y: 4 });
}

#[test]
fn nested_matches() {
    type Inner = Variant![u8, String];
    let v: Variant![Inner, i64] = Variant::new(Inner::new(9u8));

    let n = match_variant!(v {
        inner @ Inner => match_variant!(inner {
            n @ u8 => i64::from(n),
            String => -1,
        }),
        n @ i64 => n,
    });
    assert_eq!(n, 9);
}
