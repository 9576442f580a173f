use crate::q::Q;
use crate::text::parse_q;

// The four rounding behaviors, pinned value by value. round is half
// away from zero; floor/ceil are directional; trunc drops toward zero.
#[test]
fn rounding_table_is_exact() {
    let table: &[(&str, i32, i32, i32, i32)] = &[
        // input   round  floor  ceil  trunc
        ("2.3", 2, 2, 3, 2),
        ("3.8", 4, 3, 4, 3),
        ("5.5", 6, 5, 6, 5),
        ("-2.3", -2, -3, -2, -2),
        ("-3.8", -4, -4, -3, -3),
        ("-5.5", -6, -6, -5, -5),
    ];
    for &(input, round, floor, ceil, trunc) in table {
        let q = parse_q(input, 10, -1).unwrap();
        assert_eq!(q.round(), Q::from_int(round), "round {input}");
        assert_eq!(q.floor(), Q::from_int(floor), "floor {input}");
        assert_eq!(q.ceil(), Q::from_int(ceil), "ceil {input}");
        assert_eq!(q.trunc(), Q::from_int(trunc), "trunc {input}");
    }
}

#[test]
fn rounding_on_exact_integers_is_identity() {
    for v in [-3, -1, 0, 1, 7] {
        let q = Q::from_int(v);
        assert_eq!(q.round(), q);
        assert_eq!(q.floor(), q);
        assert_eq!(q.ceil(), q);
        assert_eq!(q.trunc(), q);
    }
}

#[test]
fn half_ulp_cases() {
    // exactly x.5 stored as raw 0x8000 fraction
    let q = Q::from_raw((2 << 16) | 0x8000);
    assert_eq!(q.round(), Q::from_int(3));
    let q = q.negate();
    assert_eq!(q.round(), Q::from_int(-3));
}
