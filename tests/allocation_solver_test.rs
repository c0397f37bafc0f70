// ==========================================
// 舱位分配求解器测试
// ==========================================
// 测试目标: 验证比例分配、航班数取整与退化输入
// ==========================================

use am4_config_wizard::domain::{AircraftSpec, DemandTriple, FareClass};
use am4_config_wizard::engine::{allocate, AllocationSolver};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_allocation_matches_demand_ratio() {
    let demand = DemandTriple::new(100, 20, 10);
    let result = allocate(&demand, 180).unwrap();

    assert!(approx(result.y_per, 100.0 * 180.0 / 170.0));
    assert!(approx(result.j_per, 20.0 * 180.0 / 170.0));
    assert!(approx(result.f_per, 10.0 * 180.0 / 170.0));
    assert_eq!(result.flights, 1);

    assert_eq!(result.format_seats(FareClass::Y, 1), "105.9");
    assert_eq!(result.format_seats(FareClass::J, 1), "21.2");
    assert_eq!(result.format_seats(FareClass::F, 1), "10.6");
}

#[test]
fn test_weighted_units_fill_the_cabin() {
    let cases = [
        (DemandTriple::new(100, 20, 10), 180),
        (DemandTriple::new(3500, 410, 95), 550),
        (DemandTriple::new(1, 1, 1), 50),
        (DemandTriple::new(0, 7, 0), 420),
    ];

    for (demand, seats) in cases {
        let result = allocate(&demand, seats).unwrap();
        assert!(
            (result.weighted_cabin_units() - f64::from(seats)).abs() < 1e-6,
            "demand={} seats={}",
            demand,
            seats
        );
    }
}

#[test]
fn test_flights_round_up() {
    // 仅经济舱: 每班 180 人, 500 人需 3 班
    let result = allocate(&DemandTriple::new(500, 0, 0), 180).unwrap();
    assert!(approx(result.y_per, 180.0));
    assert_eq!(result.flights, 3);

    // 仅头等舱: 每班 50 人, 100 人需 2 班
    let result = allocate(&DemandTriple::new(0, 0, 100), 150).unwrap();
    assert!(approx(result.f_per, 50.0));
    assert_eq!(result.flights, 2);
}

#[test]
fn test_degenerate_inputs_produce_nothing() {
    let solver = AllocationSolver::new();
    let a320 = AircraftSpec::new("A320-200", 180);
    let empty = AircraftSpec::new("Broken", 0);

    assert!(solver.solve(&DemandTriple::default(), Some(&a320)).is_none());
    assert!(solver.solve(&DemandTriple::new(10, 0, 0), None).is_none());
    assert!(solver.solve(&DemandTriple::new(10, 0, 0), Some(&empty)).is_none());
    assert!(solver.solve(&DemandTriple::new(10, 0, 0), Some(&a320)).is_some());
}
