use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
    assert_eq!(SimTime::from_secs_f64(2.5), SimTime(2_500_000_000));
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs_f64(1e30), SimTime(u64::MAX));
}

#[test]
fn from_secs_f64_rounds_up_to_nanos() {
    // 运动唤醒依赖向上取整：事件不得早于解析到达时刻触发
    assert_eq!(SimTime::from_secs_f64(1.5e-9), SimTime(2));
    assert_eq!(SimTime::from_secs_f64(1.0e-9), SimTime(1));
    assert!(SimTime::from_secs_f64(1.0 / 3.0) >= SimTime(333_333_333));
}

#[test]
fn from_secs_f64_rejects_non_positive_and_non_finite() {
    assert_eq!(SimTime::from_secs_f64(0.0), SimTime::ZERO);
    assert_eq!(SimTime::from_secs_f64(-1.0), SimTime::ZERO);
    assert_eq!(SimTime::from_secs_f64(f64::NAN), SimTime::ZERO);
    assert_eq!(SimTime::from_secs_f64(f64::INFINITY), SimTime(u64::MAX));
}

#[test]
fn saturating_arithmetic() {
    let a = SimTime::from_secs(3);
    let b = SimTime::from_secs(5);
    assert_eq!(b.saturating_sub(a), SimTime::from_secs(2));
    assert_eq!(a.saturating_sub(b), SimTime::ZERO);
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(1)), SimTime(u64::MAX));
}
