//! Driver status pass-through tests

use crate::helpers::*;
use ncs::core::Operation;
use ncs::prelude::*;
use proptest::prelude::*;

/// Run `op` once through the safe API and return the surfaced status.
fn surfaced_status(op: Operation, code: i32) -> Option<Status> {
    let (ncs, driver) = test_ncs();
    let device = ncs.device(0).unwrap();
    driver.inject(op, Status::from_code(code));

    let result = match op {
        Operation::DeviceCreate => ncs.device(0).map(drop),
        Operation::DeviceOpen => device.open(),
        Operation::DeviceGetOption => device.name().map(drop),
        Operation::GraphCreate => ncs.graph("g").map(drop),
        Operation::FifoCreate => ncs.fifo("f", FifoType::HostRo).map(drop),
        other => unreachable!("not exercised: {other}"),
    };
    result.err().and_then(|e| e.status())
}

const OPERATIONS: [Operation; 5] = [
    Operation::DeviceCreate,
    Operation::DeviceOpen,
    Operation::DeviceGetOption,
    Operation::GraphCreate,
    Operation::FifoCreate,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any non-zero driver status reaches the caller byte-identical.
    #[test]
    fn prop_status_passes_through(
        code in any::<i32>().prop_filter("non-zero", |c| *c != 0),
        op in proptest::sample::select(OPERATIONS.to_vec()),
    ) {
        let status = surfaced_status(op, code);
        prop_assert_eq!(status.map(|s| s.code()), Some(code));
    }
}

#[test]
fn test_every_known_status() {
    for code in -15..=-1 {
        let status = surfaced_status(Operation::DeviceOpen, code).unwrap();
        assert_eq!(status.code(), code);
        assert!(!matches!(status, Status::Unknown(_)), "{code}");
    }
}

#[test]
fn test_injected_ok_is_ignored() {
    assert_eq!(surfaced_status(Operation::DeviceOpen, 0), None);
}
