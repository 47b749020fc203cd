//! Process-wide limits are fixed once.
//!
//! Kept in its own test binary so no other test fixes the limits first.

use simcompute_model::prelude::*;

#[test]
fn installed_limits_drive_release_and_defaults() {
    let limits = QuantityLimits::new(2000, 4000);
    QuantityLimits::install_global(limits).unwrap();
    assert_eq!(QuantityLimits::global(), limits);

    assert_eq!(
        QuantityLimits::install_global(QuantityLimits::default()),
        Err(limits)
    );

    let full = ResourceQuantity::default();
    assert_eq!((full.cpu(), full.mem()), (2000, 4000));
    assert!(full.is_valid());

    let held = ResourceQuantity::with_uuid(1500, 0, 1);
    assert!(held.release(&ResourceQuantity::new(500, 4000)).is_ok());
    assert!(matches!(
        held.release(&ResourceQuantity::new(501, 0)),
        Err(QuantityError::OverCapacity { max_cpu: 2000, .. })
    ));
}
