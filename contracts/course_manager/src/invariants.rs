#![allow(dead_code)]

extern crate std;

use crate::types::Course;

/// INV-1: A reward moves a balance up by exactly one.
pub fn assert_coin_increment(balance_before: u64, balance_after: u64) {
    assert_eq!(
        balance_after,
        balance_before + 1,
        "INV-1 violated: reward moved balance from {} to {}",
        balance_before,
        balance_after
    );
}

/// INV-2: Balances never decrease.
pub fn assert_coins_monotonic(balance_before: u64, balance_after: u64) {
    assert!(
        balance_after >= balance_before,
        "INV-2 violated: balance decreased from {} to {}",
        balance_before,
        balance_after
    );
}

/// INV-3: The inventory cursor never runs past the inventory.
pub fn assert_cursor_within_inventory(course: &Course) {
    assert!(
        course.current_index <= course.inventory_size,
        "INV-3 violated: course {} cursor {} exceeds inventory size {}",
        course.course_id,
        course.current_index,
        course.inventory_size
    );
}

/// INV-4: A successful inventory claim advances the cursor by exactly one.
pub fn assert_cursor_step(before: &Course, after: &Course) {
    assert_eq!(
        after.current_index,
        before.current_index + 1,
        "INV-4 violated: course {} cursor moved from {} to {}",
        before.course_id,
        before.current_index,
        after.current_index
    );
}

/// INV-5: The claim flag is a one-way flip.
pub fn assert_claim_flag_monotonic(received_before: bool, received_after: bool) {
    assert!(
        !received_before || received_after,
        "INV-5 violated: claim flag reset from true to false"
    );
}

/// INV-6: Course configuration never changes after registration.
pub fn assert_course_immutable_fields(original: &Course, current: &Course) {
    assert_eq!(
        original.course_id, current.course_id,
        "INV-6 violated: course id changed"
    );
    assert_eq!(
        original.min_coins_required, current.min_coins_required,
        "INV-6 violated: course {} threshold changed",
        original.course_id
    );
}

/// INV-7: Inventory only grows.
pub fn assert_inventory_monotonic(before: &Course, after: &Course) {
    assert!(
        after.inventory_size >= before.inventory_size,
        "INV-7 violated: course {} inventory shrank from {} to {}",
        before.course_id,
        before.inventory_size,
        after.inventory_size
    );
}

/// Run all stateless course invariants.
pub fn assert_all_course_invariants(course: &Course) {
    assert_cursor_within_inventory(course);
    assert!(
        course.remaining() <= course.inventory_size,
        "remaining certificates exceed inventory for course {}",
        course.course_id
    );
}
