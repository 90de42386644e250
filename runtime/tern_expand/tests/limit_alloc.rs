//! Exceeding the arity cap must not allocate.
//!
//! Kept in its own test binary: the counting allocator sees every thread,
//! so no other test may run alongside it.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use stats_alloc::{Region, StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;

use tern_expand::{ArgData, Expander, NoncanonHandling};
use tern_heap::Heap;
use tern_rtti::word::int_to_word;
use tern_rtti::{
    DuFunctorDesc, ExistInfo, ExistLocn, PseudoTypeInfo, TypeCtorId, TypeInfo, TypeTableBuilder,
};

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

#[test]
fn limit_exceeded_allocates_nothing() {
    let mut b = TypeTableBuilder::new();
    let packed = b.declare("pack", "packed", 0).unwrap();
    // packed(T, int, int) with T's descriptor as a witness word.
    b.define_du(
        packed,
        vec![DuFunctorDesc::remote("packed", 1, 0)
            .with_exist_info(ExistInfo::new(vec![ExistLocn::Plain { slot: 0 }], 0))
            .with_arg(PseudoTypeInfo::exist(0))
            .with_arg(PseudoTypeInfo::ground(TypeCtorId::INT))
            .with_arg(PseudoTypeInfo::ground(TypeCtorId::INT))],
        false,
    )
    .unwrap();
    let table = b.finish();

    let mut heap = Heap::new();
    let elems: Vec<_> = (0..1_000_000).map(int_to_word).collect();
    let array = heap.alloc_array(&elems);
    let array_ty = TypeInfo::array(TypeInfo::int());

    let witness = heap.alloc_type_info(&table, &TypeInfo::string()).unwrap();
    let functor = table.get(packed).unwrap().du_layout().unwrap().functor_named("packed").unwrap();
    let term = heap.construct(functor, &[witness], &[0, 1, 2]);
    let term_ty = TypeInfo::ground(packed);

    let expander = Expander::new(&table, &heap);

    // Registers the tracing callsites outside the measured region.
    expander
        .limited_args(&array_ty, &array, NoncanonHandling::Abort, 10)
        .unwrap();
    expander
        .limited_args(&term_ty, &term, NoncanonHandling::Abort, 2)
        .unwrap();

    let region = Region::new(GLOBAL);
    let from_array = expander
        .limited_args(&array_ty, &array, NoncanonHandling::Abort, 10)
        .unwrap();
    let from_term = expander
        .limited_args(&term_ty, &term, NoncanonHandling::Abort, 2)
        .unwrap();
    let stats = region.change();

    assert_eq!(stats.allocations, 0);
    assert_eq!(stats.reallocations, 0);

    assert_eq!(from_array.arity, 1_000_000);
    assert_eq!(from_array.functor.as_deref(), Some("<<array>>"));
    assert_eq!(from_array.args, ArgData::LimitExceeded);

    assert_eq!(from_term.arity, 3);
    assert_eq!(from_term.functor.as_deref(), Some("packed"));
    assert_eq!(from_term.args, ArgData::LimitExceeded);
}
