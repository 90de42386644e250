use pretty_assertions::assert_eq;
use tern_heap::Heap;
use tern_rtti::word::{char_to_word, float_to_word, int_to_word, mkword, HEAP_BASE};
use tern_rtti::{
    ClosureLayout, DuFunctorDesc, DuLayout, ExistInfo, ExistLocn, ProcId, PseudoTypeInfo,
    TypeTableBuilder,
};

use super::*;
use crate::result::ArgData;

use crate::config::NoncanonHandling::{Abort, Allow, Cc};

struct Fixture {
    table: TypeTable,
    color: TypeCtorId,
    pair: TypeCtorId,
    list: TypeCtorId,
    set: TypeCtorId,
    wrapper: TypeCtorId,
    money: TypeCtorId,
    maybe: TypeCtorId,
    var_term: TypeCtorId,
    sentinel: Word,
    add: ClosureLayoutId,
}

fn int() -> PseudoTypeInfo {
    PseudoTypeInfo::ground(TypeCtorId::INT)
}

fn fixture() -> Fixture {
    let mut b = TypeTableBuilder::new();

    let color = b.declare("paint", "color", 0).unwrap();
    b.define_enum(color, ["Red", "Blue"], false).unwrap();

    let pair = b.declare("geom", "pair", 0).unwrap();
    b.define_du(
        pair,
        vec![DuFunctorDesc::untagged("Pair", 0)
            .with_named_arg("x", int())
            .with_named_arg("y", int())],
        false,
    )
    .unwrap();

    let list = b.declare("list", "list", 1).unwrap();
    b.define_du(
        list,
        vec![
            DuFunctorDesc::local("[]", 0, 0),
            DuFunctorDesc::untagged("[|]", 1)
                .with_arg(PseudoTypeInfo::param(0))
                .with_arg(PseudoTypeInfo::app(list, vec![PseudoTypeInfo::param(0)])),
        ],
        false,
    )
    .unwrap();

    let set = b.declare("sets", "set", 0).unwrap();
    b.define_du(
        set,
        vec![DuFunctorDesc::untagged("set", 0)
            .with_arg(PseudoTypeInfo::app(TypeCtorId::ARRAY, vec![int()]))],
        true,
    )
    .unwrap();

    let wrapper = b.declare("wrap", "wrapper", 1).unwrap();
    b.define_notag(wrapper, "wrap", Some("inner"), PseudoTypeInfo::param(0), false)
        .unwrap();

    let money = b.declare("bank", "money", 0).unwrap();
    b.define_equiv(money, int()).unwrap();

    let sentinel = b.symbolic_address().unwrap();
    let maybe = b.declare("ptr", "maybe", 0).unwrap();
    b.define_reserved_addr(
        maybe,
        &["null"],
        vec![(sentinel, "nothing".to_string())],
        vec![DuFunctorDesc::untagged("just", 0).with_arg(int())],
        false,
    )
    .unwrap();

    let var_term = b.declare("solver", "var_term", 0).unwrap();
    let layout = DuLayout::new(vec![DuFunctorDesc::untagged("f", 0).with_arg(int())], 0)
        .unwrap()
        .with_variable_ptag(7)
        .unwrap();
    b.define_du_layout(var_term, layout, false).unwrap();

    let add = b.add_closure_layout(
        ClosureLayout::new(ProcId::User {
            module: "math".into(),
            name: "add".into(),
            arity: 3,
            mode: 0,
        })
        .with_arg_types(vec![int()]),
    );

    Fixture {
        table: b.finish(),
        color,
        pair,
        list,
        set,
        wrapper,
        money,
        maybe,
        var_term,
        sentinel,
        add,
    }
}

fn functor_of<'t>(table: &'t TypeTable, ctor: TypeCtorId, name: &str) -> &'t DuFunctorDesc {
    let desc = table.get(ctor).unwrap();
    let layout = match desc.reserved_addr_layout() {
        Some(reserved) => reserved.other(),
        None => desc.du_layout().unwrap(),
    };
    layout.functor_named(name).unwrap()
}

// ── Enums and discriminated unions ──────────────────────────────────

#[test]
fn enum_value_names_its_constant() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(fx.color);

    let (name, arity) = ex.functor(&ty, &1, Abort).unwrap();
    assert_eq!(name, "Blue");
    assert_eq!(arity, 0);
    assert_eq!(ex.args(&ty, &0, Abort).unwrap().args, ArgData::None);
}

#[test]
fn enum_value_out_of_range_is_a_fault() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(fx.color);

    let err = ex.functor(&ty, &7, Abort).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(
        err,
        ExpandError::Fault(Fault::EnumOutOfRange {
            type_name: "paint.color/0".to_string(),
            word: 7,
        })
    );
}

#[test]
fn chosen_argument_by_index_and_name() {
    let fx = fixture();
    let mut heap = Heap::new();
    let pair = functor_of(&fx.table, fx.pair, "Pair");
    let value = heap.construct(pair, &[], &[3, 4]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(fx.pair);

    let by_index = ex.arg(&ty, &value, Abort, 1).unwrap();
    assert_eq!(by_index.functor, None);
    assert_eq!(by_index.arity, 2);
    let chosen = by_index.args.chosen().unwrap();
    assert_eq!(*chosen.value, 4);
    assert_eq!(chosen.type_info, TypeInfo::int());

    let by_name = ex.named_arg(&ty, &value, Abort, "x").unwrap();
    assert_eq!(*by_name.args.chosen().unwrap().value, 3);

    let missing = ex.named_arg(&ty, &value, Abort, "z").unwrap();
    assert_eq!(missing.args, ArgData::ChosenNotFound);
    assert_eq!(ex.arg(&ty, &value, Abort, 2).unwrap().args, ArgData::ChosenNotFound);
}

#[test]
fn polymorphic_alternative_instantiates_its_argument_types() {
    let fx = fixture();
    let mut heap = Heap::new();
    let s = heap.alloc_string("a");
    let nil = heap.construct(functor_of(&fx.table, fx.list, "[]"), &[], &[]);
    let cons = heap.construct(functor_of(&fx.table, fx.list, "[|]"), &[], &[s, nil]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::new(fx.list, vec![TypeInfo::string()]);

    let expansion = ex.args(&ty, &cons, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("[|]"));
    assert_eq!(expansion.arity, 2);
    let all = expansion.args.all().unwrap();
    assert_eq!(all.values(), &[s, nil]);
    assert_eq!(all.types(), &[TypeInfo::string(), ty.clone()]);

    let (name, arity) = ex.functor(&ty, &nil, Abort).unwrap();
    assert_eq!((&*name, arity), ("[]", 0));
}

#[test]
fn unused_primary_tag_is_a_fault() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::new(fx.list, vec![TypeInfo::int()]);
    let value = mkword(5, HEAP_BASE as Word);

    assert_eq!(
        ex.functor(&ty, &value, Abort).unwrap_err(),
        ExpandError::Fault(Fault::InvalidPtag {
            type_name: "list.list/1".to_string(),
            ptag: 5,
        })
    );
}

#[test]
fn reserved_addresses_are_checked_before_tags() {
    let fx = fixture();
    let mut heap = Heap::new();
    let just = heap.construct(functor_of(&fx.table, fx.maybe, "just"), &[], &[9]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(fx.maybe);

    assert_eq!(ex.functor(&ty, &0, Abort).unwrap().0, "null");
    assert_eq!(ex.functor(&ty, &fx.sentinel, Abort).unwrap().0, "nothing");
    let expansion = ex.args(&ty, &just, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("just"));
    assert_eq!(expansion.args.all().unwrap().values(), &[9]);
}

#[test]
fn unbound_variables_only_surface_under_committed_choice() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(fx.var_term);
    let value = mkword(7, 0);

    assert_eq!(ex.functor(&ty, &value, Cc).unwrap().0, "<<variable>>");
    assert_eq!(
        ex.functor(&ty, &value, Abort).unwrap_err(),
        ExpandError::Fault(Fault::UnboundVariable {
            type_name: "solver.var_term/0".to_string(),
        })
    );
}

// ── Secondary tags ──────────────────────────────────────────────────

/// `shape`: two local constants on primary tag 0, three remote alternatives
/// on primary tag 1. `labelled` carries a witness for its argument's type.
fn shape_table() -> (TypeTable, TypeCtorId) {
    let mut b = TypeTableBuilder::new();
    let shape = b.declare("geom", "shape", 0).unwrap();
    b.define_du(
        shape,
        vec![
            DuFunctorDesc::local("origin", 0, 0),
            DuFunctorDesc::local("infinity", 0, 1),
            DuFunctorDesc::remote("circle", 1, 0).with_named_arg("radius", int()),
            DuFunctorDesc::remote("rect", 1, 1)
                .with_named_arg("w", int())
                .with_named_arg("h", int()),
            DuFunctorDesc::remote("labelled", 1, 2)
                .with_exist_info(ExistInfo::new(vec![ExistLocn::Plain { slot: 0 }], 0))
                .with_named_arg("label", PseudoTypeInfo::exist(0)),
        ],
        false,
    )
    .unwrap();
    (b.finish(), shape)
}

#[test]
fn local_constants_are_leaves() {
    let (table, shape) = shape_table();
    let mut heap = Heap::new();
    let infinity = heap.construct(functor_of(&table, shape, "infinity"), &[], &[]);
    let ex = Expander::new(&table, &heap);
    let ty = TypeInfo::ground(shape);

    let expansion = ex.args(&ty, &infinity, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("infinity"));
    assert_eq!(expansion.arity, 0);
    assert_eq!(expansion.args, ArgData::None);
    assert_eq!(ex.arg(&ty, &infinity, Abort, 0).unwrap().args, ArgData::ChosenNotFound);
    assert_eq!(
        ex.named_arg(&ty, &infinity, Abort, "w").unwrap().args,
        ArgData::ChosenNotFound
    );
}

#[test]
fn local_and_reserved_constants_have_the_same_shape() {
    let fx = fixture();
    let (table, shape) = shape_table();
    let mut heap = Heap::new();
    let origin = heap.construct(functor_of(&table, shape, "origin"), &[], &[]);
    let null = 0;
    let maybe_ty = TypeInfo::ground(fx.maybe);
    let shape_ty = TypeInfo::ground(shape);

    let reserved = Expander::new(&fx.table, &heap).args(&maybe_ty, &null, Abort).unwrap();
    let local = Expander::new(&table, &heap).args(&shape_ty, &origin, Abort).unwrap();
    assert_eq!(reserved.arity, local.arity);
    assert_eq!(reserved.args, local.args);
}

#[test]
fn remote_arguments_follow_the_secondary_tag() {
    let (table, shape) = shape_table();
    let mut heap = Heap::new();
    let circle = heap.construct(functor_of(&table, shape, "circle"), &[], &[3]);
    let rect = heap.construct(functor_of(&table, shape, "rect"), &[], &[7, 9]);
    let ex = Expander::new(&table, &heap);
    let ty = TypeInfo::ground(shape);

    let expansion = ex.args(&ty, &rect, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("rect"));
    assert_eq!(expansion.arity, 2);
    let all = expansion.args.all().unwrap();
    assert_eq!(all.num_extra(), 0);
    assert_eq!(all.words(), &[7, 9]);
    assert_eq!(all.types(), &[TypeInfo::int(), TypeInfo::int()]);

    let (name, arity) = ex.functor(&ty, &circle, Abort).unwrap();
    assert_eq!((&*name, arity), ("circle", 1));
}

#[test]
fn remote_arguments_can_be_chosen() {
    let (table, shape) = shape_table();
    let mut heap = Heap::new();
    let rect = heap.construct(functor_of(&table, shape, "rect"), &[], &[7, 9]);
    let ex = Expander::new(&table, &heap);
    let ty = TypeInfo::ground(shape);

    let by_index = ex.arg(&ty, &rect, Abort, 1).unwrap();
    assert_eq!(by_index.functor, None);
    assert_eq!(by_index.arity, 2);
    let chosen = by_index.args.chosen().unwrap();
    assert_eq!((*chosen.value, &chosen.type_info), (9, &TypeInfo::int()));

    let by_name = ex.named_arg(&ty, &rect, Abort, "w").unwrap();
    assert_eq!(*by_name.args.chosen().unwrap().value, 7);
    assert_eq!(
        ex.named_arg(&ty, &rect, Abort, "radius").unwrap().args,
        ArgData::ChosenNotFound
    );
    assert_eq!(ex.arg(&ty, &rect, Abort, 2).unwrap().args, ArgData::ChosenNotFound);
}

#[test]
fn remote_witnesses_sit_between_the_tag_and_the_arguments() {
    let (table, shape) = shape_table();
    let mut heap = Heap::new();
    let float_word = heap.alloc_type_info(&table, &TypeInfo::float()).unwrap();
    let label = float_to_word(2.5);
    let labelled = heap.construct(functor_of(&table, shape, "labelled"), &[float_word], &[label]);
    let ex = Expander::new(&table, &heap);
    let ty = TypeInfo::ground(shape);

    let expansion = ex.args(&ty, &labelled, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("labelled"));
    assert_eq!(expansion.arity, 1);
    let all = expansion.args.all().unwrap();
    assert_eq!(all.witnesses(), &[float_word]);
    assert_eq!(all.values(), &[label]);
    assert_eq!(all.types(), &[TypeInfo::float()]);

    let chosen = ex.named_arg(&ty, &labelled, Abort, "label").unwrap();
    let chosen = chosen.args.chosen().unwrap();
    assert_eq!((*chosen.value, &chosen.type_info), (label, &TypeInfo::float()));
}

// ── Noncanonical handling ───────────────────────────────────────────

#[test]
fn user_equality_follows_the_policy() {
    let fx = fixture();
    let mut heap = Heap::new();
    let elems = heap.alloc_array(&[1, 2]);
    let value = heap.construct(functor_of(&fx.table, fx.set, "set"), &[], &[elems]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(fx.set);

    let err = ex.args(&ty, &value, Abort).unwrap_err();
    assert!(!err.is_fatal());
    assert_eq!(
        err,
        ExpandError::Noncanonical {
            type_name: "sets.set/0".to_string(),
        }
    );

    let allowed = ex.args(&ty, &value, Allow).unwrap();
    assert_eq!(allowed.functor.as_deref(), Some("<<sets.set/0>>"));
    assert_eq!(allowed.arity, 0);
    assert_eq!(allowed.args, ArgData::None);

    let exposed = ex.args(&ty, &value, Cc).unwrap();
    assert_eq!(exposed.functor.as_deref(), Some("set"));
    assert_eq!(
        exposed.args.all().unwrap().types(),
        &[TypeInfo::array(TypeInfo::int())]
    );
}

#[test]
fn metadata_values_are_refused_under_abort() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);

    for ctor in [
        TypeCtorId::TYPE_CTOR_INFO,
        TypeCtorId::TYPECLASS_INFO,
        TypeCtorId::BASE_TYPECLASS_INFO,
        TypeCtorId::C_POINTER,
    ] {
        let ty = TypeInfo::ground(ctor);
        let err = ex.functor(&ty, &0, Abort).unwrap_err();
        assert!(matches!(err, ExpandError::Noncanonical { .. }), "{ctor:?}");
    }

    let ty = TypeInfo::ground(TypeCtorId::TYPECLASS_INFO);
    assert_eq!(ex.functor(&ty, &0, Allow).unwrap().0, "<<typeclassinfo>>");
    let ty = TypeInfo::ground(TypeCtorId::C_POINTER);
    assert_eq!(ex.functor(&ty, &0, Cc).unwrap().0, "<<c_pointer>>");
}

#[test]
fn registers_are_never_refused() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(TypeCtorId::HP);
    assert_eq!(ex.functor(&ty, &0, Abort).unwrap().0, "<<hp>>");
}

// ── Aliases ─────────────────────────────────────────────────────────

#[test]
fn notag_wrapper_has_one_named_argument() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::new(fx.wrapper, vec![TypeInfo::float()]);
    let value = float_to_word(2.5);

    let expansion = ex.args(&ty, &value, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("wrap"));
    assert_eq!(expansion.arity, 1);
    assert_eq!(expansion.args.all().unwrap().types(), &[TypeInfo::float()]);

    let inner = ex.named_arg(&ty, &value, Abort, "inner").unwrap();
    let chosen = inner.args.chosen().unwrap();
    assert_eq!(*chosen.value, value);
    assert_eq!(chosen.type_info, TypeInfo::float());
}

#[test]
fn equivalences_and_univ_are_transparent() {
    let fx = fixture();
    let mut heap = Heap::new();
    let boxed = heap
        .alloc_univ(&fx.table, &TypeInfo::ground(fx.color), 0)
        .unwrap();
    let ex = Expander::new(&fx.table, &heap);

    let money = TypeInfo::ground(fx.money);
    assert_eq!(ex.functor(&money, &int_to_word(42), Abort).unwrap().0, "42");

    let univ = TypeInfo::univ();
    assert_eq!(ex.functor(&univ, &boxed, Abort).unwrap().0, "Red");
}

#[test]
fn alias_depth_is_bounded() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::with_config(&fx.table, &heap, ExpandConfig::with_max_alias_depth(0));
    let ty = TypeInfo::ground(fx.money);

    assert_eq!(
        ex.functor(&ty, &1, Abort).unwrap_err(),
        ExpandError::Fault(Fault::AliasDepthExceeded { depth: 1 })
    );
}

// ── Builtin structures ──────────────────────────────────────────────

#[test]
fn tuple_types_are_borrowed_from_the_descriptor() {
    let fx = fixture();
    let mut heap = Heap::new();
    let s = heap.alloc_string("b");
    let value = heap.alloc_tuple(&[int_to_word(1), s]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::tuple(vec![TypeInfo::int(), TypeInfo::string()]);

    let expansion = ex.args(&ty, &value, Abort).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("{}"));
    assert_eq!(expansion.arity, 2);
    let all = expansion.args.all().unwrap();
    assert!(!all.is_owned());
    assert_eq!(all.types(), ty.args());
}

#[test]
fn array_cap_is_reported_without_arguments() {
    let fx = fixture();
    let mut heap = Heap::new();
    let value = heap.alloc_array(&[1, 2, 3]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::array(TypeInfo::int());

    let limited = ex.limited_args(&ty, &value, Abort, 2).unwrap();
    assert_eq!(limited.functor.as_deref(), Some("<<array>>"));
    assert_eq!(limited.arity, 3);
    assert_eq!(limited.args, ArgData::LimitExceeded);

    let full = ex.limited_args(&ty, &value, Abort, 3).unwrap();
    assert_eq!(full.args.all().unwrap().values(), &[1, 2, 3]);
}

#[test]
fn primitives_render_their_value() {
    let fx = fixture();
    let mut heap = Heap::new();
    let s = heap.alloc_string("hi");
    let ex = Expander::new(&fx.table, &heap);

    let int_ty = TypeInfo::int();
    assert_eq!(ex.functor(&int_ty, &int_to_word(-7), Abort).unwrap().0, "-7");
    let char_ty = TypeInfo::char();
    assert_eq!(ex.functor(&char_ty, &char_to_word('x'), Abort).unwrap().0, "'x'");
    let string_ty = TypeInfo::string();
    assert_eq!(ex.functor(&string_ty, &s, Abort).unwrap().0, "\"hi\"");
    let float_ty = TypeInfo::float();
    let word = float_to_word(1.5);
    let (name, arity) = ex.functor(&float_ty, &word, Abort).unwrap();
    assert_eq!(name, "1.50000000000000");
    assert_eq!(arity, 0);
}

#[test]
fn invalid_character_is_a_fault() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::char();
    assert_eq!(
        ex.functor(&ty, &0xD800, Abort).unwrap_err(),
        ExpandError::Fault(Fault::InvalidChar { word: 0xD800 })
    );
}

#[test]
fn primitive_leaves_have_no_chosen_argument() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::int();
    let expansion = ex.arg(&ty, &5, Abort, 0).unwrap();
    assert_eq!(expansion.arity, 0);
    assert_eq!(expansion.args, ArgData::ChosenNotFound);
}

// ── Closures ────────────────────────────────────────────────────────

#[test]
fn closures_follow_policy_and_config() {
    let fx = fixture();
    let mut heap = Heap::new();
    let value = heap.alloc_closure(fx.add, &[int_to_word(5)]);
    let ty = TypeInfo::func(vec![TypeInfo::int(), TypeInfo::int()]);

    let ex = Expander::new(&fx.table, &heap);
    assert_eq!(
        ex.functor(&ty, &value, Abort).unwrap_err(),
        ExpandError::Noncanonical {
            type_name: "builtin.func/0".to_string(),
        }
    );
    assert_eq!(ex.functor(&ty, &value, Allow).unwrap(), ("<<function>>".into(), 0));

    let exposed = ex.args(&ty, &value, Cc).unwrap();
    assert_eq!(exposed.functor.as_deref(), Some("add"));
    assert_eq!(exposed.arity, 1);
    assert_eq!(exposed.args.all().unwrap().types(), &[TypeInfo::int()]);

    let canonical = Expander::with_config(&fx.table, &heap, ExpandConfig::with_canonicalize_closures(true));
    assert_eq!(canonical.functor(&ty, &value, Cc).unwrap(), ("<<function>>".into(), 0));
    assert_eq!(canonical.functor(&ty, &value, Abort).unwrap(), ("<<function>>".into(), 0));

    let pred = TypeInfo::pred(vec![TypeInfo::int()]);
    assert_eq!(ex.functor(&pred, &value, Allow).unwrap().0, "<<predicate>>");
}

#[test]
fn closure_with_wrong_hidden_count_is_a_fault() {
    let fx = fixture();
    let mut heap = Heap::new();
    let value = heap.alloc_closure(fx.add, &[1, 2]);
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::func(vec![TypeInfo::int()]);

    assert_eq!(
        ex.functor(&ty, &value, Cc).unwrap_err(),
        ExpandError::Fault(Fault::ClosureMismatch {
            captured: 2,
            described: 1,
        })
    );
}

// ── Type metadata as values ─────────────────────────────────────────

#[test]
fn type_descriptor_values_expose_their_arguments() {
    let fx = fixture();
    let mut heap = Heap::new();
    let described = TypeInfo::array(TypeInfo::string());
    let value = heap.alloc_type_info(&fx.table, &described).unwrap();
    let string_word = heap.alloc_type_info(&fx.table, &TypeInfo::string()).unwrap();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(TypeCtorId::TYPE_INFO);

    assert!(matches!(
        ex.functor(&ty, &value, Abort).unwrap_err(),
        ExpandError::Noncanonical { .. }
    ));

    let expansion = ex.args(&ty, &value, Cc).unwrap();
    assert_eq!(expansion.functor.as_deref(), Some("array"));
    assert_eq!(expansion.arity, 1);
    let all = expansion.args.all().unwrap();
    assert_eq!(all.values(), &[string_word]);
    assert_eq!(all.types(), &[ty.clone()]);
}

#[test]
fn allow_collapses_equivalences_in_type_descriptor_values() {
    let fx = fixture();
    let mut heap = Heap::new();
    let value = heap
        .alloc_type_info(&fx.table, &TypeInfo::ground(fx.money))
        .unwrap();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::ground(TypeCtorId::TYPE_DESC);

    assert_eq!(ex.functor(&ty, &value, Cc).unwrap().0, "money");
    assert_eq!(ex.functor(&ty, &value, Allow).unwrap().0, "int");
}

#[test]
fn type_ctor_values_render_their_name() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);

    let info = TypeInfo::ground(TypeCtorId::TYPE_CTOR_INFO);
    let color = fx.color.to_word();
    assert_eq!(ex.functor(&info, &color, Cc).unwrap(), ("paint.color/0".into(), 0));

    let desc = TypeInfo::ground(TypeCtorId::TYPE_CTOR_DESC);
    let fixed = TypeCtorDescWord::Fixed(fx.color).encode();
    assert_eq!(ex.functor(&desc, &fixed, Allow).unwrap().0, "paint.color/0");
    let tuple = TypeCtorDescWord::VariableArity {
        ctor: TypeCtorId::TUPLE,
        arity: 3,
    }
    .encode();
    assert_eq!(ex.functor(&desc, &tuple, Allow).unwrap().0, "{}");
}

// ── Faults ──────────────────────────────────────────────────────────

#[test]
fn void_and_unknown_types_are_fatal() {
    let mut b = TypeTableBuilder::new();
    let undefined = b.declare("lost", "thing", 0).unwrap();
    let table = b.finish();
    let heap = Heap::new();
    let ex = Expander::new(&table, &heap);

    let void = TypeInfo::ground(TypeCtorId::VOID);
    assert_eq!(
        ex.functor(&void, &0, Cc).unwrap_err(),
        ExpandError::Fault(Fault::VoidValue {
            type_name: "builtin.void/0".to_string(),
        })
    );

    for ctor in [undefined, TypeCtorId::from_raw(999)] {
        let ty = TypeInfo::ground(ctor);
        let err = ex.functor(&ty, &0, Cc).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, ExpandError::Fault(Fault::UnknownRep { .. })));
    }
}

#[test]
fn dangling_string_is_a_fault() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);
    let ty = TypeInfo::string();
    assert_eq!(
        ex.functor(&ty, &3, Abort).unwrap_err(),
        ExpandError::Fault(Fault::DanglingWord { word: 3 })
    );
}

// ── Call lifetimes ──────────────────────────────────────────────────

#[test]
fn descriptors_and_words_may_outlive_only_their_call() {
    let fx = fixture();
    let heap = Heap::new();
    let ex = Expander::new(&fx.table, &heap);

    let blue = {
        let ty = TypeInfo::ground(fx.color);
        let word = 1;
        let (name, _) = ex.functor(&ty, &word, Abort).unwrap();
        name.into_owned()
    };
    let rendered = {
        let ty = TypeInfo::float();
        let word = float_to_word(0.5);
        let (name, _) = ex.functor(&ty, &word, Abort).unwrap();
        name.into_owned()
    };

    let ty = TypeInfo::ground(fx.color);
    assert_eq!(ex.functor(&ty, &0, Abort).unwrap().0, "Red");
    assert_eq!(blue, "Blue");
    assert_eq!(rendered, "0.500000000000000");
}
