use pretty_assertions::assert_eq;

use super::*;

fn list_ctor() -> TypeCtorId {
    TypeCtorId::from_raw(TypeCtorId::BUILTIN_COUNT)
}

#[test]
fn equality_is_structural_with_pointer_fast_path() {
    let a = TypeInfo::array(TypeInfo::int());
    let b = TypeInfo::array(TypeInfo::int());
    assert_eq!(a, b);
    assert!(!TypeInfo::ptr_eq(&a, &b));

    let c = a.clone();
    assert!(TypeInfo::ptr_eq(&a, &c));
    assert_ne!(a, TypeInfo::array(TypeInfo::float()));
}

#[test]
fn tuple_arity_lives_on_the_instance() {
    let pair = TypeInfo::tuple(vec![TypeInfo::int(), TypeInfo::string()]);
    assert_eq!(pair.ctor(), TypeCtorId::TUPLE);
    assert_eq!(pair.arity(), 2);
    assert_eq!(TypeInfo::tuple(Vec::new()).arity(), 0);
}

#[test]
fn ground_templates_resolve_without_params() {
    let template = PseudoTypeInfo::app(list_ctor(), vec![PseudoTypeInfo::ground(TypeCtorId::INT)]);
    assert!(template.is_ground());

    let resolved = template.to_ground();
    assert_eq!(
        resolved,
        Some(TypeInfo::new(list_ctor(), vec![TypeInfo::int()]))
    );
    assert!(ArgType::from(template).is_ground());
}

#[test]
fn universal_params_are_substituted() {
    let template = PseudoTypeInfo::app(list_ctor(), vec![PseudoTypeInfo::param(1)]);
    let arg_type = ArgType::from(template.clone());
    assert_eq!(arg_type.template(), Some(&template));

    let params = [TypeInfo::int(), TypeInfo::string()];
    let resolved = arg_type.instantiate(&params).unwrap();
    assert_eq!(resolved, TypeInfo::new(list_ctor(), vec![TypeInfo::string()]));
}

#[test]
fn missing_param_is_reported() {
    let template = PseudoTypeInfo::param(3);
    let err = template.instantiate(&[TypeInfo::int()]).unwrap_err();
    assert_eq!(
        err,
        RttiError::MissingTypeParam {
            index: 3,
            available: 1
        }
    );
}

#[test]
fn existential_needs_a_witness_source() {
    let template = PseudoTypeInfo::app(TypeCtorId::ARRAY, vec![PseudoTypeInfo::exist(0)]);
    assert_eq!(
        template.instantiate(&[]),
        Err(RttiError::UnboundExistential { index: 0 })
    );

    let resolved = template
        .substitute(&mut |var| match var {
            TypeVar::Existential(0) => Ok::<_, ()>(TypeInfo::float()),
            _ => Err(()),
        })
        .unwrap();
    assert_eq!(resolved, TypeInfo::array(TypeInfo::float()));
}

#[test]
fn for_each_var_visits_nested_variables() {
    let template = PseudoTypeInfo::app(
        TypeCtorId::TUPLE,
        vec![
            PseudoTypeInfo::param(0),
            PseudoTypeInfo::app(TypeCtorId::ARRAY, vec![PseudoTypeInfo::exist(1)]),
        ],
    );
    let mut seen = Vec::new();
    template.for_each_var(&mut |var| seen.push(var));
    assert_eq!(seen, vec![TypeVar::Universal(0), TypeVar::Existential(1)]);
}
