// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adapted outputs created through the factory and chained in an arena.

use std::sync::Arc;

use approx::assert_relative_eq;
use tidelink_adaptors::{
    available_adapted_output_ids, create_adapted_output, create_linear_operation, Adaptation,
    Error, ExchangeArena, InputKey, OutputKey,
};
use tidelink_core::{
    line_string, ArgValue, Coordinate, CurvilinearGrid, Dimension, DimensionBase, Element,
    ElementSet, ElementType, Identity, PredefinedDimension, Quantity, RegularGrid, Time, TimeSet,
    Unit, ValueSet,
};

fn velocity() -> Quantity {
    let unit = Unit::new("m/s", Dimension::predefined(PredefinedDimension::LengthPerTime));
    Quantity::new("vd: m/s", unit)
}

/// A time independent output holding 1.0 on every element.
fn ones(arena: &mut ExchangeArena, set: ElementSet) -> OutputKey {
    let n = set.element_count();
    let key = arena.add_output(
        Identity::new("dummy"),
        velocity(),
        Arc::new(set),
        TimeSet::default(),
    );
    arena.set_values(key, ValueSet::single(vec![1.0; n])).unwrap();
    key
}

fn input_on(arena: &mut ExchangeArena, set: ElementSet) -> InputKey {
    arena.add_input(Identity::new("consumer"), velocity(), Arc::new(set), TimeSet::default())
}

fn curvilinear() -> ElementSet {
    let c = Coordinate::new;
    let nodes = vec![
        vec![c(0.0, 0.0), c(0.0, 5.0), c(0.0, 12.0), c(0.0, 15.0)],
        vec![c(5.0, 0.0), c(5.0, 5.0), c(5.0, 12.0), c(3.0, 17.0)],
        vec![c(10.0, 0.0), c(10.0, 7.0), c(10.0, 16.0), c(7.0, 20.0)],
    ];
    CurvilinearGrid::new(nodes, false)
        .unwrap()
        .to_element_set("grid")
        .unwrap()
}

fn points(xy: &[(f64, f64)]) -> ElementSet {
    let mut set = ElementSet::new("points", ElementType::Point);
    for (i, &p) in xy.iter().enumerate() {
        set.add_element(Element::from_xy(format!("p{}", i), &[p]));
    }
    set
}

fn first_row(arena: &ExchangeArena, key: OutputKey) -> Vec<f64> {
    arena.values(key).unwrap().element_values(0).unwrap().to_vec()
}

#[test]
fn area_operation_on_curvilinear_grid() {
    let mut arena = ExchangeArena::new();
    let source = ones(&mut arena, curvilinear());
    let op = create_adapted_output(&mut arena, "ElementOperation300", source, None).unwrap();
    assert!(matches!(arena.quantity(op), Err(Error::NotInitialised(_))));

    arena.initialize(op).unwrap();
    let quantity = arena.quantity(op).unwrap();
    assert_eq!(quantity.caption, "vd: m/s * area^1");
    assert_eq!(quantity.unit.caption, "m/s * m^2");
    assert_eq!(quantity.unit.dimension.power(DimensionBase::Length), 3.0);
    let areas = [25.0, 30.0, 35.0, 40.0, 17.0, 29.0];
    for (v, a) in first_row(&arena, op).iter().zip(areas) {
        assert_relative_eq!(*v, a, epsilon = 1e-12);
    }

    arena
        .arguments_mut(op)
        .unwrap()
        .set("AreaExponent", ArgValue::Double(-1.0))
        .unwrap();
    arena.initialize(op).unwrap();
    let quantity = arena.quantity(op).unwrap();
    assert_eq!(quantity.caption, "vd: m/s * area^-1");
    assert_eq!(quantity.unit.dimension.power(DimensionBase::Length), -1.0);
    for (v, a) in first_row(&arena, op).iter().zip(areas) {
        assert_relative_eq!(*v, 1.0 / a, epsilon = 1e-12);
    }

    arena
        .arguments_mut(op)
        .unwrap()
        .set("AreaExponent", ArgValue::Double(0.5))
        .unwrap();
    arena.initialize(op).unwrap();
    assert_eq!(arena.quantity(op).unwrap().caption, "vd: m/s * area^0.5");
    assert_eq!(
        arena.quantity(op).unwrap().unit.dimension.power(DimensionBase::Length),
        2.0
    );
    for (v, a) in first_row(&arena, op).iter().zip(areas) {
        assert_relative_eq!(*v, a.sqrt(), epsilon = 1e-12);
    }
}

#[test]
fn line_length_operation_on_line_string() {
    let coords = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(5.0, 0.0),
        Coordinate::new(8.0, 4.0),
        Coordinate::new(7.0, 5.0),
    ];
    let set = line_string("line", &coords, false, false).unwrap();
    let mut arena = ExchangeArena::new();
    let source = ones(&mut arena, set);
    let op = create_adapted_output(&mut arena, "elementoperation200", source, None).unwrap();
    arena.initialize(op).unwrap();

    let quantity = arena.quantity(op).unwrap();
    assert_eq!(quantity.caption, "vd: m/s * length^1");
    assert_eq!(quantity.unit.caption, "m/s * m^1");
    assert_eq!(quantity.unit.dimension.power(DimensionBase::Length), 2.0);
    let lengths = [5.0, 5.0, 2f64.sqrt()];
    for (v, l) in first_row(&arena, op).iter().zip(lengths) {
        assert_relative_eq!(*v, l, epsilon = 1e-12);
    }

    arena
        .arguments_mut(op)
        .unwrap()
        .set("LineLengthExponent", ArgValue::Double(-1.0))
        .unwrap();
    arena.initialize(op).unwrap();
    let quantity = arena.quantity(op).unwrap();
    assert_eq!(quantity.caption, "vd: m/s * length^-1");
    assert_eq!(quantity.unit.dimension.power(DimensionBase::Length), 0.0);
    for (v, l) in first_row(&arena, op).iter().zip(lengths) {
        assert_relative_eq!(*v, 1.0 / l, epsilon = 1e-12);
    }
}

#[test]
fn factory_lists_operations_then_mappings() {
    let mut arena = ExchangeArena::new();
    let cells = RegularGrid::new(0.0, 0.0, 10.0, 10.0, 2, 1)
        .to_element_set("cells")
        .unwrap();
    let source = ones(&mut arena, cells);
    let to_points = input_on(&mut arena, points(&[(5.0, 5.0)]));
    let lines = line_string(
        "lines",
        &[Coordinate::new(0.0, 5.0), Coordinate::new(20.0, 5.0)],
        false,
        false,
    )
    .unwrap();
    let to_lines = input_on(&mut arena, lines);

    let ids = |arena: &ExchangeArena, target| {
        available_adapted_output_ids(arena, source, target)
            .unwrap()
            .iter()
            .map(|m| m.id())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&arena, Some(to_points)), ["ElementOperation300", "ElementMapper600"]);
    assert_eq!(
        ids(&arena, Some(to_lines)),
        ["ElementOperation300", "ElementMapper700", "ElementMapper701"]
    );
    assert_eq!(ids(&arena, None), ["ElementOperation300"]);
}

#[test]
fn factory_errors() {
    let mut arena = ExchangeArena::new();
    let source = ones(&mut arena, points(&[(0.0, 0.0), (1.0, 0.0)]));
    let target = input_on(&mut arena, points(&[(0.5, 0.0)]));

    let err =
        create_adapted_output(&mut arena, "ElementMapper999", source, Some(target)).unwrap_err();
    assert!(matches!(err, Error::UnknownAdaptedOutput(id) if id == "ElementMapper999"));
    assert!(err_message_contains(
        create_adapted_output(&mut arena, "Nope", source, None),
        "Adapted output id could not be found"
    ));

    let err = create_adapted_output(&mut arena, "ElementMapper100", source, None).unwrap_err();
    assert!(matches!(err, Error::TargetRequired(_)));

    let err = create_adapted_output(&mut arena, "ElementOperation300", source, None).unwrap_err();
    assert!(matches!(err, Error::InvalidAdaptee(_)));

    let err =
        create_adapted_output(&mut arena, "ElementMapper600", source, Some(target)).unwrap_err();
    assert!(matches!(
        err,
        Error::Mapping(tidelink_mapping::Error::MethodShapeMismatch { .. })
    ));

    // Nothing was registered by the failed attempts
    assert!(arena.adapted_outputs(source).unwrap().is_empty());
}

fn err_message_contains(result: tidelink_adaptors::Result<OutputKey>, text: &str) -> bool {
    matches!(result, Err(e) if e.to_string().contains(text))
}

/// Two 10x10 cells holding 2.0 and 4.0, read at three points.
fn mapped_chain(arena: &mut ExchangeArena) -> (OutputKey, OutputKey, InputKey) {
    let cells = RegularGrid::new(0.0, 0.0, 10.0, 10.0, 2, 1)
        .to_element_set("cells")
        .unwrap();
    let times = TimeSet::new(vec![Time::stamp(0.0), Time::stamp(1.0)]);
    let source = arena.add_output(Identity::new("depth"), velocity(), Arc::new(cells), times);
    arena
        .set_values(
            source,
            ValueSet::from_rows(vec![vec![2.0, 4.0], vec![10.0, 20.0]]).unwrap(),
        )
        .unwrap();
    let consumer = input_on(arena, points(&[(5.0, 5.0), (15.0, 5.0), (10.0, 5.0)]));
    let mapper = create_adapted_output(arena, "ElementMapper600", source, Some(consumer)).unwrap();
    (source, mapper, consumer)
}

#[test]
fn mapper_output_maps_onto_target() {
    let mut arena = ExchangeArena::new();
    let (source, mapper, consumer) = mapped_chain(&mut arena);

    assert_eq!(arena.output(mapper).unwrap().identity.id, "depth->ElementMapper600");
    assert_eq!(arena.adapted_outputs(source).unwrap(), [mapper]);
    assert_eq!(arena.adaptee(mapper).unwrap(), Some(source));
    assert_eq!(arena.element_set(mapper).unwrap().element_count(), 3);
    assert_eq!(arena.quantity(mapper).unwrap(), velocity());
    assert_eq!(arena.time_set(mapper).unwrap().len(), 2);
    assert!(matches!(arena.adaptation(mapper).unwrap(), Some(Adaptation::ElementMapper(_))));

    let all = arena.values(mapper).unwrap();
    assert_eq!(all.into_rows(), vec![vec![2.0, 4.0, 3.0], vec![10.0, 20.0, 15.0]]);

    arena.input_mut(consumer).unwrap().time_set = TimeSet::new(vec![Time::stamp(1.0)]);
    let at_one = arena.get_values(mapper, consumer).unwrap();
    assert_eq!(at_one.into_rows(), vec![vec![10.0, 20.0, 15.0]]);

    let mut sum = ValueSet::single(vec![1.0; 3]);
    arena.get_values_into(mapper, consumer, &mut sum).unwrap();
    arena.get_values_into(mapper, consumer, &mut sum).unwrap();
    assert_eq!(sum.into_rows(), vec![vec![21.0, 41.0, 31.0]]);
}

#[test]
fn mapper_picks_up_replaced_element_set_on_initialize() {
    let mut arena = ExchangeArena::new();
    let (source, mapper, _) = mapped_chain(&mut arena);

    // Three cells shifted half a cell to the right
    let shifted = RegularGrid::new(5.0, 0.0, 10.0, 10.0, 3, 1)
        .to_element_set("cells")
        .unwrap();
    arena.set_element_set(source, Arc::new(shifted)).unwrap();
    assert_eq!(arena.values(source).unwrap().into_rows(), vec![vec![0.0; 3]; 2]);
    arena
        .set_values(
            source,
            ValueSet::from_rows(vec![vec![6.0, 8.0, 9.0], vec![1.0, 3.0, 5.0]]).unwrap(),
        )
        .unwrap();

    // The matrix still expects two source cells
    let stale = arena.values(mapper).unwrap_err();
    assert!(matches!(
        stale,
        Error::Mapping(tidelink_mapping::Error::DimensionMismatch { expected: 2, found: 3 })
    ));

    arena.initialize(mapper).unwrap();
    let adaptation = arena.adaptation(mapper).unwrap();
    let Some(Adaptation::ElementMapper(m)) = adaptation else {
        panic!("expected a mapper, got {:?}", adaptation);
    };
    assert_eq!(m.mapper().column_count(), 3);
    assert_eq!(
        arena.values(mapper).unwrap().into_rows(),
        vec![vec![6.0, 7.0, 6.0], vec![1.0, 2.0, 1.0]]
    );

    let err = arena.set_element_set(mapper, Arc::new(points(&[(0.0, 0.0)]))).unwrap_err();
    assert!(matches!(err, Error::DerivedValues(_)));
}

#[test]
fn linear_operation_chained_on_mapper() {
    let mut arena = ExchangeArena::new();
    let (source, mapper, consumer) = mapped_chain(&mut arena);
    let linear = create_linear_operation(&mut arena, mapper).unwrap();

    let data = arena.output(linear).unwrap();
    assert_eq!(data.identity.id, "depth->ElementMapper600 => LinearOperation");
    assert_eq!(data.identity.caption, "depth->ElementMapper600 => y = A*x + B");
    assert_eq!(
        data.identity.description,
        "Performs a linear operation on the form: y = Ax + B"
    );
    assert_eq!(
        data.arguments.get("A").unwrap().description,
        "A in y = A*x + B"
    );

    // Identity until initialised with new arguments
    assert_eq!(first_row(&arena, linear), [2.0, 4.0, 3.0]);

    let args = arena.arguments_mut(linear).unwrap();
    args.set("A", ArgValue::Double(2.0)).unwrap();
    args.set("B", ArgValue::Double(1.0)).unwrap();
    arena.initialize(linear).unwrap();
    assert_eq!(first_row(&arena, linear), [5.0, 9.0, 7.0]);
    assert_eq!(arena.element_set(linear).unwrap().element_count(), 3);

    let mut out = ValueSet::zeros(2, 3);
    arena.get_values_into(linear, consumer, &mut out).unwrap();
    assert_eq!(out.into_rows(), vec![vec![5.0, 9.0, 7.0], vec![21.0, 41.0, 31.0]]);

    let mut wrong = ValueSet::zeros(2, 2);
    let err = arena.get_values_into(linear, consumer, &mut wrong).unwrap_err();
    assert!(matches!(err, Error::ValueShape { .. }));

    arena.connect(linear, consumer).unwrap();
    assert_eq!(arena.refresh(source).unwrap(), 2);
    assert_eq!(arena.refresh(mapper).unwrap(), 1);
    assert_eq!(arena.refresh(linear).unwrap(), 0);

    let err = arena.set_values(linear, ValueSet::single(vec![0.0; 3])).unwrap_err();
    assert!(matches!(err, Error::DerivedValues(_)));
}
