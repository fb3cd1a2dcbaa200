//! Vehicle domain: classifier hierarchy, conformance and cascading deletion.

use forma_tests::prelude::*;

fn vehicle_hierarchy(model: &mut Model) -> (ClassifierId, Vec<ClassifierId>) {
    let mc = model.create_metaclass("DomainClass");
    let vehicle = model.create_class(mc, "Vehicle").unwrap();
    let land = model.create_class(mc, "LandVehicle").unwrap();
    let water = model.create_class(mc, "WaterVehicle").unwrap();
    let car = model.create_class(mc, "Car").unwrap();
    let amphibian = model.create_class(mc, "Amphibian").unwrap();

    model.set_superclasses(land, vec![vehicle]).unwrap();
    model.set_superclasses(water, vec![vehicle]).unwrap();
    model.set_superclasses(car, vec![land]).unwrap();
    model
        .set_superclasses(amphibian, vec![land, water])
        .unwrap();
    (mc, vec![vehicle, land, water, car, amphibian])
}

mod conformance {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conformance_is_reflexive_and_upward_only() {
        let mut model = Model::new();
        let (_, classes) = vehicle_hierarchy(&mut model);
        let [vehicle, land, _, car, _] = classes[..] else {
            unreachable!()
        };

        for &clf in &classes {
            assert!(model.conforms_to_type(clf, clf).unwrap());
        }
        assert!(model.conforms_to_type(car, land).unwrap());
        assert!(model.conforms_to_type(car, vehicle).unwrap());
        assert!(!model.conforms_to_type(land, car).unwrap());
        assert!(!model.conforms_to_type(vehicle, car).unwrap());
    }

    #[test]
    fn test_diamond_class_path_order() {
        let mut model = Model::new();
        let (_, classes) = vehicle_hierarchy(&mut model);
        let [vehicle, land, water, _, amphibian] = classes[..] else {
            unreachable!()
        };

        // Depth-first through the first superclass, duplicates skipped.
        assert_eq!(
            model.class_path(amphibian).unwrap(),
            vec![amphibian, land, vehicle, water]
        );
    }

    #[test]
    fn test_transitive_closures() {
        let mut model = Model::new();
        let (_, classes) = vehicle_hierarchy(&mut model);
        let [vehicle, land, _, car, amphibian] = classes[..] else {
            unreachable!()
        };

        let supers = model.all_superclasses(car).unwrap();
        assert!(supers.contains(&land) && supers.contains(&vehicle));
        assert_eq!(supers.len(), 2);

        let subs = model.all_subclasses(vehicle).unwrap();
        assert_eq!(subs.len(), 4);
        assert!(subs.contains(&car) && subs.contains(&amphibian));
    }
}

mod deletion {
    use super::*;

    #[test]
    fn test_delete_detaches_hierarchy_and_associations() {
        let mut model = Model::new();
        let (_, classes) = vehicle_hierarchy(&mut model);
        let [vehicle, land, water, car, _] = classes[..] else {
            unreachable!()
        };
        let assoc = model
            .add_association_by_descriptor(land, water, "ferries: [cargo] * -> [carrier] *")
            .unwrap();

        model.delete_classifier(land).unwrap();

        assert!(!model.subclasses(vehicle).unwrap().contains(&land));
        assert!(model.superclasses(car).unwrap().is_empty());
        assert!(model.association(assoc).is_err());
        assert!(model.classifier_associations(water).unwrap().is_empty());

        // Conformance involving the deleted classifier now fails.
        assert!(model.conforms_to_type(car, land).is_err());
        assert!(model.conforms_to_type(land, vehicle).is_err());
    }

    #[test]
    fn test_delete_metaclass_cascades_to_classes_and_instances() {
        let mut model = Model::new();
        let (mc, classes) = vehicle_hierarchy(&mut model);
        let car = classes[3];
        let beetle = model.create_object(car, "beetle").unwrap();

        model.delete_classifier(mc).unwrap();

        assert!(model.classifier(car).is_err());
        assert!(model.object(beetle).is_err());
    }

    #[test]
    fn test_delete_class_deletes_instances_and_their_links() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let person = model.create_class(mc, "Person").unwrap();
        let car = model.create_class(mc, "Car").unwrap();
        model
            .add_association_by_descriptor(person, car, "owns: [owner] * -> [car] *")
            .unwrap();
        let alice = model.create_object(person, "alice").unwrap();
        let beetle = model.create_object(car, "beetle").unwrap();
        let links = model
            .add_links(vec![(alice.into(), beetle.into())], LinkOpts::new())
            .unwrap();

        model.delete_classifier(car).unwrap();

        assert!(model.object(beetle).is_err());
        assert!(model.link(links[0]).is_err());
        assert!(model.links_of(alice).unwrap().is_empty());
    }
}

mod descriptors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_round_trip() {
        let d = parse_descriptor("drives: [driver] 1 -> [car] *").unwrap();
        assert_eq!(d.name.as_deref(), Some("drives"));
        assert_eq!(d.source_role_name.as_deref(), Some("driver"));
        assert_eq!(d.role_name.as_deref(), Some("car"));
        assert_eq!(d.source_multiplicity, Multiplicity::new(1, Some(1)));
        assert_eq!(d.multiplicity, Multiplicity::new(0, None));
        assert_eq!(d.source_multiplicity.to_string(), "1");
        assert_eq!(d.multiplicity.to_string(), "*");
    }

    #[test]
    fn test_aggregation_and_composition_markers() {
        let agg = parse_descriptor("[whole] 1 <>- [part] *").unwrap();
        assert!(agg.aggregation && !agg.composition);

        let comp = parse_descriptor("[whole] 1 <*>- [part] *").unwrap();
        assert!(comp.composition && !comp.aggregation);
    }

    #[test]
    fn test_malformed_multiplicities_are_rejected() {
        assert!(parse_descriptor("[a] x -> [b] *").is_err());
        assert!(parse_descriptor("[a] 3..1 -> [b] *").is_err());
        assert!(parse_descriptor("no marker here").is_err());
    }
}
