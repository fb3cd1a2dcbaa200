//! Deployment domain: metaclass-level modeling with stereotypes and
//! tagged values on classes and links.

use forma_tests::prelude::*;

struct Deployment {
    component: ClassifierId,
    uses: AssociationId,
    service: ClassifierId,
    encrypted: ClassifierId,
    web: ClassifierId,
    billing: ClassifierId,
    db: ClassifierId,
}

fn deployment(model: &mut Model) -> Deployment {
    let component = model.create_metaclass("Component");
    model
        .set_attributes(
            component,
            vec![Attribute::new("replicas", AttrType::Int).with_default(1i64)],
        )
        .unwrap();
    let uses = model
        .add_association_by_descriptor(component, component, "uses: [user] * -> [used] *")
        .unwrap();

    let service = model.create_stereotype("Service");
    model
        .extend_stereotype(service, vec![ExtensionTarget::Metaclass(component)])
        .unwrap();
    model
        .set_attributes(
            service,
            vec![Attribute::new("tier", AttrType::String).with_default("standard")],
        )
        .unwrap();

    let encrypted = model.create_stereotype("Encrypted");
    model
        .extend_stereotype(encrypted, vec![ExtensionTarget::Association(uses)])
        .unwrap();
    model
        .set_attributes(encrypted, vec![Attribute::new("cipher", AttrType::String)])
        .unwrap();

    let web = model.create_class(component, "Web").unwrap();
    let billing = model.create_class(component, "Billing").unwrap();
    let db = model.create_class(component, "Db").unwrap();
    Deployment {
        component,
        uses,
        service,
        encrypted,
        web,
        billing,
        db,
    }
}

mod class_level_links {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classes_link_through_metaclass_associations() {
        let mut model = Model::new();
        let d = deployment(&mut model);

        model
            .add_links(
                vec![(d.web.into(), d.billing.into()), (d.web.into(), d.db.into())],
                LinkOpts::new().role("used"),
            )
            .unwrap();

        let web_object = model.class_object(d.web).unwrap();
        assert_eq!(model.links_of(web_object).unwrap().len(), 2);
        assert_eq!(
            model.links_for_association(web_object, d.uses).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_metaclass_defaults_reach_class_objects() {
        let mut model = Model::new();
        let d = deployment(&mut model);

        let db_object = model.class_object(d.db).unwrap();
        assert_eq!(
            model.attr_value(db_object, "replicas").unwrap(),
            Some(Value::Int(1))
        );
        model.set_attr_value(db_object, "replicas", 3i64).unwrap();
        assert_eq!(
            model.attr_value(db_object, "replicas").unwrap(),
            Some(Value::Int(3))
        );
    }
}

mod stereotypes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stereotype_on_class_with_tagged_values() {
        let mut model = Model::new();
        let d = deployment(&mut model);
        let element = Stereotyped::Class(d.billing);

        model.add_stereotype_instance(element, d.service).unwrap();
        assert_eq!(
            model.tagged_value(element, "tier").unwrap(),
            Some(Value::String("standard".into()))
        );
        model.set_tagged_value(element, "tier", "premium").unwrap();
        assert_eq!(
            model.tagged_value(element, "tier").unwrap(),
            Some(Value::String("premium".into()))
        );

        let err = model
            .add_stereotype_instance(element, d.service)
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateStereotypeInstance { .. }));
    }

    #[test]
    fn test_stereotype_on_link_with_tagged_values() {
        let mut model = Model::new();
        let d = deployment(&mut model);

        let links = model
            .add_links(
                vec![(d.web.into(), d.db.into())],
                LinkOpts::new()
                    .role("used")
                    .stereotype(d.encrypted)
                    .tagged("cipher", "chacha20"),
            )
            .unwrap();
        let element = Stereotyped::Link(links[0]);

        assert_eq!(
            model.stereotype_instances(element).unwrap(),
            vec![d.encrypted]
        );
        assert_eq!(
            model.tagged_value(element, "cipher").unwrap(),
            Some(Value::String("chacha20".into()))
        );
        assert_eq!(
            model.extended_instances(d.encrypted).unwrap(),
            vec![element]
        );
    }

    #[test]
    fn test_link_stereotypes_require_extension() {
        let mut model = Model::new();
        let d = deployment(&mut model);

        // Service extends the metaclass, not the association.
        let err = model
            .add_links(
                vec![(d.web.into(), d.db.into())],
                LinkOpts::new().role("used").stereotype(d.service),
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::NotExtended { .. }));
        let web_object = model.class_object(d.web).unwrap();
        assert!(model.links_of(web_object).unwrap().is_empty());
    }

    #[test]
    fn test_stereotype_default_values_flow_into_classes() {
        let mut model = Model::new();
        let d = deployment(&mut model);
        model
            .add_attribute(d.component, Attribute::new("endpoint", AttrType::String))
            .unwrap();
        model
            .set_stereotype_default_value(d.service, "endpoint", "https")
            .unwrap();

        model
            .add_stereotype_instance(Stereotyped::Class(d.web), d.service)
            .unwrap();
        let web_object = model.class_object(d.web).unwrap();
        assert_eq!(
            model.attr_value(web_object, "endpoint").unwrap(),
            Some(Value::String("https".into()))
        );

        // A value set beforehand is never overwritten.
        let db_object = model.class_object(d.db).unwrap();
        model.set_attr_value(db_object, "endpoint", "tcp").unwrap();
        model
            .add_stereotype_instance(Stereotyped::Class(d.db), d.service)
            .unwrap();
        assert_eq!(
            model.attr_value(db_object, "endpoint").unwrap(),
            Some(Value::String("tcp".into()))
        );
    }

    #[test]
    fn test_deleting_a_stereotype_detaches_it_everywhere() {
        let mut model = Model::new();
        let d = deployment(&mut model);
        model
            .add_stereotype_instance(Stereotyped::Class(d.billing), d.service)
            .unwrap();

        model.delete_classifier(d.service).unwrap();

        assert!(model
            .stereotype_instances(Stereotyped::Class(d.billing))
            .unwrap()
            .is_empty());
        assert!(model.classifier(d.component).unwrap().extended_by.is_empty());
    }
}

mod connectivity {
    use super::*;

    #[test]
    fn test_connected_enumerates_neighbors_per_kind() {
        let mut model = Model::new();
        let d = deployment(&mut model);
        let links = model
            .add_links(
                vec![(d.web.into(), d.db.into())],
                LinkOpts::new().role("used"),
            )
            .unwrap();

        // The metaclass sees its classes and the stereotype extending it.
        let component_neighbors = model.connected(d.component.into()).unwrap();
        assert!(component_neighbors.contains(&d.web.into()));
        assert!(component_neighbors.contains(&d.service.into()));

        // The association sees its endpoints and extending stereotypes.
        let uses_neighbors = model.connected(d.uses.into()).unwrap();
        assert!(uses_neighbors.contains(&d.component.into()));
        assert!(uses_neighbors.contains(&d.encrypted.into()));

        // A link sees its endpoints and its association.
        let link_neighbors = model.connected(links[0].into()).unwrap();
        assert!(link_neighbors.contains(&model.class_object(d.web).unwrap().into()));
        assert!(link_neighbors.contains(&d.uses.into()));
    }
}
