//! Order management domain: link batches, multiplicity and atomicity.

use forma_tests::prelude::*;

fn shop(model: &mut Model) -> (ClassifierId, ClassifierId, AssociationId) {
    let mc = model.create_metaclass("DomainClass");
    let person = model.create_class(mc, "Person").unwrap();
    let order = model.create_class(mc, "Order").unwrap();
    let places = model
        .add_association_by_descriptor(person, order, "places: [customer] 1 -> [order] *")
        .unwrap();
    (person, order, places)
}

mod multiplicity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_to_many_accepts_many_orders() {
        let mut model = Model::new();
        let (person, order, places) = shop(&mut model);
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();
        let o2 = model.create_object(order, "o2").unwrap();

        let links = model
            .add_links(
                vec![(p1.into(), o1.into()), (p1.into(), o2.into())],
                LinkOpts::new(),
            )
            .unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(model.links_for_association(p1, places).unwrap().len(), 2);
    }

    #[test]
    fn test_saturated_upper_bound_fails_atomically() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let person = model.create_class(mc, "Person").unwrap();
        let order = model.create_class(mc, "Order").unwrap();
        model
            .add_association_by_descriptor(person, order, "[customer] 1 -> [order] 0..2")
            .unwrap();
        let p1 = model.create_object(person, "p1").unwrap();
        let orders: Vec<ObjectId> = (0..3)
            .map(|i| model.create_object(order, format!("o{i}")).unwrap())
            .collect();

        model
            .add_links(
                vec![(p1.into(), orders[0].into()), (p1.into(), orders[1].into())],
                LinkOpts::new(),
            )
            .unwrap();

        // The third order takes p1 past the upper bound; nothing changes.
        let err = model
            .add_links(vec![(p1.into(), orders[2].into())], LinkOpts::new())
            .unwrap_err();
        assert!(matches!(err, ModelError::MultiplicityViolation { .. }));
        assert_eq!(model.links_of(p1).unwrap().len(), 2);
        assert!(model.links_of(orders[2]).unwrap().is_empty());
    }

    #[test]
    fn test_removing_the_sole_link_is_tolerated() {
        let mut model = Model::new();
        let (person, order, _) = shop(&mut model);
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();

        model
            .add_links(vec![(p1.into(), o1.into())], LinkOpts::new())
            .unwrap();

        // The order drops below its customer lower bound, but with zero
        // links on its own side and a zero floor opposite this reads as a
        // structure under construction, not a violation.
        model
            .delete_links(vec![(p1.into(), o1.into())], LinkOpts::new())
            .unwrap();
        assert!(model.links_of(o1).unwrap().is_empty());
    }

    #[test]
    fn test_unlinked_order_is_tolerated_while_opposite_floor_is_zero() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let person = model.create_class(mc, "Person").unwrap();
        let order = model.create_class(mc, "Order").unwrap();
        let places = model
            .add_association_by_descriptor(person, order, "[customer] 1 -> [order] *")
            .unwrap();

        // An order with zero customers is below the source lower bound, but
        // while its own side holds zero links and the target floor is zero
        // the violation is tolerated (half-wired construction).
        model.check_multiplicity(places, 0, 0, false).unwrap();
        // With an opposite link present the bound applies.
        assert!(model.check_multiplicity(places, 0, 1, false).is_err());
    }
}

mod link_deletion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_associations_need_disambiguation() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let person = model.create_class(mc, "Person").unwrap();
        let order = model.create_class(mc, "Order").unwrap();
        let placed = model
            .add_association_by_descriptor(person, order, "[customer] * -> [placed] *")
            .unwrap();
        let reviewed = model
            .add_association_by_descriptor(person, order, "[reviewer] * -> [reviewed] *")
            .unwrap();
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();

        model
            .add_links(
                vec![(p1.into(), o1.into())],
                LinkOpts::new().association(placed),
            )
            .unwrap();
        model
            .add_links(
                vec![(p1.into(), o1.into())],
                LinkOpts::new().association(reviewed),
            )
            .unwrap();

        let err = model
            .delete_links(vec![(p1.into(), o1.into())], LinkOpts::new())
            .unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousLink { .. }));

        model
            .delete_links(
                vec![(p1.into(), o1.into())],
                LinkOpts::new().association(reviewed),
            )
            .unwrap();
        assert_eq!(model.links_for_association(p1, placed).unwrap().len(), 1);
        assert_eq!(model.links_for_association(p1, reviewed).unwrap().len(), 0);
    }

    #[test]
    fn test_role_name_disambiguates() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let person = model.create_class(mc, "Person").unwrap();
        let order = model.create_class(mc, "Order").unwrap();
        model
            .add_association_by_descriptor(person, order, "[customer] * -> [placed] *")
            .unwrap();
        model
            .add_association_by_descriptor(person, order, "[reviewer] * -> [reviewed] *")
            .unwrap();
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();

        model
            .add_links(vec![(p1.into(), o1.into())], LinkOpts::new().role("placed"))
            .unwrap();
        model
            .add_links(
                vec![(p1.into(), o1.into())],
                LinkOpts::new().role("reviewed"),
            )
            .unwrap();
        model
            .delete_links(vec![(p1.into(), o1.into())], LinkOpts::new().role("placed"))
            .unwrap();
        assert_eq!(model.links_of(p1).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_batch_is_all_or_nothing() {
        let mut model = Model::new();
        let (person, order, _) = shop(&mut model);
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();
        let o2 = model.create_object(order, "o2").unwrap();

        model
            .add_links(vec![(p1.into(), o1.into())], LinkOpts::new())
            .unwrap();

        // The second pair has no link; the first pair must survive.
        let err = model
            .delete_links(
                vec![(p1.into(), o1.into()), (p1.into(), o2.into())],
                LinkOpts::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::NoSuchLink { .. }));
        assert_eq!(model.links_of(p1).unwrap().len(), 1);
        assert_eq!(model.links_of(o1).unwrap().len(), 1);
    }

    #[test]
    fn test_deleting_an_object_removes_its_links() {
        let mut model = Model::new();
        let (person, order, _) = shop(&mut model);
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();
        let links = model
            .add_links(vec![(p1.into(), o1.into())], LinkOpts::new())
            .unwrap();

        model.delete_object(o1).unwrap();
        assert!(model.link(links[0]).is_err());
        assert!(model.links_of(p1).unwrap().is_empty());
    }
}

mod labels {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels_are_stamped_on_created_links() {
        let mut model = Model::new();
        let (person, order, _) = shop(&mut model);
        let p1 = model.create_object(person, "p1").unwrap();
        let o1 = model.create_object(order, "o1").unwrap();

        let links = model
            .add_links(
                vec![(p1.into(), o1.into())],
                LinkOpts::new().label("first purchase"),
            )
            .unwrap();
        assert_eq!(
            model.link(links[0]).unwrap().label.as_deref(),
            Some("first purchase")
        );
    }
}
