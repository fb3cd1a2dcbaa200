//! Library domain: attribute tables, defaults, enumerations and values.

use forma_tests::prelude::*;

mod defaults {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_objects_are_seeded_with_defaults() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let book = model.create_class(mc, "Book").unwrap();
        model
            .set_attributes(
                book,
                vec![
                    Attribute::new("title", AttrType::String),
                    Attribute::new("copies", AttrType::Int).with_default(1i64),
                ],
            )
            .unwrap();

        let b = model.create_object(book, "dune").unwrap();
        assert_eq!(model.attr_value(b, "copies").unwrap(), Some(Value::Int(1)));
        assert_eq!(model.attr_value(b, "title").unwrap(), None);
    }

    #[test]
    fn test_adding_a_default_backfills_existing_instances() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let book = model.create_class(mc, "Book").unwrap();
        model
            .set_attributes(book, vec![Attribute::new("copies", AttrType::Int)])
            .unwrap();

        let kept = model.create_object(book, "kept").unwrap();
        let bare = model.create_object(book, "bare").unwrap();
        model.set_attr_value(kept, "copies", 7i64).unwrap();

        model
            .add_attribute(book, Attribute::new("lendable", AttrType::Bool).with_default(true))
            .unwrap();
        model
            .set_attributes(
                book,
                vec![
                    Attribute::new("copies", AttrType::Int).with_default(1i64),
                    Attribute::new("lendable", AttrType::Bool).with_default(true),
                ],
            )
            .unwrap();

        // Back-filled where unset, untouched where explicitly set.
        assert_eq!(model.attr_value(bare, "copies").unwrap(), Some(Value::Int(1)));
        assert_eq!(model.attr_value(kept, "copies").unwrap(), Some(Value::Int(7)));
        assert_eq!(
            model.attr_value(bare, "lendable").unwrap(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_bulk_assignment_with_the_attrs_macro() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let book = model.create_class(mc, "Book").unwrap();
        model
            .set_attributes(
                book,
                vec![
                    Attribute::new("title", AttrType::String),
                    Attribute::new("copies", AttrType::Int),
                ],
            )
            .unwrap();
        let b = model.create_object(book, "dune").unwrap();

        for (name, value) in attrs! { "title" => "Dune", "copies" => 2i64 } {
            model.set_attr_value(b, &name, value).unwrap();
        }
        assert_eq!(
            model.attr_value(b, "title").unwrap(),
            Some(Value::String("Dune".into()))
        );
        assert_eq!(model.attr_value(b, "copies").unwrap(), Some(Value::Int(2)));
    }

    #[test]
    fn test_removed_attributes_strip_stored_values() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let book = model.create_class(mc, "Book").unwrap();
        model
            .set_attributes(
                book,
                vec![
                    Attribute::new("title", AttrType::String),
                    Attribute::new("copies", AttrType::Int),
                ],
            )
            .unwrap();
        let b = model.create_object(book, "dune").unwrap();
        model.set_attr_value(b, "copies", 3i64).unwrap();

        model
            .set_attributes(book, vec![Attribute::new("title", AttrType::String)])
            .unwrap();
        assert!(model.attr_value(b, "copies").is_err());
        assert!(model.set_attr_value(b, "copies", 3i64).is_err());
    }
}

mod typing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enumeration_attributes() {
        let mut model = Model::new();
        let genre = model.create_enumeration(
            "Genre",
            vec!["novel".into(), "poetry".into(), "reference".into()],
        );
        let mc = model.create_metaclass("DomainClass");
        let book = model.create_class(mc, "Book").unwrap();
        model
            .set_attributes(
                book,
                vec![Attribute::new("genre", AttrType::Enumeration(genre)).with_default("novel")],
            )
            .unwrap();

        let b = model.create_object(book, "dune").unwrap();
        assert_eq!(
            model.attr_value(b, "genre").unwrap(),
            Some(Value::String("novel".into()))
        );
        model.set_attr_value(b, "genre", "poetry").unwrap();

        let err = model.set_attr_value(b, "genre", "cooking").unwrap_err();
        assert!(matches!(err, ModelError::IllegalEnumValue { .. }));
    }

    #[test]
    fn test_classifier_typed_attributes_check_conformance() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let member = model.create_class(mc, "Member").unwrap();
        let staff = model.create_class(mc, "Staff").unwrap();
        let book = model.create_class(mc, "Book").unwrap();
        model.set_superclasses(staff, vec![member]).unwrap();
        model
            .set_attributes(
                book,
                vec![Attribute::new("borrowed_by", AttrType::Classifier(member))],
            )
            .unwrap();

        let b = model.create_object(book, "dune").unwrap();
        let clerk = model.create_object(staff, "clerk").unwrap();
        let other_book = model.create_object(book, "other").unwrap();

        // A staff instance conforms to Member.
        model.set_attr_value(b, "borrowed_by", clerk).unwrap();
        let err = model.set_attr_value(b, "borrowed_by", other_book).unwrap_err();
        assert!(matches!(err, ModelError::ValueTypeMismatch { .. }));
    }

    #[test]
    fn test_list_and_float_values() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let book = model.create_class(mc, "Book").unwrap();
        model
            .set_attributes(
                book,
                vec![
                    Attribute::new("tags", AttrType::List),
                    Attribute::new("weight", AttrType::Float),
                ],
            )
            .unwrap();
        let b = model.create_object(book, "dune").unwrap();

        model
            .set_attr_value(b, "tags", vec![Value::from("scifi"), Value::from("classic")])
            .unwrap();
        // Float slots accept integer values.
        model.set_attr_value(b, "weight", 2i64).unwrap();
        model.set_attr_value(b, "weight", 1.5f64).unwrap();
        assert!(model.set_attr_value(b, "weight", "heavy").is_err());
    }
}

mod inheritance {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inherited_attributes_resolve_along_the_class_path() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let media = model.create_class(mc, "Media").unwrap();
        let book = model.create_class(mc, "Book").unwrap();
        model.set_superclasses(book, vec![media]).unwrap();
        model
            .set_attributes(media, vec![Attribute::new("title", AttrType::String)])
            .unwrap();

        let b = model.create_object(book, "dune").unwrap();
        model.set_attr_value(b, "title", "Dune").unwrap();
        assert_eq!(
            model.attr_value(b, "title").unwrap(),
            Some(Value::String("Dune".into()))
        );
    }

    #[test]
    fn test_shadowing_keeps_values_per_defining_classifier() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        let media = model.create_class(mc, "Media").unwrap();
        let book = model.create_class(mc, "Book").unwrap();
        model.set_superclasses(book, vec![media]).unwrap();
        model
            .set_attributes(media, vec![Attribute::new("id", AttrType::Int)])
            .unwrap();
        model
            .set_attributes(book, vec![Attribute::new("id", AttrType::String)])
            .unwrap();

        let b = model.create_object(book, "dune").unwrap();
        model.set_attr_value(b, "id", "isbn-42").unwrap();
        model.set_attr_value_for(b, "id", 42i64, media).unwrap();

        assert_eq!(
            model.attr_value(b, "id").unwrap(),
            Some(Value::String("isbn-42".into()))
        );
        assert_eq!(
            model.attr_value_for(b, "id", media).unwrap(),
            Some(Value::Int(42))
        );
    }

    #[test]
    fn test_metaclass_attributes_live_on_class_objects() {
        let mut model = Model::new();
        let mc = model.create_metaclass("DomainClass");
        model
            .set_attributes(
                mc,
                vec![Attribute::new("table_name", AttrType::String).with_default("unmapped")],
            )
            .unwrap();

        let book = model.create_class(mc, "Book").unwrap();
        let class_object = model.class_object(book).unwrap();
        assert_eq!(
            model.attr_value(class_object, "table_name").unwrap(),
            Some(Value::String("unmapped".into()))
        );
        model
            .set_attr_value(class_object, "table_name", "books")
            .unwrap();
        assert_eq!(
            model.attr_value(class_object, "table_name").unwrap(),
            Some(Value::String("books".into()))
        );
    }
}
