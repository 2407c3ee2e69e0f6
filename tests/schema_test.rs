use nuodbaas_provider::schema::projector::{Attribute, AttributeType, PlanModifierHint, View};
use nuodbaas_provider::schema::{embedded_document, project, SchemaOverrides};

fn find<'a>(attributes: &'a [Attribute], name: &str) -> &'a Attribute {
    attributes
        .iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("attribute '{}' not found", name))
}

fn database_attributes(view: View) -> Vec<Attribute> {
    let document = embedded_document().unwrap();
    let schema = document.resolve("DatabaseModel").unwrap();
    project(&schema, view, &SchemaOverrides::new()).unwrap()
}

#[test]
fn test_embedded_document_parses() {
    let document = embedded_document().unwrap();
    for name in [
        "ProjectModel",
        "DatabaseModel",
        "BackupModel",
        "BackupPolicyModel",
        "UserModel",
    ] {
        document.resolve(name).unwrap();
    }
}

#[test]
fn test_resource_view_identifiers() {
    let attributes = database_attributes(View::Resource);
    for name in ["organization", "project", "name"] {
        let attribute = find(&attributes, name);
        assert!(attribute.required, "{} should be required", name);
        assert!(attribute.identifier, "{} should be an identifier", name);
        assert!(
            attribute
                .plan_modifiers
                .contains(&PlanModifierHint::RequiresReplace),
            "{} should require replace on change",
            name
        );
        assert_eq!(attribute.ty, AttributeType::String);
        assert!(attribute.pattern.is_some());
    }
}

#[test]
fn test_resource_view_sensitive_required_field() {
    let attributes = database_attributes(View::Resource);
    let password = find(&attributes, "dba_password");
    assert!(password.required);
    assert!(password.sensitive);
    assert!(!password.computed);
    assert!(password.plan_modifiers.is_empty());
}

#[test]
fn test_resource_view_optional_computed_fields() {
    let attributes = database_attributes(View::Resource);
    let tier = find(&attributes, "tier");
    assert!(!tier.required);
    assert!(tier.optional);
    assert!(tier.computed);
    assert!(tier
        .plan_modifiers
        .contains(&PlanModifierHint::UseStateForUnknown));
}

#[test]
fn test_resource_view_read_only_fields_are_computed() {
    let attributes = database_attributes(View::Resource);
    let status = find(&attributes, "status");
    assert!(status.computed);
    assert!(!status.required);
    assert!(!status.optional);

    let AttributeType::Nested(fields) = &status.ty else {
        panic!("status should be a nested attribute");
    };
    let ready = find(fields, "ready");
    assert!(ready.computed);
    assert_eq!(ready.ty, AttributeType::Bool);
    let endpoint = find(fields, "sql_endpoint");
    assert_eq!(endpoint.ty, AttributeType::String);
}

#[test]
fn test_resource_view_type_mapping() {
    let attributes = database_attributes(View::Resource);
    let labels = find(&attributes, "labels");
    assert_eq!(labels.ty, AttributeType::Map(Box::new(AttributeType::String)));

    let maintenance = find(&attributes, "maintenance");
    let AttributeType::Nested(fields) = &maintenance.ty else {
        panic!("maintenance should be a nested attribute");
    };
    assert_eq!(find(fields, "is_disabled").ty, AttributeType::Bool);

    let document = embedded_document().unwrap();
    let policy = document.resolve("BackupPolicyModel").unwrap();
    let attributes = project(&policy, View::Resource, &SchemaOverrides::new()).unwrap();
    let selector = find(&attributes, "selector");
    let AttributeType::Nested(fields) = &selector.ty else {
        panic!("selector should be a nested attribute");
    };
    assert_eq!(
        find(fields, "slas").ty,
        AttributeType::List(Box::new(AttributeType::String))
    );
    let retention = find(&attributes, "retention");
    let AttributeType::Nested(fields) = &retention.ty else {
        panic!("retention should be a nested attribute");
    };
    assert_eq!(find(fields, "daily").ty, AttributeType::Int64);
}

#[test]
fn test_properties_without_exposed_name_are_skipped() {
    // resourceVersion carries no x-tf-name and must not appear.
    let attributes = database_attributes(View::Resource);
    assert!(!attributes.iter().any(|a| a.name.contains("version")));
}

#[test]
fn test_data_source_view() {
    let attributes = database_attributes(View::DataSource);
    for attribute in &attributes {
        assert!(
            attribute.plan_modifiers.is_empty(),
            "data sources carry no plan modifiers"
        );
        if attribute.identifier {
            assert!(attribute.required);
            assert!(!attribute.computed);
        } else {
            assert!(attribute.computed);
            assert!(!attribute.required);
            assert!(!attribute.optional);
        }
    }
    assert!(find(&attributes, "organization").required);
    assert!(find(&attributes, "dba_password").computed);
}

#[test]
fn test_overrides_replace_description_and_pattern() {
    let document = embedded_document().unwrap();
    let schema = document.resolve("ProjectModel").unwrap();
    let overrides = SchemaOverrides::new()
        .with_description("sla", "Service level agreement.")
        .with_pattern("tier", "^n[0-9]")
        .with_description("maintenance.isDisabled", "Shut the project down.");
    let attributes = project(&schema, View::Resource, &overrides).unwrap();

    assert_eq!(
        find(&attributes, "sla").description.as_deref(),
        Some("Service level agreement.")
    );
    assert_eq!(find(&attributes, "tier").pattern.as_deref(), Some("^n[0-9]"));

    let maintenance = find(&attributes, "maintenance");
    let AttributeType::Nested(fields) = &maintenance.ty else {
        panic!("maintenance should be a nested attribute");
    };
    assert_eq!(
        find(fields, "is_disabled").description.as_deref(),
        Some("Shut the project down.")
    );
}
