/// Descriptor for one user-editable property of a generator's settings.
///
/// Hosts render these in a settings UI; `key` addresses the property
/// programmatically, `name` is the label shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableProperty {
    pub key: &'static str,
    pub name: &'static str,
}

impl EditableProperty {
    pub const fn new(key: &'static str, name: &'static str) -> Self {
        Self { key, name }
    }
}

/// Settings types advertise which of their fields a host may edit.
pub trait Editable {
    fn editable_properties(&self) -> &[EditableProperty];
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EntitySettings {
        #[allow(dead_code)]
        namespace: String,
        #[allow(dead_code)]
        emit_headers: bool,
    }

    const ENTITY_PROPERTIES: &[EditableProperty] = &[
        EditableProperty::new("namespace", "Namespace"),
        EditableProperty::new("emit_headers", "Emit file headers"),
    ];

    impl Editable for EntitySettings {
        fn editable_properties(&self) -> &[EditableProperty] {
            ENTITY_PROPERTIES
        }
    }

    #[test]
    fn descriptors_expose_keys_and_labels() {
        let settings = EntitySettings {
            namespace: "Acme.Models".to_string(),
            emit_headers: true,
        };
        let properties = settings.editable_properties();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].key, "namespace");
        assert_eq!(properties[1].name, "Emit file headers");
    }
}
