use std::collections::BTreeMap;

use crate::host::{UiRef, WidgetRole};
use crate::models::{EventOrigin, FieldValue, Fields, PayloadValue, RawEvent};

use super::catalog::{self, RESERVED_NAMES};
use super::identity::IdentityTable;

pub const TEXT_WIDGET: &str = "text_widget";
pub const TEXT_WIDGET_CONTEXT: &str = "text_widget_context";
pub const SHELL_CONTEXT: &str = "shell";

/// Reduce a raw event delivered on `signal` to serializable fields.
///
/// Total over every payload shape: values without a scalar form fall back
/// to their textual description, and live objects become an `<name>_id`
/// token plus a `<name>_class` kind name.
pub fn extract(signal: &str, event: &RawEvent, identities: &mut IdentityTable) -> Fields {
    let mut attributes: BTreeMap<&str, PayloadValue> = event
        .attributes()
        .map(|(name, value)| (name, value.clone()))
        .collect();

    derive_text_widget(&mut attributes);

    let allow_list = catalog::input_allow_list(signal);
    let mut fields = Fields::new();

    for (name, value) in &attributes {
        if !is_selected(name, event.origin(), allow_list) {
            continue;
        }
        normalize_into(&mut fields, name, value, identities);
    }

    fields
}

/// Adds `text_widget` (and the shell context tag) when the event involves
/// a text surface it does not name directly.
fn derive_text_widget(attributes: &mut BTreeMap<&str, PayloadValue>) {
    if !attributes.contains_key(TEXT_WIDGET) {
        let mut derived: Option<UiRef> = attributes
            .get("editor")
            .and_then(PayloadValue::as_object)
            .and_then(|editor| editor.text_surface());

        if let Some(widget) = attributes.get("widget").and_then(PayloadValue::as_object) {
            if widget.role() == WidgetRole::TextSurface {
                derived = Some(widget.clone());
            }
        }

        if let Some(text) = derived {
            attributes.insert(TEXT_WIDGET, PayloadValue::Object(text));
        }
    }

    let in_shell = attributes
        .get(TEXT_WIDGET)
        .and_then(PayloadValue::as_object)
        .and_then(|text| text.container())
        .map_or(false, |container| container.role() == WidgetRole::Shell);

    if in_shell {
        attributes.insert(TEXT_WIDGET_CONTEXT, PayloadValue::Str(SHELL_CONTEXT.to_string()));
    }
}

fn is_selected(name: &str, origin: EventOrigin, input_allow_list: &[&str]) -> bool {
    if name.starts_with('_') {
        return false;
    }

    match origin {
        EventOrigin::Native => input_allow_list.contains(&name),
        EventOrigin::Application => !RESERVED_NAMES.contains(&name),
    }
}

fn normalize_into(
    fields: &mut Fields,
    name: &str,
    value: &PayloadValue,
    identities: &mut IdentityTable,
) {
    let normalized = match value {
        PayloadValue::Object(object) => {
            fields.insert(
                format!("{name}_id"),
                FieldValue::Int(identities.token_for(object)),
            );
            fields.insert(
                format!("{name}_class"),
                FieldValue::Text(object.class_name().to_string()),
            );
            return;
        }
        PayloadValue::Str(text) => FieldValue::Text(text.clone()),
        PayloadValue::Int(number) => FieldValue::Int(*number),
        // NaN and infinities have no JSON number form.
        PayloadValue::Float(number) if number.is_finite() => FieldValue::Float(*number),
        other => FieldValue::Text(other.describe()),
    };

    fields.insert(name.to_string(), normalized);
}
