//! Draws a [`FormState`] as an element tree
//!
//! Element ids follow the quote page (`tow_type`, `extra-services`,
//! `service-limit-msg`, `make`, `model`, `lane`, `quote-result`) so the
//! rendered view can be compared against it directly.

use crate::catalog::{Catalog, Suggestion};
use crate::dom::element::ElementNode;
use crate::dom::tree::DomTree;
use crate::form::{FormState, LaneChoice, ScalarField, ServiceBlock, ServiceBlockList, YesNo};
use crate::submit::ResultBox;
use serde_json::json;

pub const ADD_SERVICE_LABEL: &str = "+ Add More Service";
pub const REMOVE_SERVICE_LABEL: &str = "Remove";

/// Render the full form
pub fn render_form(state: &FormState, catalog: &Catalog, result: &ResultBox, limit_message: &str) -> DomTree {
    let form = ElementNode::new("form")
        .attr("id", "quote-form")
        .child(tow_type_select(state, catalog))
        .child(yes_no_radios(
            "need_tow",
            "Do you need a tow?",
            state.need_tow(),
            "set_need_tow",
            json!({}),
            "answer",
        ))
        .child(text_input(ScalarField::Source, "Pickup address", state.source()))
        .child(text_input(ScalarField::Destination, "Drop-off address", state.destination()))
        .child(service_blocks(state.blocks()))
        .child(
            ElementNode::new("div")
                .attr("id", "service-limit-msg")
                .attr("class", if state.blocks().limit_message_visible() { "show" } else { "" })
                .hidden(!state.blocks().limit_message_visible())
                .with_text(limit_message),
        )
        .with_children(vehicle_inputs(state, catalog))
        .with_children(weather_select(state, catalog))
        .child(text_input(
            ScalarField::TruckUtilization,
            "Truck utilization",
            state.truck_utilization().unwrap_or_default(),
        ))
        .child(yes_no_radios(
            "is_accident",
            "Was there an accident?",
            Some(state.is_accident()),
            "set_field",
            json!({ "field": ScalarField::IsAccident }),
            "value",
        ))
        .child(yes_no_radios(
            "unsafe_location",
            "Is the vehicle in an unsafe location?",
            state.location().answer(),
            "set_unsafe_location",
            json!({}),
            "answer",
        ))
        .child(lane_select(state, catalog))
        .child(
            ElementNode::new("button")
                .attr("type", "submit")
                .attr("id", "get-quote")
                .with_text("Get Quote"),
        )
        .child(result_box(result));

    DomTree::new(form)
}

fn option(value: &str, label: &str, selected: bool) -> ElementNode {
    ElementNode::new("option")
        .attr("value", value)
        .flag("selected", selected)
        .with_text(label)
}

fn tow_type_select(state: &FormState, catalog: &Catalog) -> ElementNode {
    let selected = state.tow_type();
    ElementNode::new("select")
        .attr("id", "tow_type")
        .attr("name", "tow_type")
        .flag("required", true)
        .bind("select_tow_type", json!({}), Some("tow_type"))
        .with_children(
            catalog
                .pricing
                .tow_types()
                .map(|tow| option(tow, tow, selected == Some(tow))),
        )
}

fn text_input(field: ScalarField, placeholder: &str, value: &str) -> ElementNode {
    ElementNode::new("input")
        .attr("type", "text")
        .attr("id", field.name())
        .attr("name", field.name())
        .attr("placeholder", placeholder)
        .attr("value", value)
        .flag(
            "required",
            matches!(field, ScalarField::Source | ScalarField::Destination),
        )
        .bind("set_field", json!({ "field": field }), Some("value"))
}

fn yes_no_radios(
    name: &str,
    legend: &str,
    answer: Option<YesNo>,
    handler: &str,
    args: serde_json::Value,
    value_key: &str,
) -> ElementNode {
    let radio = |value: YesNo, label: &str| {
        ElementNode::new("label").with_text(label).child(
            ElementNode::new("input")
                .attr("type", "radio")
                .attr("id", format!("{}-{}", name, value.as_str()))
                .attr("name", name)
                .attr("value", value.as_str())
                .flag("checked", answer == Some(value))
                .bind(handler, args.clone(), Some(value_key)),
        )
    };

    ElementNode::new("fieldset")
        .attr("id", name)
        .child(ElementNode::new("legend").with_text(legend))
        .child(radio(YesNo::Yes, "Yes"))
        .child(radio(YesNo::No, "No"))
}

fn service_blocks(blocks: &ServiceBlockList) -> ElementNode {
    ElementNode::new("div")
        .attr("id", "extra-services")
        .with_children(blocks.iter().map(|block| service_block(blocks, block)))
}

fn service_block(blocks: &ServiceBlockList, block: &ServiceBlock) -> ElementNode {
    let id = block.id();
    let select_id = format!("service_type-{}", id);

    let select = ElementNode::new("select")
        .attr("id", select_id.as_str())
        .attr("name", "service_type")
        .bind("select_service", json!({ "block": id }), Some("service"))
        .with_children(
            block
                .options()
                .iter()
                .map(|opt| option(&opt.key, &opt.label, block.selected() == Some(opt.key.as_str()))),
        );

    let extras = block.extras().specs().iter().map(|spec| {
        ElementNode::new("label").with_text(spec.label).child(
            ElementNode::new("input")
                .attr("type", "number")
                .attr("id", format!("{}-{}", spec.name, id))
                .attr("name", spec.name)
                .attr("min", "0")
                .attr("step", spec.step.as_attr())
                .attr("value", block.extras().value(spec.name).unwrap_or_default())
                .bind("set_extra_field", json!({ "block": id, "field": spec.name }), Some("value")),
        )
    });

    let mut wrapper = ElementNode::new("div")
        .attr("class", "service-block")
        .attr("data-block", id.to_string())
        .child(
            ElementNode::new("label")
                .attr("for", select_id.as_str())
                .with_text("Service Type"),
        )
        .child(select)
        .child(
            ElementNode::new("div")
                .attr("class", "service-extras")
                .with_children(extras),
        )
        .child(
            ElementNode::new("button")
                .attr("type", "button")
                .attr("class", "add-service")
                .flag("disabled", !blocks.can_add_from(id))
                .bind("add_service", json!({}), None)
                .with_text(ADD_SERVICE_LABEL),
        );

    if blocks.can_remove(id) {
        wrapper.add_child(
            ElementNode::new("button")
                .attr("type", "button")
                .attr("class", "remove-service")
                .bind("remove_service", json!({ "block": id }), None)
                .with_text(REMOVE_SERVICE_LABEL),
        );
    }

    wrapper
}

fn datalist(id: &str, suggestions: &[Suggestion]) -> ElementNode {
    ElementNode::new("datalist").attr("id", id).with_children(
        suggestions
            .iter()
            .map(|s| ElementNode::new("option").attr("value", s.label.as_str())),
    )
}

fn vehicle_inputs(state: &FormState, catalog: &Catalog) -> Vec<ElementNode> {
    let vehicle = state.vehicle();
    vec![
        ElementNode::new("input")
            .attr("type", "text")
            .attr("id", "make")
            .attr("name", "make")
            .attr("list", "make-list")
            .attr("value", vehicle.make_input())
            .bind("set_make", json!({}), Some("make")),
        datalist("make-list", &catalog.vehicles.make_suggestions()),
        ElementNode::new("input")
            .attr("type", "text")
            .attr("id", "model")
            .attr("name", "model")
            .attr("list", "model-list")
            .attr("value", vehicle.model_input())
            .flag("disabled", !vehicle.model_enabled())
            .bind("set_model", json!({}), Some("model")),
        datalist("model-list", vehicle.model_suggestions()),
    ]
}

/// Weather select; absent when the page supplied no weather options
fn weather_select(state: &FormState, catalog: &Catalog) -> Option<ElementNode> {
    let weather = &catalog.modifiers.weather;
    if weather.is_empty() {
        return None;
    }

    let selected = state.weather();
    Some(
        ElementNode::new("select")
            .attr("id", "weather")
            .attr("name", "weather")
            .bind("set_field", json!({ "field": ScalarField::Weather }), Some("value"))
            .child(option("", "Select weather", selected.is_none()))
            .with_children(
                weather
                    .iter()
                    .map(|(key, entry)| option(key, &entry.label, selected == Some(key.as_str()))),
            ),
    )
}

fn lane_select(state: &FormState, catalog: &Catalog) -> ElementNode {
    let location = state.location();
    let modifiers = &catalog.modifiers;
    let selected = location.lane();

    let groups = modifiers.vehicle_location.iter().map(|(road_key, road)| {
        ElementNode::new("optgroup")
            .attr("label", road.label.as_str())
            .with_children(road.lanes.keys().map(|lane_key| {
                let choice = LaneChoice::new(road_key.as_str(), lane_key.as_str());
                let label = location
                    .option_label(&choice, modifiers)
                    .unwrap_or_else(|| lane_key.clone());
                option(&choice.option_value(), &label, selected == Some(&choice))
            }))
    });

    ElementNode::new("select")
        .attr("id", "lane")
        .attr("name", "lane")
        .flag("required", location.lane_required())
        .hidden(!location.lane_visible())
        .bind("select_lane", json!({}), Some("option"))
        .child(option("", "Select lane", selected.is_none()))
        .with_children(groups)
}

fn result_box(result: &ResultBox) -> ElementNode {
    ElementNode::new("div")
        .attr("id", "quote-result")
        .attr(
            "style",
            if result.visible { "display: block" } else { "display: none" },
        )
        .with_text(result.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PricingTable, ServiceEntry};
    use crate::form::{AddOutcome, BlockId, MAX_SERVICE_BLOCKS};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog
            .pricing
            .insert("light", "tow", ServiceEntry::new("Tow").with_rank(1.0));
        catalog.pricing.insert("light", "window_film", ServiceEntry::new("Window Film"));
        catalog
            .pricing
            .insert("light", "heavy_equipment", ServiceEntry::new("Heavy Equipment"));
        catalog.pricing.insert("heavy", "recovery", ServiceEntry::new("Recovery"));
        catalog.vehicles.insert_make("ford", "Ford");
        catalog.vehicles.insert_model("ford", "f150", "F-150");
        catalog
            .modifiers
            .insert_lane("highway", "Highway", "shoulder", "Shoulder");
        catalog.modifiers.insert_lane("highway", "Highway", "left", "Left Lane");
        catalog
    }

    fn state(catalog: &Catalog) -> FormState {
        FormState::new(&catalog.pricing, MAX_SERVICE_BLOCKS, "tow")
    }

    fn render(state: &FormState, catalog: &Catalog) -> DomTree {
        render_form(state, catalog, &ResultBox::hidden(), "limit")
    }

    fn count_tag(node: &ElementNode, tag: &str) -> usize {
        let mut found = Vec::new();
        node.descendants_by_tag(tag, &mut found);
        found.len()
    }

    #[test]
    fn test_tow_type_options_follow_table() {
        let catalog = catalog();
        let tree = render(&state(&catalog), &catalog);

        let select = tree.find_by_id("tow_type").unwrap();
        let values: Vec<_> = select
            .children
            .iter()
            .map(|o| o.get_attribute("value").unwrap().as_str())
            .collect();
        assert_eq!(values, vec!["light", "heavy"]);
        assert!(select.children[0].has_attribute("selected"));
    }

    #[test]
    fn test_window_film_renders_two_number_inputs() {
        let catalog = catalog();
        let mut state = state(&catalog);
        state.select_service(BlockId(0), "window_film").unwrap();

        let tree = render(&state, &catalog);
        let extras = tree.find_by_id("extra-services").unwrap();
        let mut inputs = Vec::new();
        extras.descendants_by_tag("input", &mut inputs);

        assert_eq!(inputs.len(), 2);
        for input in inputs {
            assert_eq!(input.get_attribute("type").unwrap(), "number");
            assert_eq!(input.get_attribute("min").unwrap(), "0");
            assert_eq!(input.get_attribute("step").unwrap(), "1");
        }
    }

    #[test]
    fn test_heavy_equipment_renders_half_step_input() {
        let catalog = catalog();
        let mut state = state(&catalog);
        state.select_service(BlockId(0), "heavy_equipment").unwrap();

        let tree = render(&state, &catalog);
        let input = tree.find_by_id("equipment_hours-0").unwrap();
        assert_eq!(input.get_attribute("step").unwrap(), "0.5");
    }

    #[test]
    fn test_add_button_only_on_newest_block() {
        let catalog = catalog();
        let mut state = state(&catalog);
        assert!(matches!(state.add_service(&catalog.pricing), AddOutcome::Added(_)));

        let tree = render(&state, &catalog);
        let blocks = &tree.find_by_id("extra-services").unwrap().children;
        assert_eq!(blocks.len(), 2);

        let add_disabled: Vec<bool> = blocks
            .iter()
            .map(|b| b.children.iter().find(|c| c.has_class("add-service")).unwrap().is_disabled())
            .collect();
        assert_eq!(add_disabled, vec![true, false]);

        assert_eq!(count_tag(&blocks[0], "button"), 1);
        assert_eq!(count_tag(&blocks[1], "button"), 2);
    }

    #[test]
    fn test_limit_message_visibility() {
        let catalog = catalog();
        let mut state = state(&catalog);
        let tree = render(&state, &catalog);
        assert!(!tree.find_by_id("service-limit-msg").unwrap().is_visible);

        for _ in 0..MAX_SERVICE_BLOCKS {
            state.add_service(&catalog.pricing);
        }
        let tree = render(&state, &catalog);
        let msg = tree.find_by_id("service-limit-msg").unwrap();
        assert!(msg.is_visible);
        assert!(msg.has_class("show"));
    }

    #[test]
    fn test_model_input_disabled_until_make_resolves() {
        let catalog = catalog();
        let mut state = state(&catalog);
        let tree = render(&state, &catalog);
        assert!(tree.find_by_id("model").unwrap().is_disabled());
        assert!(tree.index_of("model").is_none());

        state.set_make("Ford", &catalog.vehicles);
        let tree = render(&state, &catalog);
        assert!(!tree.find_by_id("model").unwrap().is_disabled());
        assert_eq!(tree.find_by_id("model-list").unwrap().children.len(), 1);
    }

    #[test]
    fn test_lane_select_follows_unsafe_answer() {
        let catalog = catalog();
        let mut state = state(&catalog);

        let tree = render(&state, &catalog);
        let lane = tree.find_by_id("lane").unwrap();
        assert!(!lane.is_visible);
        assert!(!lane.has_attribute("required"));

        state.set_unsafe_location(YesNo::Yes);
        state
            .select_lane(LaneChoice::new("highway", "shoulder"), &catalog.modifiers)
            .unwrap();
        let tree = render(&state, &catalog);
        let lane = tree.find_by_id("lane").unwrap();
        assert!(lane.is_visible);
        assert!(lane.has_attribute("required"));

        let group = &lane.children[1];
        assert_eq!(group.get_attribute("label").unwrap(), "Highway");
        assert_eq!(group.children[0].text_content.as_deref(), Some("Highway – Shoulder"));
        assert_eq!(group.children[1].text_content.as_deref(), Some("Left Lane"));
    }

    #[test]
    fn test_result_box_display() {
        let catalog = catalog();
        let state = state(&catalog);
        let shown = ResultBox {
            text: "Tow: $95".to_string(),
            visible: true,
        };

        let tree = render_form(&state, &catalog, &shown, "limit");
        let result = tree.find_by_id("quote-result").unwrap();
        assert_eq!(result.display(), Some("block"));
        assert_eq!(result.text_content.as_deref(), Some("Tow: $95"));
    }

    #[test]
    fn test_weather_select_absent_without_options() {
        let catalog = catalog();
        let tree = render(&state(&catalog), &catalog);
        assert!(tree.find_by_id("weather").is_none());

        let mut with_weather = catalog.clone();
        with_weather.modifiers.insert_weather("rain", "Rain");
        let tree = render(&state(&with_weather), &with_weather);
        assert_eq!(tree.find_by_id("weather").unwrap().children.len(), 2);
    }

    #[test]
    fn test_empty_tow_type_renders_empty_service_select() {
        let mut catalog = catalog();
        catalog.pricing = PricingTable::from_json(r#"{"bare": {}}"#).unwrap();
        let tree = render(&state(&catalog), &catalog);

        let select = tree.find_by_id("service_type-0").unwrap();
        assert!(select.children.is_empty());
    }
}
