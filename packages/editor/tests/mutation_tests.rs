//! Layout mutations checked against every node of a nested fixture

use serde_json::json;
use std::collections::HashSet;
use xb_editor::{
    ComponentModel, ComponentModels, ComponentNode, IdGenerator, LayoutModelPiece,
    LayoutModelState, LayoutMutation, MutationOutcome, RegionNode,
};
use xb_layout::{
    collect_component_uuids, collect_layout_uuids, find_component, find_path_by_uuid,
    validate_layout_model, ComponentCounter,
};

/// header: [logo]
/// content: [hero{body: [title, cta{inner: [icon]}]}, grid{left: [card], right: []}, footer-note]
fn fixture() -> LayoutModelState {
    let header = RegionNode::new("header", "Header").with_component(ComponentNode::new("logo", "sdc.image"));
    let content = RegionNode::new("content", "Content")
        .with_component(ComponentNode::new("hero", "sdc.hero").with_slot(
            "body",
            vec![
                ComponentNode::new("title", "sdc.heading"),
                ComponentNode::new("cta", "sdc.button")
                    .with_slot("inner", vec![ComponentNode::new("icon", "sdc.icon")]),
            ],
        ))
        .with_component(
            ComponentNode::new("grid", "sdc.grid")
                .with_slot("left", vec![ComponentNode::new("card", "sdc.card")])
                .with_slot("right", vec![]),
        )
        .with_component(ComponentNode::new("footer-note", "sdc.text"));

    let layout = vec![header, content];
    let model = collect_layout_uuids(&layout)
        .into_iter()
        .map(|uuid| {
            let resolved = json!({ "label": uuid.clone() }).as_object().cloned().unwrap();
            (uuid, ComponentModel::new(resolved))
        })
        .collect();

    LayoutModelState {
        layout,
        model,
        initialized: false,
    }
}

fn apply(state: &LayoutModelState, mutation: LayoutMutation, ids: &mut IdGenerator) -> LayoutModelState {
    match mutation.apply(state, ids).unwrap() {
        MutationOutcome::Changed { state, .. } => state,
        MutationOutcome::Unchanged => panic!("Expected {} to change the layout", mutation.name()),
    }
}

fn model_keys(model: &ComponentModels) -> HashSet<String> {
    model.keys().cloned().collect()
}

#[test]
fn test_delete_cascades_for_every_component() {
    let state = fixture();
    let mut ids = IdGenerator::sequential("unused");

    for uuid in collect_layout_uuids(&state.layout) {
        let removed = collect_component_uuids(find_component(&state.layout, &uuid).unwrap());
        let next = apply(&state, LayoutMutation::DeleteNode { uuid: uuid.clone() }, &mut ids);

        for gone in &removed {
            assert!(find_path_by_uuid(&next.layout, gone).is_none(), "{} still in tree", gone);
            assert!(!next.model.contains_key(gone), "{} still in model", gone);
        }
        assert_eq!(next.model.len(), state.model.len() - removed.len());
        assert!(validate_layout_model(&next.to_root()).is_empty());
    }
}

#[test]
fn test_duplicate_is_independent_for_every_component() {
    let state = fixture();

    for uuid in collect_layout_uuids(&state.layout) {
        let mut ids = IdGenerator::sequential("copy");
        let original = find_component(&state.layout, &uuid).unwrap();
        let original_ids: HashSet<_> = collect_component_uuids(original).into_iter().collect();

        let outcome = LayoutMutation::DuplicateNode { uuid: uuid.clone() }
            .apply(&state, &mut ids)
            .unwrap();
        let MutationOutcome::Changed { state: next, inserted } = outcome else {
            panic!("Duplicate of {} did nothing", uuid);
        };

        let copy_uuid = &inserted[0];
        let copy = find_component(&next.layout, copy_uuid).unwrap();
        let copy_ids: HashSet<_> = collect_component_uuids(copy).into_iter().collect();

        assert_ne!(copy_uuid, &uuid);
        assert!(copy_ids.is_disjoint(&original_ids));
        assert_eq!(ComponentCounter::count_component(copy), ComponentCounter::count_component(original));
        assert_eq!(next.model[copy_uuid], state.model[&uuid]);

        // Sibling right after the original
        let mut expected = find_path_by_uuid(&state.layout, &uuid).unwrap();
        *expected.last_mut().unwrap() += 1;
        assert_eq!(find_path_by_uuid(&next.layout, copy_uuid), Some(expected));
        assert!(validate_layout_model(&next.to_root()).is_empty());
    }
}

#[test]
fn test_move_keeps_single_occurrence() {
    let state = fixture();
    let mut ids = IdGenerator::sequential("unused");
    let destinations = ["header", "content", "hero/body", "cta/inner", "grid/left", "grid/right"];

    for uuid in ["logo", "title", "cta", "card", "footer-note"] {
        for target in destinations {
            let mut to = find_path_by_uuid(&state.layout, target).unwrap();
            to.push(0);
            let already_there = find_path_by_uuid(&state.layout, uuid) == Some(to.clone());

            let outcome = LayoutMutation::MoveNode {
                uuid: uuid.to_string(),
                to,
            }
            .apply(&state, &mut ids)
            .unwrap();

            let MutationOutcome::Changed { state: next, .. } = outcome else {
                // Moving cta into its own slot is refused, dropping in place does nothing
                assert!(already_there || (uuid, target) == ("cta", "cta/inner"), "{} → {}", uuid, target);
                continue;
            };
            assert!(!already_there, "{} → {}", uuid, target);

            let occurrences = collect_layout_uuids(&next.layout)
                .into_iter()
                .filter(|id| id == uuid)
                .count();
            assert_eq!(occurrences, 1, "{} → {}", uuid, target);

            let parent = find_path_by_uuid(&next.layout, target).unwrap();
            let mut expected = parent;
            expected.push(0);
            assert_eq!(find_path_by_uuid(&next.layout, uuid), Some(expected), "{} → {}", uuid, target);
            assert_eq!(model_keys(&next.model), model_keys(&state.model));
        }
    }
}

#[test]
fn test_insert_then_delete_restores_model_keys() {
    let state = fixture();
    let mut ids = IdGenerator::sequential("new");
    let piece = LayoutModelPiece::single(
        ComponentNode::new("tpl", "sdc.card")
            .with_slot("body", vec![ComponentNode::new("tpl-child", "sdc.text")]),
        [
            ("tpl".to_string(), ComponentModel::default()),
            ("tpl-child".to_string(), ComponentModel::default()),
        ]
        .into_iter()
        .collect(),
    );

    for target in ["header", "content", "hero/body", "grid/right"] {
        let mut to = find_path_by_uuid(&state.layout, target).unwrap();
        to.push(0);

        let outcome = LayoutMutation::InsertNodes {
            to,
            piece: piece.clone(),
            forced_uuid: None,
        }
        .apply(&state, &mut ids)
        .unwrap();
        let MutationOutcome::Changed { state: inserted, inserted: uuids } = outcome else {
            panic!("Insert into {} did nothing", target);
        };
        assert_eq!(inserted.model.len(), state.model.len() + 2);

        let removed = apply(
            &inserted,
            LayoutMutation::DeleteNode {
                uuid: uuids[0].clone(),
            },
            &mut ids,
        );
        assert_eq!(model_keys(&removed.model), model_keys(&state.model));
        assert_eq!(removed.layout, state.layout);
    }
}

#[test]
fn test_section_without_models_is_fully_modelled() {
    let state = fixture();
    let mut ids = IdGenerator::sequential("new");
    let section = LayoutModelPiece {
        layout: vec![
            ComponentNode::new("banner", "sdc.banner")
                .with_slot("body", vec![ComponentNode::new("banner-text", "sdc.text")]),
            ComponentNode::new("divider", "sdc.divider"),
        ],
        model: [("banner-text".to_string(), ComponentModel::default())]
            .into_iter()
            .collect(),
    };

    for target in ["header", "content", "hero/body", "cta/inner", "grid/right"] {
        let mut to = find_path_by_uuid(&state.layout, target).unwrap();
        to.push(1);

        let next = apply(
            &state,
            LayoutMutation::InsertNodes {
                to,
                piece: section.clone(),
                forced_uuid: None,
            },
            &mut ids,
        );

        assert!(validate_layout_model(&next.to_root()).is_empty(), "insert into {}", target);
        assert_eq!(next.model.len(), state.model.len() + 3);
    }
}

#[test]
fn test_moving_onto_own_position_is_unchanged() {
    let state = fixture();
    let mut ids = IdGenerator::sequential("unused");

    for uuid in collect_layout_uuids(&state.layout) {
        let path = find_path_by_uuid(&state.layout, &uuid).unwrap();
        let index = *path.last().unwrap();
        let mut after = path.clone();
        *after.last_mut().unwrap() += 1;

        for to in [path.clone(), after] {
            let outcome = LayoutMutation::MoveNode {
                uuid: uuid.clone(),
                to,
            }
            .apply(&state, &mut ids)
            .unwrap();
            assert_eq!(outcome, MutationOutcome::Unchanged, "move {}", uuid);
        }

        let outcome = LayoutMutation::SortNode {
            uuid: uuid.clone(),
            to: index,
        }
        .apply(&state, &mut ids)
        .unwrap();
        assert_eq!(outcome, MutationOutcome::Unchanged, "sort {}", uuid);
    }
}

#[test]
fn test_sort_and_shift_stay_in_parent() {
    let state = fixture();
    let mut ids = IdGenerator::sequential("unused");

    let sorted = apply(
        &state,
        LayoutMutation::SortNode {
            uuid: "hero".to_string(),
            to: 2,
        },
        &mut ids,
    );
    let order: Vec<_> = sorted.layout[1].components.iter().map(|c| c.uuid.as_str()).collect();
    assert_eq!(order, vec!["grid", "footer-note", "hero"]);

    let shifted = apply(
        &state,
        LayoutMutation::ShiftNode {
            uuid: "cta".to_string(),
            direction: xb_editor::Direction::Up,
        },
        &mut ids,
    );
    assert_eq!(find_path_by_uuid(&shifted.layout, "cta"), Some(vec![1, 0, 0, 0]));
    assert_eq!(find_path_by_uuid(&shifted.layout, "title"), Some(vec![1, 0, 0, 1]));

    let unchanged = LayoutMutation::ShiftNode {
        uuid: "logo".to_string(),
        direction: xb_editor::Direction::Down,
    }
    .apply(&state, &mut ids)
    .unwrap();
    assert_eq!(unchanged, MutationOutcome::Unchanged);
}

#[test]
fn test_earlier_snapshots_are_untouched() {
    let state = fixture();
    let before = state.clone();
    let mut ids = IdGenerator::sequential("new");

    let mut current = state.clone();
    for mutation in [
        LayoutMutation::DeleteNode { uuid: "icon".to_string() },
        LayoutMutation::DuplicateNode { uuid: "grid".to_string() },
        LayoutMutation::MoveNode {
            uuid: "card".to_string(),
            to: vec![0, 0],
        },
    ] {
        current = apply(&current, mutation, &mut ids);
    }

    assert_eq!(state, before);
    assert_ne!(current.layout, state.layout);
}
