//! Relationship resolution across every list of a schema.
//!
//! Runs once, after all fields have been constructed and before any list is
//! compiled. Only the set of lists and field paths is needed here, so one
//! pass over the draft storage shapes is enough regardless of how lists
//! refer to each other.

use crate::error::SchemaError;
use crate::log_relationships_debug;
use crate::schema::types::{DBField, RelationMode, ResolvedDBField, ResolvedRelationDBField};
use std::collections::BTreeMap;

/// List key to field path to the storage shape a field declared.
pub type DraftLists = BTreeMap<String, BTreeMap<String, DBField>>;

/// List key to field path to the completed storage shape.
///
/// Target lists of one-sided relations also carry the synthesized
/// back-reference fields.
pub type ResolvedLists = BTreeMap<String, BTreeMap<String, ResolvedDBField>>;

/// Name of the field synthesized on the target of a one-sided relation.
#[must_use]
pub fn back_reference_name(list_key: &str, field_path: &str) -> String {
    format!("from_{list_key}_{field_path}")
}

pub fn resolve_relationships(drafts: &DraftLists) -> Result<ResolvedLists, SchemaError> {
    let mut resolved: ResolvedLists = drafts
        .keys()
        .map(|list_key| (list_key.clone(), BTreeMap::new()))
        .collect();

    for (list_key, fields) in drafts {
        for (field_path, db_field) in fields {
            let completed = match db_field {
                DBField::Scalar(scalar) => ResolvedDBField::Scalar(scalar.clone()),
                DBField::Multi(multi) => ResolvedDBField::Multi(multi.clone()),
                DBField::None => ResolvedDBField::None,
                DBField::Relation(relation) => {
                    let target_fields = drafts.get(&relation.list).ok_or_else(|| {
                        SchemaError::RelationListNotFound {
                            list_key: list_key.clone(),
                            field_path: field_path.clone(),
                            target_list: relation.list.clone(),
                        }
                    })?;

                    let foreign_field = match &relation.field {
                        Some(target_field) => {
                            check_counterpart(
                                list_key,
                                field_path,
                                &relation.list,
                                target_field,
                                target_fields,
                            )?;
                            target_field.clone()
                        }
                        None => {
                            let back_reference = back_reference_name(list_key, field_path);
                            let target_resolved =
                                resolved.entry(relation.list.clone()).or_default();
                            if target_fields.contains_key(&back_reference)
                                || target_resolved.contains_key(&back_reference)
                            {
                                return Err(SchemaError::BackReferenceConflict {
                                    list_key: list_key.clone(),
                                    field_path: field_path.clone(),
                                    target_list: relation.list.clone(),
                                    back_reference,
                                });
                            }
                            log_relationships_debug!(
                                "Synthesizing {}.{} for one-sided relation {}.{}",
                                relation.list,
                                back_reference,
                                list_key,
                                field_path
                            );
                            target_resolved.insert(
                                back_reference.clone(),
                                ResolvedDBField::Relation(ResolvedRelationDBField {
                                    list: list_key.clone(),
                                    field: field_path.clone(),
                                    mode: RelationMode::Many,
                                }),
                            );
                            back_reference
                        }
                    };

                    log_relationships_debug!(
                        "Resolved {}.{} -> {}.{} ({:?})",
                        list_key,
                        field_path,
                        relation.list,
                        foreign_field,
                        relation.mode
                    );
                    ResolvedDBField::Relation(ResolvedRelationDBField {
                        list: relation.list.clone(),
                        field: foreign_field,
                        mode: relation.mode,
                    })
                }
            };

            resolved
                .entry(list_key.clone())
                .or_default()
                .insert(field_path.clone(), completed);
        }
    }

    Ok(resolved)
}

fn check_counterpart(
    list_key: &str,
    field_path: &str,
    target_list: &str,
    target_field: &str,
    target_fields: &BTreeMap<String, DBField>,
) -> Result<(), SchemaError> {
    let counterpart = target_fields
        .get(target_field)
        .ok_or_else(|| SchemaError::RelationFieldNotFound {
            list_key: list_key.to_string(),
            field_path: field_path.to_string(),
            target_list: target_list.to_string(),
            target_field: target_field.to_string(),
        })?;

    let points_back = matches!(
        counterpart,
        DBField::Relation(back) if back.list == list_key && back.field.as_deref() == Some(field_path)
    );
    if points_back {
        Ok(())
    } else {
        Err(SchemaError::RelationFieldMismatch {
            list_key: list_key.to_string(),
            field_path: field_path.to_string(),
            target_list: target_list.to_string(),
            target_field: target_field.to_string(),
        })
    }
}
