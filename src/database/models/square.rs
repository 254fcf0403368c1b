use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::input::SquareInput;

/// A persisted square, as stored and as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Square {
    pub id: i64,
    pub title: Option<String>,
    pub plane: Option<String>,
    pub purpose: Option<String>,
    pub delineator: Option<String>,
    pub notations: Option<String>,
    pub details: Option<String>,
    #[serde(rename = "extraData")]
    #[sqlx(rename = "extraData")]
    pub extra_data: Option<String>,
    pub class: Option<String>,
    pub parent: Option<String>,
    pub depth: Option<i32>,
    pub name: Option<String>,
    pub size: Option<i32>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub parent_id: Option<i64>,
}

impl Square {
    /// The record a backend stores for `input` under `id`. Full overwrite:
    /// fields absent from the input become `None`.
    pub fn from_input(id: i64, input: &SquareInput) -> Self {
        let input = input.clone();
        Self {
            id,
            title: input.title,
            plane: input.plane,
            purpose: input.purpose,
            delineator: input.delineator,
            notations: input.notations,
            details: input.details,
            extra_data: input.extra_data,
            class: input.class,
            parent: input.parent,
            depth: input.depth,
            name: input.name,
            size: input.size,
            color: input.color,
            kind: input.kind,
            parent_id: input.parent_id,
        }
    }
}
