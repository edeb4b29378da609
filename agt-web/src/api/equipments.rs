//! Equipment pages and the quick-search JSON endpoint

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

use agt_common::search::{self, SearchSuggestion};
use agt_common::{Equipment, EquipmentRepository, NewEquipment, Repository};

use crate::error::{parse_id, WebError, WebResult};
use crate::forms::{EquipmentForm, ValidationErrors};
use crate::views::{self, FormMode};
use crate::AppState;

const INDEX: &str = "/Equipments";

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(rename = "searchString")]
    pub search_string: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchJsonQuery {
    pub term: Option<String>,
}

async fn load(state: &AppState, raw_id: &str) -> WebResult<Equipment> {
    let id = parse_id(raw_id)?;
    state
        .equipment
        .get_by_id(id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("Equipment {} does not exist", id)))
}

/// Field checks plus "the chosen brand exists"
async fn validate(state: &AppState, form: &EquipmentForm) -> WebResult<Result<NewEquipment, ValidationErrors>> {
    let new_equipment = match form.validate() {
        Ok(new_equipment) => new_equipment,
        Err(errors) => return Ok(Err(errors)),
    };

    if !state.brands.exists(new_equipment.brand_id).await? {
        let mut errors = ValidationErrors::default();
        errors.add("BrandId", "The selected brand does not exist.");
        return Ok(Err(errors));
    }

    Ok(Ok(new_equipment))
}

async fn render_form(
    state: &AppState,
    mode: FormMode,
    form: &EquipmentForm,
    errors: &ValidationErrors,
) -> WebResult<Html<String>> {
    let brands = state.brands.get_all().await?;
    Ok(views::equipments::form(mode, form, errors, &brands))
}

/// GET /Equipments?searchString=
///
/// With a search string the list is the repository search ordered by
/// relevance; without one it is the full brand-joined list.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> WebResult<Html<String>> {
    let search_string = query.search_string.as_deref().filter(|s| !s.is_empty());

    let items: Vec<Equipment> = match search_string {
        Some(term) => {
            let hits = state.equipment.search(term).await?;
            search::rank(&hits, term).into_iter().cloned().collect()
        }
        None => state.equipment.get_all_with_brand().await?,
    };

    Ok(views::equipments::index(&items, search_string))
}

/// GET /Equipments/SearchJson?term=
///
/// Up to eight ranked `{id, title, subtitle, url}` objects; a blank term
/// answers an empty array without touching the store.
pub async fn search_json(
    State(state): State<AppState>,
    Query(query): Query<SearchJsonQuery>,
) -> WebResult<Json<Vec<SearchSuggestion>>> {
    let term = query.term.unwrap_or_default();
    if term.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let hits = state.equipment.search(&term).await?;
    let suggestions = search::suggest(&hits, &term);
    debug!("Quick search '{}': {} suggestions", term, suggestions.len());
    Ok(Json(suggestions))
}

/// GET /Equipments/Details/:id
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let equipment = load(&state, &id).await?;
    Ok(views::equipments::details(&equipment))
}

/// GET /Equipments/Create
pub async fn create_form(State(state): State<AppState>) -> WebResult<Html<String>> {
    render_form(
        &state,
        FormMode::Create,
        &EquipmentForm::default(),
        &ValidationErrors::default(),
    )
    .await
}

/// POST /Equipments/Create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<EquipmentForm>,
) -> WebResult<Response> {
    let new_equipment = match validate(&state, &form).await? {
        Ok(new_equipment) => new_equipment,
        Err(errors) => {
            return Ok(render_form(&state, FormMode::Create, &form, &errors)
                .await?
                .into_response())
        }
    };

    state.equipment.add(new_equipment).await?;
    Ok(Redirect::to(INDEX).into_response())
}

/// GET /Equipments/Edit/:id
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let equipment = load(&state, &id).await?;
    render_form(
        &state,
        FormMode::Edit(equipment.id),
        &EquipmentForm::from(&equipment),
        &ValidationErrors::default(),
    )
    .await
}

/// POST /Equipments/Edit/:id
///
/// The posted `Id` must match the route. If the item vanished while the
/// form was open the answer is 404; any other conflict is a server error.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<EquipmentForm>,
) -> WebResult<Response> {
    let id = parse_id(&id)?;
    if form.form_id() != Some(id) {
        return Err(WebError::NotFound(format!("Equipment id mismatch for {}", id)));
    }

    let equipment = match validate(&state, &form).await? {
        Ok(new_equipment) => new_equipment.into_equipment(id),
        Err(errors) => {
            return Ok(render_form(&state, FormMode::Edit(id), &form, &errors)
                .await?
                .into_response())
        }
    };

    if let Err(err) = state.equipment.update(&equipment).await {
        if err.is_concurrency() && !state.equipment.exists(id).await? {
            warn!("Equipment {} was deleted during edit", id);
            return Err(WebError::NotFound(format!("Equipment {} does not exist", id)));
        }
        return Err(err.into());
    }

    Ok(Redirect::to(INDEX).into_response())
}

/// GET /Equipments/Delete/:id
pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let equipment = load(&state, &id).await?;
    Ok(views::equipments::delete_confirm(&equipment))
}

/// POST /Equipments/Delete/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Redirect> {
    let id = parse_id(&id)?;

    if let Some(equipment) = state.equipment.get_by_id(id).await? {
        if let Err(err) = state.equipment.delete(&equipment).await {
            if err.is_concurrency() && !state.equipment.exists(id).await? {
                warn!("Equipment {} was deleted concurrently", id);
                return Err(WebError::NotFound(format!("Equipment {} does not exist", id)));
            }
            return Err(err.into());
        }
    }

    Ok(Redirect::to(INDEX))
}
