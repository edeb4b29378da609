//! Brand pages: list, details, create, edit, delete

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::warn;

use agt_common::{Brand, EquipmentRepository, Repository};

use crate::error::{parse_id, WebError, WebResult};
use crate::forms::{BrandForm, ValidationErrors};
use crate::views::{self, FormMode};
use crate::AppState;

const INDEX: &str = "/Brands";

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(rename = "searchString")]
    pub search_string: Option<String>,
}

async fn load(state: &AppState, raw_id: &str) -> WebResult<Brand> {
    let id = parse_id(raw_id)?;
    state
        .brands
        .get_by_id(id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("Brand {} does not exist", id)))
}

/// GET /Brands?searchString=
///
/// Optional case-insensitive filter on name or country.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> WebResult<Html<String>> {
    let brands = state.brands.get_all().await?;

    let search = query
        .search_string
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let brands: Vec<Brand> = match search {
        Some(term) => {
            let term = term.to_lowercase();
            brands
                .into_iter()
                .filter(|b| {
                    b.name.to_lowercase().contains(&term) || b.country.to_lowercase().contains(&term)
                })
                .collect()
        }
        None => brands,
    };

    Ok(views::brands::index(&brands, search))
}

/// GET /Brands/Details/:id
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let brand = load(&state, &id).await?;
    let equipment = state.equipment.list_by_brand(brand.id).await?;
    Ok(views::brands::details(&brand, &equipment))
}

/// GET /Brands/Create
pub async fn create_form() -> Html<String> {
    views::brands::form(FormMode::Create, &BrandForm::default(), &ValidationErrors::default())
}

/// POST /Brands/Create
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BrandForm>,
) -> WebResult<Response> {
    let new_brand = match form.validate() {
        Ok(new_brand) => new_brand,
        Err(errors) => {
            return Ok(views::brands::form(FormMode::Create, &form, &errors).into_response())
        }
    };

    state.brands.add(new_brand).await?;
    Ok(Redirect::to(INDEX).into_response())
}

/// GET /Brands/Edit/:id
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let brand = load(&state, &id).await?;
    Ok(views::brands::form(
        FormMode::Edit(brand.id),
        &BrandForm::from(&brand),
        &ValidationErrors::default(),
    ))
}

/// POST /Brands/Edit/:id
///
/// The posted `Id` must match the route. If the brand vanished while the
/// form was open the answer is 404; any other conflict is a server error.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BrandForm>,
) -> WebResult<Response> {
    let id = parse_id(&id)?;
    if form.form_id() != Some(id) {
        return Err(WebError::NotFound(format!("Brand id mismatch for {}", id)));
    }

    let new_brand = match form.validate() {
        Ok(new_brand) => new_brand,
        Err(errors) => {
            return Ok(views::brands::form(FormMode::Edit(id), &form, &errors).into_response())
        }
    };

    let brand = Brand {
        id,
        name: new_brand.name,
        country: new_brand.country,
    };

    if let Err(err) = state.brands.update(&brand).await {
        if err.is_concurrency() && !state.brands.exists(id).await? {
            warn!("Brand {} was deleted during edit", id);
            return Err(WebError::NotFound(format!("Brand {} does not exist", id)));
        }
        return Err(err.into());
    }

    Ok(Redirect::to(INDEX).into_response())
}

/// GET /Brands/Delete/:id
pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let brand = load(&state, &id).await?;
    let owned = state.equipment.list_by_brand(brand.id).await?;
    Ok(views::brands::delete_confirm(&brand, owned.len()))
}

/// POST /Brands/Delete/:id
///
/// Removes the brand and, through the cascade, its equipment. Deleting a
/// brand that is already gone just returns to the list.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Redirect> {
    let id = parse_id(&id)?;

    if let Some(brand) = state.brands.get_by_id(id).await? {
        if let Err(err) = state.brands.delete(&brand).await {
            if err.is_concurrency() && !state.brands.exists(id).await? {
                warn!("Brand {} was deleted concurrently", id);
                return Err(WebError::NotFound(format!("Brand {} does not exist", id)));
            }
            return Err(err.into());
        }
    }

    Ok(Redirect::to(INDEX))
}
