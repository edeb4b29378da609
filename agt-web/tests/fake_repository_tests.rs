//! Handler tests against recording fake repositories
//!
//! The fakes log every call so tests can assert which repository methods a
//! handler used, and can simulate a record disappearing between the read
//! and the write.

use std::sync::{Arc, Mutex};

use agt_common::{
    Brand, Equipment, EquipmentRepository, EquipmentType, Error, NewBrand, NewEquipment, Price,
    Repository, Result,
};
use agt_web::{build_router, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::util::ServiceExt; // for `oneshot` method

/// How writes behave
#[derive(Debug, Clone, Copy, PartialEq)]
enum WriteMode {
    Normal,
    /// The record is removed by "someone else" and the write affects nothing
    Vanish,
    /// The write affects nothing but the record is still there
    Conflict,
}

struct FakeBrands {
    brands: Vec<Brand>,
}

#[async_trait]
impl Repository<Brand> for FakeBrands {
    async fn get_all(&self) -> Result<Vec<Brand>> {
        Ok(self.brands.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Brand>> {
        Ok(self.brands.iter().find(|b| b.id == id).cloned())
    }

    async fn add(&self, brand: NewBrand) -> Result<Brand> {
        Ok(Brand {
            id: 100,
            name: brand.name,
            country: brand.country,
        })
    }

    async fn update(&self, _brand: &Brand) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _brand: &Brand) -> Result<()> {
        Ok(())
    }
}

struct FakeEquipment {
    items: Mutex<Vec<Equipment>>,
    calls: Mutex<Vec<String>>,
    mode: WriteMode,
}

impl FakeEquipment {
    fn new(items: Vec<Equipment>, mode: WriteMode) -> Self {
        Self {
            items: Mutex::new(items),
            calls: Mutex::new(Vec::new()),
            mode,
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn write(&self, id: i64) -> Result<()> {
        match self.mode {
            WriteMode::Normal => Ok(()),
            WriteMode::Vanish => {
                self.items.lock().unwrap().retain(|e| e.id != id);
                Err(Error::Concurrency(format!("equipment {} changed", id)))
            }
            WriteMode::Conflict => Err(Error::Concurrency(format!("equipment {} changed", id))),
        }
    }
}

#[async_trait]
impl Repository<Equipment> for FakeEquipment {
    async fn get_all(&self) -> Result<Vec<Equipment>> {
        self.record("get_all");
        Ok(self.items.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Equipment>> {
        self.record(format!("get_by_id({})", id));
        Ok(self.items.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn add(&self, equipment: NewEquipment) -> Result<Equipment> {
        self.record("add");
        Ok(equipment.into_equipment(100))
    }

    async fn update(&self, equipment: &Equipment) -> Result<()> {
        self.record(format!("update({})", equipment.id));
        self.write(equipment.id)
    }

    async fn delete(&self, equipment: &Equipment) -> Result<()> {
        self.record(format!("delete({})", equipment.id));
        self.write(equipment.id)
    }
}

#[async_trait]
impl EquipmentRepository for FakeEquipment {
    async fn get_all_with_brand(&self) -> Result<Vec<Equipment>> {
        self.record("get_all_with_brand");
        Ok(self.items.lock().unwrap().clone())
    }

    async fn search(&self, term: &str) -> Result<Vec<Equipment>> {
        self.record(format!("search({})", term));
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|e| agt_common::search::matches(e, term))
            .cloned()
            .collect())
    }

    async fn list_by_brand(&self, brand_id: i64) -> Result<Vec<Equipment>> {
        self.record(format!("list_by_brand({})", brand_id));
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.brand_id == brand_id)
            .cloned()
            .collect())
    }
}

fn focal() -> Brand {
    Brand {
        id: 1,
        name: "Focal".to_string(),
        country: "France".to_string(),
    }
}

fn item(id: i64, model: &str) -> Equipment {
    Equipment {
        id,
        model_name: model.to_string(),
        kind: EquipmentType::Headphone,
        price: Price::from_units(1000).unwrap(),
        purchase_date: None,
        review_score: 9.0,
        notes: None,
        brand_id: 1,
        brand: Some(focal()),
    }
}

fn setup(mode: WriteMode) -> (axum::Router, Arc<FakeEquipment>) {
    let equipment = Arc::new(FakeEquipment::new(
        vec![item(1, "Utopia"), item(2, "Clear MG")],
        mode,
    ));
    let brands = Arc::new(FakeBrands {
        brands: vec![focal()],
    });
    let state = AppState::new(brands, equipment.clone());
    (build_router(state), equipment)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const EDIT_BODY: &str =
    "Id=1&ModelName=Utopia&Type=0&Price=1000&PurchaseDate=&ReviewScore=9&Notes=&BrandId=1";

#[tokio::test]
async fn test_index_without_search_uses_full_list() {
    let (app, fake) = setup(WriteMode::Normal);

    let response = app.oneshot(get("/Equipments")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = fake.calls();
    assert_eq!(calls, vec!["get_all_with_brand"]);
}

#[tokio::test]
async fn test_index_with_search_calls_search_once() {
    let (app, fake) = setup(WriteMode::Normal);

    let response = app
        .oneshot(get("/Equipments?searchString=Utopia"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = fake.calls();
    assert_eq!(calls, vec!["search(Utopia)"]);
}

#[tokio::test]
async fn test_search_json_blank_term_skips_repository() {
    let (app, fake) = setup(WriteMode::Normal);

    let response = app
        .oneshot(get("/Equipments/SearchJson?term=%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_edit_of_vanished_equipment_is_not_found() {
    let (app, fake) = setup(WriteMode::Vanish);

    let response = app
        .oneshot(post_form("/Equipments/Edit/1", EDIT_BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(fake.calls().contains(&"update(1)".to_string()));
}

#[tokio::test]
async fn test_edit_conflict_on_existing_equipment_is_server_error() {
    let (app, _) = setup(WriteMode::Conflict);

    let response = app
        .oneshot(post_form("/Equipments/Edit/1", EDIT_BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_delete_of_vanished_equipment_is_not_found() {
    let (app, fake) = setup(WriteMode::Vanish);

    let response = app
        .oneshot(post_form("/Equipments/Delete/2", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(fake.calls().contains(&"delete(2)".to_string()));
}

#[tokio::test]
async fn test_successful_edit_redirects() {
    let (app, fake) = setup(WriteMode::Normal);

    let response = app
        .oneshot(post_form("/Equipments/Edit/1", EDIT_BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(fake.calls(), vec!["update(1)"]);
}
