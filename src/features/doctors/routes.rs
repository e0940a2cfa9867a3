use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::doctors::handlers;
use crate::features::doctors::services::DoctorService;

/// Create routes for the doctors feature
pub fn routes(service: Arc<DoctorService>) -> Router {
    Router::new()
        .route(
            "/api/doctors",
            get(handlers::list_doctors).post(handlers::create_doctor),
        )
        .route(
            "/api/doctors/",
            get(handlers::list_doctors).post(handlers::create_doctor),
        )
        .route("/api/doctors/{id}", get(handlers::get_doctor))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_server, unconnected_pool};
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn server() -> axum_test::TestServer {
        test_server(routes(Arc::new(DoctorService::new(unconnected_pool()))))
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_price() {
        let response = server()
            .post("/api/doctors/")
            .json(&json!({
                "area_id": Uuid::new_v4(),
                "price": 100001,
                "name": "Dr. X"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("price"));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let response = server()
            .post("/api/doctors/")
            .json(&json!({ "price": 100 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON data"));
    }

    #[tokio::test]
    async fn test_unsupported_language_is_rejected() {
        let response = server()
            .get(&format!("/api/doctors/{}", Uuid::new_v4()))
            .add_header(
                HeaderName::from_static("x-language-code"),
                HeaderValue::from_static("de_DE"),
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_rejects_malformed_query() {
        let response = server().get("/api/doctors/?area_id=nope").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid query"));

        let response = server()
            .get(&format!("/api/doctors/?category_ids={}&category_ids=nope", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server().get("/api/doctors/?price_min=-5").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

/// Round trips against PostgreSQL at `DATABASE_URL`
#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::features::areas::models::Area;
    use crate::features::categories::models::Category;
    use crate::features::doctors::dtos::DoctorResponseDto;
    use crate::features::doctors::models::{Doctor, DoctorUpdate, NewDoctor, WorkingHours};
    use crate::features::doctors::repositories::DoctorRepository;
    use crate::modules::persistence::{Commit, DbError, Fields, Repository};
    use crate::shared::language::Language;
    use crate::shared::test_helpers::test_server;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use fake::{faker::name::en::Name, Fake};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use sqlx::PgPool;
    use uuid::Uuid;

    struct Seed {
        area: Uuid,
        category: Uuid,
    }

    async fn seed(pool: &PgPool) -> Seed {
        let mut conn = pool.acquire().await.unwrap();

        let area: Area =
            Repository::create(&mut conn, Fields::new().set("name", "A1"), Language::English)
                .await
                .unwrap();
        Repository::<Area>::translate(
            &mut conn,
            area.id,
            Fields::new().set("name", "A1-zh"),
            Language::Chinese,
            Commit::Immediately,
        )
        .await
        .unwrap();

        let category: Category =
            Repository::create(&mut conn, Fields::new().set("name", "C1"), Language::English)
                .await
                .unwrap();
        Repository::<Category>::translate(
            &mut conn,
            category.id,
            Fields::new().set("name", "C1-zh"),
            Language::Chinese,
            Commit::Immediately,
        )
        .await
        .unwrap();

        Seed {
            area: area.id,
            category: category.id,
        }
    }

    fn server(pool: PgPool) -> axum_test::TestServer {
        test_server(routes(Arc::new(DoctorService::new(pool))))
    }

    fn chinese() -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-language-code"),
            HeaderValue::from_static("zh_CN"),
        )
    }

    fn new_doctor(seed: &Seed, price: i64) -> NewDoctor {
        NewDoctor {
            area_id: seed.area,
            category_ids: vec![seed.category],
            price: Decimal::from(price),
            phone_number: Some("23456789".to_string()),
            name: Name().fake(),
            working_hours: WorkingHours::default(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_then_get_round_trip(pool: PgPool) {
        let seed = seed(&pool).await;
        let server = server(pool);

        let response = server
            .post("/api/doctors/")
            .json(&json!({
                "area_id": seed.area,
                "category_ids": [seed.category],
                "price": 100,
                "name": "Dr. X"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: DoctorResponseDto = response.json();
        assert_eq!(created.name, "Dr. X");
        assert_eq!(created.category_ids, vec![seed.category]);
        assert_eq!(created.working_hours, WorkingHours::default());

        let fetched: DoctorResponseDto = server
            .get(&format!("/api/doctors/{}", created.id))
            .await
            .json();
        assert_eq!(fetched.name, "Dr. X");
        assert_eq!(fetched.price, Decimal::from(100));
        assert_eq!(fetched.category_ids, vec![seed.category]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_doctor_is_invisible_in_other_language(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let doctor = DoctorRepository::create(&mut conn, new_doctor(&seed, 100), Language::English)
            .await
            .unwrap();

        let translated = Repository::<Doctor>::get(&mut conn, doctor.id, Some(Language::Chinese))
            .await
            .unwrap();
        assert!(translated.is_none());

        let bare = Repository::<Doctor>::get(&mut conn, doctor.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bare.name, None);
        drop(conn);

        let (name, value) = chinese();
        let response = server(pool)
            .get(&format!("/api/doctors/{}", doctor.id))
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(
            body["detail"],
            format!("Doctor is not found {}", doctor.id)
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_second_translation_in_same_language_is_unique_violation(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let doctor = DoctorRepository::create(&mut conn, new_doctor(&seed, 100), Language::English)
            .await
            .unwrap();

        let err = Repository::<Doctor>::translate(
            &mut conn,
            doctor.id,
            Fields::new().set("name", "Dr. Y"),
            Language::English,
            Commit::Immediately,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueConstraintViolation { entity: "DoctorTranslation", ref field }
                if field == "doctor_id, language_code"
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_added_translation_is_served_in_its_language(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let doctor = DoctorRepository::create(&mut conn, new_doctor(&seed, 100), Language::English)
            .await
            .unwrap();
        Repository::<Doctor>::translate(
            &mut conn,
            doctor.id,
            Fields::new().set("name", "陳醫生"),
            Language::Chinese,
            Commit::Immediately,
        )
        .await
        .unwrap();
        drop(conn);

        let (name, value) = chinese();
        let fetched: DoctorResponseDto = server(pool)
            .get(&format!("/api/doctors/{}", doctor.id))
            .add_header(name, value)
            .await
            .json();
        assert_eq!(fetched.name, "陳醫生");
        assert_eq!(fetched.category_ids, vec![seed.category]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_failed_create_leaves_nothing_behind(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut doctor = new_doctor(&seed, 100);
        doctor.category_ids.push(Uuid::new_v4());

        let err = DoctorRepository::create(&mut conn, doctor, Language::English)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::ForeignKeyViolation { entity: "DoctorCategory", .. }
        ));

        let doctors = Repository::<Doctor>::all(&mut conn).await.unwrap();
        assert!(doctors.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_price_bounds_are_normalized(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let cheap = DoctorRepository::create(&mut conn, new_doctor(&seed, 100), Language::English)
            .await
            .unwrap();
        DoctorRepository::create(&mut conn, new_doctor(&seed, 5000), Language::English)
            .await
            .unwrap();
        drop(conn);

        let server = server(pool);
        let swapped: Value = server
            .get("/api/doctors/?price_min=2500&price_max=0")
            .await
            .json();
        let ordered: Value = server
            .get("/api/doctors/?price_min=0&price_max=2500")
            .await
            .json();

        assert_eq!(swapped, ordered);
        let items = swapped["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!(cheap.id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_filters_by_category_and_area(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let linked = DoctorRepository::create(&mut conn, new_doctor(&seed, 100), Language::English)
            .await
            .unwrap();
        let mut unlinked = new_doctor(&seed, 200);
        unlinked.category_ids.clear();
        DoctorRepository::create(&mut conn, unlinked, Language::English)
            .await
            .unwrap();
        drop(conn);

        let server = server(pool);
        let by_category: Value = server
            .get(&format!("/api/doctors/?category_ids={}", seed.category))
            .await
            .json();
        let items = by_category["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!(linked.id));

        let by_area: Value = server
            .get(&format!("/api/doctors/?area_id={}", seed.area))
            .await
            .json();
        assert_eq!(by_area["items"].as_array().unwrap().len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_ids_are_not_found(pool: PgPool) {
        let seed = seed(&pool).await;
        let server = server(pool);

        let missing = Uuid::new_v4();
        let response = server.get(&format!("/api/doctors/{}", missing)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post("/api/doctors/")
            .json(&json!({
                "area_id": missing,
                "category_ids": [seed.category],
                "price": 100,
                "name": "Dr. X"
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["detail"], format!("Area is not found {}", missing));

        let response = server
            .post("/api/doctors/")
            .json(&json!({
                "area_id": seed.area,
                "category_ids": [missing],
                "price": 100,
                "name": "Dr. X"
            }))
            .await;
        let body: Value = response.json();
        assert_eq!(body["detail"], format!("Category is not found {}", missing));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_refreshes_updated_at_only(pool: PgPool) {
        let seed = seed(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let created = DoctorRepository::create(&mut conn, new_doctor(&seed, 100), Language::English)
            .await
            .unwrap();

        let updated = DoctorRepository::update(
            &mut conn,
            created.id,
            DoctorUpdate {
                price: Some(Decimal::from(300)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.price, Decimal::from(300));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }
}
