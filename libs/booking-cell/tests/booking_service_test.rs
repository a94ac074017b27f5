use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{AppointmentDraft, AppointmentPatch, BookingError, ServiceKind};
use booking_cell::services::booking::BookingService;
use shared_utils::session::Session;
use shared_utils::test_utils::{JwtTestUtils, MockBackendResponses, TestConfig, TestUser};

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn service_for(mock_server: &MockServer) -> BookingService {
    let config = TestConfig::with_backend_url(&mock_server.uri());
    let user = TestUser::customer("cliente@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));
    let session = Session::new(token, user.to_user());

    BookingService::new(&config.to_app_config(), Some(session))
}

#[tokio::test]
async fn availability_subtracts_booked_slots_in_day_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booking("1", "Ana", "corte", "2024-06-10", "09:00"),
            MockBackendResponses::booking("2", "Bia", "corte", "2024-06-10", "14:00"),
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let slots = service
        .availability(test_date(), ServiceKind::Corte, None)
        .await
        .unwrap();

    assert_eq!(
        slots,
        vec![
            "10:00", "11:00", "12:00", "13:00", "15:00", "16:00", "17:00", "18:00", "19:00",
            "20:00"
        ]
    );
}

#[tokio::test]
async fn enveloped_day_listing_is_understood() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::success_envelope(json!([
                MockBackendResponses::booking("1", "Ana", "corte", "2024-06-10", "09:00"),
            ])),
        ))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let slots = service
        .availability(test_date(), ServiceKind::Corte, None)
        .await
        .unwrap();

    assert_eq!(slots.len(), 11);
    assert!(!slots.contains(&"09:00".to_string()));
}

#[tokio::test]
async fn enveloped_conflict_maps_to_slot_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::success_envelope(json!([]))),
        )
        .mount(&mock_server)
        .await;

    // A 2xx body can still refuse the write through the envelope.
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::failure_envelope("Horário indisponível")),
        )
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Corte,
            date: test_date(),
            time: "10:00".to_string(),
        })
        .await;

    assert_matches!(result, Err(BookingError::SlotUnavailable));
}

#[tokio::test]
async fn enveloped_create_returns_the_appointment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::success_envelope(json!([]))),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockBackendResponses::success_envelope(MockBackendResponses::booking(
                "31", "Carlos", "corte", "2024-06-10", "10:00",
            )),
        ))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let appointment = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Corte,
            date: test_date(),
            time: "10:00".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(appointment.id, "31");
    assert_eq!(appointment.time, "10:00");
}

#[tokio::test]
async fn legacy_records_count_toward_occupancy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::legacy_booking("abc", "Ana", "corte", "2024-06-10", "09:00"),
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let slots = service
        .availability(test_date(), ServiceKind::Corte, None)
        .await
        .unwrap();

    assert!(!slots.contains(&"09:00".to_string()));
    assert_eq!(slots.len(), 11);
}

#[tokio::test]
async fn booking_a_taken_slot_never_reaches_the_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booking("1", "Ana", "corte", "2024-06-10", "09:00"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Corte,
            date: test_date(),
            time: "09:00".to_string(),
        })
        .await;

    assert_matches!(result, Err(BookingError::SlotUnavailable));
}

#[tokio::test]
async fn backend_conflict_rejection_surfaces_as_slot_unavailable() {
    let mock_server = MockServer::start().await;

    // The local pre-check sees a free day; the backend wins the race.
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Horário já agendado"})),
        )
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Barba,
            date: test_date(),
            time: "10:00".to_string(),
        })
        .await;

    assert_matches!(result, Err(BookingError::SlotUnavailable));
}

#[tokio::test]
async fn backend_failure_is_not_mistaken_for_a_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "database exploded"})),
        )
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let result = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Barba,
            date: test_date(),
            time: "10:00".to_string(),
        })
        .await;

    assert_matches!(result, Err(BookingError::Server(_)));
}

#[tokio::test]
async fn missing_session_fails_before_any_network_io() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_backend_url(&mock_server.uri()).to_app_config();
    let service = BookingService::new(&config, None);

    let result = service
        .availability(test_date(), ServiceKind::Corte, None)
        .await;
    assert_matches!(result, Err(BookingError::NotAuthenticated));

    let result = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Corte,
            date: test_date(),
            time: "09:00".to_string(),
        })
        .await;
    assert_matches!(result, Err(BookingError::NotAuthenticated));
}

#[tokio::test]
async fn off_grid_time_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    let service = service_for(&mock_server);
    let result = service
        .create(AppointmentDraft {
            customer_name: "Carlos".to_string(),
            customer_phone: "11 98888-0000".to_string(),
            service: ServiceKind::Corte,
            date: test_date(),
            time: "09:30".to_string(),
        })
        .await;

    assert_matches!(result, Err(BookingError::Validation(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rescheduling_may_keep_its_own_slot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booking("55", "Ana", "corte", "2024-06-10", "10:00"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::booking("55", "Ana", "corte", "2024-06-10", "10:00"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/appointments/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::booking("55", "Ana Maria", "corte", "2024-06-10", "10:00"),
        ))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let updated = service
        .update(
            "55",
            AppointmentPatch {
                customer_name: Some("Ana Maria".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.customer_name, "Ana Maria");
    assert_eq!(updated.time, "10:00");
}

#[tokio::test]
async fn update_cannot_blank_out_required_fields() {
    let mock_server = MockServer::start().await;

    let service = service_for(&mock_server);
    let result = service
        .update(
            "55",
            AppointmentPatch {
                customer_name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(BookingError::Validation(_)));

    let result = service
        .update(
            "55",
            AppointmentPatch {
                customer_phone: Some(String::new()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(BookingError::Validation(_)));

    // Rejected before the record is even fetched.
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn day_listing_normalizes_and_sorts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .and(query_param("date", "2024-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booking("2", "Bia", "barba", "2024-06-10", "14:00"),
            MockBackendResponses::legacy_booking("7", "Ana", "corte", "2024-06-10", "09:00"),
            {"id": "9", "service": "corte", "date": "2024-06-10"},
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let appointments = service.list_for_day(test_date()).await.unwrap();

    // The timeless record is skipped, not an error.
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].time, "09:00");
    assert_eq!(appointments[0].id, "7");
    assert_eq!(appointments[1].time, "14:00");
}
