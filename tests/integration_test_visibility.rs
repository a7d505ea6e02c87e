mod common;

use common::{admin, committee, date, guest, request, resident, setup};
use facility_scheduler::domain::models::role::{Role, RoleContext};
use facility_scheduler::error::AppError;

#[tokio::test]
async fn test_guest_read_is_redacted() {
    let (service, _store) = setup();

    let mut req = request("reservedPaid", "2025-03-01", "10:00", "11:00", "Hall rental");
    req.contact_name = Some("Jane Doe".to_string());
    req.contact_info = Some("jane@example.com".to_string());
    let created = service.create(&req, &admin()).await.unwrap();

    let view = service
        .get(&created[0].id, &guest("anon-1"))
        .await
        .unwrap();
    assert!(view.contact_name.is_none());
    assert!(view.contact_info.is_none());
    assert!(view.owner_id.is_none());

    let json = serde_json::to_value(&view).unwrap();
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("contactName"));
    assert!(!object.contains_key("contactInfo"));
    assert_eq!(object["title"], "Hall rental");
}

#[tokio::test]
async fn test_owner_reads_full_detail() {
    let (service, _store) = setup();

    let mut req = request("smallGroup", "2025-03-01", "10:00", "11:00", "Book club");
    req.contact_name = Some("Pat Smith".to_string());
    let created = service.create(&req, &resident("u7")).await.unwrap();

    let view = service.get(&created[0].id, &resident("u7")).await.unwrap();
    assert_eq!(view.contact_name.as_deref(), Some("Pat Smith"));
    assert_eq!(view.owner_id.as_deref(), Some("u7"));

    // A different resident gets the redacted default.
    let view = service.get(&created[0].id, &resident("u8")).await.unwrap();
    assert!(view.contact_name.is_none());
}

#[tokio::test]
async fn test_committee_sees_detail_for_its_category_only() {
    let (service, _store) = setup();

    let mut committee_req =
        request("committeeEvent", "2025-03-01", "10:00", "11:00", "Bake sale");
    committee_req.contact_name = Some("Chair".to_string());
    let committee_event = service.create(&committee_req, &admin()).await.unwrap();

    let mut paid_req = request("reservedPaid", "2025-03-02", "10:00", "11:00", "Rental");
    paid_req.contact_name = Some("Renter".to_string());
    let paid = service.create(&paid_req, &admin()).await.unwrap();

    let view = service
        .get(&committee_event[0].id, &committee())
        .await
        .unwrap();
    assert_eq!(view.contact_name.as_deref(), Some("Chair"));

    let view = service.get(&paid[0].id, &committee()).await.unwrap();
    assert!(view.contact_name.is_none());
}

#[tokio::test]
async fn test_list_range_projects_per_viewer_and_sorts() {
    let (service, _store) = setup();

    let mut late = request("smallGroup", "2025-03-01", "14:00", "15:00", "Afternoon");
    late.contact_name = Some("A".to_string());
    service.create(&late, &resident("u1")).await.unwrap();

    let mut early = request("smallGroup", "2025-03-01", "09:00", "10:00", "Morning");
    early.contact_name = Some("B".to_string());
    service.create(&early, &resident("u2")).await.unwrap();

    service
        .create(
            &request("boardMeeting", "2025-03-05", "10:00", "11:00", "Board"),
            &admin(),
        )
        .await
        .unwrap();

    let views = service
        .list_range(date("2025-03-01"), date("2025-03-31"), &guest("anon-1"))
        .await
        .unwrap();

    assert_eq!(views.len(), 3);
    assert_eq!(views[0].title, "Morning");
    assert_eq!(views[1].title, "Afternoon");
    assert_eq!(views[2].title, "Board");
    assert!(views.iter().all(|v| v.contact_name.is_none()));

    // The same records, unredacted for an administrator.
    let views = service
        .list_range(date("2025-03-01"), date("2025-03-31"), &admin())
        .await
        .unwrap();
    assert!(views
        .iter()
        .filter(|v| v.title != "Board")
        .all(|v| v.contact_name.is_some()));
}

#[tokio::test]
async fn test_get_unknown_booking_is_not_found() {
    let (service, _store) = setup();
    let err = service
        .get("nope", &RoleContext::new(Role::Admin, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
