use roster_core::{
    AddressRepository, AddressSchema, ConstraintKind, Gateway, RepoError, Repository,
    SchemaValidationError, UserRepository, UserSchema,
};

fn gateway_with_user() -> (Gateway, i64) {
    let gateway = Gateway::open_in_memory().unwrap();
    let id = {
        let users = UserRepository::try_new(&gateway).unwrap();
        users.save(&UserSchema::new("Ann", 30)).unwrap().id.unwrap()
    };
    (gateway, id)
}

#[test]
fn save_then_get_roundtrip() {
    let (gateway, user_id) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    let input = AddressSchema::new("ann@x.com", user_id);
    let saved = addresses.save(&input).unwrap();

    assert_eq!(input.id, None);
    assert_eq!(saved, input.with_id(1));
    assert_eq!(addresses.get(1).unwrap(), saved);
}

#[test]
fn new_address_shows_up_in_owner_snapshot() {
    let (gateway, user_id) = gateway_with_user();
    let users = UserRepository::try_new(&gateway).unwrap();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    let before = users.get(user_id).unwrap();
    let saved = addresses
        .save(&AddressSchema::new("ann@x.com", user_id))
        .unwrap();

    assert!(before.addresses.is_empty());
    assert!(users.get(user_id).unwrap().addresses.contains(&saved));
}

#[test]
fn duplicate_email_is_rejected_by_storage() {
    let (gateway, user_id) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    addresses
        .save(&AddressSchema::new("ann@x.com", user_id))
        .unwrap();
    let err = addresses
        .save(&AddressSchema::new("ann@x.com", user_id))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        }
    ));
    assert_eq!(count(&gateway), 1);

    // The failed session was released; later writes still go through.
    let next = addresses
        .save(&AddressSchema::new("ann@y.com", user_id))
        .unwrap();
    assert_eq!(next.id, Some(2));
}

#[test]
fn unknown_owner_is_rejected_by_storage() {
    let (gateway, _) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    let err = addresses
        .save(&AddressSchema::new("ghost@x.com", 404))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        }
    ));
    assert_eq!(count(&gateway), 0);
}

#[test]
fn invalid_schema_never_reaches_storage() {
    let (gateway, user_id) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    let err = addresses
        .save(&AddressSchema::new("not-an-email", user_id))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(SchemaValidationError::MalformedEmail)
    ));
    assert_eq!(count(&gateway), 0);
}

#[test]
fn get_missing_address_returns_not_found() {
    let (gateway, _) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    assert!(matches!(
        addresses.get(5),
        Err(RepoError::NotFound {
            entity: "address",
            id: 5
        })
    ));
}

#[test]
fn update_changes_email_and_keeps_owner() {
    let (gateway, user_id) = gateway_with_user();
    let users = UserRepository::try_new(&gateway).unwrap();
    let addresses = AddressRepository::try_new(&gateway).unwrap();
    let other_id = users
        .save(&UserSchema::new("Bo", 41))
        .unwrap()
        .id
        .unwrap();

    let saved = addresses
        .save(&AddressSchema::new("ann@x.com", user_id))
        .unwrap();
    let mut request = saved.with_email("ann@new.com");
    request.user_id = other_id;

    let updated = addresses.update(&request).unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.email, "ann@new.com");
    assert_eq!(updated.user_id, user_id);

    assert_eq!(addresses.get(1).unwrap(), updated);
    assert!(users.get(other_id).unwrap().addresses.is_empty());
}

#[test]
fn update_to_taken_email_is_rejected_and_rolled_back() {
    let (gateway, user_id) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    addresses
        .save(&AddressSchema::new("ann@x.com", user_id))
        .unwrap();
    let second = addresses
        .save(&AddressSchema::new("ann@y.com", user_id))
        .unwrap();

    let err = addresses
        .update(&second.with_email("ann@x.com"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        }
    ));
    assert_eq!(addresses.get(2).unwrap().email, "ann@y.com");
}

#[test]
fn update_with_stale_id_returns_not_found() {
    let (gateway, user_id) = gateway_with_user();
    let addresses = AddressRepository::try_new(&gateway).unwrap();

    let err = addresses
        .update(&AddressSchema::new("ann@x.com", user_id).with_id(9))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "address",
            id: 9
        }
    ));
    assert_eq!(count(&gateway), 0);
}

#[test]
fn repository_rejects_gateway_missing_addresses_table() {
    let gateway = Gateway::open_in_memory().unwrap();
    gateway
        .connection()
        .execute_batch("DROP TABLE addresses;")
        .unwrap();

    assert!(matches!(
        AddressRepository::try_new(&gateway),
        Err(RepoError::MissingRequiredTable("addresses"))
    ));
}

fn count(gateway: &Gateway) -> i64 {
    gateway
        .connection()
        .query_row("SELECT COUNT(*) FROM addresses;", [], |row| row.get(0))
        .unwrap()
}
