use workforce_core::db::open_db_in_memory;
use workforce_core::repo::location_repo::{
    attach_locations, create_location_owner, create_locations, get_locations_for_owner,
    get_locations_for_optional_owner, link_owner_to_locations, LocationQueries,
};
use workforce_core::{DatabaseConfig, DatabasePool, Location};

fn sample_locations() -> Vec<Location> {
    vec![
        Location::new("N1 9GU", "front office"),
        Location::new("N1 9GU", "loading bay"),
        Location::new("SW1A 0AA", "depot"),
    ]
}

#[test]
fn create_locations_returns_every_id_in_order() {
    let conn = open_db_in_memory().unwrap();

    let ids = create_locations(&conn, &sample_locations()).unwrap();

    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn linked_locations_read_back_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let owner_id = create_location_owner(&conn).unwrap();
    let ids = create_locations(&conn, &sample_locations()).unwrap();

    link_owner_to_locations(&conn, owner_id, &ids).unwrap();

    assert_eq!(
        get_locations_for_owner(&conn, owner_id).unwrap(),
        sample_locations()
    );
}

#[test]
fn owners_do_not_see_each_others_locations() {
    let conn = open_db_in_memory().unwrap();
    let first = create_location_owner(&conn).unwrap();
    let second = create_location_owner(&conn).unwrap();
    assert_ne!(first, second);

    attach_locations(&conn, first, &sample_locations()[..1]).unwrap();
    attach_locations(&conn, second, &sample_locations()[1..]).unwrap();

    assert_eq!(get_locations_for_owner(&conn, first).unwrap().len(), 1);
    assert_eq!(get_locations_for_owner(&conn, second).unwrap().len(), 2);
}

#[test]
fn owner_without_locations_reads_back_empty() {
    let conn = open_db_in_memory().unwrap();
    let owner_id = create_location_owner(&conn).unwrap();

    assert!(attach_locations(&conn, owner_id, &[]).unwrap().is_empty());
    assert!(get_locations_for_owner(&conn, owner_id).unwrap().is_empty());
    assert!(get_locations_for_optional_owner(&conn, None)
        .unwrap()
        .is_empty());
}

#[test]
fn linking_to_an_unknown_owner_is_bad_key() {
    let conn = open_db_in_memory().unwrap();
    let ids = create_locations(&conn, &sample_locations()[..1]).unwrap();

    let err = link_owner_to_locations(&conn, 4242, &ids).unwrap_err();

    assert_eq!(err.bad_key(), Some(format!("4242/{}", ids[0]).as_str()));
}

#[test]
fn query_module_creates_standalone_owner() {
    let dir = tempfile::tempdir().unwrap();
    let pool =
        DatabasePool::open(&DatabaseConfig::with_path(dir.path().join("owners.db"))).unwrap();

    let owner_id = LocationQueries::new(&pool)
        .unwrap()
        .create_owner_with_locations(&sample_locations())
        .unwrap();
    let loaded = LocationQueries::new(&pool)
        .unwrap()
        .get_locations_for_owner(owner_id)
        .unwrap();

    assert_eq!(loaded, sample_locations());
}
