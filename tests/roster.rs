use chrono::NaiveDate;
use rusqlite::Connection;
use sumo_core::db::open_db_in_memory;
use sumo_core::{
    BashoId, BashoRepository, Division, NewBasho, NewMeasurement, NewRikishi, Rank, RankTitle,
    RepoError, RikishiId, RikishiRepository, Side, SqliteBashoRepository, SqliteRikishiRepository,
    ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_basho(conn: &mut Connection, name: &str, start: NaiveDate, end: NaiveDate) -> BashoId {
    let mut repo = SqliteBashoRepository::try_new(conn).unwrap();
    repo.create_basho(&NewBasho::new(name, start, end)).unwrap()
}

fn create_rikishi(conn: &mut Connection, name: &str) -> RikishiId {
    let mut repo = SqliteRikishiRepository::try_new(conn).unwrap();
    repo.create_rikishi(&NewRikishi::new(name, date(2015, 1, 1), date(1995, 1, 1)))
        .unwrap()
}

#[test]
fn enter_roster_and_read_back() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let rank = Rank::numbered(RankTitle::Yokozuna, 1, Side::East);
    let mut repo = SqliteBashoRepository::try_new(&mut conn).unwrap();
    repo.enter_roster(basho_id, rikishi_id, rank, Division::Makuuchi)
        .unwrap();

    let roster = repo.roster(basho_id).unwrap();
    assert_eq!(roster.len(), 1);
    let (rikishi, entry) = &roster[0];
    assert_eq!(rikishi.id, rikishi_id);
    assert_eq!(entry.basho_id, basho_id);
    assert_eq!(entry.rank, Some(rank));
    assert_eq!(entry.division, Some(Division::Makuuchi));
    assert_eq!(entry.rank_value, Some(rank.ordering_value()));
}

#[test]
fn enter_roster_twice_leaves_one_row_with_latest_values() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Onosato");

    let mut repo = SqliteBashoRepository::try_new(&mut conn).unwrap();
    repo.enter_roster(
        basho_id,
        rikishi_id,
        Rank::numbered(RankTitle::Juryo, 5, Side::West),
        Division::Juryo,
    )
    .unwrap();
    let promoted = Rank::numbered(RankTitle::Maegashira, 15, Side::East);
    repo.enter_roster(basho_id, rikishi_id, promoted, Division::Makuuchi)
        .unwrap();

    let roster = repo.roster(basho_id).unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].1.rank, Some(promoted));
    assert_eq!(roster[0].1.division, Some(Division::Makuuchi));
}

#[test]
fn enter_roster_rejects_rank_outside_division() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let mut repo = SqliteBashoRepository::try_new(&mut conn).unwrap();
    let err = repo
        .enter_roster(
            basho_id,
            rikishi_id,
            Rank::numbered(RankTitle::Yokozuna, 1, Side::East),
            Division::Juryo,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::RankOutsideDivision { .. })
    ));
    assert!(repo.roster(basho_id).unwrap().is_empty());
}

#[test]
fn enter_roster_reports_missing_basho_and_rikishi() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let rank = Rank::numbered(RankTitle::Maegashira, 1, Side::East);
    let mut repo = SqliteBashoRepository::try_new(&mut conn).unwrap();

    let err = repo
        .enter_roster(999, rikishi_id, rank, Division::Makuuchi)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "basho", id: 999 }));

    let err = repo
        .enter_roster(basho_id, 999, rank, Division::Makuuchi)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "rikishi", id: 999 }));
}

#[test]
fn roster_orders_by_division_then_rank_then_name() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let juryo = create_rikishi(&mut conn, "Asanoyama");
    let maegashira = create_rikishi(&mut conn, "Ura");
    let yokozuna = create_rikishi(&mut conn, "Terunofuji");
    let unranked = create_rikishi(&mut conn, "Wakatakakage");

    // Membership-only row, as the match side effect would leave behind.
    conn.execute(
        "INSERT INTO basho_rikishi (basho_id, rikishi_id, rank, division)
         VALUES (?1, ?2, NULL, NULL);",
        rusqlite::params![basho_id, unranked],
    )
    .unwrap();

    let mut repo = SqliteBashoRepository::try_new(&mut conn).unwrap();
    repo.enter_roster(
        basho_id,
        juryo,
        Rank::numbered(RankTitle::Juryo, 2, Side::East),
        Division::Juryo,
    )
    .unwrap();
    repo.enter_roster(
        basho_id,
        maegashira,
        Rank::numbered(RankTitle::Maegashira, 4, Side::West),
        Division::Makuuchi,
    )
    .unwrap();
    repo.enter_roster(
        basho_id,
        yokozuna,
        Rank::numbered(RankTitle::Yokozuna, 1, Side::East),
        Division::Makuuchi,
    )
    .unwrap();

    let order: Vec<i64> = repo
        .roster(basho_id)
        .unwrap()
        .into_iter()
        .map(|(rikishi, _)| rikishi.id)
        .collect();
    assert_eq!(order, [yokozuna, maegashira, juryo, unranked]);
}

#[test]
fn roster_reports_missing_basho() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteBashoRepository::try_new(&mut conn).unwrap();

    let err = repo.roster(42).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "basho", id: 42 }));
}

#[test]
fn record_measurement_round_trips_exact_values() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let mut repo = SqliteRikishiRepository::try_new(&mut conn).unwrap();
    repo.record_measurement(&NewMeasurement {
        rikishi_id,
        basho_id,
        height_cm: 192.0,
        weight_kg: 181.5,
    })
    .unwrap();

    let loaded = repo.measurement_for(rikishi_id, basho_id).unwrap().unwrap();
    assert_eq!(loaded.height_cm, 192.0);
    assert_eq!(loaded.weight_kg, 181.5);
}

#[test]
fn record_measurement_upserts_one_row_per_basho() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let mut repo = SqliteRikishiRepository::try_new(&mut conn).unwrap();
    for weight_kg in [180.0, 182.5] {
        repo.record_measurement(&NewMeasurement {
            rikishi_id,
            basho_id,
            height_cm: 192.0,
            weight_kg,
        })
        .unwrap();
    }

    let history = repo.measurement_history(rikishi_id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].weight_kg, 182.5);
}

#[test]
fn record_measurement_rejects_zero_height_without_inserting() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let mut repo = SqliteRikishiRepository::try_new(&mut conn).unwrap();
    let err = repo
        .record_measurement(&NewMeasurement {
            rikishi_id,
            basho_id,
            height_cm: 0.0,
            weight_kg: 150.0,
        })
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonPositiveMeasurement {
            field: "height_cm",
            ..
        })
    ));
    assert!(repo.measurement_for(rikishi_id, basho_id).unwrap().is_none());
}

#[test]
fn record_measurement_reports_missing_foreign_keys() {
    let mut conn = open_db_in_memory().unwrap();
    let basho_id = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let mut repo = SqliteRikishiRepository::try_new(&mut conn).unwrap();

    let err = repo
        .record_measurement(&NewMeasurement {
            rikishi_id: 999,
            basho_id,
            height_cm: 190.0,
            weight_kg: 160.0,
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "rikishi", id: 999 }));

    let err = repo
        .record_measurement(&NewMeasurement {
            rikishi_id,
            basho_id: 999,
            height_cm: 190.0,
            weight_kg: 160.0,
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "basho", id: 999 }));
}

#[test]
fn measurement_history_is_ordered_by_basho_start_date() {
    let mut conn = open_db_in_memory().unwrap();
    let later = create_basho(&mut conn, "Natsu 2024", date(2024, 5, 12), date(2024, 5, 26));
    let earlier = create_basho(&mut conn, "Haru 2024", date(2024, 3, 10), date(2024, 3, 24));
    let rikishi_id = create_rikishi(&mut conn, "Terunofuji");

    let mut repo = SqliteRikishiRepository::try_new(&mut conn).unwrap();
    repo.record_measurement(&NewMeasurement {
        rikishi_id,
        basho_id: later,
        height_cm: 192.0,
        weight_kg: 183.0,
    })
    .unwrap();
    repo.record_measurement(&NewMeasurement {
        rikishi_id,
        basho_id: earlier,
        height_cm: 192.0,
        weight_kg: 181.0,
    })
    .unwrap();

    let history = repo.measurement_history(rikishi_id).unwrap();
    let basho_order: Vec<i64> = history.iter().map(|m| m.basho_id).collect();
    assert_eq!(basho_order, [earlier, later]);
}
