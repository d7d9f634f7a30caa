//! Process-wide state: the global unit registry, settings and legal age.
//!
//! Tests in this binary share one registry, so anything that changes the
//! default precision or legal age holds `GLOBAL_STATE`.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use valor_core::config::{Settings, ENV_LEGAL_AGE, ENV_UNITS};
use valor_core::temporal;
use valor_core::{json, units, BirthDate, Date, ErrorCode, Quantity, Scanner, SqlValue, Unit, Valuer};

static GLOBAL_STATE: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    init_tracing();
    GLOBAL_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `RUST_LOG=valor_core=debug cargo test` shows registry writes.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn unregistered_unit_is_not_found() {
    let err = Quantity::new(1.0, "PARSEC").unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(Unit::new("PARSEC").is_err());
}

#[test]
fn strict_registration_conflicts_globally() {
    units::register_unit_strict("CX").unwrap();
    let err = units::register_unit_strict("cx").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(units::registered_units().contains(&"CX".to_string()));
}

#[test]
fn concurrent_registration_and_lookup() {
    let writers: Vec<_> = (0..8)
        .map(|i| thread::spawn(move || units::register_units([format!("U{i}")]).unwrap()))
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    let readers: Vec<_> = (0..8)
        .map(|i| thread::spawn(move || units::is_registered(&format!("u{i}"))))
        .collect();
    for reader in readers {
        assert!(reader.join().unwrap());
    }
}

#[test]
fn quantity_json_and_sql_use_the_global_registry() {
    let _guard = lock();
    units::register_units(["L"]).unwrap();
    units::set_default_precision(2).unwrap();

    let volume: Quantity = json::decode(r#"{"value":2.5,"unit":"l"}"#).unwrap();
    assert_eq!(volume.to_string(), "2.50 L");
    assert_eq!(json::encode(&volume).unwrap(), r#"{"value":2.5,"unit":"L"}"#);

    assert_eq!(volume.to_sql(), SqlValue::Text("2.50 L".into()));
    assert_eq!(Quantity::scan(volume.to_sql()).unwrap(), volume);

    let err = json::decode::<Quantity>(r#"{"value":-1.0,"unit":"L"}"#).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    assert!(json::decode::<Quantity>(r#"{"value":1.0,"unit":"LIGHTYEAR"}"#).is_err());
}

#[test]
fn quantity_json_survives_a_precision_change() {
    let _guard = lock();
    units::register_units(["KG"]).unwrap();
    units::set_default_precision(3).unwrap();
    let weight = Quantity::new(1.575, "KG").unwrap();
    let encoded = json::encode(&weight).unwrap();
    assert_eq!(encoded, r#"{"value":1.575,"unit":"KG"}"#);

    units::set_default_precision(2).unwrap();
    let decoded: Quantity = json::decode(&encoded).unwrap();
    assert_eq!(decoded, weight);
    assert_eq!((decoded.value(), decoded.precision()), (1575, 3));
}

#[test]
fn precision_change_does_not_touch_existing_quantities() {
    let _guard = lock();
    units::register_units(["M"]).unwrap();
    units::set_default_precision(1).unwrap();
    let before = Quantity::new(1.25, "M").unwrap();

    units::set_default_precision(4).unwrap();
    let after = Quantity::new(1.25, "M").unwrap();

    assert_eq!((before.value(), before.precision()), (12, 1));
    assert_eq!((after.value(), after.precision()), (12500, 4));
    assert!(before.add(&after).unwrap_err().is_domain_violation());
    units::set_default_precision(2).unwrap();
}

#[test]
fn settings_apply_installs_units_and_legal_age() {
    let _guard = lock();
    let settings = Settings::from_lookup(|key| match key {
        ENV_UNITS => Some("dz, pct".to_string()),
        ENV_LEGAL_AGE => Some("21".to_string()),
        _ => None,
    })
    .unwrap();
    settings.apply().unwrap();

    assert!(units::is_registered("DZ"));
    assert!(units::is_registered("PCT"));
    assert_eq!(units::default_precision(), 2);
    assert_eq!(temporal::legal_age(), 21);

    let on = Date::new("2024-07-19").unwrap();
    let twenty = BirthDate::from_date_on(Date::new("2004-01-01").unwrap(), on).unwrap();
    assert!(!twenty.is_legal_age_on(&on));

    temporal::set_legal_age(temporal::DEFAULT_LEGAL_AGE);
    assert!(twenty.is_legal_age_on(&on));
}
