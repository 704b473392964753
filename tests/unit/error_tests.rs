//! Unit tests for `AppError` display format and classification.

use todont::AppError;

#[test]
fn display_prefixes_identify_the_kind() {
    let cases = [
        (AppError::Config("x".into()), "config: x"),
        (AppError::Db("x".into()), "db: x"),
        (AppError::Io("x".into()), "io: x"),
        (AppError::NotFound("list 'ab'".into()), "not found: list 'ab'"),
        (AppError::Validation("name is required".into()), "validation failed: name is required"),
        (AppError::PreconditionFailed("too early".into()), "precondition failed: too early"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn messages_have_no_trailing_period() {
    let err = AppError::NotFound("item 'x' in list 'y'".into());
    assert!(!err.to_string().ends_with('.'));
}

#[test]
fn domain_outcomes_are_recoverable() {
    assert!(AppError::NotFound(String::new()).is_recoverable());
    assert!(AppError::Validation(String::new()).is_recoverable());
    assert!(AppError::PreconditionFailed(String::new()).is_recoverable());
    assert!(!AppError::Db(String::new()).is_recoverable());
    assert!(!AppError::Config(String::new()).is_recoverable());
    assert!(!AppError::Io(String::new()).is_recoverable());
}

#[test]
fn toml_errors_become_config_errors() {
    let toml_err = toml::from_str::<toml::Value>("= nope").expect_err("invalid toml");
    let err: AppError = toml_err.into();
    assert!(err.to_string().starts_with("config: invalid config"));
}

#[test]
fn io_errors_become_io_errors() {
    let err: AppError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy").into();
    assert_eq!(err.to_string(), "io: busy");
}
